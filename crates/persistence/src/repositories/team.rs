//! Team repository for database operations.

use async_trait::async_trait;
use domain::models::TeamMembership;
use domain::services::{StoreError, TeamStore};
use sqlx::PgPool;

use super::backend_error;
use crate::entities::TeamMembershipEntity;
use crate::metrics::QueryTimer;

/// Repository for team database operations.
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Teams linked to any of the given directory groups.
    ///
    /// Group DNs are compared case-insensitively.
    pub async fn find_by_directory_groups(
        &self,
        groups: &[String],
    ) -> Result<Vec<TeamMembershipEntity>, sqlx::Error> {
        let lowered: Vec<String> = groups.iter().map(|g| g.to_lowercase()).collect();

        let timer = QueryTimer::new("find_teams_by_directory_groups");
        let result = sqlx::query_as::<_, TeamMembershipEntity>(
            r#"
            SELECT t.id AS team_id, t.name AS team_name,
                   o.id AS org_id, o.name AS org_name,
                   g.group_dn
            FROM team_directory_groups g
            JOIN teams t ON t.id = g.team_id
            JOIN organizations o ON o.id = t.org_id
            WHERE lower(g.group_dn) = ANY($1)
            ORDER BY o.name, t.name
            "#,
        )
        .bind(&lowered)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl TeamStore for TeamRepository {
    async fn teams_for_directory_groups(
        &self,
        groups: &[String],
    ) -> Result<Vec<TeamMembership>, StoreError> {
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let entities = self
            .find_by_directory_groups(groups)
            .await
            .map_err(backend_error)?;
        Ok(entities.into_iter().map(Into::into).collect())
    }
}
