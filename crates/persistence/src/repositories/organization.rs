//! Organization repository for database operations.

use async_trait::async_trait;
use domain::models::Organization;
use domain::services::{OrgStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::backend_error;
use crate::entities::OrganizationEntity;
use crate::metrics::QueryTimer;

/// Repository for organization database operations.
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find organizations by ID in one round trip.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<OrganizationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_organizations_by_ids");
        let result = sqlx::query_as::<_, OrganizationEntity>(
            r#"
            SELECT id, name
            FROM organizations
            WHERE id = ANY($1)
            ORDER BY name
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl OrgStore for OrganizationRepository {
    async fn search_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Organization>, StoreError> {
        let entities = self.find_by_ids(ids).await.map_err(backend_error)?;
        Ok(entities.into_iter().map(Into::into).collect())
    }
}
