//! User repository for database operations.

use async_trait::async_trait;
use domain::models::{UpsertExternalUser, User, LDAP_AUTH_MODULE};
use domain::services::{StoreError, UserStore};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::backend_error;
use crate::entities::{OrgRoleDb, UserEntity};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str =
    "id, login, email, name, auth_module, auth_id, is_admin, is_disabled, created_at, updated_at";

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark the directory-sourced user with this login disabled.
    ///
    /// Returns the number of rows changed.
    pub async fn disable_by_login(
        &self,
        login: &str,
        auth_module: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("disable_external_user");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_disabled = TRUE, updated_at = NOW()
            WHERE login = $1 AND auth_module = $2
            "#,
        )
        .bind(login)
        .bind(auth_module)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }

    /// Whether any user, whatever its auth module, has this login.
    pub async fn login_exists(&self, login: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("user_login_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)",
        )
        .bind(login)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert or update the user and replace its org roles, atomically.
    ///
    /// Returns `None` when the user is unknown and signup is not allowed.
    pub async fn upsert_external(
        &self,
        cmd: &UpsertExternalUser,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let ext = &cmd.external_user;
        let timer = QueryTimer::new("upsert_external_user");

        let mut tx = self.pool.begin().await?;

        // Prefer the row linked to this directory entry over a login match
        let existing = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE (auth_module = $1 AND auth_id = $2) OR login = $3
            ORDER BY (auth_id = $2) DESC NULLS LAST
            LIMIT 1
            FOR UPDATE
            "#,
            USER_COLUMNS
        ))
        .bind(&ext.auth_module)
        .bind(&ext.auth_id)
        .bind(&ext.login)
        .fetch_optional(&mut *tx)
        .await?;

        let user = match existing {
            Some(current) => {
                sqlx::query_as::<_, UserEntity>(&format!(
                    r#"
                    UPDATE users
                    SET login = $2,
                        email = CASE WHEN $3 = '' THEN email ELSE $3 END,
                        name = CASE WHEN $4 = '' THEN name ELSE $4 END,
                        auth_module = $5,
                        auth_id = $6,
                        is_admin = COALESCE($7, is_admin),
                        is_disabled = $8,
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING {}
                    "#,
                    USER_COLUMNS
                ))
                .bind(current.id)
                .bind(&ext.login)
                .bind(&ext.email)
                .bind(&ext.name)
                .bind(&ext.auth_module)
                .bind(&ext.auth_id)
                .bind(ext.is_admin)
                .bind(ext.is_disabled)
                .fetch_one(&mut *tx)
                .await?
            }
            None if !cmd.signup_allowed => {
                timer.record();
                return Ok(None);
            }
            None => {
                sqlx::query_as::<_, UserEntity>(&format!(
                    r#"
                    INSERT INTO users (login, email, name, auth_module, auth_id, is_admin, is_disabled)
                    VALUES ($1, $2, $3, $4, $5, COALESCE($6, FALSE), $7)
                    RETURNING {}
                    "#,
                    USER_COLUMNS
                ))
                .bind(&ext.login)
                .bind(&ext.email)
                .bind(&ext.name)
                .bind(&ext.auth_module)
                .bind(&ext.auth_id)
                .bind(ext.is_admin)
                .bind(ext.is_disabled)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        // An empty role map leaves existing memberships alone
        if !ext.org_roles.is_empty() {
            let org_ids: Vec<Uuid> = ext.org_roles.keys().copied().collect();

            sqlx::query(
                r#"
                DELETE FROM org_users
                WHERE user_id = $1 AND NOT (org_id = ANY($2))
                "#,
            )
            .bind(user.id)
            .bind(&org_ids)
            .execute(&mut *tx)
            .await?;

            for (org_id, role) in &ext.org_roles {
                sqlx::query(
                    r#"
                    INSERT INTO org_users (org_id, user_id, role)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (org_id, user_id)
                    DO UPDATE SET role = EXCLUDED.role, updated_at = NOW()
                    "#,
                )
                .bind(org_id)
                .bind(user.id)
                .bind(OrgRoleDb::from(*role))
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        timer.record();

        debug!(user_id = %user.id, orgs = ext.org_roles.len(), "Org roles synced");
        Ok(Some(user))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let entity = self.find_by_id(id).await.map_err(backend_error)?;
        Ok(entity.map(Into::into))
    }

    async fn upsert(&self, cmd: UpsertExternalUser) -> Result<User, StoreError> {
        match self.upsert_external(&cmd).await.map_err(backend_error)? {
            Some(entity) => {
                info!(user_id = %entity.id, login = %entity.login, "External user upserted");
                Ok(entity.into())
            }
            None => Err(StoreError::SignupNotAllowed(cmd.external_user.login)),
        }
    }

    async fn disable_external(&self, login: &str) -> Result<(), StoreError> {
        let changed = self
            .disable_by_login(login, LDAP_AUTH_MODULE)
            .await
            .map_err(backend_error)?;

        if changed > 0 {
            return Ok(());
        }

        if self.login_exists(login).await.map_err(backend_error)? {
            Err(StoreError::NotExternal(login.to_string()))
        } else {
            Err(StoreError::NotFound(login.to_string()))
        }
    }
}
