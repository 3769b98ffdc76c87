use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Organization;

pub struct OrganizationStore {
    pool: PgPool,
}

impl OrganizationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Organization>, DatabaseError> {
        let rows = sqlx::query_as::<_, Organization>(
            "SELECT id, name, created_at, updated_at FROM organizations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Organization>, DatabaseError> {
        let row = sqlx::query_as::<_, Organization>(
            "SELECT id, name, created_at, updated_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM organizations WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn insert(&self, name: &str) -> Result<Organization, DatabaseError> {
        let row = sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (name) VALUES ($1) \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update(&self, id: Uuid, name: &str) -> Result<Option<Organization>, DatabaseError> {
        let row = sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET name = $2, updated_at = now() WHERE id = $1 \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Deletes the organization and, through the schema cascade, its whole
    /// subtree of departments, teams and membership rows.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
