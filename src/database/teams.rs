use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Team, TeamRecord};

const RECORD_COLUMNS: &str = "t.id, t.name, t.department_id, d.name AS department_name";

/// Team queries. A team's organization is reached through its department, so
/// tenant-scoped lookups join one level up.
pub struct TeamStore {
    pool: PgPool,
}

impl TeamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Root-admin path: every team across all organizations.
    pub async fn list_all(&self) -> Result<Vec<TeamRecord>, DatabaseError> {
        let rows = sqlx::query_as::<_, TeamRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM teams t \
             JOIN departments d ON d.id = t.department_id \
             ORDER BY d.name, t.name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<TeamRecord>, DatabaseError> {
        let rows = sqlx::query_as::<_, TeamRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM teams t \
             JOIN departments d ON d.id = t.department_id \
             WHERE d.organization_id = $1 \
             ORDER BY d.name, t.name"
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_department(
        &self,
        department_id: Uuid,
    ) -> Result<Vec<TeamRecord>, DatabaseError> {
        let rows = sqlx::query_as::<_, TeamRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM teams t \
             JOIN departments d ON d.id = t.department_id \
             WHERE t.department_id = $1 \
             ORDER BY t.name"
        ))
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Root-admin path: unscoped lookup.
    pub async fn get(&self, id: Uuid) -> Result<Option<TeamRecord>, DatabaseError> {
        let row = sqlx::query_as::<_, TeamRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM teams t \
             JOIN departments d ON d.id = t.department_id \
             WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_in_organization(
        &self,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<TeamRecord>, DatabaseError> {
        let row = sqlx::query_as::<_, TeamRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM teams t \
             JOIN departments d ON d.id = t.department_id \
             WHERE t.id = $1 AND d.organization_id = $2"
        ))
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn exists_in_organization(
        &self,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM teams t \
             JOIN departments d ON d.id = t.department_id \
             WHERE t.id = $1 AND d.organization_id = $2)",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn exists_by_name_in_department(
        &self,
        name: &str,
        department_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM teams WHERE name = $1 AND department_id = $2)",
        )
        .bind(name)
        .bind(department_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn insert(&self, name: &str, department_id: Uuid) -> Result<Team, DatabaseError> {
        let row = sqlx::query_as::<_, Team>(
            "INSERT INTO teams (name, department_id) VALUES ($1, $2) \
             RETURNING id, name, department_id, created_at, updated_at",
        )
        .bind(name)
        .bind(department_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Updates name and parent department; re-parenting stays within the
    /// caller's organization because the target department is resolved
    /// tenant-scoped before this runs.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        department_id: Uuid,
    ) -> Result<Option<Team>, DatabaseError> {
        let row = sqlx::query_as::<_, Team>(
            "UPDATE teams SET name = $2, department_id = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING id, name, department_id, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Root-admin path: unscoped delete.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_in_organization(
        &self,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM teams t USING departments d \
             WHERE d.id = t.department_id AND t.id = $1 AND d.organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
