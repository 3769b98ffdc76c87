use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Department, DepartmentRecord};

const RECORD_COLUMNS: &str =
    "d.id, d.name, d.organization_id, o.name AS organization_name";

/// Department queries. Tenant scoping is always a SQL predicate so a miss and
/// a cross-tenant row are indistinguishable to the caller.
pub struct DepartmentStore {
    pool: PgPool,
}

impl DepartmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Root-admin path: every department across all organizations.
    pub async fn list_all(&self) -> Result<Vec<DepartmentRecord>, DatabaseError> {
        let rows = sqlx::query_as::<_, DepartmentRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM departments d \
             JOIN organizations o ON o.id = d.organization_id \
             ORDER BY o.name, d.name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<DepartmentRecord>, DatabaseError> {
        let rows = sqlx::query_as::<_, DepartmentRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM departments d \
             JOIN organizations o ON o.id = d.organization_id \
             WHERE d.organization_id = $1 \
             ORDER BY d.name"
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Root-admin path: unscoped lookup.
    pub async fn get(&self, id: Uuid) -> Result<Option<DepartmentRecord>, DatabaseError> {
        let row = sqlx::query_as::<_, DepartmentRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM departments d \
             JOIN organizations o ON o.id = d.organization_id \
             WHERE d.id = $1"
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
    ) -> Result<Option<DepartmentRecord>, DatabaseError> {
        let row = sqlx::query_as::<_, DepartmentRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM departments d \
             JOIN organizations o ON o.id = d.organization_id \
             WHERE d.id = $1 AND d.organization_id = $2"
        ))
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn exists_by_name_in_organization(
        &self,
        name: &str,
        organization_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE name = $1 AND organization_id = $2)",
        )
        .bind(name)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Rename check: does another department already hold this name?
    pub async fn exists_by_name_in_organization_excluding(
        &self,
        name: &str,
        organization_id: Uuid,
        excluded_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM departments \
             WHERE name = $1 AND organization_id = $2 AND id <> $3)",
        )
        .bind(name)
        .bind(organization_id)
        .bind(excluded_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn insert(
        &self,
        name: &str,
        organization_id: Uuid,
    ) -> Result<Department, DatabaseError> {
        let row = sqlx::query_as::<_, Department>(
            "INSERT INTO departments (name, organization_id) VALUES ($1, $2) \
             RETURNING id, name, organization_id, created_at, updated_at",
        )
        .bind(name)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Updates name and owning organization. Root admins use the latter to
    /// move a department (and its teams) between organizations.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        organization_id: Uuid,
    ) -> Result<Option<Department>, DatabaseError> {
        let row = sqlx::query_as::<_, Department>(
            "UPDATE departments SET name = $2, organization_id = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING id, name, organization_id, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Root-admin path: unscoped delete, cascades to teams.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
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
        let result =
            sqlx::query("DELETE FROM departments WHERE id = $1 AND organization_id = $2")
                .bind(id)
                .bind(organization_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
