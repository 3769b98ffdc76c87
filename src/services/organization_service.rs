use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::CallContext;
use crate::database::manager::DatabaseManager;
use crate::database::models::{DepartmentRecord, Organization, TeamRecord};
use crate::database::{DepartmentStore, OrganizationStore, TeamStore};
use crate::error::ApiError;
use crate::services::validate_name;

#[derive(Debug, Deserialize)]
pub struct OrganizationInput {
    pub name: String,
}

/// Denormalized view of an organization's subtree.
#[derive(Debug)]
pub struct OrganizationChildren {
    pub departments: Vec<DepartmentRecord>,
    pub teams: Vec<TeamRecord>,
}

pub struct OrganizationService {
    organizations: OrganizationStore,
    departments: DepartmentStore,
    teams: TeamStore,
}

impl OrganizationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            organizations: OrganizationStore::new(pool.clone()),
            departments: DepartmentStore::new(pool.clone()),
            teams: TeamStore::new(pool),
        }
    }

    pub async fn from_config() -> Result<Self, ApiError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }

    pub async fn list(&self, ctx: &CallContext) -> Result<Vec<Organization>, ApiError> {
        if !ctx.is_root_admin() {
            return Err(ApiError::forbidden(
                "Only root administrators may list all organizations",
            ));
        }

        Ok(self.organizations.list().await?)
    }

    /// Self-service bootstrap: the one mutation that takes no caller context.
    pub async fn create(&self, input: OrganizationInput) -> Result<Organization, ApiError> {
        let name = validate_name(&input.name, "Organization")?;
        Ok(self.organizations.insert(&name).await?)
    }

    /// Unauthenticated probe used by peer services.
    pub async fn exists(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.organizations.exists(id).await?)
    }

    pub async fn get(&self, ctx: &CallContext, id: Uuid) -> Result<Organization, ApiError> {
        ctx.require_organization_access(id)?;

        self.organizations
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Organization not found with id {}", id)))
    }

    pub async fn update(
        &self,
        ctx: &CallContext,
        id: Uuid,
        input: OrganizationInput,
    ) -> Result<Organization, ApiError> {
        ctx.require_organization_access(id)?;
        let name = validate_name(&input.name, "Organization")?;

        self.organizations
            .update(id, &name)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Organization not found with id {}", id)))
    }

    pub async fn delete(&self, ctx: &CallContext, id: Uuid) -> Result<(), ApiError> {
        ctx.require_organization_access(id)?;

        if !self.organizations.delete(id).await? {
            return Err(ApiError::not_found(format!("Organization not found with id {}", id)));
        }

        Ok(())
    }

    pub async fn children(
        &self,
        ctx: &CallContext,
        id: Uuid,
    ) -> Result<OrganizationChildren, ApiError> {
        ctx.require_organization_access(id)?;

        if !self.organizations.exists(id).await? {
            return Err(ApiError::not_found(format!("Organization not found with id {}", id)));
        }

        let departments = self.departments.list_by_organization(id).await?;
        let teams = self.teams.list_by_organization(id).await?;

        Ok(OrganizationChildren { departments, teams })
    }
}
