use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::CallContext;
use crate::database::manager::{is_unique_violation, DatabaseError, DatabaseManager};
use crate::database::models::DepartmentRecord;
use crate::database::{DepartmentStore, OrganizationStore};
use crate::error::ApiError;
use crate::services::validate_name;

#[derive(Debug, Deserialize)]
pub struct DepartmentInput {
    pub name: String,
    #[serde(rename = "organizationId")]
    pub organization_id: Option<Uuid>,
}

pub struct DepartmentService {
    departments: DepartmentStore,
    organizations: OrganizationStore,
}

impl DepartmentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            departments: DepartmentStore::new(pool.clone()),
            organizations: OrganizationStore::new(pool),
        }
    }

    pub async fn from_config() -> Result<Self, ApiError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }

    pub async fn list(&self, ctx: &CallContext) -> Result<Vec<DepartmentRecord>, ApiError> {
        if ctx.is_root_admin() {
            Ok(self.departments.list_all().await?)
        } else {
            let organization_id = ctx.current_organization_id()?;
            Ok(self.departments.list_by_organization(organization_id).await?)
        }
    }

    pub async fn create(
        &self,
        ctx: &CallContext,
        input: DepartmentInput,
    ) -> Result<DepartmentRecord, ApiError> {
        let name = validate_name(&input.name, "Department")?;

        // Root admins name the target organization; tenant callers are bound
        // to their own regardless of what the body says.
        let organization_id = if ctx.is_root_admin() {
            input.organization_id.ok_or_else(|| {
                ApiError::bad_request("Organization ID is required for root department creation")
            })?
        } else {
            ctx.current_organization_id()?
        };

        let organization = self.organizations.get(organization_id).await?.ok_or_else(|| {
            ApiError::not_found(format!("Organization not found with id {}", organization_id))
        })?;

        if self
            .departments
            .exists_by_name_in_organization(&name, organization_id)
            .await?
        {
            return Err(duplicate_name(&name));
        }

        let created = match self.departments.insert(&name, organization_id).await {
            Ok(row) => row,
            Err(DatabaseError::Sqlx(e)) if is_unique_violation(&e) => {
                return Err(duplicate_name(&name))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(DepartmentRecord {
            id: created.id,
            name: created.name,
            organization_id: organization.id,
            organization_name: organization.name,
        })
    }

    pub async fn get(&self, ctx: &CallContext, id: Uuid) -> Result<DepartmentRecord, ApiError> {
        if ctx.is_root_admin() {
            self.departments
                .get(id)
                .await?
                .ok_or_else(|| ApiError::not_found(format!("Department not found with id {}", id)))
        } else {
            let organization_id = ctx.current_organization_id()?;
            self.departments
                .get_in_organization(id, organization_id)
                .await?
                .ok_or_else(|| not_found_in_org(id, organization_id))
        }
    }

    pub async fn update(
        &self,
        ctx: &CallContext,
        id: Uuid,
        input: DepartmentInput,
    ) -> Result<DepartmentRecord, ApiError> {
        let name = validate_name(&input.name, "Department")?;

        // Root admins may rebind the department (and its teams) to another
        // organization; tenant callers keep theirs and the field is ignored.
        let (existing, target_organization_id, target_organization_name) = if ctx.is_root_admin() {
            let target = input.organization_id.ok_or_else(|| {
                ApiError::bad_request("Organization ID is required for root department update")
            })?;

            let existing = self.departments.get(id).await?.ok_or_else(|| {
                ApiError::not_found(format!("Department not found with id {}", id))
            })?;

            let organization = self.organizations.get(target).await?.ok_or_else(|| {
                ApiError::not_found(format!("Organization not found with id {}", target))
            })?;

            (existing, organization.id, organization.name)
        } else {
            let organization_id = ctx.current_organization_id()?;
            let existing = self
                .departments
                .get_in_organization(id, organization_id)
                .await?
                .ok_or_else(|| not_found_in_org(id, organization_id))?;

            let organization_name = existing.organization_name.clone();
            (existing, organization_id, organization_name)
        };

        if self
            .departments
            .exists_by_name_in_organization_excluding(&name, target_organization_id, existing.id)
            .await?
        {
            return Err(duplicate_name(&name));
        }

        let updated = match self
            .departments
            .update(id, &name, target_organization_id)
            .await
        {
            Ok(Some(row)) => row,
            Ok(None) => {
                return Err(ApiError::not_found(format!("Department not found with id {}", id)))
            }
            Err(DatabaseError::Sqlx(e)) if is_unique_violation(&e) => {
                return Err(duplicate_name(&name))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(DepartmentRecord {
            id: updated.id,
            name: updated.name,
            organization_id: target_organization_id,
            organization_name: target_organization_name,
        })
    }

    /// Deletes the department; teams and membership rows go with it.
    pub async fn delete(&self, ctx: &CallContext, id: Uuid) -> Result<(), ApiError> {
        let deleted = if ctx.is_root_admin() {
            self.departments.delete(id).await?
        } else {
            let organization_id = ctx.current_organization_id()?;
            self.departments.delete_in_organization(id, organization_id).await?
        };

        if !deleted {
            return Err(ApiError::not_found(format!("Department not found with id {}", id)));
        }

        Ok(())
    }
}

fn duplicate_name(name: &str) -> ApiError {
    ApiError::bad_request(format!(
        "A department with the name '{}' already exists in this organization.",
        name
    ))
}

fn not_found_in_org(id: Uuid, organization_id: Uuid) -> ApiError {
    ApiError::not_found(format!(
        "Department not found with id {} in organization {}",
        id, organization_id
    ))
}
