use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::CallContext;
use crate::database::manager::{is_unique_violation, DatabaseError, DatabaseManager};
use crate::database::models::{DepartmentRecord, TeamRecord};
use crate::database::{DepartmentStore, TeamStore};
use crate::error::ApiError;
use crate::services::validate_name;

#[derive(Debug, Deserialize)]
pub struct TeamInput {
    pub name: String,
    #[serde(rename = "departmentId")]
    pub department_id: Option<Uuid>,
}

pub struct TeamService {
    teams: TeamStore,
    departments: DepartmentStore,
}

impl TeamService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            teams: TeamStore::new(pool.clone()),
            departments: DepartmentStore::new(pool),
        }
    }

    pub async fn from_config() -> Result<Self, ApiError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }

    pub async fn list(&self, ctx: &CallContext) -> Result<Vec<TeamRecord>, ApiError> {
        if ctx.is_root_admin() {
            Ok(self.teams.list_all().await?)
        } else {
            let organization_id = ctx.current_organization_id()?;
            Ok(self.teams.list_by_organization(organization_id).await?)
        }
    }

    pub async fn list_by_department(
        &self,
        ctx: &CallContext,
        department_id: Uuid,
    ) -> Result<Vec<TeamRecord>, ApiError> {
        if !ctx.is_root_admin() {
            // The department itself must be inside the caller's organization
            let organization_id = ctx.current_organization_id()?;
            self.resolve_department(department_id, Some(organization_id)).await?;
        }

        Ok(self.teams.list_by_department(department_id).await?)
    }

    pub async fn create(&self, ctx: &CallContext, input: TeamInput) -> Result<TeamRecord, ApiError> {
        let name = validate_name(&input.name, "Team")?;
        let department_id = input
            .department_id
            .ok_or_else(|| ApiError::bad_request("Department ID must be provided to create a team."))?;

        let scope = if ctx.is_root_admin() {
            None
        } else {
            Some(ctx.current_organization_id()?)
        };
        let department = self.resolve_department(department_id, scope).await?;

        if self.teams.exists_by_name_in_department(&name, department_id).await? {
            return Err(duplicate_name(&name));
        }

        let created = match self.teams.insert(&name, department_id).await {
            Ok(row) => row,
            Err(DatabaseError::Sqlx(e)) if is_unique_violation(&e) => {
                return Err(duplicate_name(&name))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(TeamRecord {
            id: created.id,
            name: created.name,
            department_id: department.id,
            department_name: department.name,
        })
    }

    pub async fn get(&self, ctx: &CallContext, id: Uuid) -> Result<TeamRecord, ApiError> {
        if ctx.is_root_admin() {
            self.teams
                .get(id)
                .await?
                .ok_or_else(|| ApiError::not_found(format!("Team not found with id: {}", id)))
        } else {
            let organization_id = ctx.current_organization_id()?;
            self.teams
                .get_in_organization(id, organization_id)
                .await?
                .ok_or_else(|| not_found_in_org(id, organization_id))
        }
    }

    /// Rename and/or re-parent. The target department is resolved through the
    /// caller's tenant scope, so a cross-organization move reads as a missing
    /// department.
    pub async fn update(
        &self,
        ctx: &CallContext,
        id: Uuid,
        input: TeamInput,
    ) -> Result<TeamRecord, ApiError> {
        let name = validate_name(&input.name, "Team")?;
        let department_id = input
            .department_id
            .ok_or_else(|| ApiError::bad_request("Department ID must be provided to update a team."))?;

        let (existing, department) = if ctx.is_root_admin() {
            let existing = self
                .teams
                .get(id)
                .await?
                .ok_or_else(|| ApiError::not_found(format!("Team not found with id: {}", id)))?;
            let department = self.resolve_department(department_id, None).await?;
            (existing, department)
        } else {
            let organization_id = ctx.current_organization_id()?;
            let existing = self
                .teams
                .get_in_organization(id, organization_id)
                .await?
                .ok_or_else(|| not_found_in_org(id, organization_id))?;
            let department = self
                .resolve_department(department_id, Some(organization_id))
                .await?;
            (existing, department)
        };

        // A rename that only changes case of the team's own name passes; any
        // other collision in the target department is rejected.
        let taken = self.teams.exists_by_name_in_department(&name, department.id).await?;
        if taken && !existing.name.eq_ignore_ascii_case(&name) {
            return Err(duplicate_name(&name));
        }

        let updated = match self.teams.update(id, &name, department.id).await {
            Ok(Some(row)) => row,
            Ok(None) => return Err(ApiError::not_found(format!("Team not found with id: {}", id))),
            Err(DatabaseError::Sqlx(e)) if is_unique_violation(&e) => {
                return Err(duplicate_name(&name))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(TeamRecord {
            id: updated.id,
            name: updated.name,
            department_id: department.id,
            department_name: department.name,
        })
    }

    pub async fn delete(&self, ctx: &CallContext, id: Uuid) -> Result<(), ApiError> {
        let deleted = if ctx.is_root_admin() {
            self.teams.delete(id).await?
        } else {
            let organization_id = ctx.current_organization_id()?;
            if !self.teams.exists_in_organization(id, organization_id).await? {
                return Err(not_found_in_org(id, organization_id));
            }
            self.teams.delete_in_organization(id, organization_id).await?
        };

        if !deleted {
            return Err(ApiError::not_found(format!("Team not found with id: {}", id)));
        }

        Ok(())
    }

    /// Fetch a department, tenant-scoped when a scope is given.
    async fn resolve_department(
        &self,
        department_id: Uuid,
        organization_id: Option<Uuid>,
    ) -> Result<DepartmentRecord, ApiError> {
        match organization_id {
            Some(org) => self
                .departments
                .get_in_organization(department_id, org)
                .await?
                .ok_or_else(|| {
                    ApiError::not_found(format!(
                        "Department not found with id {} in organization {}",
                        department_id, org
                    ))
                }),
            None => self.departments.get(department_id).await?.ok_or_else(|| {
                ApiError::not_found(format!("Department not found with id {}", department_id))
            }),
        }
    }
}

fn duplicate_name(name: &str) -> ApiError {
    ApiError::bad_request(format!(
        "A team with the name '{}' already exists in this department.",
        name
    ))
}

fn not_found_in_org(id: Uuid, organization_id: Uuid) -> ApiError {
    ApiError::not_found(format!(
        "Team not found with id: {} in organization: {}",
        id, organization_id
    ))
}
