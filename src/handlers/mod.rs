use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{DepartmentRecord, TeamRecord};
use crate::services::OrganizationChildren;

pub mod assignments;
pub mod departments;
pub mod organizations;
pub mod teams;

#[derive(Debug, Serialize)]
pub struct OrganizationSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DepartmentSummary {
    pub id: Uuid,
    pub name: String,
}

/// Department with its organization embedded, as clients consume it.
#[derive(Debug, Serialize)]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub name: String,
    pub organization: OrganizationSummary,
}

impl From<DepartmentRecord> for DepartmentResponse {
    fn from(record: DepartmentRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            organization: OrganizationSummary {
                id: record.organization_id,
                name: record.organization_name,
            },
        }
    }
}

/// Team with its department embedded.
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub department: DepartmentSummary,
}

impl From<TeamRecord> for TeamResponse {
    fn from(record: TeamRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            department: DepartmentSummary {
                id: record.department_id,
                name: record.department_name,
            },
        }
    }
}

/// Flattened subtree view returned by the children endpoint.
#[derive(Debug, Serialize)]
pub struct ChildrenResponse {
    pub departments: Vec<DepartmentResponse>,
    pub teams: Vec<TeamResponse>,
}

impl From<OrganizationChildren> for ChildrenResponse {
    fn from(children: OrganizationChildren) -> Self {
        Self {
            departments: children.departments.into_iter().map(Into::into).collect(),
            teams: children.teams.into_iter().map(Into::into).collect(),
        }
    }
}
