use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod survey_service;
pub mod user_service;

pub use survey_service::SurveyServiceClient;
pub use user_service::UserServiceClient;

/// Outcome of a remote existence probe. Unknown covers any transport-level
/// failure, including the probe deadline; callers treat it as fatal for the
/// operation in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Present,
    Absent,
    Unknown,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{service} returned status {status}")]
    UnexpectedStatus { service: &'static str, status: u16 },

    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Placement record dispatched to the user-service alongside assign/remove
/// calls. A DEPARTMENT record carries no team id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentRecord {
    #[serde(rename = "departmentId")]
    pub department_id: Uuid,
    #[serde(rename = "teamId")]
    pub team_id: Option<Uuid>,
    #[serde(rename = "assignmentType")]
    pub assignment_type: AssignmentKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssignmentKind {
    #[serde(rename = "DEPARTMENT")]
    Department,
    #[serde(rename = "TEAM")]
    Team,
}

impl AssignmentRecord {
    pub fn department(department_id: Uuid) -> Self {
        Self {
            department_id,
            team_id: None,
            assignment_type: AssignmentKind::Department,
        }
    }

    pub fn team(department_id: Uuid, team_id: Uuid) -> Self {
        Self {
            department_id,
            team_id: Some(team_id),
            assignment_type: AssignmentKind::Team,
        }
    }

    /// Path segment of the user-service placement endpoints.
    pub fn target_segment(&self) -> &'static str {
        match self.assignment_type {
            AssignmentKind::Department => "department",
            AssignmentKind::Team => "team",
        }
    }
}

/// User-service contract: existence probe plus placement dispatch.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, user_id: Uuid) -> Existence;
    async fn assign(&self, user_id: Uuid, record: &AssignmentRecord) -> Result<(), ClientError>;
    async fn remove(&self, user_id: Uuid, record: &AssignmentRecord) -> Result<(), ClientError>;
}

/// Survey-service contract: existence probe only.
#[async_trait]
pub trait SurveyDirectory: Send + Sync {
    async fn survey_exists(&self, survey_id: Uuid) -> Existence;
}

static USER_SERVICE: Lazy<Arc<UserServiceClient>> =
    Lazy::new(|| Arc::new(UserServiceClient::from_config()));

static SURVEY_SERVICE: Lazy<Arc<SurveyServiceClient>> =
    Lazy::new(|| Arc::new(SurveyServiceClient::from_config()));

pub fn user_directory() -> Arc<dyn UserDirectory> {
    USER_SERVICE.clone()
}

pub fn survey_directory() -> Arc<dyn SurveyDirectory> {
    SURVEY_SERVICE.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_record_has_null_team_id() {
        let dept = Uuid::new_v4();
        let record = AssignmentRecord::department(dept);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["departmentId"], serde_json::json!(dept));
        assert_eq!(json["teamId"], serde_json::Value::Null);
        assert_eq!(json["assignmentType"], "DEPARTMENT");
        assert_eq!(record.target_segment(), "department");
    }

    #[test]
    fn team_record_carries_parent_department() {
        let dept = Uuid::new_v4();
        let team = Uuid::new_v4();
        let record = AssignmentRecord::team(dept, team);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["departmentId"], serde_json::json!(dept));
        assert_eq!(json["teamId"], serde_json::json!(team));
        assert_eq!(json["assignmentType"], "TEAM");
        assert_eq!(record.target_segment(), "team");
    }
}
