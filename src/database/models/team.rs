use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Team joined with its department summary.
#[derive(Debug, Clone, FromRow)]
pub struct TeamRecord {
    pub id: Uuid,
    pub name: String,
    pub department_id: Uuid,
    pub department_name: String,
}
