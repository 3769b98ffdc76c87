use sqlx::PgConnection;
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Owner of a membership set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Department,
    Team,
}

impl HostKind {
    pub fn label(self) -> &'static str {
        match self {
            HostKind::Department => "Department",
            HostKind::Team => "Team",
        }
    }

    pub fn label_lower(self) -> &'static str {
        match self {
            HostKind::Department => "department",
            HostKind::Team => "team",
        }
    }
}

/// Kind of id stored in a membership set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    User,
    Survey,
}

impl MemberKind {
    pub fn label(self) -> &'static str {
        match self {
            MemberKind::User => "User",
            MemberKind::Survey => "Survey",
        }
    }
}

/// Fixed identifiers for the four membership tables. Interpolating these into
/// SQL is safe: they never originate from request data.
fn table_for(host: HostKind, member: MemberKind) -> (&'static str, &'static str, &'static str) {
    match (host, member) {
        (HostKind::Department, MemberKind::User) => ("department_users", "department_id", "user_id"),
        (HostKind::Department, MemberKind::Survey) => {
            ("department_surveys", "department_id", "survey_id")
        }
        (HostKind::Team, MemberKind::User) => ("team_users", "team_id", "user_id"),
        (HostKind::Team, MemberKind::Survey) => ("team_surveys", "team_id", "survey_id"),
    }
}

/// A host row locked for the duration of the surrounding transaction.
#[derive(Debug, Clone, Copy)]
pub struct LockedHost {
    pub id: Uuid,
    /// Parent department for team hosts; the host itself for departments.
    pub department_id: Uuid,
}

/// Resolve the host tenant-scoped and take a row lock on it. Returns None
/// when the host does not exist inside the organization, which callers report
/// as NotFound without distinguishing the cross-tenant case.
pub async fn lock_host(
    conn: &mut PgConnection,
    host: HostKind,
    host_id: Uuid,
    organization_id: Uuid,
) -> Result<Option<LockedHost>, DatabaseError> {
    let row: Option<(Uuid, Uuid)> = match host {
        HostKind::Department => {
            sqlx::query_as(
                "SELECT id, id FROM departments \
                 WHERE id = $1 AND organization_id = $2 FOR UPDATE",
            )
            .bind(host_id)
            .bind(organization_id)
            .fetch_optional(conn)
            .await?
        }
        HostKind::Team => {
            sqlx::query_as(
                "SELECT t.id, t.department_id FROM teams t \
                 JOIN departments d ON d.id = t.department_id \
                 WHERE t.id = $1 AND d.organization_id = $2 FOR UPDATE OF t",
            )
            .bind(host_id)
            .bind(organization_id)
            .fetch_optional(conn)
            .await?
        }
    };

    Ok(row.map(|(id, department_id)| LockedHost { id, department_id }))
}

pub async fn contains(
    conn: &mut PgConnection,
    host: HostKind,
    member: MemberKind,
    host_id: Uuid,
    member_id: Uuid,
) -> Result<bool, DatabaseError> {
    let (table, host_col, member_col) = table_for(host, member);
    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {table} WHERE {host_col} = $1 AND {member_col} = $2)"
    ))
    .bind(host_id)
    .bind(member_id)
    .fetch_one(conn)
    .await?;

    Ok(exists)
}

/// Insert a membership row. A unique violation bubbles out as a raw sqlx
/// error so the service layer can map the race to its invariant message.
pub async fn insert(
    conn: &mut PgConnection,
    host: HostKind,
    member: MemberKind,
    host_id: Uuid,
    member_id: Uuid,
) -> Result<(), DatabaseError> {
    let (table, host_col, member_col) = table_for(host, member);
    sqlx::query(&format!(
        "INSERT INTO {table} ({host_col}, {member_col}) VALUES ($1, $2)"
    ))
    .bind(host_id)
    .bind(member_id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn remove(
    conn: &mut PgConnection,
    host: HostKind,
    member: MemberKind,
    host_id: Uuid,
    member_id: Uuid,
) -> Result<bool, DatabaseError> {
    let (table, host_col, member_col) = table_for(host, member);
    let result = sqlx::query(&format!(
        "DELETE FROM {table} WHERE {host_col} = $1 AND {member_col} = $2"
    ))
    .bind(host_id)
    .bind(member_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_maps_to_its_own_table() {
        let tables: Vec<&str> = [
            (HostKind::Department, MemberKind::User),
            (HostKind::Department, MemberKind::Survey),
            (HostKind::Team, MemberKind::User),
            (HostKind::Team, MemberKind::Survey),
        ]
        .into_iter()
        .map(|(h, m)| table_for(h, m).0)
        .collect();

        assert_eq!(
            tables,
            vec!["department_users", "department_surveys", "team_users", "team_surveys"]
        );
    }

    #[test]
    fn host_columns_match_host_kind() {
        assert_eq!(table_for(HostKind::Department, MemberKind::Survey).1, "department_id");
        assert_eq!(table_for(HostKind::Team, MemberKind::User).1, "team_id");
    }
}
