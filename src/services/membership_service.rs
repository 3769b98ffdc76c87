use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::CallContext;
use crate::clients::{
    self, AssignmentRecord, Existence, SurveyDirectory, UserDirectory,
};
use crate::database::manager::{is_unique_violation, DatabaseError, DatabaseManager};
use crate::database::memberships::{self, HostKind, LockedHost, MemberKind};
use crate::database::OrganizationStore;
use crate::error::ApiError;

/// One engine for all four membership families:
/// {department, team} x {user, survey}.
///
/// Assign: probe the owning service, then in a single transaction re-read and
/// lock the host, enforce the set invariant, insert, notify the user-service
/// for user members, commit. A downstream failure before commit rolls the
/// local write back. Remove mirrors it without the probe.
pub struct MembershipService {
    pool: PgPool,
    organizations: OrganizationStore,
    users: Arc<dyn UserDirectory>,
    surveys: Arc<dyn SurveyDirectory>,
}

impl MembershipService {
    pub fn new(
        pool: PgPool,
        users: Arc<dyn UserDirectory>,
        surveys: Arc<dyn SurveyDirectory>,
    ) -> Self {
        Self {
            organizations: OrganizationStore::new(pool.clone()),
            pool,
            users,
            surveys,
        }
    }

    pub async fn from_config() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self::new(pool, clients::user_directory(), clients::survey_directory()))
    }

    pub async fn assign(
        &self,
        ctx: &CallContext,
        organization_id: Uuid,
        host: HostKind,
        host_id: Uuid,
        member: MemberKind,
        member_id: Uuid,
    ) -> Result<(), ApiError> {
        self.verify_organization_access(ctx, organization_id).await?;

        // Probe before opening the transaction; the host is re-read inside it.
        self.probe_member(member, member_id).await?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let locked = memberships::lock_host(&mut *tx, host, host_id, organization_id)
            .await?
            .ok_or_else(|| host_not_found(host, host_id, organization_id))?;

        if memberships::contains(&mut *tx, host, member, host_id, member_id).await? {
            return Err(already_assigned(member, host));
        }

        match memberships::insert(&mut *tx, host, member, host_id, member_id).await {
            Ok(()) => {}
            // Lost a race with a concurrent assign; report it as the
            // invariant check would have.
            Err(DatabaseError::Sqlx(e)) if is_unique_violation(&e) => {
                return Err(already_assigned(member, host))
            }
            Err(e) => return Err(e.into()),
        }

        if member == MemberKind::User {
            // Dropping the transaction on error rolls the local write back.
            let record = placement_record(host, host_id, &locked);
            self.users.assign(member_id, &record).await?;
        }

        tx.commit().await.map_err(DatabaseError::from)?;

        info!(
            "{} {} assigned to {} {} in organization {}",
            member.label(),
            member_id,
            host.label_lower(),
            host_id,
            organization_id
        );
        Ok(())
    }

    pub async fn remove(
        &self,
        ctx: &CallContext,
        organization_id: Uuid,
        host: HostKind,
        host_id: Uuid,
        member: MemberKind,
        member_id: Uuid,
    ) -> Result<(), ApiError> {
        self.verify_organization_access(ctx, organization_id).await?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let locked = memberships::lock_host(&mut *tx, host, host_id, organization_id)
            .await?
            .ok_or_else(|| host_not_found(host, host_id, organization_id))?;

        if !memberships::remove(&mut *tx, host, member, host_id, member_id).await? {
            return Err(not_assigned(member, host));
        }

        if member == MemberKind::User {
            let record = placement_record(host, host_id, &locked);
            self.users.remove(member_id, &record).await?;
        }

        tx.commit().await.map_err(DatabaseError::from)?;

        info!(
            "{} {} removed from {} {} in organization {}",
            member.label(),
            member_id,
            host.label_lower(),
            host_id,
            organization_id
        );
        Ok(())
    }

    async fn verify_organization_access(
        &self,
        ctx: &CallContext,
        organization_id: Uuid,
    ) -> Result<(), ApiError> {
        if !self.organizations.exists(organization_id).await? {
            return Err(ApiError::not_found(format!(
                "Organization not found with id: {}",
                organization_id
            )));
        }

        ctx.require_organization_access(organization_id)
    }

    async fn probe_member(&self, member: MemberKind, member_id: Uuid) -> Result<(), ApiError> {
        let existence = match member {
            MemberKind::User => self.users.user_exists(member_id).await,
            MemberKind::Survey => self.surveys.survey_exists(member_id).await,
        };

        match existence {
            Existence::Present => Ok(()),
            Existence::Absent => Err(ApiError::not_found(format!(
                "{} not found with id: {}",
                member.label(),
                member_id
            ))),
            Existence::Unknown => Err(ApiError::service_failure(format!(
                "Could not verify {} {}: service unavailable",
                member.label().to_lowercase(),
                member_id
            ))),
        }
    }
}

fn placement_record(host: HostKind, host_id: Uuid, locked: &LockedHost) -> AssignmentRecord {
    match host {
        HostKind::Department => AssignmentRecord::department(host_id),
        HostKind::Team => AssignmentRecord::team(locked.department_id, host_id),
    }
}

fn host_not_found(host: HostKind, host_id: Uuid, organization_id: Uuid) -> ApiError {
    ApiError::not_found(format!(
        "{} not found with id {} in organization {}",
        host.label(),
        host_id,
        organization_id
    ))
}

fn already_assigned(member: MemberKind, host: HostKind) -> ApiError {
    ApiError::bad_request(format!(
        "{} is already assigned to this {}",
        member.label(),
        host.label_lower()
    ))
}

fn not_assigned(member: MemberKind, host: HostKind) -> ApiError {
    ApiError::bad_request(format!(
        "{} is not assigned to this {}",
        member.label(),
        host.label_lower()
    ))
}
