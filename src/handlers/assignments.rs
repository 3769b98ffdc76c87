use axum::extract::Path;
use uuid::Uuid;

use crate::auth::{CallContext, ORGANIZATION_DELETE, ORGANIZATION_UPDATE};
use crate::database::memberships::{HostKind, MemberKind};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::MembershipService;

/// POST /api/organizations/:org/departments/:dept/assign-user/:user
pub async fn assign_user_to_department(
    ctx: CallContext,
    Path((organization_id, department_id, user_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_UPDATE)?;

    let service = MembershipService::from_config().await?;
    service
        .assign(&ctx, organization_id, HostKind::Department, department_id, MemberKind::User, user_id)
        .await?;
    Ok(ApiResponse::success(()))
}

/// DELETE /api/organizations/:org/departments/:dept/remove-user/:user
pub async fn remove_user_from_department(
    ctx: CallContext,
    Path((organization_id, department_id, user_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_DELETE)?;

    let service = MembershipService::from_config().await?;
    service
        .remove(&ctx, organization_id, HostKind::Department, department_id, MemberKind::User, user_id)
        .await?;
    Ok(ApiResponse::<()>::no_content())
}

/// POST /api/organizations/:org/teams/:team/assign-user/:user
pub async fn assign_user_to_team(
    ctx: CallContext,
    Path((organization_id, team_id, user_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_UPDATE)?;

    let service = MembershipService::from_config().await?;
    service
        .assign(&ctx, organization_id, HostKind::Team, team_id, MemberKind::User, user_id)
        .await?;
    Ok(ApiResponse::success(()))
}

/// DELETE /api/organizations/:org/teams/:team/remove-user/:user
pub async fn remove_user_from_team(
    ctx: CallContext,
    Path((organization_id, team_id, user_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_DELETE)?;

    let service = MembershipService::from_config().await?;
    service
        .remove(&ctx, organization_id, HostKind::Team, team_id, MemberKind::User, user_id)
        .await?;
    Ok(ApiResponse::<()>::no_content())
}

/// POST /api/organizations/:org/departments/:dept/assign-survey/:survey
pub async fn assign_survey_to_department(
    ctx: CallContext,
    Path((organization_id, department_id, survey_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_UPDATE)?;

    let service = MembershipService::from_config().await?;
    service
        .assign(&ctx, organization_id, HostKind::Department, department_id, MemberKind::Survey, survey_id)
        .await?;
    Ok(ApiResponse::success(()))
}

/// DELETE /api/organizations/:org/departments/:dept/remove-survey/:survey
pub async fn remove_survey_from_department(
    ctx: CallContext,
    Path((organization_id, department_id, survey_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_DELETE)?;

    let service = MembershipService::from_config().await?;
    service
        .remove(&ctx, organization_id, HostKind::Department, department_id, MemberKind::Survey, survey_id)
        .await?;
    Ok(ApiResponse::<()>::no_content())
}

/// POST /api/organizations/:org/teams/:team/assign-survey/:survey
pub async fn assign_survey_to_team(
    ctx: CallContext,
    Path((organization_id, team_id, survey_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_UPDATE)?;

    let service = MembershipService::from_config().await?;
    service
        .assign(&ctx, organization_id, HostKind::Team, team_id, MemberKind::Survey, survey_id)
        .await?;
    Ok(ApiResponse::success(()))
}

/// DELETE /api/organizations/:org/teams/:team/remove-survey/:survey
pub async fn remove_survey_from_team(
    ctx: CallContext,
    Path((organization_id, team_id, survey_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_DELETE)?;

    let service = MembershipService::from_config().await?;
    service
        .remove(&ctx, organization_id, HostKind::Team, team_id, MemberKind::Survey, survey_id)
        .await?;
    Ok(ApiResponse::<()>::no_content())
}
