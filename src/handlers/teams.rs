use axum::extract::{Json, Path};
use uuid::Uuid;

use crate::auth::{
    CallContext, ORGANIZATION_CREATE, ORGANIZATION_DELETE, ORGANIZATION_READ, ORGANIZATION_UPDATE,
};
use crate::handlers::TeamResponse;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::{TeamInput, TeamService};

/// GET /api/teams - root sees all, tenants see their own
pub async fn list(ctx: CallContext) -> ApiResult<Vec<TeamResponse>> {
    ctx.require_authority(ORGANIZATION_READ)?;

    let service = TeamService::from_config().await?;
    let teams = service.list(&ctx).await?;
    Ok(ApiResponse::success(teams.into_iter().map(Into::into).collect()))
}

/// POST /api/teams
pub async fn create(ctx: CallContext, Json(input): Json<TeamInput>) -> ApiResult<TeamResponse> {
    ctx.require_authority(ORGANIZATION_CREATE)?;

    let service = TeamService::from_config().await?;
    let created = service.create(&ctx, input).await?;
    Ok(ApiResponse::created(created.into()))
}

/// GET /api/teams/:id
pub async fn get_by_id(ctx: CallContext, Path(id): Path<Uuid>) -> ApiResult<TeamResponse> {
    ctx.require_authority(ORGANIZATION_READ)?;

    let service = TeamService::from_config().await?;
    Ok(ApiResponse::success(service.get(&ctx, id).await?.into()))
}

/// PUT /api/teams/:id - rename and/or re-parent within the organization
pub async fn update(
    ctx: CallContext,
    Path(id): Path<Uuid>,
    Json(input): Json<TeamInput>,
) -> ApiResult<TeamResponse> {
    ctx.require_authority(ORGANIZATION_UPDATE)?;

    let service = TeamService::from_config().await?;
    Ok(ApiResponse::success(service.update(&ctx, id, input).await?.into()))
}

/// DELETE /api/teams/:id
pub async fn delete_by_id(ctx: CallContext, Path(id): Path<Uuid>) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_DELETE)?;

    let service = TeamService::from_config().await?;
    service.delete(&ctx, id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// GET /api/teams/department/:department_id
pub async fn list_by_department(
    ctx: CallContext,
    Path(department_id): Path<Uuid>,
) -> ApiResult<Vec<TeamResponse>> {
    ctx.require_authority(ORGANIZATION_READ)?;

    let service = TeamService::from_config().await?;
    let teams = service.list_by_department(&ctx, department_id).await?;
    Ok(ApiResponse::success(teams.into_iter().map(Into::into).collect()))
}
