use axum::extract::{Json, Path};
use uuid::Uuid;

use crate::auth::{
    CallContext, ORGANIZATION_CREATE, ORGANIZATION_DELETE, ORGANIZATION_READ, ORGANIZATION_UPDATE,
};
use crate::handlers::DepartmentResponse;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::{DepartmentInput, DepartmentService};

/// GET /api/departments - root sees all, tenants see their own
pub async fn list(ctx: CallContext) -> ApiResult<Vec<DepartmentResponse>> {
    ctx.require_authority(ORGANIZATION_READ)?;

    let service = DepartmentService::from_config().await?;
    let departments = service.list(&ctx).await?;
    Ok(ApiResponse::success(departments.into_iter().map(Into::into).collect()))
}

/// POST /api/departments
pub async fn create(
    ctx: CallContext,
    Json(input): Json<DepartmentInput>,
) -> ApiResult<DepartmentResponse> {
    ctx.require_authority(ORGANIZATION_CREATE)?;

    let service = DepartmentService::from_config().await?;
    let created = service.create(&ctx, input).await?;
    Ok(ApiResponse::created(created.into()))
}

/// GET /api/departments/:id
pub async fn get_by_id(ctx: CallContext, Path(id): Path<Uuid>) -> ApiResult<DepartmentResponse> {
    ctx.require_authority(ORGANIZATION_READ)?;

    let service = DepartmentService::from_config().await?;
    Ok(ApiResponse::success(service.get(&ctx, id).await?.into()))
}

/// PUT /api/departments/:id
pub async fn update(
    ctx: CallContext,
    Path(id): Path<Uuid>,
    Json(input): Json<DepartmentInput>,
) -> ApiResult<DepartmentResponse> {
    ctx.require_authority(ORGANIZATION_UPDATE)?;

    let service = DepartmentService::from_config().await?;
    Ok(ApiResponse::success(service.update(&ctx, id, input).await?.into()))
}

/// DELETE /api/departments/:id - cascades to the department's teams
pub async fn delete_by_id(ctx: CallContext, Path(id): Path<Uuid>) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_DELETE)?;

    let service = DepartmentService::from_config().await?;
    service.delete(&ctx, id).await?;
    Ok(ApiResponse::<()>::no_content())
}
