use axum::extract::{Json, Path};
use uuid::Uuid;

use crate::auth::{CallContext, ORGANIZATION_DELETE, ORGANIZATION_READ, ORGANIZATION_UPDATE};
use crate::database::models::Organization;
use crate::handlers::ChildrenResponse;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::{OrganizationInput, OrganizationService};

/// GET /api/organizations - root admins only
pub async fn list(ctx: CallContext) -> ApiResult<Vec<Organization>> {
    let service = OrganizationService::from_config().await?;
    Ok(ApiResponse::success(service.list(&ctx).await?))
}

/// POST /api/organizations - unauthenticated tenant bootstrap
pub async fn create(Json(input): Json<OrganizationInput>) -> ApiResult<Organization> {
    let service = OrganizationService::from_config().await?;
    Ok(ApiResponse::created(service.create(input).await?))
}

/// GET /api/organizations/:id/exists - unauthenticated probe for peer services
pub async fn exists(Path(id): Path<Uuid>) -> ApiResult<bool> {
    let service = OrganizationService::from_config().await?;
    Ok(ApiResponse::success(service.exists(id).await?))
}

/// GET /api/organizations/:id
pub async fn get_by_id(ctx: CallContext, Path(id): Path<Uuid>) -> ApiResult<Organization> {
    ctx.require_authority(ORGANIZATION_READ)?;

    let service = OrganizationService::from_config().await?;
    Ok(ApiResponse::success(service.get(&ctx, id).await?))
}

/// PUT /api/organizations/:id
pub async fn update(
    ctx: CallContext,
    Path(id): Path<Uuid>,
    Json(input): Json<OrganizationInput>,
) -> ApiResult<Organization> {
    ctx.require_authority(ORGANIZATION_UPDATE)?;

    let service = OrganizationService::from_config().await?;
    Ok(ApiResponse::success(service.update(&ctx, id, input).await?))
}

/// DELETE /api/organizations/:id
pub async fn delete_by_id(ctx: CallContext, Path(id): Path<Uuid>) -> ApiResult<()> {
    ctx.require_authority(ORGANIZATION_DELETE)?;

    let service = OrganizationService::from_config().await?;
    service.delete(&ctx, id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// GET /api/organizations/:id/children - flattened subtree
pub async fn children(ctx: CallContext, Path(id): Path<Uuid>) -> ApiResult<ChildrenResponse> {
    ctx.require_authority(ORGANIZATION_READ)?;

    let service = OrganizationService::from_config().await?;
    let subtree = service.children(&ctx, id).await?;
    Ok(ApiResponse::success(subtree.into()))
}
