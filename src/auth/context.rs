use uuid::Uuid;

use crate::auth::{Claims, SYS_ADMIN_ROOT};
use crate::error::ApiError;

/// Per-request identity and tenant scope derived from the bearer token.
///
/// Constructed once by the auth middleware and passed explicitly into every
/// service call. Core code never reaches into ambient request state.
#[derive(Clone, Debug)]
pub struct CallContext {
    pub subject: String,
    pub organization_id: Option<Uuid>,
    pub authorities: Vec<String>,
}

impl From<Claims> for CallContext {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            organization_id: claims.organization_id,
            authorities: claims.authorities,
        }
    }
}

impl CallContext {
    pub fn is_root_admin(&self) -> bool {
        self.authorities.iter().any(|a| a == SYS_ADMIN_ROOT)
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// The caller's tenant. Root admins carry no tenant and must name the
    /// target organization explicitly instead.
    pub fn current_organization_id(&self) -> Result<Uuid, ApiError> {
        self.organization_id
            .ok_or_else(|| ApiError::forbidden("No organization context found in token"))
    }

    /// Root admins pass; everyone else must own the target organization.
    pub fn require_organization_access(&self, target_organization_id: Uuid) -> Result<(), ApiError> {
        if self.is_root_admin() {
            return Ok(());
        }

        if self.current_organization_id()? != target_organization_id {
            return Err(ApiError::forbidden(
                "Access denied: resource belongs to a different organization",
            ));
        }

        Ok(())
    }

    /// Root admins pass; everyone else must carry the named authority.
    pub fn require_authority(&self, authority: &str) -> Result<(), ApiError> {
        if self.is_root_admin() || self.has_authority(authority) {
            return Ok(());
        }

        Err(ApiError::forbidden(format!(
            "Access denied: missing authority {}",
            authority
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ORGANIZATION_READ, ORGANIZATION_UPDATE};

    fn tenant_ctx(org: Uuid) -> CallContext {
        CallContext {
            subject: "alice".to_string(),
            organization_id: Some(org),
            authorities: vec![ORGANIZATION_READ.to_string()],
        }
    }

    fn root_ctx() -> CallContext {
        CallContext {
            subject: "root".to_string(),
            organization_id: None,
            authorities: vec![SYS_ADMIN_ROOT.to_string()],
        }
    }

    #[test]
    fn root_admin_bypasses_tenant_check() {
        let ctx = root_ctx();
        assert!(ctx.is_root_admin());
        assert!(ctx.require_organization_access(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn tenant_caller_allowed_on_own_organization() {
        let org = Uuid::new_v4();
        assert!(tenant_ctx(org).require_organization_access(org).is_ok());
    }

    #[test]
    fn tenant_caller_forbidden_on_foreign_organization() {
        let ctx = tenant_ctx(Uuid::new_v4());
        let err = ctx.require_organization_access(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn missing_tenant_claim_is_forbidden() {
        let ctx = CallContext {
            subject: "bob".to_string(),
            organization_id: None,
            authorities: vec![ORGANIZATION_READ.to_string()],
        };
        assert_eq!(ctx.current_organization_id().unwrap_err().status_code(), 403);
        assert_eq!(
            ctx.require_organization_access(Uuid::new_v4()).unwrap_err().status_code(),
            403
        );
    }

    #[test]
    fn authority_check_honors_root_bypass() {
        assert!(root_ctx().require_authority(ORGANIZATION_UPDATE).is_ok());

        let ctx = tenant_ctx(Uuid::new_v4());
        assert!(ctx.require_authority(ORGANIZATION_READ).is_ok());
        assert_eq!(
            ctx.require_authority(ORGANIZATION_UPDATE).unwrap_err().status_code(),
            403
        );
    }
}
