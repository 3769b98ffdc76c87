pub mod department_service;
pub mod membership_service;
pub mod organization_service;
pub mod team_service;

pub use department_service::{DepartmentInput, DepartmentService};
pub use membership_service::MembershipService;
pub use organization_service::{OrganizationChildren, OrganizationInput, OrganizationService};
pub use team_service::{TeamInput, TeamService};

use crate::error::ApiError;

/// Shared name validation: trimmed, 2..=100 characters. The trimmed form is
/// what gets persisted and compared for uniqueness.
pub(crate) fn validate_name(raw: &str, label: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("{} name must not be empty.", label)));
    }

    let length = trimmed.chars().count();
    if !(2..=100).contains(&length) {
        return Err(ApiError::bad_request(format!(
            "{} name must be between 2 and 100 characters.",
            label
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(validate_name("  Engineering  ", "Department").unwrap(), "Engineering");
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert!(validate_name("", "Department").is_err());
        assert!(validate_name("   ", "Team").is_err());
    }

    #[test]
    fn enforces_length_bounds_after_trim() {
        assert!(validate_name("A", "Department").is_err());
        assert!(validate_name(" A ", "Department").is_err());
        assert!(validate_name("AB", "Department").is_ok());
        assert_eq!(validate_name(&"x".repeat(100), "Team").unwrap().len(), 100);
        assert!(validate_name(&"x".repeat(101), "Team").is_err());
    }
}
