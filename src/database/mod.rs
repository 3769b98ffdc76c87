pub mod departments;
pub mod manager;
pub mod memberships;
pub mod models;
pub mod organizations;
pub mod teams;

pub use departments::DepartmentStore;
pub use organizations::OrganizationStore;
pub use teams::TeamStore;
