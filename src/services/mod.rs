// Services layer - validation, orchestration and projection
pub mod crypto;
pub mod group_service;
pub mod permission_service;
pub mod projection;
pub mod role_service;
pub mod user_service;
pub mod validation;

pub use group_service::GroupService;
pub use permission_service::PermissionService;
pub use role_service::RoleService;
pub use user_service::UserService;

#[cfg(test)]
mod group_service_tests;

#[cfg(test)]
mod role_service_tests;
