// API layer - HTTP endpoints
pub mod groups;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod users;

pub use groups::GroupApi;
pub use health::HealthApi;
pub use permissions::PermissionApi;
pub use roles::RoleApi;
pub use users::UserApi;
