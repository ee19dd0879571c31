// Stores layer - persistence for entities and their relation tables
pub mod group_store;
pub mod permission_store;
pub mod role_store;
pub mod user_store;

pub use group_store::GroupStore;
pub use permission_store::PermissionStore;
pub use role_store::RoleStore;
pub use user_store::UserStore;
