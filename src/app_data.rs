use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::stores::{GroupStore, PermissionStore, RoleStore, UserStore};

/// Centralized application data following the main-owned stores pattern.
///
/// The database connection and all stores are created once and shared
/// across services, giving every service the same storage view.
pub struct AppData {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub group_store: Arc<GroupStore>,
    pub role_store: Arc<RoleStore>,
    pub permission_store: Arc<PermissionStore>,
}

impl AppData {
    /// Build all stores over an already-migrated connection.
    pub fn new(db: DatabaseConnection) -> Self {
        tracing::debug!("Creating stores...");
        Self {
            db,
            user_store: Arc::new(UserStore::new()),
            group_store: Arc::new(GroupStore::new()),
            role_store: Arc::new(RoleStore::new()),
            permission_store: Arc::new(PermissionStore::new()),
        }
    }
}
