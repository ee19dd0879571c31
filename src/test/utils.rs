// Test utilities shared across the service unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::services::{GroupService, PermissionService, RoleService, UserService};

/// Creates an in-memory database with migrations applied and shared AppData.
pub async fn setup_test_app_data() -> (DatabaseConnection, Arc<AppData>) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let app_data = Arc::new(AppData::new(db.clone()));
    (db, app_data)
}

/// Creates a full service setup over a fresh in-memory database.
///
/// Returns (app_data, user_service, group_service, role_service, permission_service).
/// Callers can discard what they don't need:
/// ```rust
/// let (_app_data, users, _groups, roles, _perms) = setup_test_services().await;
/// ```
pub async fn setup_test_services() -> (
    Arc<AppData>,
    Arc<UserService>,
    Arc<GroupService>,
    Arc<RoleService>,
    Arc<PermissionService>,
) {
    let (_db, app_data) = setup_test_app_data().await;

    let user_service = Arc::new(UserService::new(app_data.clone()));
    let group_service = Arc::new(GroupService::new(app_data.clone()));
    let role_service = Arc::new(RoleService::new(app_data.clone()));
    let permission_service = Arc::new(PermissionService::new(app_data.clone()));

    (
        app_data,
        user_service,
        group_service,
        role_service,
        permission_service,
    )
}
