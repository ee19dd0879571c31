// Common test utilities for integration tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

use rbac_backend::app_data::AppData;
use rbac_backend::services::{GroupService, PermissionService, RoleService, UserService};

/// Creates a full service setup over a fresh in-memory database.
pub async fn setup_services() -> (
    Arc<UserService>,
    Arc<GroupService>,
    Arc<RoleService>,
    Arc<PermissionService>,
) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let app_data = Arc::new(AppData::new(db));

    (
        Arc::new(UserService::new(app_data.clone())),
        Arc::new(GroupService::new(app_data.clone())),
        Arc::new(RoleService::new(app_data.clone())),
        Arc::new(PermissionService::new(app_data)),
    )
}
