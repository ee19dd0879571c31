use std::sync::Arc;

use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use rbac_backend::api::{GroupApi, HealthApi, PermissionApi, RoleApi, UserApi};
use rbac_backend::app_data::AppData;
use rbac_backend::config::{connect_database, init_logging, migrate_database};
use rbac_backend::services::{GroupService, PermissionService, RoleService, UserService};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let db = connect_database()
        .await
        .expect("Failed to connect to database");

    migrate_database(&db)
        .await
        .expect("Failed to run migrations");

    // Shared stores over the single connection pool
    let app_data = Arc::new(AppData::new(db));

    let user_service = Arc::new(UserService::new(app_data.clone()));
    let group_service = Arc::new(GroupService::new(app_data.clone()));
    let role_service = Arc::new(RoleService::new(app_data.clone()));
    let permission_service = Arc::new(PermissionService::new(app_data.clone()));

    let api_service = OpenApiService::new(
        (
            HealthApi,
            UserApi::new(user_service),
            GroupApi::new(group_service),
            RoleApi::new(role_service),
            PermissionApi::new(permission_service),
        ),
        "RBAC Administration API",
        "1.0.0",
    )
    .server("http://localhost:3000/api");

    // Generate Swagger UI from the OpenAPI service
    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    let bind_addr = std::env::var("HTTP_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!("Starting server on http://{}", bind_addr);
    tracing::info!("Swagger UI available at http://localhost:3000/swagger");

    Server::new(TcpListener::bind(bind_addr)).run(app).await
}
