use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request to create a new permission
#[derive(Object, Debug)]
pub struct CreatePermissionRequest {
    /// Unique permission name, up to 50 characters
    pub name: String,

    /// Optional description, up to 255 characters
    pub description: Option<String>,

    /// Resource the permission applies to, e.g. "document"
    pub resource: String,

    /// Action the permission grants, e.g. "read"
    pub action: String,
}

/// Response model for permission data
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub resource: String,
    pub action: String,

    /// Derived `resource:action` identifier
    pub full_permission: String,

    /// Creation time as a unix timestamp
    pub created_at: i64,
}

/// One page of permissions plus the total count
#[derive(Object, Debug)]
pub struct PermissionPage {
    pub items: Vec<PermissionResponse>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}
