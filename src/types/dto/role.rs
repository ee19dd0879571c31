use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::dto::permission::PermissionResponse;

/// Request to create a new role
#[derive(Object, Debug)]
pub struct CreateRoleRequest {
    /// Unique role name, up to 50 characters
    pub name: String,

    /// Optional description, up to 255 characters
    pub description: Option<String>,

    /// Permissions to assign to the role
    pub permission_ids: Option<Vec<i32>>,
}

/// Request to update an existing role
#[derive(Object, Debug)]
pub struct UpdateRoleRequest {
    /// Unique role name, up to 50 characters
    pub name: String,

    /// Optional description, up to 255 characters
    pub description: Option<String>,

    /// When present, replaces the role's permission set (set-difference semantics)
    pub permission_ids: Option<Vec<i32>>,
}

/// Response model for role data, including its permission set
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<PermissionResponse>,

    /// Creation time as a unix timestamp
    pub created_at: i64,

    /// Last modification time as a unix timestamp
    pub updated_at: i64,
}

/// One page of roles plus the total count
#[derive(Object, Debug)]
pub struct RolePage {
    pub items: Vec<RoleResponse>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}
