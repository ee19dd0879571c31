use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::dto::group::GroupResponse;
use crate::types::dto::role::RoleResponse;

/// Request to create a new user
#[derive(Object, Debug)]
pub struct CreateUserRequest {
    /// Unique username, 3 to 50 characters
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Plaintext password, 8 to 100 characters; stored only as a hash
    pub password: String,

    /// Roles to assign to the new user
    pub role_ids: Option<Vec<i32>>,

    /// Groups to place the new user in
    pub group_ids: Option<Vec<i32>>,
}

/// Request to update an existing user; all fields optional
#[derive(Object, Debug, Default)]
pub struct UpdateUserRequest {
    /// Unique username, 3 to 50 characters
    pub username: Option<String>,

    /// Unique email address
    pub email: Option<String>,

    /// New plaintext password, 8 to 100 characters
    pub password: Option<String>,

    /// Active flag
    pub active: Option<bool>,

    /// When present, replaces the user's role set (set-difference semantics)
    pub role_ids: Option<Vec<i32>>,

    /// When present, replaces the user's group set (set-difference semantics)
    pub group_ids: Option<Vec<i32>>,
}

/// Response model for user data. The password hash is never serialized.
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub active: bool,
    pub roles: Vec<RoleResponse>,
    pub groups: Vec<GroupResponse>,

    /// Creation time as a unix timestamp
    pub created_at: i64,

    /// Last modification time as a unix timestamp
    pub updated_at: i64,
}

/// Abbreviated user view for group member listings
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub active: bool,
}

/// One page of users plus the total count
#[derive(Object, Debug)]
pub struct UserPage {
    pub items: Vec<UserResponse>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}
