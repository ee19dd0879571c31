use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request to create or update a group
#[derive(Object, Debug)]
pub struct GroupRequest {
    /// Unique group name, 2 to 100 characters
    pub name: String,

    /// Optional description, up to 255 characters
    pub description: Option<String>,
}

/// Response model for group data.
///
/// Member lists are deliberately absent; they are served only by the
/// dedicated group-members endpoint to keep nested projections bounded.
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,

    /// Creation time as a unix timestamp
    pub created_at: i64,

    /// Last modification time as a unix timestamp
    pub updated_at: i64,
}

/// One page of groups plus the total count
#[derive(Object, Debug)]
pub struct GroupPage {
    pub items: Vec<GroupResponse>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}
