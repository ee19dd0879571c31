use std::sync::Arc;

use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::errors::RbacError;
use crate::services::GroupService;
use crate::types::dto::group::{GroupPage, GroupRequest, GroupResponse};
use crate::types::dto::user::UserSummary;
use crate::types::internal::PageRequest;

/// Group management API endpoints
pub struct GroupApi {
    groups: Arc<GroupService>,
}

impl GroupApi {
    pub fn new(groups: Arc<GroupService>) -> Self {
        Self { groups }
    }
}

/// API tags for group endpoints
#[derive(Tags)]
enum GroupTags {
    /// Group management
    Groups,
}

#[OpenApi(prefix_path = "/v1/groups")]
impl GroupApi {
    /// Create a new group
    #[oai(path = "/", method = "post", tag = "GroupTags::Groups")]
    async fn create_group(
        &self,
        body: Json<GroupRequest>,
    ) -> Result<Json<GroupResponse>, RbacError> {
        let group = self.groups.create_group(body.0).await?;
        Ok(Json(group))
    }

    /// Get a group by id
    #[oai(path = "/:id", method = "get", tag = "GroupTags::Groups")]
    async fn get_group(&self, id: Path<i32>) -> Result<Json<GroupResponse>, RbacError> {
        let group = self.groups.get_group(id.0).await?;
        Ok(Json(group))
    }

    /// List groups with pagination
    #[oai(path = "/", method = "get", tag = "GroupTags::Groups")]
    async fn list_groups(
        &self,
        page: Query<Option<u64>>,
        size: Query<Option<u64>>,
        sort_by: Query<Option<String>>,
        sort_dir: Query<Option<String>>,
    ) -> Result<Json<GroupPage>, RbacError> {
        let request = PageRequest::from_query(page.0, size.0, sort_by.0, sort_dir.0);
        let groups = self.groups.list_groups(request).await?;
        Ok(Json(groups))
    }

    /// List all groups without pagination
    #[oai(path = "/list", method = "get", tag = "GroupTags::Groups")]
    async fn list_all_groups(&self) -> Result<Json<Vec<GroupResponse>>, RbacError> {
        let groups = self.groups.list_all_groups().await?;
        Ok(Json(groups))
    }

    /// Update a group's name and description
    #[oai(path = "/:id", method = "put", tag = "GroupTags::Groups")]
    async fn update_group(
        &self,
        id: Path<i32>,
        body: Json<GroupRequest>,
    ) -> Result<Json<GroupResponse>, RbacError> {
        let group = self.groups.update_group(id.0, body.0).await?;
        Ok(Json(group))
    }

    /// Delete a group permanently; members are not deleted
    #[oai(path = "/:id", method = "delete", tag = "GroupTags::Groups")]
    async fn delete_group(&self, id: Path<i32>) -> Result<(), RbacError> {
        self.groups.delete_group(id.0).await
    }

    /// Add a user to a group (idempotent)
    #[oai(path = "/:group_id/users/:user_id", method = "post", tag = "GroupTags::Groups")]
    async fn add_user_to_group(
        &self,
        group_id: Path<i32>,
        user_id: Path<i32>,
    ) -> Result<Json<GroupResponse>, RbacError> {
        let group = self.groups.add_user_to_group(group_id.0, user_id.0).await?;
        Ok(Json(group))
    }

    /// Remove a user from a group (idempotent)
    #[oai(path = "/:group_id/users/:user_id", method = "delete", tag = "GroupTags::Groups")]
    async fn remove_user_from_group(
        &self,
        group_id: Path<i32>,
        user_id: Path<i32>,
    ) -> Result<Json<GroupResponse>, RbacError> {
        let group = self
            .groups
            .remove_user_from_group(group_id.0, user_id.0)
            .await?;
        Ok(Json(group))
    }

    /// List the members of a group
    #[oai(path = "/:id/members", method = "get", tag = "GroupTags::Groups")]
    async fn group_members(&self, id: Path<i32>) -> Result<Json<Vec<UserSummary>>, RbacError> {
        let members = self.groups.group_members(id.0).await?;
        Ok(Json(members))
    }
}
