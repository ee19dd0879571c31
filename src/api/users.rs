use std::sync::Arc;

use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::errors::RbacError;
use crate::services::UserService;
use crate::types::dto::user::{CreateUserRequest, UpdateUserRequest, UserPage, UserResponse};
use crate::types::internal::PageRequest;

/// User management API endpoints
pub struct UserApi {
    users: Arc<UserService>,
}

impl UserApi {
    pub fn new(users: Arc<UserService>) -> Self {
        Self { users }
    }
}

/// API tags for user endpoints
#[derive(Tags)]
enum UserTags {
    /// User management
    Users,
}

#[OpenApi(prefix_path = "/v1/users")]
impl UserApi {
    /// Create a new user
    #[oai(path = "/", method = "post", tag = "UserTags::Users")]
    async fn create_user(
        &self,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserResponse>, RbacError> {
        let user = self.users.create_user(body.0).await?;
        Ok(Json(user))
    }

    /// Get a user by id
    #[oai(path = "/:id", method = "get", tag = "UserTags::Users")]
    async fn get_user(&self, id: Path<i32>) -> Result<Json<UserResponse>, RbacError> {
        let user = self.users.get_user(id.0).await?;
        Ok(Json(user))
    }

    /// Get a user by username
    #[oai(path = "/username/:username", method = "get", tag = "UserTags::Users")]
    async fn get_user_by_username(
        &self,
        username: Path<String>,
    ) -> Result<Json<UserResponse>, RbacError> {
        let user = self.users.get_user_by_username(&username.0).await?;
        Ok(Json(user))
    }

    /// List users with pagination
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list_users(
        &self,
        page: Query<Option<u64>>,
        size: Query<Option<u64>>,
        sort_by: Query<Option<String>>,
        sort_dir: Query<Option<String>>,
    ) -> Result<Json<UserPage>, RbacError> {
        let request = PageRequest::from_query(page.0, size.0, sort_by.0, sort_dir.0);
        let users = self.users.list_users(request).await?;
        Ok(Json(users))
    }

    /// Update a user; absent fields are left unchanged
    #[oai(path = "/:id", method = "put", tag = "UserTags::Users")]
    async fn update_user(
        &self,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, RbacError> {
        let user = self.users.update_user(id.0, body.0).await?;
        Ok(Json(user))
    }

    /// Delete a user permanently
    #[oai(path = "/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete_user(&self, id: Path<i32>) -> Result<(), RbacError> {
        self.users.delete_user(id.0).await
    }

    /// Activate a user account
    #[oai(path = "/:id/activate", method = "patch", tag = "UserTags::Users")]
    async fn activate_user(&self, id: Path<i32>) -> Result<Json<UserResponse>, RbacError> {
        let user = self.users.activate_user(id.0).await?;
        Ok(Json(user))
    }

    /// Deactivate a user account
    #[oai(path = "/:id/deactivate", method = "patch", tag = "UserTags::Users")]
    async fn deactivate_user(&self, id: Path<i32>) -> Result<Json<UserResponse>, RbacError> {
        let user = self.users.deactivate_user(id.0).await?;
        Ok(Json(user))
    }

    /// Assign a role to a user (idempotent)
    #[oai(path = "/:user_id/roles/:role_id", method = "post", tag = "UserTags::Users")]
    async fn add_role_to_user(
        &self,
        user_id: Path<i32>,
        role_id: Path<i32>,
    ) -> Result<Json<UserResponse>, RbacError> {
        let user = self.users.add_role_to_user(user_id.0, role_id.0).await?;
        Ok(Json(user))
    }

    /// Remove a role from a user (idempotent)
    #[oai(path = "/:user_id/roles/:role_id", method = "delete", tag = "UserTags::Users")]
    async fn remove_role_from_user(
        &self,
        user_id: Path<i32>,
        role_id: Path<i32>,
    ) -> Result<Json<UserResponse>, RbacError> {
        let user = self
            .users
            .remove_role_from_user(user_id.0, role_id.0)
            .await?;
        Ok(Json(user))
    }
}
