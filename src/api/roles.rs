use std::sync::Arc;

use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::errors::RbacError;
use crate::services::RoleService;
use crate::types::dto::role::{CreateRoleRequest, RolePage, RoleResponse, UpdateRoleRequest};
use crate::types::internal::PageRequest;

/// Role management API endpoints
pub struct RoleApi {
    roles: Arc<RoleService>,
}

impl RoleApi {
    pub fn new(roles: Arc<RoleService>) -> Self {
        Self { roles }
    }
}

/// API tags for role endpoints
#[derive(Tags)]
enum RoleTags {
    /// Role management
    Roles,
}

#[OpenApi(prefix_path = "/v1/roles")]
impl RoleApi {
    /// Create a new role, optionally with an initial permission set
    #[oai(path = "/", method = "post", tag = "RoleTags::Roles")]
    async fn create_role(
        &self,
        body: Json<CreateRoleRequest>,
    ) -> Result<Json<RoleResponse>, RbacError> {
        let role = self.roles.create_role(body.0).await?;
        Ok(Json(role))
    }

    /// Get a role by id
    #[oai(path = "/:id", method = "get", tag = "RoleTags::Roles")]
    async fn get_role(&self, id: Path<i32>) -> Result<Json<RoleResponse>, RbacError> {
        let role = self.roles.get_role(id.0).await?;
        Ok(Json(role))
    }

    /// List roles with pagination
    #[oai(path = "/", method = "get", tag = "RoleTags::Roles")]
    async fn list_roles(
        &self,
        page: Query<Option<u64>>,
        size: Query<Option<u64>>,
        sort_by: Query<Option<String>>,
        sort_dir: Query<Option<String>>,
    ) -> Result<Json<RolePage>, RbacError> {
        let request = PageRequest::from_query(page.0, size.0, sort_by.0, sort_dir.0);
        let roles = self.roles.list_roles(request).await?;
        Ok(Json(roles))
    }

    /// List all roles without pagination
    #[oai(path = "/list", method = "get", tag = "RoleTags::Roles")]
    async fn list_all_roles(&self) -> Result<Json<Vec<RoleResponse>>, RbacError> {
        let roles = self.roles.list_all_roles().await?;
        Ok(Json(roles))
    }

    /// Update a role; a present permission set replaces the old one
    #[oai(path = "/:id", method = "put", tag = "RoleTags::Roles")]
    async fn update_role(
        &self,
        id: Path<i32>,
        body: Json<UpdateRoleRequest>,
    ) -> Result<Json<RoleResponse>, RbacError> {
        let role = self.roles.update_role(id.0, body.0).await?;
        Ok(Json(role))
    }

    /// Delete a role permanently; it is removed from all users holding it
    #[oai(path = "/:id", method = "delete", tag = "RoleTags::Roles")]
    async fn delete_role(&self, id: Path<i32>) -> Result<(), RbacError> {
        self.roles.delete_role(id.0).await
    }

    /// Grant a permission to a role (idempotent)
    #[oai(path = "/:role_id/permissions/:permission_id", method = "post", tag = "RoleTags::Roles")]
    async fn add_permission_to_role(
        &self,
        role_id: Path<i32>,
        permission_id: Path<i32>,
    ) -> Result<Json<RoleResponse>, RbacError> {
        let role = self
            .roles
            .add_permission_to_role(role_id.0, permission_id.0)
            .await?;
        Ok(Json(role))
    }

    /// Revoke a permission from a role (idempotent)
    #[oai(path = "/:role_id/permissions/:permission_id", method = "delete", tag = "RoleTags::Roles")]
    async fn remove_permission_from_role(
        &self,
        role_id: Path<i32>,
        permission_id: Path<i32>,
    ) -> Result<Json<RoleResponse>, RbacError> {
        let role = self
            .roles
            .remove_permission_from_role(role_id.0, permission_id.0)
            .await?;
        Ok(Json(role))
    }
}
