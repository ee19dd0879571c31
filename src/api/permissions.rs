use std::sync::Arc;

use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::errors::RbacError;
use crate::services::PermissionService;
use crate::types::dto::permission::{CreatePermissionRequest, PermissionPage, PermissionResponse};
use crate::types::internal::PageRequest;

/// Permission management API endpoints
pub struct PermissionApi {
    permissions: Arc<PermissionService>,
}

impl PermissionApi {
    pub fn new(permissions: Arc<PermissionService>) -> Self {
        Self { permissions }
    }
}

/// API tags for permission endpoints
#[derive(Tags)]
enum PermissionTags {
    /// Permission management
    Permissions,
}

#[OpenApi(prefix_path = "/v1/permissions")]
impl PermissionApi {
    /// Create a new permission
    #[oai(path = "/", method = "post", tag = "PermissionTags::Permissions")]
    async fn create_permission(
        &self,
        body: Json<CreatePermissionRequest>,
    ) -> Result<Json<PermissionResponse>, RbacError> {
        let permission = self.permissions.create_permission(body.0).await?;
        Ok(Json(permission))
    }

    /// Get a permission by id
    #[oai(path = "/:id", method = "get", tag = "PermissionTags::Permissions")]
    async fn get_permission(&self, id: Path<i32>) -> Result<Json<PermissionResponse>, RbacError> {
        let permission = self.permissions.get_permission(id.0).await?;
        Ok(Json(permission))
    }

    /// List permissions with pagination
    #[oai(path = "/", method = "get", tag = "PermissionTags::Permissions")]
    async fn list_permissions(
        &self,
        page: Query<Option<u64>>,
        size: Query<Option<u64>>,
        sort_by: Query<Option<String>>,
        sort_dir: Query<Option<String>>,
    ) -> Result<Json<PermissionPage>, RbacError> {
        let request = PageRequest::from_query(page.0, size.0, sort_by.0, sort_dir.0);
        let permissions = self.permissions.list_permissions(request).await?;
        Ok(Json(permissions))
    }

    /// List all permissions without pagination
    #[oai(path = "/list", method = "get", tag = "PermissionTags::Permissions")]
    async fn list_all_permissions(&self) -> Result<Json<Vec<PermissionResponse>>, RbacError> {
        let permissions = self.permissions.list_all_permissions().await?;
        Ok(Json(permissions))
    }

    /// List permissions for a resource (case-insensitive)
    #[oai(path = "/resource/:resource", method = "get", tag = "PermissionTags::Permissions")]
    async fn permissions_by_resource(
        &self,
        resource: Path<String>,
    ) -> Result<Json<Vec<PermissionResponse>>, RbacError> {
        let permissions = self
            .permissions
            .permissions_by_resource(&resource.0)
            .await?;
        Ok(Json(permissions))
    }

    /// Delete a permission permanently; it is revoked from all roles
    #[oai(path = "/:id", method = "delete", tag = "PermissionTags::Permissions")]
    async fn delete_permission(&self, id: Path<i32>) -> Result<(), RbacError> {
        self.permissions.delete_permission(id.0).await
    }
}
