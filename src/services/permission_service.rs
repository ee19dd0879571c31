use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::{EntityKind, InternalError, RbacError};
use crate::services::{projection, validation};
use crate::stores::PermissionStore;
use crate::types::dto::permission::{CreatePermissionRequest, PermissionPage, PermissionResponse};
use crate::types::internal::PageRequest;

/// Service for managing permissions.
///
/// Permissions are immutable metadata apart from role assignment, so there
/// is no update operation.
pub struct PermissionService {
    db: DatabaseConnection,
    permissions: Arc<PermissionStore>,
}

impl PermissionService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            permissions: app_data.permission_store.clone(),
        }
    }

    pub async fn create_permission(
        &self,
        req: CreatePermissionRequest,
    ) -> Result<PermissionResponse, RbacError> {
        validation::validate_create_permission(&req)?;
        tracing::info!("Creating new permission with name: {}", req.name);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        if self.permissions.name_taken(&txn, &req.name).await? {
            return Err(InternalError::conflict(EntityKind::Permission, "name", &req.name).into());
        }

        let created = self
            .permissions
            .insert(&txn, req.name, req.description, req.resource, req.action)
            .await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("Permission created successfully with id: {}", created.id);
        Ok(projection::permission_view(created))
    }

    pub async fn get_permission(&self, id: i32) -> Result<PermissionResponse, RbacError> {
        tracing::debug!("Fetching permission with id: {}", id);
        let model = self
            .permissions
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Permission, id))?;
        Ok(projection::permission_view(model))
    }

    pub async fn list_permissions(&self, page: PageRequest) -> Result<PermissionPage, RbacError> {
        let (models, total) = self.permissions.list(&self.db, &page).await?;
        Ok(PermissionPage {
            items: models
                .into_iter()
                .map(projection::permission_view)
                .collect(),
            total,
            page: page.page,
            size: page.size,
        })
    }

    pub async fn list_all_permissions(&self) -> Result<Vec<PermissionResponse>, RbacError> {
        let models = self.permissions.list_all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(projection::permission_view)
            .collect())
    }

    /// Permissions for one resource, matched case-insensitively.
    pub async fn permissions_by_resource(
        &self,
        resource: &str,
    ) -> Result<Vec<PermissionResponse>, RbacError> {
        tracing::debug!("Fetching permissions for resource: {}", resource);
        let models = self.permissions.by_resource(&self.db, resource).await?;
        Ok(models
            .into_iter()
            .map(projection::permission_view)
            .collect())
    }

    pub async fn delete_permission(&self, id: i32) -> Result<(), RbacError> {
        tracing::info!("Deleting permission with id: {}", id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.permissions
            .find_by_id(&txn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Permission, id))?;
        self.permissions.delete(&txn, id).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("Permission deleted successfully with id: {}", id);
        Ok(())
    }
}
