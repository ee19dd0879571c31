use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::{EntityKind, InternalError, RbacError};
use crate::services::{projection, validation};
use crate::stores::{PermissionStore, RoleStore};
use crate::types::db::role;
use crate::types::dto::role::{CreateRoleRequest, RolePage, RoleResponse, UpdateRoleRequest};
use crate::types::internal::PageRequest;

/// Service for managing roles and their permission sets.
pub struct RoleService {
    db: DatabaseConnection,
    roles: Arc<RoleStore>,
    permissions: Arc<PermissionStore>,
}

impl RoleService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            roles: app_data.role_store.clone(),
            permissions: app_data.permission_store.clone(),
        }
    }

    /// Resolve a set of permission ids, aborting on the first missing one.
    async fn resolve_permissions<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[i32],
    ) -> Result<BTreeSet<i32>, InternalError> {
        let requested: BTreeSet<i32> = ids.iter().copied().collect();
        for permission_id in &requested {
            self.permissions
                .find_by_id(conn, *permission_id)
                .await?
                .ok_or_else(|| InternalError::not_found(EntityKind::Permission, permission_id))?;
        }
        Ok(requested)
    }

    pub async fn create_role(&self, req: CreateRoleRequest) -> Result<RoleResponse, RbacError> {
        validation::validate_create_role(&req)?;
        tracing::info!("Creating new role with name: {}", req.name);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;

        // Uniqueness before reference resolution
        if self.roles.name_taken(&txn, &req.name, None).await? {
            return Err(InternalError::conflict(EntityKind::Role, "name", &req.name).into());
        }
        let permission_ids = match &req.permission_ids {
            Some(ids) => self.resolve_permissions(&txn, ids).await?,
            None => BTreeSet::new(),
        };

        let created = self.roles.insert(&txn, req.name, req.description).await?;
        for permission_id in &permission_ids {
            self.roles
                .add_permission(&txn, created.id, *permission_id)
                .await?;
        }

        let view = projection::role_view(&txn, &self.roles, created).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("Role created successfully with id: {}", view.id);
        Ok(view)
    }

    pub async fn get_role(&self, id: i32) -> Result<RoleResponse, RbacError> {
        tracing::debug!("Fetching role with id: {}", id);
        let model = self
            .roles
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, id))?;
        Ok(projection::role_view(&self.db, &self.roles, model).await?)
    }

    pub async fn list_roles(&self, page: PageRequest) -> Result<RolePage, RbacError> {
        let (models, total) = self.roles.list(&self.db, &page).await?;
        let mut items = Vec::with_capacity(models.len());
        for model in models {
            items.push(projection::role_view(&self.db, &self.roles, model).await?);
        }
        Ok(RolePage {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }

    pub async fn list_all_roles(&self) -> Result<Vec<RoleResponse>, RbacError> {
        let models = self.roles.list_all(&self.db).await?;
        let mut items = Vec::with_capacity(models.len());
        for model in models {
            items.push(projection::role_view(&self.db, &self.roles, model).await?);
        }
        Ok(items)
    }

    pub async fn update_role(
        &self,
        id: i32,
        req: UpdateRoleRequest,
    ) -> Result<RoleResponse, RbacError> {
        validation::validate_update_role(&req)?;
        tracing::info!("Updating role with id: {}", id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        let current = self
            .roles
            .find_by_id(&txn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, id))?;

        if self.roles.name_taken(&txn, &req.name, Some(id)).await? {
            return Err(InternalError::conflict(EntityKind::Role, "name", &req.name).into());
        }
        let permission_ids = match &req.permission_ids {
            Some(ids) => Some(self.resolve_permissions(&txn, ids).await?),
            None => None,
        };

        let mut model: role::ActiveModel = current.into();
        model.name = Set(req.name);
        model.description = Set(req.description);
        model.updated_at = Set(Utc::now().timestamp());
        let updated = self.roles.update(&txn, model).await?;

        if let Some(desired) = permission_ids {
            self.roles.set_permissions(&txn, id, &desired).await?;
        }

        let view = projection::role_view(&txn, &self.roles, updated).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("Role updated successfully with id: {}", id);
        Ok(view)
    }

    pub async fn delete_role(&self, id: i32) -> Result<(), RbacError> {
        tracing::info!("Deleting role with id: {}", id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.roles
            .find_by_id(&txn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, id))?;
        self.roles.delete(&txn, id).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("Role deleted successfully with id: {}", id);
        Ok(())
    }

    /// Add a single role→permission edge. Repeating the call is a no-op.
    pub async fn add_permission_to_role(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<RoleResponse, RbacError> {
        tracing::info!("Adding permission {} to role {}", permission_id, role_id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.roles
            .find_by_id(&txn, role_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, role_id))?;
        self.permissions
            .find_by_id(&txn, permission_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Permission, permission_id))?;

        if self.roles.add_permission(&txn, role_id, permission_id).await? {
            self.roles.touch(&txn, role_id).await?;
        }

        let model = self
            .roles
            .find_by_id(&txn, role_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, role_id))?;
        let view = projection::role_view(&txn, &self.roles, model).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;
        Ok(view)
    }

    /// Remove a single role→permission edge. Removing an absent edge is a
    /// no-op.
    pub async fn remove_permission_from_role(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<RoleResponse, RbacError> {
        tracing::info!("Removing permission {} from role {}", permission_id, role_id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.roles
            .find_by_id(&txn, role_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, role_id))?;
        self.permissions
            .find_by_id(&txn, permission_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Permission, permission_id))?;

        if self
            .roles
            .remove_permission(&txn, role_id, permission_id)
            .await?
        {
            self.roles.touch(&txn, role_id).await?;
        }

        let model = self
            .roles
            .find_by_id(&txn, role_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, role_id))?;
        let view = projection::role_view(&txn, &self.roles, model).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;
        Ok(view)
    }
}
