use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::{EntityKind, InternalError, RbacError};
use crate::services::{crypto, projection, validation};
use crate::stores::{GroupStore, RoleStore, UserStore};
use crate::types::db::user;
use crate::types::dto::user::{CreateUserRequest, UpdateUserRequest, UserPage, UserResponse};
use crate::types::internal::PageRequest;

/// Service for managing users and their role/group memberships.
///
/// Checks run in a fixed order inside one transaction: field validation,
/// then uniqueness, then reference resolution, then writes. Any failure
/// rolls the whole operation back.
pub struct UserService {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    roles: Arc<RoleStore>,
    groups: Arc<GroupStore>,
}

impl UserService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            users: app_data.user_store.clone(),
            roles: app_data.role_store.clone(),
            groups: app_data.group_store.clone(),
        }
    }

    /// Resolve a set of role ids, aborting on the first missing one.
    /// Ids are deduplicated and checked in ascending order so the reported
    /// missing id is deterministic.
    async fn resolve_roles<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[i32],
    ) -> Result<BTreeSet<i32>, InternalError> {
        let requested: BTreeSet<i32> = ids.iter().copied().collect();
        for role_id in &requested {
            self.roles
                .find_by_id(conn, *role_id)
                .await?
                .ok_or_else(|| InternalError::not_found(EntityKind::Role, role_id))?;
        }
        Ok(requested)
    }

    async fn resolve_groups<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[i32],
    ) -> Result<BTreeSet<i32>, InternalError> {
        let requested: BTreeSet<i32> = ids.iter().copied().collect();
        for group_id in &requested {
            self.groups
                .find_by_id(conn, *group_id)
                .await?
                .ok_or_else(|| InternalError::not_found(EntityKind::Group, group_id))?;
        }
        Ok(requested)
    }

    pub async fn create_user(&self, req: CreateUserRequest) -> Result<UserResponse, RbacError> {
        validation::validate_create_user(&req)?;
        tracing::info!("Creating new user with username: {}", req.username);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;

        // Uniqueness before reference resolution
        if self.users.username_taken(&txn, &req.username, None).await? {
            return Err(
                InternalError::conflict(EntityKind::User, "username", &req.username).into(),
            );
        }
        if self.users.email_taken(&txn, &req.email, None).await? {
            return Err(InternalError::conflict(EntityKind::User, "email", &req.email).into());
        }

        let role_ids = match &req.role_ids {
            Some(ids) => self.resolve_roles(&txn, ids).await?,
            None => BTreeSet::new(),
        };
        let group_ids = match &req.group_ids {
            Some(ids) => self.resolve_groups(&txn, ids).await?,
            None => BTreeSet::new(),
        };

        let password_hash = crypto::hash_password(&req.password)?;
        let created = self
            .users
            .insert(&txn, req.username, req.email, password_hash)
            .await?;

        for role_id in &role_ids {
            self.users.add_role(&txn, created.id, *role_id).await?;
        }
        for group_id in &group_ids {
            self.users.add_group(&txn, created.id, *group_id).await?;
        }

        let view = projection::user_view(&txn, &self.users, &self.roles, created).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("User created successfully with id: {}", view.id);
        Ok(view)
    }

    pub async fn get_user(&self, id: i32) -> Result<UserResponse, RbacError> {
        tracing::debug!("Fetching user with id: {}", id);
        let model = self
            .users
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, id))?;
        Ok(projection::user_view(&self.db, &self.users, &self.roles, model).await?)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<UserResponse, RbacError> {
        tracing::debug!("Fetching user with username: {}", username);
        let model = self
            .users
            .find_by_username(&self.db, username)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, username))?;
        Ok(projection::user_view(&self.db, &self.users, &self.roles, model).await?)
    }

    pub async fn list_users(&self, page: PageRequest) -> Result<UserPage, RbacError> {
        let (models, total) = self.users.list(&self.db, &page).await?;
        let mut items = Vec::with_capacity(models.len());
        for model in models {
            items.push(projection::user_view(&self.db, &self.users, &self.roles, model).await?);
        }
        Ok(UserPage {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }

    pub async fn update_user(
        &self,
        id: i32,
        req: UpdateUserRequest,
    ) -> Result<UserResponse, RbacError> {
        validation::validate_update_user(&req)?;
        tracing::info!("Updating user with id: {}", id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;

        let current = self
            .users
            .find_by_id(&txn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, id))?;

        // Rename checks exclude the user's own row, so re-submitting an
        // unchanged value never reports a false conflict.
        if let Some(username) = &req.username {
            if self.users.username_taken(&txn, username, Some(id)).await? {
                return Err(InternalError::conflict(EntityKind::User, "username", username).into());
            }
        }
        if let Some(email) = &req.email {
            if self.users.email_taken(&txn, email, Some(id)).await? {
                return Err(InternalError::conflict(EntityKind::User, "email", email).into());
            }
        }

        // Resolve every referenced id before any write
        let role_ids = match &req.role_ids {
            Some(ids) => Some(self.resolve_roles(&txn, ids).await?),
            None => None,
        };
        let group_ids = match &req.group_ids {
            Some(ids) => Some(self.resolve_groups(&txn, ids).await?),
            None => None,
        };

        let mut model: user::ActiveModel = current.into();
        if let Some(username) = req.username {
            model.username = Set(username);
        }
        if let Some(email) = req.email {
            model.email = Set(email);
        }
        if let Some(password) = req.password {
            model.password_hash = Set(crypto::hash_password(&password)?);
        }
        if let Some(active) = req.active {
            model.active = Set(active);
        }
        model.updated_at = Set(Utc::now().timestamp());
        let updated = self.users.update(&txn, model).await?;

        if let Some(desired) = role_ids {
            self.users.set_roles(&txn, id, &desired).await?;
        }
        if let Some(desired) = group_ids {
            self.users.set_groups(&txn, id, &desired).await?;
        }

        let view = projection::user_view(&txn, &self.users, &self.roles, updated).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("User updated successfully with id: {}", id);
        Ok(view)
    }

    pub async fn delete_user(&self, id: i32) -> Result<(), RbacError> {
        tracing::info!("Deleting user with id: {}", id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.users
            .find_by_id(&txn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, id))?;
        self.users.delete(&txn, id).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("User deleted successfully with id: {}", id);
        Ok(())
    }

    pub async fn activate_user(&self, id: i32) -> Result<UserResponse, RbacError> {
        tracing::info!("Activating user with id: {}", id);
        self.set_active(id, true).await
    }

    pub async fn deactivate_user(&self, id: i32) -> Result<UserResponse, RbacError> {
        tracing::info!("Deactivating user with id: {}", id);
        self.set_active(id, false).await
    }

    async fn set_active(&self, id: i32, active: bool) -> Result<UserResponse, RbacError> {
        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        let current = self
            .users
            .find_by_id(&txn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, id))?;

        let mut model: user::ActiveModel = current.into();
        model.active = Set(active);
        model.updated_at = Set(Utc::now().timestamp());
        let updated = self.users.update(&txn, model).await?;

        let view = projection::user_view(&txn, &self.users, &self.roles, updated).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;
        Ok(view)
    }

    /// Add a single user→role edge. Repeating the call is a no-op.
    pub async fn add_role_to_user(
        &self,
        user_id: i32,
        role_id: i32,
    ) -> Result<UserResponse, RbacError> {
        tracing::info!("Adding role {} to user {}", role_id, user_id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.users
            .find_by_id(&txn, user_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, user_id))?;
        self.roles
            .find_by_id(&txn, role_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, role_id))?;

        if self.users.add_role(&txn, user_id, role_id).await? {
            self.users.touch(&txn, user_id).await?;
        }

        let model = self
            .users
            .find_by_id(&txn, user_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, user_id))?;
        let view = projection::user_view(&txn, &self.users, &self.roles, model).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;
        Ok(view)
    }

    /// Remove a single user→role edge. Removing an absent edge is a no-op.
    pub async fn remove_role_from_user(
        &self,
        user_id: i32,
        role_id: i32,
    ) -> Result<UserResponse, RbacError> {
        tracing::info!("Removing role {} from user {}", role_id, user_id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.users
            .find_by_id(&txn, user_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, user_id))?;
        self.roles
            .find_by_id(&txn, role_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, role_id))?;

        if self.users.remove_role(&txn, user_id, role_id).await? {
            self.users.touch(&txn, user_id).await?;
        }

        let model = self
            .users
            .find_by_id(&txn, user_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, user_id))?;
        let view = projection::user_view(&txn, &self.users, &self.roles, model).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;
        Ok(view)
    }
}
