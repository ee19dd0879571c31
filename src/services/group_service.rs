use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::{EntityKind, InternalError, RbacError};
use crate::services::{projection, validation};
use crate::stores::{GroupStore, UserStore};
use crate::types::db::group;
use crate::types::dto::group::{GroupPage, GroupRequest, GroupResponse};
use crate::types::dto::user::UserSummary;
use crate::types::internal::PageRequest;

/// Service for managing groups and their memberships.
///
/// The user↔group edge is owned by the user_groups join table; adding or
/// removing a member here is visible from both navigation directions as
/// soon as the transaction commits.
pub struct GroupService {
    db: DatabaseConnection,
    groups: Arc<GroupStore>,
    users: Arc<UserStore>,
}

impl GroupService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            groups: app_data.group_store.clone(),
            users: app_data.user_store.clone(),
        }
    }

    pub async fn create_group(&self, req: GroupRequest) -> Result<GroupResponse, RbacError> {
        validation::validate_group(&req)?;
        tracing::info!("Creating new group with name: {}", req.name);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        if self.groups.name_taken(&txn, &req.name, None).await? {
            return Err(InternalError::conflict(EntityKind::Group, "name", &req.name).into());
        }

        let created = self.groups.insert(&txn, req.name, req.description).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("Group created successfully with id: {}", created.id);
        Ok(projection::group_view(created))
    }

    pub async fn get_group(&self, id: i32) -> Result<GroupResponse, RbacError> {
        tracing::debug!("Fetching group with id: {}", id);
        let model = self
            .groups
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Group, id))?;
        Ok(projection::group_view(model))
    }

    pub async fn list_groups(&self, page: PageRequest) -> Result<GroupPage, RbacError> {
        let (models, total) = self.groups.list(&self.db, &page).await?;
        Ok(GroupPage {
            items: models.into_iter().map(projection::group_view).collect(),
            total,
            page: page.page,
            size: page.size,
        })
    }

    pub async fn list_all_groups(&self) -> Result<Vec<GroupResponse>, RbacError> {
        let models = self.groups.list_all(&self.db).await?;
        Ok(models.into_iter().map(projection::group_view).collect())
    }

    pub async fn update_group(
        &self,
        id: i32,
        req: GroupRequest,
    ) -> Result<GroupResponse, RbacError> {
        validation::validate_group(&req)?;
        tracing::info!("Updating group with id: {}", id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        let current = self
            .groups
            .find_by_id(&txn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Group, id))?;

        if self.groups.name_taken(&txn, &req.name, Some(id)).await? {
            return Err(InternalError::conflict(EntityKind::Group, "name", &req.name).into());
        }

        let mut model: group::ActiveModel = current.into();
        model.name = Set(req.name);
        model.description = Set(req.description);
        model.updated_at = Set(Utc::now().timestamp());
        let updated = self.groups.update(&txn, model).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("Group updated successfully with id: {}", id);
        Ok(projection::group_view(updated))
    }

    pub async fn delete_group(&self, id: i32) -> Result<(), RbacError> {
        tracing::info!("Deleting group with id: {}", id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.groups
            .find_by_id(&txn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Group, id))?;
        self.groups.delete(&txn, id).await?;
        txn.commit().await.map_err(InternalError::tx_commit)?;

        tracing::info!("Group deleted successfully with id: {}", id);
        Ok(())
    }

    /// Add a single user→group edge. Repeating the call is a no-op.
    pub async fn add_user_to_group(
        &self,
        group_id: i32,
        user_id: i32,
    ) -> Result<GroupResponse, RbacError> {
        tracing::info!("Adding user {} to group {}", user_id, group_id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.groups
            .find_by_id(&txn, group_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Group, group_id))?;
        self.users
            .find_by_id(&txn, user_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, user_id))?;

        if self.users.add_group(&txn, user_id, group_id).await? {
            self.groups.touch(&txn, group_id).await?;
        }

        let model = self
            .groups
            .find_by_id(&txn, group_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Group, group_id))?;
        txn.commit().await.map_err(InternalError::tx_commit)?;
        Ok(projection::group_view(model))
    }

    /// Remove a single user→group edge. Removing an absent edge is a no-op.
    pub async fn remove_user_from_group(
        &self,
        group_id: i32,
        user_id: i32,
    ) -> Result<GroupResponse, RbacError> {
        tracing::info!("Removing user {} from group {}", user_id, group_id);

        let txn = self.db.begin().await.map_err(InternalError::tx_begin)?;
        self.groups
            .find_by_id(&txn, group_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Group, group_id))?;
        self.users
            .find_by_id(&txn, user_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, user_id))?;

        if self.users.remove_group(&txn, user_id, group_id).await? {
            self.groups.touch(&txn, group_id).await?;
        }

        let model = self
            .groups
            .find_by_id(&txn, group_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Group, group_id))?;
        txn.commit().await.map_err(InternalError::tx_commit)?;
        Ok(projection::group_view(model))
    }

    /// Direct member listing; the only place member lists are exposed.
    pub async fn group_members(&self, group_id: i32) -> Result<Vec<UserSummary>, RbacError> {
        tracing::debug!("Fetching members of group {}", group_id);
        self.groups
            .find_by_id(&self.db, group_id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::Group, group_id))?;
        let members = self.groups.members(&self.db, group_id).await?;
        Ok(members.into_iter().map(projection::user_summary).collect())
    }
}
