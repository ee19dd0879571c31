use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::permission::{self, Entity as Permission};
use crate::types::db::role::{self, Entity as Role};
use crate::types::db::role_permission::{self, Entity as RolePermission};
use crate::types::db::user_role::{self, Entity as UserRole};
use crate::types::internal::{PageRequest, SortDir};

/// RoleStore manages role rows and the owning role_permissions join table.
pub struct RoleStore {}

impl RoleStore {
    pub fn new() -> Self {
        Self {}
    }

    fn sort_column(sort_by: Option<&str>) -> role::Column {
        match sort_by.unwrap_or("id") {
            "name" => role::Column::Name,
            "created_at" => role::Column::CreatedAt,
            "updated_at" => role::Column::UpdatedAt,
            _ => role::Column::Id,
        }
    }

    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: String,
        description: Option<String>,
    ) -> Result<role::Model, InternalError> {
        let now = Utc::now().timestamp();
        let new_role = role::ActiveModel {
            name: Set(name),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_role
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_role", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<role::Model>, InternalError> {
        Role::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_by_id", e))
    }

    pub async fn name_taken<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, InternalError> {
        let mut query = Role::find().filter(role::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(role::Column::Id.ne(id));
        }
        let count = query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("role_name_taken", e))?;
        Ok(count > 0)
    }

    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        page: &PageRequest,
    ) -> Result<(Vec<role::Model>, u64), InternalError> {
        let order = match page.sort_dir {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        };
        let paginator = Role::find()
            .order_by(Self::sort_column(page.sort_by.as_deref()), order)
            .paginate(conn, page.size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_roles", e))?;
        let items = paginator
            .fetch_page(page.page)
            .await
            .map_err(|e| InternalError::database("list_roles", e))?;
        Ok((items, total))
    }

    pub async fn list_all<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<role::Model>, InternalError> {
        Role::find()
            .order_by_asc(role::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_all_roles", e))
    }

    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: role::ActiveModel,
    ) -> Result<role::Model, InternalError> {
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_role", e))
    }

    /// Bump the role's updated_at after a permission-set mutation.
    pub async fn touch<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), InternalError> {
        let model = role::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("touch_role", e))?;
        Ok(())
    }

    /// Hard delete; role_permissions and user_roles edges go first so no
    /// orphaned edge survives, while users and permissions themselves stay.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), InternalError> {
        RolePermission::delete_many()
            .filter(role_permission::Column::RoleId.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_permissions", e))?;
        UserRole::delete_many()
            .filter(user_role::Column::RoleId.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_assignments", e))?;
        Role::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role", e))?;
        Ok(())
    }

    pub async fn permission_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        let edges = RolePermission::find()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("role_permission_ids", e))?;
        Ok(edges.into_iter().map(|e| e.permission_id).collect())
    }

    /// Permissions of a role, ordered by id for stable projection.
    pub async fn permissions_of_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: i32,
    ) -> Result<Vec<permission::Model>, InternalError> {
        let ids = self.permission_ids(conn, role_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Permission::find()
            .filter(permission::Column::Id.is_in(ids))
            .order_by_asc(permission::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("permissions_of_role", e))
    }

    /// Add a role→permission edge. Returns false without writing when the
    /// edge already exists.
    pub async fn add_permission<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, InternalError> {
        let existing = RolePermission::find_by_id((role_id, permission_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_permission", e))?;
        if existing.is_some() {
            return Ok(false);
        }
        let edge = role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
        };
        RolePermission::insert(edge)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_role_permission", e))?;
        Ok(true)
    }

    /// Remove a role→permission edge. Returns false when the edge was absent.
    pub async fn remove_permission<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, InternalError> {
        let result = RolePermission::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .filter(role_permission::Column::PermissionId.eq(permission_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_permission", e))?;
        Ok(result.rows_affected > 0)
    }

    /// Replace the role's permission set with set-difference semantics.
    pub async fn set_permissions<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: i32,
        desired: &BTreeSet<i32>,
    ) -> Result<bool, InternalError> {
        let current: BTreeSet<i32> = self
            .permission_ids(conn, role_id)
            .await?
            .into_iter()
            .collect();
        let mut changed = false;
        for permission_id in desired.difference(&current) {
            self.add_permission(conn, role_id, *permission_id).await?;
            changed = true;
        }
        for permission_id in current.difference(desired) {
            self.remove_permission(conn, role_id, *permission_id).await?;
            changed = true;
        }
        Ok(changed)
    }
}

impl Default for RoleStore {
    fn default() -> Self {
        Self::new()
    }
}
