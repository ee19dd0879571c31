use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::permission::{self, Entity as Permission};
use crate::types::db::role_permission::{self, Entity as RolePermission};
use crate::types::internal::{PageRequest, SortDir};

/// PermissionStore manages permission rows. Permissions are immutable after
/// creation, so there is no update or touch here.
pub struct PermissionStore {}

impl PermissionStore {
    pub fn new() -> Self {
        Self {}
    }

    fn sort_column(sort_by: Option<&str>) -> permission::Column {
        match sort_by.unwrap_or("id") {
            "name" => permission::Column::Name,
            "resource" => permission::Column::Resource,
            "action" => permission::Column::Action,
            "created_at" => permission::Column::CreatedAt,
            _ => permission::Column::Id,
        }
    }

    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: String,
        description: Option<String>,
        resource: String,
        action: String,
    ) -> Result<permission::Model, InternalError> {
        let new_permission = permission::ActiveModel {
            name: Set(name),
            description: Set(description),
            resource: Set(resource),
            action: Set(action),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        new_permission
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_permission", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<permission::Model>, InternalError> {
        Permission::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_permission_by_id", e))
    }

    pub async fn name_taken<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<bool, InternalError> {
        let count = Permission::find()
            .filter(permission::Column::Name.eq(name))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("permission_name_taken", e))?;
        Ok(count > 0)
    }

    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        page: &PageRequest,
    ) -> Result<(Vec<permission::Model>, u64), InternalError> {
        let order = match page.sort_dir {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        };
        let paginator = Permission::find()
            .order_by(Self::sort_column(page.sort_by.as_deref()), order)
            .paginate(conn, page.size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_permissions", e))?;
        let items = paginator
            .fetch_page(page.page)
            .await
            .map_err(|e| InternalError::database("list_permissions", e))?;
        Ok((items, total))
    }

    pub async fn list_all<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<permission::Model>, InternalError> {
        Permission::find()
            .order_by_asc(permission::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_all_permissions", e))
    }

    /// Permissions whose resource matches, case-insensitively.
    pub async fn by_resource<C: ConnectionTrait>(
        &self,
        conn: &C,
        resource: &str,
    ) -> Result<Vec<permission::Model>, InternalError> {
        let all = self.list_all(conn).await?;
        Ok(all
            .into_iter()
            .filter(|p| p.resource.eq_ignore_ascii_case(resource))
            .collect())
    }

    /// Hard delete; role_permissions edges go first so no orphaned edge
    /// survives, while the roles themselves stay.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), InternalError> {
        RolePermission::delete_many()
            .filter(role_permission::Column::PermissionId.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_permission_assignments", e))?;
        Permission::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_permission", e))?;
        Ok(())
    }
}

impl Default for PermissionStore {
    fn default() -> Self {
        Self::new()
    }
}
