use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::group::{self, Entity as Group};
use crate::types::db::user::{self, Entity as User};
use crate::types::db::user_group::{self, Entity as UserGroup};
use crate::types::internal::{PageRequest, SortDir};

/// GroupStore manages group rows. The user↔group edges themselves live on
/// the owning join table handled by `UserStore`; this store only serves the
/// inverse member view.
pub struct GroupStore {}

impl GroupStore {
    pub fn new() -> Self {
        Self {}
    }

    fn sort_column(sort_by: Option<&str>) -> group::Column {
        match sort_by.unwrap_or("id") {
            "name" => group::Column::Name,
            "created_at" => group::Column::CreatedAt,
            "updated_at" => group::Column::UpdatedAt,
            _ => group::Column::Id,
        }
    }

    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: String,
        description: Option<String>,
    ) -> Result<group::Model, InternalError> {
        let now = Utc::now().timestamp();
        let new_group = group::ActiveModel {
            name: Set(name),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_group
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_group", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<group::Model>, InternalError> {
        Group::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_group_by_id", e))
    }

    pub async fn name_taken<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, InternalError> {
        let mut query = Group::find().filter(group::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(group::Column::Id.ne(id));
        }
        let count = query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("group_name_taken", e))?;
        Ok(count > 0)
    }

    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        page: &PageRequest,
    ) -> Result<(Vec<group::Model>, u64), InternalError> {
        let order = match page.sort_dir {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        };
        let paginator = Group::find()
            .order_by(Self::sort_column(page.sort_by.as_deref()), order)
            .paginate(conn, page.size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_groups", e))?;
        let items = paginator
            .fetch_page(page.page)
            .await
            .map_err(|e| InternalError::database("list_groups", e))?;
        Ok((items, total))
    }

    pub async fn list_all<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<group::Model>, InternalError> {
        Group::find()
            .order_by_asc(group::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_all_groups", e))
    }

    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: group::ActiveModel,
    ) -> Result<group::Model, InternalError> {
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_group", e))
    }

    /// Bump the group's updated_at after a membership mutation.
    pub async fn touch<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), InternalError> {
        let model = group::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("touch_group", e))?;
        Ok(())
    }

    /// Hard delete; membership rows go first so no orphaned edge survives.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), InternalError> {
        UserGroup::delete_many()
            .filter(user_group::Column::GroupId.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_group_members", e))?;
        Group::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_group", e))?;
        Ok(())
    }

    /// Direct member query: the inverse view of user.groups, computed from
    /// the join table and ordered by id.
    pub async fn members<C: ConnectionTrait>(
        &self,
        conn: &C,
        group_id: i32,
    ) -> Result<Vec<user::Model>, InternalError> {
        let edges = UserGroup::find()
            .filter(user_group::Column::GroupId.eq(group_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("group_member_ids", e))?;
        let user_ids: Vec<i32> = edges.into_iter().map(|e| e.user_id).collect();
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("group_members", e))
    }
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}
