use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::group::{self, Entity as Group};
use crate::types::db::role::{self, Entity as Role};
use crate::types::db::user::{self, Entity as User};
use crate::types::db::user_group::{self, Entity as UserGroup};
use crate::types::db::user_role::{self, Entity as UserRole};
use crate::types::internal::{PageRequest, SortDir};

/// UserStore manages user rows and the user_roles / user_groups join tables.
///
/// Methods are generic over the connection so services can run several store
/// calls inside one transaction.
pub struct UserStore {}

impl UserStore {
    pub fn new() -> Self {
        Self {}
    }

    fn sort_column(sort_by: Option<&str>) -> user::Column {
        match sort_by.unwrap_or("id") {
            "username" => user::Column::Username,
            "email" => user::Column::Email,
            "created_at" => user::Column::CreatedAt,
            "updated_at" => user::Column::UpdatedAt,
            // Unknown sort fields fall back to the id column
            _ => user::Column::Id,
        }
    }

    /// Insert a new user row. Timestamps are set once here; created_at never
    /// changes afterwards.
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();
        let new_user = user::ActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_user
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_user", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    pub async fn find_by_username<C: ConnectionTrait>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    /// Check whether a username is taken, optionally excluding one user id so
    /// that re-submitting an unchanged name never reports a false conflict.
    pub async fn username_taken<C: ConnectionTrait>(
        &self,
        conn: &C,
        username: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, InternalError> {
        let mut query = User::find().filter(user::Column::Username.eq(username));
        if let Some(id) = exclude_id {
            query = query.filter(user::Column::Id.ne(id));
        }
        let count = query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("username_taken", e))?;
        Ok(count > 0)
    }

    pub async fn email_taken<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, InternalError> {
        let mut query = User::find().filter(user::Column::Email.eq(email));
        if let Some(id) = exclude_id {
            query = query.filter(user::Column::Id.ne(id));
        }
        let count = query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("email_taken", e))?;
        Ok(count > 0)
    }

    /// Paginated listing; returns the page of users and the total row count.
    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        page: &PageRequest,
    ) -> Result<(Vec<user::Model>, u64), InternalError> {
        let order = match page.sort_dir {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        };
        let paginator = User::find()
            .order_by(Self::sort_column(page.sort_by.as_deref()), order)
            .paginate(conn, page.size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_users", e))?;
        let items = paginator
            .fetch_page(page.page)
            .await
            .map_err(|e| InternalError::database("list_users", e))?;
        Ok((items, total))
    }

    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: user::ActiveModel,
    ) -> Result<user::Model, InternalError> {
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_user", e))
    }

    /// Bump the user's updated_at after a relation-set mutation.
    pub async fn touch<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), InternalError> {
        let model = user::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };
        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("touch_user", e))?;
        Ok(())
    }

    /// Hard delete; edge rows are removed first so no orphaned edge survives.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), InternalError> {
        UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_roles", e))?;
        UserGroup::delete_many()
            .filter(user_group::Column::UserId.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_groups", e))?;
        User::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;
        Ok(())
    }

    pub async fn role_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        let edges = UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("user_role_ids", e))?;
        Ok(edges.into_iter().map(|e| e.role_id).collect())
    }

    /// Roles held by a user, ordered by id for stable projection.
    pub async fn roles_of_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Vec<role::Model>, InternalError> {
        let ids = self.role_ids(conn, user_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Role::find()
            .filter(role::Column::Id.is_in(ids))
            .order_by_asc(role::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("roles_of_user", e))
    }

    pub async fn group_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        let edges = UserGroup::find()
            .filter(user_group::Column::UserId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("user_group_ids", e))?;
        Ok(edges.into_iter().map(|e| e.group_id).collect())
    }

    /// Groups the user belongs to, ordered by id for stable projection.
    pub async fn groups_of_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Vec<group::Model>, InternalError> {
        let ids = self.group_ids(conn, user_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Group::find()
            .filter(group::Column::Id.is_in(ids))
            .order_by_asc(group::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("groups_of_user", e))
    }

    /// Add a user→role edge. Returns false without writing when the edge
    /// already exists.
    pub async fn add_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
        role_id: i32,
    ) -> Result<bool, InternalError> {
        let existing = UserRole::find_by_id((user_id, role_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_role", e))?;
        if existing.is_some() {
            return Ok(false);
        }
        let edge = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        };
        UserRole::insert(edge)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_user_role", e))?;
        Ok(true)
    }

    /// Remove a user→role edge. Returns false when the edge was absent.
    pub async fn remove_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
        role_id: i32,
    ) -> Result<bool, InternalError> {
        let result = UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_role", e))?;
        Ok(result.rows_affected > 0)
    }

    /// Replace the user's role set with set-difference semantics: only rows
    /// actually entering or leaving the set are written.
    pub async fn set_roles<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
        desired: &BTreeSet<i32>,
    ) -> Result<bool, InternalError> {
        let current: BTreeSet<i32> = self.role_ids(conn, user_id).await?.into_iter().collect();
        let mut changed = false;
        for role_id in desired.difference(&current) {
            self.add_role(conn, user_id, *role_id).await?;
            changed = true;
        }
        for role_id in current.difference(desired) {
            self.remove_role(conn, user_id, *role_id).await?;
            changed = true;
        }
        Ok(changed)
    }

    /// Add a user→group edge; idempotent like `add_role`.
    pub async fn add_group<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
        group_id: i32,
    ) -> Result<bool, InternalError> {
        let existing = UserGroup::find_by_id((user_id, group_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_group", e))?;
        if existing.is_some() {
            return Ok(false);
        }
        let edge = user_group::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
        };
        UserGroup::insert(edge)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_user_group", e))?;
        Ok(true)
    }

    pub async fn remove_group<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
        group_id: i32,
    ) -> Result<bool, InternalError> {
        let result = UserGroup::delete_many()
            .filter(user_group::Column::UserId.eq(user_id))
            .filter(user_group::Column::GroupId.eq(group_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_group", e))?;
        Ok(result.rows_affected > 0)
    }

    /// Replace the user's group set with set-difference semantics.
    pub async fn set_groups<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
        desired: &BTreeSet<i32>,
    ) -> Result<bool, InternalError> {
        let current: BTreeSet<i32> = self.group_ids(conn, user_id).await?.into_iter().collect();
        let mut changed = false;
        for group_id in desired.difference(&current) {
            self.add_group(conn, user_id, *group_id).await?;
            changed = true;
        }
        for group_id in current.difference(desired) {
            self.remove_group(conn, user_id, *group_id).await?;
            changed = true;
        }
        Ok(changed)
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
