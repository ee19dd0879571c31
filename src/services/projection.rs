//! Read-side projection from stored entities to response views.
//!
//! Expansion is bounded to break the cyclic reference graph: a user view
//! carries full role views (with permissions) and group views without
//! members; a permission view never carries its roles. Nested sets come
//! from the stores ordered by id, so repeated projections are stable.

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::stores::{RoleStore, UserStore};
use crate::types::db::{group, permission, role, user};
use crate::types::dto::group::GroupResponse;
use crate::types::dto::permission::PermissionResponse;
use crate::types::dto::role::RoleResponse;
use crate::types::dto::user::{UserResponse, UserSummary};

pub fn permission_view(model: permission::Model) -> PermissionResponse {
    let full_permission = model.full_permission();
    PermissionResponse {
        id: model.id,
        name: model.name,
        description: model.description,
        resource: model.resource,
        action: model.action,
        full_permission,
        created_at: model.created_at,
    }
}

pub fn group_view(model: group::Model) -> GroupResponse {
    GroupResponse {
        id: model.id,
        name: model.name,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn user_summary(model: user::Model) -> UserSummary {
    UserSummary {
        id: model.id,
        username: model.username,
        email: model.email,
        active: model.active,
    }
}

pub async fn role_view<C: ConnectionTrait>(
    conn: &C,
    roles: &RoleStore,
    model: role::Model,
) -> Result<RoleResponse, InternalError> {
    let permissions = roles
        .permissions_of_role(conn, model.id)
        .await?
        .into_iter()
        .map(permission_view)
        .collect();
    Ok(RoleResponse {
        id: model.id,
        name: model.name,
        description: model.description,
        permissions,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// Project a user with one level of nesting: full role views and group
/// views. The password hash is dropped here and never reaches a response.
pub async fn user_view<C: ConnectionTrait>(
    conn: &C,
    users: &UserStore,
    roles: &RoleStore,
    model: user::Model,
) -> Result<UserResponse, InternalError> {
    let mut role_views = Vec::new();
    for role in users.roles_of_user(conn, model.id).await? {
        role_views.push(role_view(conn, roles, role).await?);
    }
    let group_views = users
        .groups_of_user(conn, model.id)
        .await?
        .into_iter()
        .map(group_view)
        .collect();

    Ok(UserResponse {
        id: model.id,
        username: model.username,
        email: model.email,
        active: model.active,
        roles: role_views,
        groups: group_views,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
