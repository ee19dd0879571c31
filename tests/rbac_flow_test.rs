// End-to-end flow across all four services over one database

mod common;

use common::setup_services;
use rbac_backend::types::dto::group::GroupRequest;
use rbac_backend::types::dto::permission::CreatePermissionRequest;
use rbac_backend::types::dto::role::CreateRoleRequest;
use rbac_backend::types::dto::user::{CreateUserRequest, UpdateUserRequest};
use rbac_backend::types::internal::PageRequest;

#[tokio::test]
async fn test_full_rbac_assembly_flow() {
    let (users, groups, roles, permissions) = setup_services().await;

    // Build up the chain: permission, role carrying it, user carrying the role
    let read_docs = permissions
        .create_permission(CreatePermissionRequest {
            name: "read-documents".to_string(),
            description: Some("Read access to documents".to_string()),
            resource: "document".to_string(),
            action: "read".to_string(),
        })
        .await
        .expect("Failed to create permission");
    assert_eq!(read_docs.full_permission, "document:read");

    let viewer = roles
        .create_role(CreateRoleRequest {
            name: "viewer".to_string(),
            description: Some("Read-only role".to_string()),
            permission_ids: Some(vec![read_docs.id]),
        })
        .await
        .expect("Failed to create role");

    let engineering = groups
        .create_group(GroupRequest {
            name: "engineering".to_string(),
            description: None,
        })
        .await
        .expect("Failed to create group");

    let alice = users
        .create_user(CreateUserRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct horse battery".to_string(),
            role_ids: Some(vec![viewer.id]),
            group_ids: Some(vec![engineering.id]),
        })
        .await
        .expect("Failed to create user");

    // The projection expands one level: roles carry permissions, groups don't
    // carry members
    let fetched = users.get_user(alice.id).await.expect("Failed to fetch user");
    assert_eq!(fetched.roles.len(), 1);
    assert_eq!(fetched.roles[0].name, "viewer");
    assert_eq!(fetched.roles[0].permissions.len(), 1);
    assert_eq!(fetched.roles[0].permissions[0].full_permission, "document:read");
    assert_eq!(fetched.groups.len(), 1);
    assert_eq!(fetched.groups[0].name, "engineering");

    // Group membership is visible from the group side too
    let members = groups
        .group_members(engineering.id)
        .await
        .expect("Failed to list members");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].username, "alice");
}

#[tokio::test]
async fn test_role_deletion_propagates_to_user_projection() {
    let (users, _groups, roles, permissions) = setup_services().await;

    let perm = permissions
        .create_permission(CreatePermissionRequest {
            name: "write-documents".to_string(),
            description: None,
            resource: "document".to_string(),
            action: "write".to_string(),
        })
        .await
        .expect("Failed to create permission");

    let editor = roles
        .create_role(CreateRoleRequest {
            name: "editor".to_string(),
            description: None,
            permission_ids: Some(vec![perm.id]),
        })
        .await
        .expect("Failed to create role");

    let bob = users
        .create_user(CreateUserRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "correct horse battery".to_string(),
            role_ids: Some(vec![editor.id]),
            group_ids: None,
        })
        .await
        .expect("Failed to create user");

    roles.delete_role(editor.id).await.expect("Failed to delete role");

    // The user survives, the role disappears from their view; the
    // permission itself is untouched
    let fetched = users.get_user(bob.id).await.expect("User should survive");
    assert!(fetched.roles.is_empty());
    permissions
        .get_permission(perm.id)
        .await
        .expect("Permission should survive role deletion");
}

#[tokio::test]
async fn test_membership_survives_entity_updates() {
    let (users, groups, _roles, _permissions) = setup_services().await;

    let group = groups
        .create_group(GroupRequest {
            name: "ops".to_string(),
            description: None,
        })
        .await
        .expect("Failed to create group");

    let user = users
        .create_user(CreateUserRequest {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            password: "correct horse battery".to_string(),
            role_ids: None,
            group_ids: Some(vec![group.id]),
        })
        .await
        .expect("Failed to create user");

    // Renaming the user must not disturb the membership edge
    users
        .update_user(
            user.id,
            UpdateUserRequest {
                username: Some("caroline".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to rename user");

    let members = groups
        .group_members(group.id)
        .await
        .expect("Failed to list members");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].username, "caroline");
}

#[tokio::test]
async fn test_listing_reflects_all_created_entities() {
    let (users, groups, roles, permissions) = setup_services().await;

    for i in 0..3 {
        permissions
            .create_permission(CreatePermissionRequest {
                name: format!("perm{}", i),
                description: None,
                resource: "widget".to_string(),
                action: format!("action{}", i),
            })
            .await
            .expect("Failed to create permission");
    }

    roles
        .create_role(CreateRoleRequest {
            name: "admin".to_string(),
            description: None,
            permission_ids: None,
        })
        .await
        .expect("Failed to create role");
    groups
        .create_group(GroupRequest {
            name: "everyone".to_string(),
            description: None,
        })
        .await
        .expect("Failed to create group");
    users
        .create_user(CreateUserRequest {
            username: "dave".to_string(),
            email: "dave@example.com".to_string(),
            password: "correct horse battery".to_string(),
            role_ids: None,
            group_ids: None,
        })
        .await
        .expect("Failed to create user");

    let page = PageRequest::from_query(None, None, None, None);
    assert_eq!(permissions.list_permissions(page.clone()).await.unwrap().total, 3);
    assert_eq!(roles.list_roles(page.clone()).await.unwrap().total, 1);
    assert_eq!(groups.list_groups(page.clone()).await.unwrap().total, 1);
    assert_eq!(users.list_users(page).await.unwrap().total, 1);

    let by_resource = permissions
        .permissions_by_resource("widget")
        .await
        .expect("Failed to query by resource");
    assert_eq!(by_resource.len(), 3);
}
