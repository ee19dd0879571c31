use crate::errors::RbacError;
use crate::test::utils::setup_test_services;
use crate::types::dto::permission::CreatePermissionRequest;
use crate::types::dto::role::{CreateRoleRequest, UpdateRoleRequest};
use crate::types::internal::PageRequest;

fn role_req(name: &str) -> CreateRoleRequest {
    CreateRoleRequest {
        name: name.to_string(),
        description: None,
        permission_ids: None,
    }
}

fn permission_req(name: &str, resource: &str, action: &str) -> CreatePermissionRequest {
    CreatePermissionRequest {
        name: name.to_string(),
        description: None,
        resource: resource.to_string(),
        action: action.to_string(),
    }
}

#[tokio::test]
async fn test_created_role_carries_its_permissions() {
    let (_app_data, _users, _groups, roles, perms) = setup_test_services().await;

    let read = perms
        .create_permission(permission_req("doc-read", "document", "read"))
        .await
        .expect("Failed to create permission");
    assert_eq!(read.full_permission, "document:read");

    let role = roles
        .create_role(CreateRoleRequest {
            name: "viewer".to_string(),
            description: Some("Read-only access".to_string()),
            permission_ids: Some(vec![read.id]),
        })
        .await
        .expect("Failed to create role");

    assert_eq!(role.permissions.len(), 1);
    assert_eq!(role.permissions[0].full_permission, "document:read");

    let fetched = roles.get_role(role.id).await.expect("Failed to fetch role");
    assert_eq!(fetched.permissions.len(), 1);
}

#[tokio::test]
async fn test_duplicate_role_name_is_rejected() {
    let (_app_data, _users, _groups, roles, _perms) = setup_test_services().await;

    roles.create_role(role_req("viewer")).await.unwrap();
    let result = roles.create_role(role_req("viewer")).await;
    assert!(matches!(result, Err(RbacError::Conflict(_))));
}

#[tokio::test]
async fn test_create_with_missing_permission_reference_fails() {
    let (_app_data, _users, _groups, roles, _perms) = setup_test_services().await;

    let result = roles
        .create_role(CreateRoleRequest {
            name: "viewer".to_string(),
            description: None,
            permission_ids: Some(vec![42]),
        })
        .await;
    assert!(matches!(result, Err(RbacError::NotFound(_))));

    // The aborted create must not have inserted the role
    let page = roles
        .list_roles(PageRequest::from_query(None, None, None, None))
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_add_permission_is_idempotent() {
    let (_app_data, _users, _groups, roles, perms) = setup_test_services().await;

    let role = roles.create_role(role_req("viewer")).await.unwrap();
    let perm = perms
        .create_permission(permission_req("doc-read", "document", "read"))
        .await
        .unwrap();

    let first = roles
        .add_permission_to_role(role.id, perm.id)
        .await
        .expect("Failed to add permission");
    assert_eq!(first.permissions.len(), 1);

    let second = roles
        .add_permission_to_role(role.id, perm.id)
        .await
        .expect("Repeated add should be a no-op");
    assert_eq!(second.permissions.len(), 1);
    assert_eq!(second.updated_at, first.updated_at);
}

#[tokio::test]
async fn test_remove_absent_permission_is_a_noop() {
    let (_app_data, _users, _groups, roles, perms) = setup_test_services().await;

    let role = roles.create_role(role_req("viewer")).await.unwrap();
    let perm = perms
        .create_permission(permission_req("doc-read", "document", "read"))
        .await
        .unwrap();

    let view = roles
        .remove_permission_from_role(role.id, perm.id)
        .await
        .expect("Removing an absent edge should succeed");
    assert!(view.permissions.is_empty());
}

#[tokio::test]
async fn test_bulk_permission_replacement_uses_set_difference() {
    let (_app_data, _users, _groups, roles, perms) = setup_test_services().await;

    let a = perms
        .create_permission(permission_req("doc-read", "document", "read"))
        .await
        .unwrap();
    let b = perms
        .create_permission(permission_req("doc-write", "document", "write"))
        .await
        .unwrap();
    let c = perms
        .create_permission(permission_req("doc-delete", "document", "delete"))
        .await
        .unwrap();

    let role = roles
        .create_role(CreateRoleRequest {
            name: "editor".to_string(),
            description: None,
            permission_ids: Some(vec![a.id, b.id]),
        })
        .await
        .unwrap();

    let updated = roles
        .update_role(
            role.id,
            UpdateRoleRequest {
                name: "editor".to_string(),
                description: None,
                permission_ids: Some(vec![b.id, c.id]),
            },
        )
        .await
        .expect("Failed to replace permission set");

    let mut ids: Vec<i32> = updated.permissions.iter().map(|p| p.id).collect();
    ids.sort();
    assert_eq!(ids, vec![b.id, c.id]);
}

#[tokio::test]
async fn test_update_without_permission_ids_leaves_set_untouched() {
    let (_app_data, _users, _groups, roles, perms) = setup_test_services().await;

    let perm = perms
        .create_permission(permission_req("doc-read", "document", "read"))
        .await
        .unwrap();
    let role = roles
        .create_role(CreateRoleRequest {
            name: "viewer".to_string(),
            description: None,
            permission_ids: Some(vec![perm.id]),
        })
        .await
        .unwrap();

    let updated = roles
        .update_role(
            role.id,
            UpdateRoleRequest {
                name: "reader".to_string(),
                description: None,
                permission_ids: None,
            },
        )
        .await
        .expect("Failed to rename role");
    assert_eq!(updated.name, "reader");
    assert_eq!(updated.permissions.len(), 1);
}

#[tokio::test]
async fn test_duplicate_permission_name_is_rejected() {
    let (_app_data, _users, _groups, _roles, perms) = setup_test_services().await;

    perms
        .create_permission(permission_req("doc-read", "document", "read"))
        .await
        .unwrap();

    // Uniqueness is on the name, not the resource:action pair
    let result = perms
        .create_permission(permission_req("doc-read", "report", "read"))
        .await;
    assert!(matches!(result, Err(RbacError::Conflict(_))));

    perms
        .create_permission(permission_req("document-reader", "document", "read"))
        .await
        .expect("Different name with same pair should succeed");
}

#[tokio::test]
async fn test_permissions_by_resource_is_case_insensitive() {
    let (_app_data, _users, _groups, _roles, perms) = setup_test_services().await;

    perms
        .create_permission(permission_req("doc-read", "Document", "read"))
        .await
        .unwrap();
    perms
        .create_permission(permission_req("user-read", "user", "read"))
        .await
        .unwrap();

    let found = perms
        .permissions_by_resource("document")
        .await
        .expect("Failed to query by resource");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "doc-read");
}

#[tokio::test]
async fn test_deleting_permission_detaches_it_from_roles() {
    let (_app_data, _users, _groups, roles, perms) = setup_test_services().await;

    let perm = perms
        .create_permission(permission_req("doc-read", "document", "read"))
        .await
        .unwrap();
    let role = roles
        .create_role(CreateRoleRequest {
            name: "viewer".to_string(),
            description: None,
            permission_ids: Some(vec![perm.id]),
        })
        .await
        .unwrap();

    perms
        .delete_permission(perm.id)
        .await
        .expect("Failed to delete permission");

    let fetched = roles.get_role(role.id).await.expect("Role should survive");
    assert!(fetched.permissions.is_empty());
}
