use crate::errors::RbacError;
use crate::test::utils::setup_test_services;
use crate::types::dto::group::GroupRequest;
use crate::types::dto::user::CreateUserRequest;
use crate::types::internal::PageRequest;

fn group_req(name: &str) -> GroupRequest {
    GroupRequest {
        name: name.to_string(),
        description: None,
    }
}

fn user_req(username: &str) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "correct horse battery".to_string(),
        role_ids: None,
        group_ids: None,
    }
}

#[tokio::test]
async fn test_created_group_is_retrievable() {
    let (_app_data, _users, groups, _roles, _perms) = setup_test_services().await;

    let created = groups
        .create_group(GroupRequest {
            name: "engineering".to_string(),
            description: Some("All engineers".to_string()),
        })
        .await
        .expect("Failed to create group");
    assert_eq!(created.created_at, created.updated_at);

    let fetched = groups.get_group(created.id).await.expect("Failed to fetch group");
    assert_eq!(fetched.name, "engineering");
    assert_eq!(fetched.description.as_deref(), Some("All engineers"));
}

#[tokio::test]
async fn test_duplicate_group_name_is_rejected() {
    let (_app_data, _users, groups, _roles, _perms) = setup_test_services().await;

    groups
        .create_group(group_req("engineering"))
        .await
        .expect("Failed to create group");

    let result = groups.create_group(group_req("engineering")).await;
    assert!(matches!(result, Err(RbacError::Conflict(_))));
}

#[tokio::test]
async fn test_group_name_too_short_is_rejected() {
    let (_app_data, _users, groups, _roles, _perms) = setup_test_services().await;

    let result = groups.create_group(group_req("x")).await;
    match result {
        Err(RbacError::ValidationFailed(body)) => {
            assert_eq!(body.0.validation_errors[0].field, "name");
        }
        other => panic!("Expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rename_to_taken_name_is_rejected() {
    let (_app_data, _users, groups, _roles, _perms) = setup_test_services().await;

    groups.create_group(group_req("alpha")).await.unwrap();
    let beta = groups.create_group(group_req("beta")).await.unwrap();

    let result = groups.update_group(beta.id, group_req("alpha")).await;
    assert!(matches!(result, Err(RbacError::Conflict(_))));

    // Renaming to its own current name stays fine
    let updated = groups
        .update_group(beta.id, group_req("beta"))
        .await
        .expect("Rename to own name should succeed");
    assert_eq!(updated.name, "beta");
}

#[tokio::test]
async fn test_membership_is_visible_from_both_directions() {
    let (_app_data, users, groups, _roles, _perms) = setup_test_services().await;

    let group = groups.create_group(group_req("engineering")).await.unwrap();
    let user = users.create_user(user_req("alice")).await.unwrap();

    groups
        .add_user_to_group(group.id, user.id)
        .await
        .expect("Failed to add member");

    let members = groups.group_members(group.id).await.expect("Failed to list members");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].username, "alice");

    let fetched = users.get_user(user.id).await.expect("Failed to fetch user");
    assert_eq!(fetched.groups.len(), 1);
    assert_eq!(fetched.groups[0].id, group.id);
}

#[tokio::test]
async fn test_add_member_is_idempotent() {
    let (_app_data, users, groups, _roles, _perms) = setup_test_services().await;

    let group = groups.create_group(group_req("engineering")).await.unwrap();
    let user = users.create_user(user_req("alice")).await.unwrap();

    let first = groups.add_user_to_group(group.id, user.id).await.unwrap();
    let touched_at = first.updated_at;

    let second = groups
        .add_user_to_group(group.id, user.id)
        .await
        .expect("Repeated add should be a no-op");
    assert_eq!(second.updated_at, touched_at);

    let members = groups.group_members(group.id).await.unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn test_remove_member_and_remove_again() {
    let (_app_data, users, groups, _roles, _perms) = setup_test_services().await;

    let group = groups.create_group(group_req("engineering")).await.unwrap();
    let user = users.create_user(user_req("alice")).await.unwrap();
    groups.add_user_to_group(group.id, user.id).await.unwrap();

    groups
        .remove_user_from_group(group.id, user.id)
        .await
        .expect("Failed to remove member");
    assert!(groups.group_members(group.id).await.unwrap().is_empty());

    // Removing the already-absent edge stays successful
    groups
        .remove_user_from_group(group.id, user.id)
        .await
        .expect("Removing an absent edge should succeed");
}

#[tokio::test]
async fn test_add_member_to_missing_group_fails() {
    let (_app_data, users, groups, _roles, _perms) = setup_test_services().await;

    let user = users.create_user(user_req("alice")).await.unwrap();
    let result = groups.add_user_to_group(9999, user.id).await;
    assert!(matches!(result, Err(RbacError::NotFound(_))));

    let group = groups.create_group(group_req("engineering")).await.unwrap();
    let result = groups.add_user_to_group(group.id, 9999).await;
    assert!(matches!(result, Err(RbacError::NotFound(_))));
}

#[tokio::test]
async fn test_deleting_group_leaves_members_intact() {
    let (_app_data, users, groups, _roles, _perms) = setup_test_services().await;

    let group = groups.create_group(group_req("engineering")).await.unwrap();
    let user = users.create_user(user_req("alice")).await.unwrap();
    groups.add_user_to_group(group.id, user.id).await.unwrap();

    groups.delete_group(group.id).await.expect("Failed to delete group");

    let fetched = users.get_user(user.id).await.expect("User should survive");
    assert!(fetched.groups.is_empty());
}

#[tokio::test]
async fn test_list_groups_pagination() {
    let (_app_data, _users, groups, _roles, _perms) = setup_test_services().await;

    for i in 0..3 {
        groups.create_group(group_req(&format!("group{}", i))).await.unwrap();
    }

    let page = groups
        .list_groups(PageRequest::from_query(Some(0), Some(2), None, None))
        .await
        .expect("Failed to list groups");
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);

    let all = groups.list_all_groups().await.expect("Failed to list all groups");
    assert_eq!(all.len(), 3);
}
