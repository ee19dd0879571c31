//! Explicit per-request validation, run before any core operation executes.
//!
//! Each validator checks every field and reports one message per offending
//! field, so a request with several problems is rejected with all of them
//! at once.

use crate::errors::api::{FieldViolation, RbacError};
use crate::types::dto::group::GroupRequest;
use crate::types::dto::permission::CreatePermissionRequest;
use crate::types::dto::role::{CreateRoleRequest, UpdateRoleRequest};
use crate::types::dto::user::{CreateUserRequest, UpdateUserRequest};

const MAX_DESCRIPTION_LEN: usize = 255;

fn violation(field: &str, message: &str) -> FieldViolation {
    FieldViolation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn check_username(value: &str, violations: &mut Vec<FieldViolation>) {
    let len = value.chars().count();
    if !(3..=50).contains(&len) {
        violations.push(violation(
            "username",
            "Username must be between 3 and 50 characters",
        ));
    }
}

fn check_email(value: &str, violations: &mut Vec<FieldViolation>) {
    if !is_valid_email(value) {
        violations.push(violation("email", "Invalid email format"));
    }
}

fn check_password(value: &str, violations: &mut Vec<FieldViolation>) {
    let len = value.chars().count();
    if !(8..=100).contains(&len) {
        violations.push(violation(
            "password",
            "Password must be between 8 and 100 characters",
        ));
    }
}

fn check_description(value: Option<&str>, violations: &mut Vec<FieldViolation>) {
    if let Some(description) = value {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            violations.push(violation(
                "description",
                "Description cannot exceed 255 characters",
            ));
        }
    }
}

fn check_short_name(
    field: &str,
    value: &str,
    required_message: &str,
    length_message: &str,
    violations: &mut Vec<FieldViolation>,
) {
    if value.trim().is_empty() {
        violations.push(violation(field, required_message));
    } else if value.chars().count() > 50 {
        violations.push(violation(field, length_message));
    }
}

/// Minimal structural email check: one '@', non-empty local part, and a
/// dotted domain without whitespace.
fn is_valid_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = match parts.next() {
        Some(d) => d,
        None => return false,
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if value.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn finish(violations: Vec<FieldViolation>) -> Result<(), RbacError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(RbacError::validation_failed(violations))
    }
}

pub fn validate_create_user(req: &CreateUserRequest) -> Result<(), RbacError> {
    let mut violations = Vec::new();
    check_username(&req.username, &mut violations);
    check_email(&req.email, &mut violations);
    check_password(&req.password, &mut violations);
    finish(violations)
}

pub fn validate_update_user(req: &UpdateUserRequest) -> Result<(), RbacError> {
    let mut violations = Vec::new();
    if let Some(username) = &req.username {
        check_username(username, &mut violations);
    }
    if let Some(email) = &req.email {
        check_email(email, &mut violations);
    }
    if let Some(password) = &req.password {
        check_password(password, &mut violations);
    }
    finish(violations)
}

pub fn validate_group(req: &GroupRequest) -> Result<(), RbacError> {
    let mut violations = Vec::new();
    if req.name.trim().is_empty() {
        violations.push(violation("name", "Group name is required"));
    } else {
        let len = req.name.chars().count();
        if !(2..=100).contains(&len) {
            violations.push(violation(
                "name",
                "Group name must be between 2 and 100 characters",
            ));
        }
    }
    check_description(req.description.as_deref(), &mut violations);
    finish(violations)
}

pub fn validate_create_role(req: &CreateRoleRequest) -> Result<(), RbacError> {
    validate_role_fields(&req.name, req.description.as_deref())
}

pub fn validate_update_role(req: &UpdateRoleRequest) -> Result<(), RbacError> {
    validate_role_fields(&req.name, req.description.as_deref())
}

fn validate_role_fields(name: &str, description: Option<&str>) -> Result<(), RbacError> {
    let mut violations = Vec::new();
    check_short_name(
        "name",
        name,
        "Role name is required",
        "Role name cannot exceed 50 characters",
        &mut violations,
    );
    check_description(description, &mut violations);
    finish(violations)
}

pub fn validate_create_permission(req: &CreatePermissionRequest) -> Result<(), RbacError> {
    let mut violations = Vec::new();
    check_short_name(
        "name",
        &req.name,
        "Permission name is required",
        "Permission name cannot exceed 50 characters",
        &mut violations,
    );
    check_short_name(
        "resource",
        &req.resource,
        "Resource is required",
        "Resource cannot exceed 50 characters",
        &mut violations,
    );
    check_short_name(
        "action",
        &req.action,
        "Action is required",
        "Action cannot exceed 50 characters",
        &mut violations,
    );
    check_description(req.description.as_deref(), &mut violations);
    finish(violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_request(username: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role_ids: None,
            group_ids: None,
        }
    }

    #[test]
    fn test_valid_user_request_passes() {
        assert!(validate_create_user(&user_request("alice", "alice@example.com", "s3cret-pw")).is_ok());
    }

    #[test]
    fn test_short_username_rejected() {
        let err = validate_create_user(&user_request("al", "alice@example.com", "s3cret-pw"));
        assert!(err.is_err());
    }

    #[test]
    fn test_all_invalid_fields_reported_at_once() {
        let result = validate_create_user(&user_request("al", "not-an-email", "short"));
        match result {
            Err(RbacError::ValidationFailed(body)) => {
                assert_eq!(body.0.validation_errors.len(), 3);
            }
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("nobody"));
        assert!(!is_valid_email("a@.co"));
    }

    #[test]
    fn test_update_user_skips_absent_fields() {
        let req = UpdateUserRequest::default();
        assert!(validate_update_user(&req).is_ok());
    }

    #[test]
    fn test_group_name_bounds() {
        let ok = GroupRequest {
            name: "engineering".to_string(),
            description: None,
        };
        assert!(validate_group(&ok).is_ok());

        let too_short = GroupRequest {
            name: "e".to_string(),
            description: None,
        };
        assert!(validate_group(&too_short).is_err());

        let long_description = GroupRequest {
            name: "engineering".to_string(),
            description: Some("d".repeat(256)),
        };
        assert!(validate_group(&long_description).is_err());
    }

    #[test]
    fn test_permission_requires_resource_and_action() {
        let req = CreatePermissionRequest {
            name: "document:read".to_string(),
            description: None,
            resource: "".to_string(),
            action: "read".to_string(),
        };
        match validate_create_permission(&req) {
            Err(RbacError::ValidationFailed(body)) => {
                assert_eq!(body.0.validation_errors.len(), 1);
                assert_eq!(body.0.validation_errors[0].field, "resource");
            }
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
    }
}
