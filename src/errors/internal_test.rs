#[cfg(test)]
mod tests {
    use crate::errors::internal::{EntityKind, InternalError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_includes_operation() {
        let db_err = DbErr::RecordNotFound("test record".to_string());
        let error = InternalError::database("create_user", db_err);

        let error_string = error.to_string();
        assert!(error_string.contains("create_user"));
        assert!(error_string.contains("Database error"));
    }

    #[test]
    fn test_conflict_error_names_field_and_value() {
        let error = InternalError::conflict(EntityKind::User, "username", "alice");

        let error_string = error.to_string();
        assert!(error_string.contains("User"));
        assert!(error_string.contains("username"));
        assert!(error_string.contains("alice"));
    }

    #[test]
    fn test_not_found_error_names_kind_and_key() {
        let error = InternalError::not_found(EntityKind::Role, 42);

        let error_string = error.to_string();
        assert!(error_string.contains("Role"));
        assert!(error_string.contains("42"));
    }

    #[test]
    fn test_crypto_error_includes_operation() {
        let error = InternalError::crypto("argon2_hash", "invalid params");

        let error_string = error.to_string();
        assert!(error_string.contains("argon2_hash"));
        assert!(error_string.contains("invalid params"));
        assert!(error_string.contains("Crypto error"));
    }
}
