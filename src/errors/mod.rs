// Errors layer - Error type definitions
pub mod api;
pub mod internal;

// Re-exports for convenience
pub use api::RbacError;
pub use internal::{DatabaseError, EntityKind, InternalError};

#[cfg(test)]
mod internal_test;
