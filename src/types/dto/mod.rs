// Request and response DTOs for the HTTP API
pub mod common;
pub mod group;
pub mod permission;
pub mod role;
pub mod user;
