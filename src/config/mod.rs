// Configuration layer - environment-driven settings
pub mod database;
pub mod logging;

pub use database::{connect_database, migrate_database};
pub use logging::init_logging;
