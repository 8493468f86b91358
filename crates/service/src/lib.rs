// Service modules (registry functionality)
pub mod config;
pub mod database;
pub mod http_server;
pub mod process;
pub mod state;

// Re-exports for consumers (CLI, tests)
pub use config::Config;
pub use database::{Database, DatabaseSetupError};
pub use process::{spawn_service, start_service, ShutdownHandle};
pub use state::{ServiceState, StateSetupError};
