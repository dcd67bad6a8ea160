//! CLI command handlers

pub mod args;
pub mod error_handling;
pub mod router;

pub use args::{get_log_level, Cli, Commands};
pub use error_handling::handle_fatal_error;
pub use router::execute_command;
