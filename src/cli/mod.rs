//! CLI layer: argument parsing, command dispatch and table output

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod table;

pub use args::{Cli, Commands};
pub use commands::execute_command;
pub use error::{CliError, CliResult};
