//! Application layer: commands and the ledger service
//!
//! This layer turns textual commands into domain operations and keeps the
//! history that makes them replayable.

pub mod command;
pub mod error;
pub mod services;

pub use command::{BranchAction, Command, ItemAction};
pub use error::{ApplicationError, ApplicationResult};
