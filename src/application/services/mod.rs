//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod ledger;

pub use ledger::{LedgerService, LedgerState};
