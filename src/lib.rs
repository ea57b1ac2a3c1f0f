//! Multi-branch ledger: money, time and inventory per branch, with exact
//! proportional distribution and conserving split/merge.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
