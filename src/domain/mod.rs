//! Domain layer: ledger quantities, branches and the registry
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod branch;
pub mod distribution;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod ordered_map;
pub mod quantity;
pub mod selector;

pub use branch::{Activity, Branch};
pub use distribution::allocate_by_weight;
pub use error::{DomainError, DomainResult};
pub use inventory::Inventory;
pub use ledger::{Ledger, Registry, DEFAULT_BRANCH_NAME, DEFAULT_DESCRIPTION};
pub use ordered_map::OrderedMap;
pub use quantity::{split_int, Balance, Cents, Minutes, Units, Wage};
pub use selector::{RowNum, Selector};
