//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{Cents, Minutes, Selector, Units};

/// Multi-branch ledger: money, time and inventory per branch
#[derive(Parser, Debug)]
#[command(name = "ledger")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Ledger state file (default: <base_dir>/ledger.toml)
    #[arg(short = 'f', long = "state", global = true, value_hint = ValueHint::FilePath)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a fresh ledger with one seed branch
    Init {
        /// Overwrite an existing ledger
        #[arg(long)]
        force: bool,
    },

    /// Show totals over all branches
    Summary,

    /// List branches with their figures
    Branches {
        /// Show names and descriptions instead
        #[arg(long)]
        descriptions: bool,
    },

    /// Deposit capital, spread over branches by balance
    Deposit {
        /// Amount in dollars, e.g. 12.50
        #[arg(allow_negative_numbers = true)]
        amount: Cents,
    },

    /// Withdraw capital, spread over branches by balance
    Withdraw {
        /// Amount in dollars
        #[arg(allow_negative_numbers = true)]
        amount: Cents,
    },

    /// Record income, spread over branches by balance
    Earn {
        /// Amount in dollars
        #[arg(allow_negative_numbers = true)]
        amount: Cents,
    },

    /// Record an expense, spread over branches by balance
    Spend {
        /// Amount in dollars
        #[arg(allow_negative_numbers = true)]
        amount: Cents,
    },

    /// Clock time, spread over branches by balance
    Clock {
        /// Hours, e.g. 1.5 or "1h 30m"
        hours: Minutes,
    },

    /// Print the command history
    History,

    /// Rebuild the ledger by replaying its history
    Replay,

    /// Work with one branch (by name or row number)
    Branch {
        /// Branch name or 1-based row number
        selector: Selector,

        #[command(subcommand)]
        command: BranchCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum BranchCommands {
    /// Show the branch's figures
    Show,

    /// Print the branch name
    Name,

    /// Print the branch description
    Description,

    /// Give the branch a new, unused name
    Rename { new_name: String },

    /// Replace the branch description
    Describe { description: String },

    /// Deposit capital into this branch
    Deposit {
        #[arg(allow_negative_numbers = true)]
        amount: Cents,
    },

    /// Withdraw capital from this branch
    Withdraw {
        #[arg(allow_negative_numbers = true)]
        amount: Cents,
    },

    /// Record income in this branch
    Earn {
        #[arg(allow_negative_numbers = true)]
        amount: Cents,
    },

    /// Record an expense in this branch
    Spend {
        #[arg(allow_negative_numbers = true)]
        amount: Cents,
    },

    /// Clock time on this branch
    Clock { hours: Minutes },

    /// List the branch inventory
    Inventory,

    /// Replace the branch by equal-share children
    Split {
        /// Number of children (at least 2)
        #[arg(default_value_t = 2)]
        ways: usize,
    },

    /// Absorb another branch into this one
    Merge {
        /// Branch to absorb (name or row number)
        other: Selector,
    },

    /// Work with one inventory item (by label or row number)
    Item {
        /// Item label or 1-based row number
        item: Selector,

        /// Number of units to act on
        #[arg(short, long, default_value = "1")]
        units: Units,

        #[command(subcommand)]
        command: ItemCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add units without paying
    Acquire,

    /// Remove units without payment
    Discard,

    /// Move units to another label
    Relabel { new_label: String },

    /// Pay for units (expense)
    Buy {
        #[arg(allow_negative_numbers = true)]
        price: Cents,
    },

    /// Sell units (income)
    Sell {
        #[arg(allow_negative_numbers = true)]
        price: Cents,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config and state paths
    Path,

    /// Create config template
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
