//! Ledger service
//!
//! Executes [`Command`]s against a [`Ledger`] and records each successful one
//! in the history, so that a ledger can always be rebuilt by replaying it.

use tracing::{debug, info};

use crate::application::command::{BranchAction, Command, ItemAction};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    DomainResult, Ledger, Registry, Selector, DEFAULT_BRANCH_NAME, DEFAULT_DESCRIPTION,
};

/// A detached copy of everything the service holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    pub registry: Registry,
    /// Canonical command lines, oldest first.
    pub history: Vec<String>,
}

/// Service owning one ledger and its command history.
#[derive(Debug, Clone)]
pub struct LedgerService {
    ledger: Ledger,
    history: Vec<String>,
    seed_name: String,
    seed_description: String,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerService {
    /// Create a service holding a fresh ledger with the default seed branch.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_BRANCH_NAME, DEFAULT_DESCRIPTION)
    }

    /// Create a service whose fresh ledgers start with the given branch.
    pub fn with_seed(name: impl Into<String>, description: impl Into<String>) -> Self {
        let seed_name = name.into();
        let seed_description = description.into();
        Self {
            ledger: Ledger::seeded(&seed_name, &seed_description),
            history: Vec::new(),
            seed_name,
            seed_description,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Resolve a branch selector against the current registry.
    pub fn resolve_branch(&self, selector: &Selector) -> ApplicationResult<String> {
        Ok(self.ledger.resolve(selector)?)
    }

    /// Resolve an item selector within a branch's inventory.
    pub fn resolve_item(&self, branch: &str, selector: &Selector) -> ApplicationResult<String> {
        Ok(self.ledger.branch(branch)?.inventory().resolve(selector)?)
    }

    /// Run a command; on success its canonical text joins the history.
    ///
    /// A failing command leaves both the ledger and the history untouched.
    pub fn execute(&mut self, command: &Command) -> ApplicationResult<()> {
        self.apply(command)?;
        let line = command.to_string();
        debug!("execute: {line}");
        self.history.push(line);
        Ok(())
    }

    fn apply(&mut self, command: &Command) -> DomainResult<()> {
        let ledger = &mut self.ledger;
        match command {
            Command::Distribute { activity, amount } => {
                ledger.distribute(*activity, *amount).map(drop)
            }
            Command::Clock { minutes } => ledger.distribute_time(*minutes).map(drop),
            Command::Branch { name, action } => match action {
                BranchAction::Rename(new_name) => ledger.rename_branch(name, new_name),
                BranchAction::Describe(text) => ledger.describe_branch(name, text),
                BranchAction::Money { activity, amount } => ledger.apply(name, *activity, *amount),
                BranchAction::Clock(minutes) => ledger.clock(name, *minutes),
                BranchAction::Split(ways) => ledger.split_branch(name, *ways).map(drop),
                BranchAction::Merge(other) => ledger.merge_branches(name, other),
                BranchAction::Item {
                    label,
                    units,
                    action,
                } => match action {
                    ItemAction::Acquire => ledger.acquire_item(name, label, *units),
                    ItemAction::Discard => ledger.discard_item(name, label, *units),
                    ItemAction::Relabel(new_label) => {
                        ledger.relabel_item(name, label, new_label, *units)
                    }
                    ItemAction::Buy(cents) => ledger.buy_item(name, label, *units, *cents),
                    ItemAction::Sell(cents) => ledger.sell_item(name, label, *units, *cents),
                },
            },
        }
    }

    pub fn get_state(&self) -> LedgerState {
        LedgerState {
            registry: self.ledger.registry().clone(),
            history: self.history.clone(),
        }
    }

    /// Replace the held state after validating it.
    ///
    /// Every registry key must equal its branch's name and every history line
    /// must parse as a command. On failure nothing changes.
    pub fn set_state(&mut self, state: LedgerState) -> ApplicationResult<()> {
        let LedgerState { registry, history } = state;
        for (index, line) in history.iter().enumerate() {
            line.parse::<Command>()
                .map_err(|e| ApplicationError::InvalidState {
                    message: format!("history line {}: {e}", index + 1),
                })?;
        }
        self.ledger =
            Ledger::from_registry(registry).map_err(|e| ApplicationError::InvalidState {
                message: e.to_string(),
            })?;
        self.history = history;
        debug!(
            "set_state: {} branches, {} history lines",
            self.ledger.len(),
            self.history.len()
        );
        Ok(())
    }

    /// Back to a freshly seeded ledger with an empty history.
    pub fn reset(&mut self) {
        self.ledger = Ledger::seeded(&self.seed_name, &self.seed_description);
        self.history.clear();
        info!("ledger reset to seed branch {:?}", self.seed_name);
    }

    /// Rebuild a ledger from scratch by executing `history` in order.
    ///
    /// Returns a new service with the same seed; `self` is not modified.
    pub fn replay(&self, history: &[String]) -> ApplicationResult<Self> {
        let mut service = Self::with_seed(&self.seed_name, &self.seed_description);
        for (index, line) in history.iter().enumerate() {
            let replay_error = |source| ApplicationError::Replay {
                line: index + 1,
                command: line.clone(),
                source,
            };
            let command: Command = line.parse().map_err(replay_error)?;
            service.apply(&command).map_err(replay_error)?;
            service.history.push(command.to_string());
        }
        debug!("replay: {} commands", history.len());
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Activity, Cents};

    #[test]
    fn given_failing_command_when_executed_then_history_unchanged() {
        let mut service = LedgerService::new();
        let command = Command::distribute(Activity::Withdraw, Cents::new(100));

        assert!(service.execute(&command).is_err());
        assert!(service.history().is_empty());
    }

    #[test]
    fn given_seed_when_reset_then_seed_branch_restored() {
        let mut service = LedgerService::with_seed("Main", "seed");
        service
            .execute(&Command::branch(
                "Main",
                BranchAction::Rename("Other".to_string()),
            ))
            .unwrap();

        service.reset();

        assert!(service.ledger().contains("Main"));
        assert!(service.history().is_empty());
    }
}
