//! Ledger snapshots on disk
//!
//! A snapshot is a TOML document holding the registry and the command
//! history. The domain types stay free of serde; the DTOs below mirror them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::services::LedgerState;
use crate::domain::{
    Balance, Branch, Cents, DomainError, Inventory, Minutes, Registry, Units,
};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDto {
    version: u32,
    #[serde(default)]
    saved_at: Option<String>,
    #[serde(default)]
    history: Vec<String>,
    #[serde(default)]
    branches: Vec<BranchDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BranchDto {
    key: String,
    name: String,
    #[serde(default)]
    description: String,
    balance: i64,
    profit: i64,
    time_spent: i64,
    #[serde(default)]
    inventory: Vec<ItemDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemDto {
    label: String,
    units: i64,
}

impl BranchDto {
    fn from_branch(key: &str, branch: &Branch) -> Self {
        Self {
            key: key.to_string(),
            name: branch.name().to_string(),
            description: branch.description().to_string(),
            balance: branch.balance().value(),
            profit: branch.profit().value(),
            time_spent: branch.time_spent().value(),
            inventory: branch
                .inventory()
                .iter()
                .map(|(label, units)| ItemDto {
                    label: label.clone(),
                    units: units.value(),
                })
                .collect(),
        }
    }

    fn into_branch(self) -> Result<(String, Branch), String> {
        let mut inventory = Inventory::new();
        for item in self.inventory {
            if inventory.contains(&item.label) {
                return Err(format!(
                    "branch {:?}: duplicate item {:?}",
                    self.name, item.label
                ));
            }
            inventory
                .acquire(&item.label, Units::new(item.units).map_err(|e| e.to_string())?)
                .map_err(|e| e.to_string())?;
        }
        let invalid = |e: DomainError| format!("branch {:?}: {e}", self.name);
        let balance = Balance::new(self.balance).map_err(invalid)?;
        let time_spent = Minutes::new(self.time_spent).map_err(invalid)?;
        let branch = Branch::from_parts(
            self.name,
            self.description,
            balance,
            Cents::new(self.profit),
            time_spent,
            inventory,
        );
        Ok((self.key, branch))
    }
}

/// Reads and writes ledger snapshots at one path.
pub struct SnapshotStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// Load the stored state; `None` when no snapshot has been written yet.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> InfraResult<Option<LedgerState>> {
        if !self.exists() {
            debug!("no snapshot yet");
            return Ok(None);
        }
        let text = self
            .fs
            .read_to_string(&self.path)
            .map_err(|e| InfraError::io(format!("reading {}", self.path.display()), e))?;
        let state = decode(&text).map_err(|message| InfraError::snapshot(&self.path, message))?;
        debug!(
            "loaded {} branches, {} history lines",
            state.registry.len(),
            state.history.len()
        );
        Ok(Some(state))
    }

    /// Atomically replace the snapshot with `state`.
    #[instrument(level = "debug", skip(self, state), fields(path = %self.path.display()))]
    pub fn save(&self, state: &LedgerState) -> InfraResult<()> {
        let text = encode(state).map_err(|message| InfraError::snapshot(&self.path, message))?;
        self.fs
            .ensure_parent(&self.path)
            .map_err(|e| InfraError::io(format!("creating parent of {}", self.path.display()), e))?;
        self.fs
            .write_atomic(&self.path, &text)
            .map_err(|e| InfraError::io(format!("writing {}", self.path.display()), e))?;
        debug!("saved {} branches", state.registry.len());
        Ok(())
    }
}

fn encode(state: &LedgerState) -> Result<String, String> {
    let dto = SnapshotDto {
        version: SNAPSHOT_VERSION,
        saved_at: Some(chrono::Utc::now().to_rfc3339()),
        history: state.history.clone(),
        branches: state
            .registry
            .iter()
            .map(|(key, branch)| BranchDto::from_branch(key, branch))
            .collect(),
    };
    toml::to_string_pretty(&dto).map_err(|e| e.to_string())
}

fn decode(text: &str) -> Result<LedgerState, String> {
    let dto: SnapshotDto = toml::from_str(text).map_err(|e| e.to_string())?;
    if dto.version != SNAPSHOT_VERSION {
        return Err(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            dto.version
        ));
    }
    let mut registry = Registry::new();
    for branch in dto.branches {
        let (key, branch) = branch.into_branch()?;
        if registry.set(key.clone(), branch).is_some() {
            return Err(format!("duplicate branch key {key:?}"));
        }
    }
    Ok(LedgerState {
        registry,
        history: dto.history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_other_version_when_decoding_then_rejected() {
        let result = decode("version = 99\n");
        assert!(result.unwrap_err().contains("unsupported snapshot version"));
    }

    #[test]
    fn given_negative_balance_when_decoding_then_rejected() {
        let text = r#"
version = 1

[[branches]]
key = "A"
name = "A"
balance = -5
profit = 0
time_spent = 0
"#;
        assert!(decode(text).is_err());
    }
}
