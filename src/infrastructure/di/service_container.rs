//! Service container for dependency injection
//!
//! Wires the settings, the filesystem and the snapshot store together and
//! hands out ledger services loaded from disk.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::LedgerService;
use crate::config::Settings;
use crate::infrastructure::snapshot::SnapshotStore;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Snapshot store at the configured state path
    pub store: SnapshotStore,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let store = SnapshotStore::new(Arc::clone(&fs), settings.state_path());
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            store,
        }
    }

    /// A ledger service with no history, seeded from the settings.
    pub fn fresh_ledger(&self) -> LedgerService {
        LedgerService::with_seed(
            &self.settings.initial_branch,
            &self.settings.initial_description,
        )
    }

    /// Load the stored ledger, or a fresh one when nothing is stored yet.
    pub fn open_ledger(&self) -> InfraResult<LedgerService> {
        let mut service = self.fresh_ledger();
        if let Some(state) = self.store.load()? {
            service.set_state(state)?;
        }
        debug!("opened ledger with {} branches", service.ledger().len());
        Ok(service)
    }

    pub fn save_ledger(&self, service: &LedgerService) -> InfraResult<()> {
        self.store.save(&service.get_state())
    }
}
