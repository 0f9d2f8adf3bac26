//! # State Snapshot
//!
//! The operator CLI keeps the factory and its host ledger in a JSON file
//! between invocations. A missing file means a fresh factory bootstrapped
//! from [`LaunchpadConfig`].

use std::fs;
use std::path::Path;

use launchpad_core::serde_helpers::pubkey_serde;
use launchpad_core::{FactoryState, InMemoryLedger, TokenFactory};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use solana_program::{hash::hashv, pubkey::Pubkey};
use tempfile::NamedTempFile;

use crate::config::LaunchpadConfig;
use crate::error::{CliError, CliResult};

pub type LocalFactory = TokenFactory<InMemoryLedger>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(with = "pubkey_serde")]
    pub factory: Pubkey,
    pub state: FactoryState,
    pub ledger: InMemoryLedger,
}

impl Snapshot {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write to a sibling temp file, then rename over `path`
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(|e| CliError::io(dir, e))?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.as_file()
            .sync_all()
            .map_err(|e| CliError::io(file.path(), e))?;
        file.persist(path).map_err(|e| CliError::io(path, e.error))?;
        debug!("Saved state snapshot to {}", path.display());
        Ok(())
    }

    pub fn into_factory(self) -> LocalFactory {
        TokenFactory::from_parts(self.factory, self.state, self.ledger)
    }

    pub fn from_factory(factory: LocalFactory) -> Self {
        let (factory, state, ledger) = factory.into_parts();
        Self {
            factory,
            state,
            ledger,
        }
    }
}

/// Factory address for a cluster/owner pair
pub fn factory_address(config: &LaunchpadConfig) -> Pubkey {
    Pubkey::new_from_array(
        hashv(&[
            b"launchpad/factory",
            config.cluster.as_bytes(),
            config.owner.as_ref(),
        ])
        .to_bytes(),
    )
}

/// Fresh factory: initialized, with every configured template deployed and registered
pub fn bootstrap(config: &LaunchpadConfig) -> CliResult<LocalFactory> {
    let mut factory = TokenFactory::new(factory_address(config), InMemoryLedger::new());
    factory.initialize(config.owner, config.fee_recipient, config.service_fee)?;

    for template in &config.templates {
        let implementation = factory.ledger_mut().deploy_template(template.kind);
        factory.add_template(config.owner, template.id, implementation)?;
    }

    info!(
        "Bootstrapped factory {} on {} with {} templates",
        factory.address(),
        config.cluster,
        config.templates.len()
    );
    Ok(factory)
}

/// Load the snapshot at `path`, or bootstrap a new factory when none exists
pub fn open(config: &LaunchpadConfig, path: &Path) -> CliResult<LocalFactory> {
    if !path.exists() {
        return bootstrap(config);
    }

    let snapshot = Snapshot::load(path)?;
    if snapshot.factory != factory_address(config) {
        return Err(CliError::SnapshotMismatch(path.display().to_string()));
    }
    debug!("Loaded factory {} from {}", snapshot.factory, path.display());
    Ok(snapshot.into_factory())
}

pub fn persist(factory: LocalFactory, path: &Path) -> CliResult<()> {
    Snapshot::from_factory(factory).save(path)
}
