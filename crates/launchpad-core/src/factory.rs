//! # Token Factory
//!
//! [`TokenFactory`] binds the owned [`FactoryState`] to a [`Ledger`] host and
//! the factory's own address. Operations live next to the component they
//! belong to (`registry`, `fees`, `authority`, `instantiator`); this module
//! holds the shared plumbing.
//!
//! Every mutating operation runs inside [`TokenFactory::transact`]: on error
//! both the factory state and the ledger are restored to their pre-call
//! values, so failures never leave partial effects behind.

use log::debug;
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::authority::Authority;
use crate::constants::SUPPORTED_CLUSTERS;
use crate::errors::FactoryResult;
use crate::events::FactoryEvent;
use crate::fees::FeeState;
use crate::instantiator::DeploymentRecord;
use crate::ledger::Ledger;
use crate::registry::TemplateRegistry;

/// Everything the factory owns. Survives logic upgrades unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryState {
    pub(crate) authority: Authority,
    pub(crate) fees: FeeState,
    pub(crate) registry: TemplateRegistry,
    pub(crate) deployments: DeploymentRecord,
    /// Salt entropy; advances once per successful deployment
    pub(crate) nonce: u64,
}

pub struct TokenFactory<L: Ledger> {
    pub(crate) address: Pubkey,
    pub(crate) state: FactoryState,
    pub(crate) ledger: L,
}

impl<L: Ledger> TokenFactory<L> {
    /// Uninitialized factory living at `address`
    pub fn new(address: Pubkey, ledger: L) -> Self {
        Self::from_parts(address, FactoryState::default(), ledger)
    }

    /// Reattach previously persisted state
    pub fn from_parts(address: Pubkey, state: FactoryState, ledger: L) -> Self {
        Self {
            address,
            state,
            ledger,
        }
    }

    pub fn into_parts(self) -> (Pubkey, FactoryState, L) {
        (self.address, self.state, self.ledger)
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn state(&self) -> &FactoryState {
        &self.state
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct host access, e.g. for funding accounts in a sandbox
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Run `op` as one all-or-nothing unit
    pub(crate) fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> FactoryResult<T>,
    ) -> FactoryResult<T> {
        let state = self.state.clone();
        let checkpoint = self.ledger.checkpoint();

        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!("Call reverted: {}", err);
                self.state = state;
                self.ledger.revert(checkpoint);
                Err(err)
            }
        }
    }

    pub(crate) fn emit(&mut self, event: FactoryEvent) {
        debug!("Event: {:?}", event);
        self.ledger.emit_event(event);
    }

    pub fn events(&self) -> &[FactoryEvent] {
        self.ledger.events()
    }

    /// Nonce the next successful deployment will consume
    pub fn nonce(&self) -> u64 {
        self.state.nonce
    }

    pub fn is_cluster_supported(&self, cluster: &str) -> bool {
        is_cluster_supported(cluster)
    }
}

/// Whether `cluster` is on the static allow-list
pub fn is_cluster_supported(cluster: &str) -> bool {
    SUPPORTED_CLUSTERS.contains(&cluster)
}
