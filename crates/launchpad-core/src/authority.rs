//! # Ownership / Upgrade Authority
//!
//! Single-owner model. The owner gates every administrative call and the
//! factory's own logic upgrade; upgrades swap the logic pointer only and
//! leave registry, fees and counters as they are.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::errors::{FactoryError, FactoryResult};
use crate::events::FactoryEvent;
use crate::factory::TokenFactory;
use crate::fees::FeeState;
use crate::ledger::Ledger;
use crate::serde_helpers::pubkey_serde;

/// Guard held for the full duration of a deployment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentLock {
    #[default]
    Idle,
    Deploying,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub(crate) initialized: bool,
    #[serde(with = "pubkey_serde")]
    pub(crate) owner: Pubkey,
    pub(crate) paused: bool,
    pub(crate) lock: DeploymentLock,
    /// Current factory logic; replaced only through an authorized upgrade
    #[serde(with = "pubkey_serde")]
    pub(crate) logic: Pubkey,
    pub(crate) version: u32,
}

impl<L: Ledger> TokenFactory<L> {
    /// One-time setup performed by the deployer
    pub fn initialize(
        &mut self,
        owner: Pubkey,
        fee_recipient: Pubkey,
        service_fee: u64,
    ) -> FactoryResult<()> {
        self.transact(|factory| {
            if factory.state.authority.initialized {
                return Err(FactoryError::AlreadyInitialized);
            }
            if owner == Pubkey::default() {
                return Err(FactoryError::InvalidOwner);
            }

            factory.state.fees = FeeState::new(service_fee, fee_recipient, &factory.address)?;
            factory.state.authority.initialized = true;
            factory.state.authority.owner = owner;
            factory.state.authority.version = 1;

            info!(
                "Factory {} initialized: owner={}, fee={} lamports",
                factory.address, owner, service_fee
            );
            factory.emit(FactoryEvent::FactoryInitialized {
                owner,
                fee_recipient,
                service_fee,
            });
            Ok(())
        })
    }

    pub(crate) fn ensure_initialized(&self) -> FactoryResult<()> {
        if !self.state.authority.initialized {
            return Err(FactoryError::NotInitialized);
        }
        Ok(())
    }

    pub(crate) fn ensure_not_deploying(&self) -> FactoryResult<()> {
        if self.state.authority.lock == DeploymentLock::Deploying {
            warn!("Rejected call while a deployment is in progress");
            return Err(FactoryError::ReentrantCall);
        }
        Ok(())
    }

    pub(crate) fn only_owner(&self, caller: &Pubkey) -> FactoryResult<()> {
        self.ensure_initialized()?;
        if *caller != self.state.authority.owner {
            warn!("Rejected privileged call from {}", caller);
            return Err(FactoryError::Unauthorized);
        }
        Ok(())
    }

    /// Atomic, owner-only, non-reentrant administrative call
    pub(crate) fn admin<T>(
        &mut self,
        caller: Pubkey,
        op: impl FnOnce(&mut Self) -> FactoryResult<T>,
    ) -> FactoryResult<T> {
        self.transact(|factory| {
            factory.ensure_not_deploying()?;
            factory.only_owner(&caller)?;
            op(factory)
        })
    }

    pub fn transfer_ownership(&mut self, caller: Pubkey, new_owner: Pubkey) -> FactoryResult<()> {
        self.admin(caller, |factory| {
            if new_owner == Pubkey::default() {
                return Err(FactoryError::InvalidOwner);
            }
            let previous_owner = std::mem::replace(&mut factory.state.authority.owner, new_owner);
            info!("Ownership transferred from {} to {}", previous_owner, new_owner);
            factory.emit(FactoryEvent::OwnershipTransferred {
                previous_owner,
                new_owner,
            });
            Ok(())
        })
    }

    /// Halt new deployments; reads and administration stay available
    pub fn pause(&mut self, caller: Pubkey) -> FactoryResult<()> {
        self.admin(caller, |factory| {
            if factory.state.authority.paused {
                return Err(FactoryError::Paused);
            }
            factory.state.authority.paused = true;
            factory.emit(FactoryEvent::Paused { by: caller });
            Ok(())
        })
    }

    pub fn unpause(&mut self, caller: Pubkey) -> FactoryResult<()> {
        self.admin(caller, |factory| {
            if !factory.state.authority.paused {
                return Err(FactoryError::NotPaused);
            }
            factory.state.authority.paused = false;
            factory.emit(FactoryEvent::Unpaused { by: caller });
            Ok(())
        })
    }

    /// Gate consulted by the upgrade path before the logic changes
    pub fn authorize_upgrade(&self, caller: &Pubkey, new_logic: &Pubkey) -> FactoryResult<()> {
        self.ensure_not_deploying()?;
        self.only_owner(caller)?;
        if *new_logic == Pubkey::default() {
            return Err(FactoryError::InvalidImplementation);
        }
        Ok(())
    }

    /// Swap the factory logic, keeping all persisted state. Returns the new version.
    pub fn upgrade_to(&mut self, caller: Pubkey, new_logic: Pubkey) -> FactoryResult<u32> {
        self.transact(|factory| {
            factory.authorize_upgrade(&caller, &new_logic)?;

            let authority = &mut factory.state.authority;
            authority.logic = new_logic;
            authority.version = authority
                .version
                .checked_add(1)
                .ok_or(FactoryError::MathOverflow)?;
            let version = authority.version;

            info!("Factory upgraded to {} (version {})", new_logic, version);
            factory.emit(FactoryEvent::Upgraded {
                logic: new_logic,
                version,
            });
            Ok(version)
        })
    }

    pub fn owner(&self) -> Pubkey {
        self.state.authority.owner
    }

    pub fn is_paused(&self) -> bool {
        self.state.authority.paused
    }

    pub fn is_initialized(&self) -> bool {
        self.state.authority.initialized
    }

    pub fn logic(&self) -> Pubkey {
        self.state.authority.logic
    }

    pub fn version(&self) -> u32 {
        self.state.authority.version
    }
}
