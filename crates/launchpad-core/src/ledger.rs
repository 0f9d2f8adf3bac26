//! # Ledger Host
//!
//! The factory never touches accounts directly; everything goes through the
//! [`Ledger`] trait so operations can run against the in-memory host below
//! or any other backend that honours checkpoint/revert.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use solana_program::{hash::hashv, pubkey::Pubkey};

use crate::errors::{FactoryError, FactoryResult};
use crate::events::FactoryEvent;
use crate::instance::TokenInstance;
use crate::serde_helpers::{pubkey_map_serde, pubkey_serde};
use crate::types::TemplateKind;

/// Storage and value-transfer surface the factory runs against
pub trait Ledger {
    type Checkpoint;

    /// Capture everything needed to undo the current call
    fn checkpoint(&self) -> Self::Checkpoint;

    /// Restore the state captured by [`Ledger::checkpoint`]
    fn revert(&mut self, checkpoint: Self::Checkpoint);

    fn has_code(&self, address: &Pubkey) -> bool;

    /// Template variant executed by code at `address`, if it is a template
    fn template_kind(&self, address: &Pubkey) -> Option<TemplateKind>;

    /// Create an uninitialized delegate of `implementation` at `address`
    fn deploy_clone(&mut self, address: Pubkey, implementation: &Pubkey) -> FactoryResult<()>;

    fn instance(&self, address: &Pubkey) -> Option<&TokenInstance>;

    fn instance_mut(&mut self, address: &Pubkey) -> Option<&mut TokenInstance>;

    fn balance(&self, address: &Pubkey) -> u64;

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, lamports: u64) -> FactoryResult<()>;

    fn emit_event(&mut self, event: FactoryEvent);

    fn events(&self) -> &[FactoryEvent];
}

/// Executable contents of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Code {
    Template {
        kind: TemplateKind,
    },
    Clone {
        #[serde(with = "pubkey_serde")]
        implementation: Pubkey,
        instance: TokenInstance,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub lamports: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
    /// Accounts whose code refuses incoming transfers
    #[serde(default)]
    pub rejects_deposits: bool,
}

/// Hash-map backed ledger used by tests and the operator CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    #[serde(with = "pubkey_map_serde")]
    accounts: HashMap<Pubkey, Account>,
    events: Vec<FactoryEvent>,
    programs_deployed: u64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, address: &Pubkey) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Credit lamports out of thin air
    pub fn airdrop(&mut self, address: &Pubkey, lamports: u64) {
        let account = self.accounts.entry(*address).or_default();
        account.lamports = account.lamports.saturating_add(lamports);
    }

    /// Deploy a template program at the next deterministic program address
    pub fn deploy_template(&mut self, kind: TemplateKind) -> Pubkey {
        let seed = self.programs_deployed.to_le_bytes();
        let address = Pubkey::new_from_array(
            hashv(&[b"launchpad/program", kind.name().as_bytes(), &seed]).to_bytes(),
        );
        self.deploy_template_at(address, kind);
        address
    }

    /// Deploy (or overwrite) a template program at a chosen address
    pub fn deploy_template_at(&mut self, address: Pubkey, kind: TemplateKind) {
        self.programs_deployed += 1;
        self.accounts.entry(address).or_default().code = Some(Code::Template { kind });
        debug!("Deployed {} template at {}", kind.name(), address);
    }

    pub fn set_rejects_deposits(&mut self, address: &Pubkey, rejects: bool) {
        self.accounts.entry(*address).or_default().rejects_deposits = rejects;
    }

    /// Drop events recorded so far
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl Ledger for InMemoryLedger {
    type Checkpoint = InMemoryLedger;

    fn checkpoint(&self) -> Self::Checkpoint {
        self.clone()
    }

    fn revert(&mut self, checkpoint: Self::Checkpoint) {
        *self = checkpoint;
    }

    fn has_code(&self, address: &Pubkey) -> bool {
        self.accounts
            .get(address)
            .is_some_and(|account| account.code.is_some())
    }

    fn template_kind(&self, address: &Pubkey) -> Option<TemplateKind> {
        match self.accounts.get(address)?.code.as_ref()? {
            Code::Template { kind } => Some(*kind),
            Code::Clone { .. } => None,
        }
    }

    fn deploy_clone(&mut self, address: Pubkey, implementation: &Pubkey) -> FactoryResult<()> {
        if self.has_code(&address) {
            return Err(FactoryError::InstanceAlreadyExists(address.to_string()));
        }
        let kind = self
            .template_kind(implementation)
            .ok_or(FactoryError::InvalidImplementation)?;

        // Lamports already sitting at the address are kept
        self.accounts.entry(address).or_default().code = Some(Code::Clone {
            implementation: *implementation,
            instance: TokenInstance::new(kind),
        });
        Ok(())
    }

    fn instance(&self, address: &Pubkey) -> Option<&TokenInstance> {
        match self.accounts.get(address)?.code.as_ref()? {
            Code::Clone { instance, .. } => Some(instance),
            Code::Template { .. } => None,
        }
    }

    fn instance_mut(&mut self, address: &Pubkey) -> Option<&mut TokenInstance> {
        match self.accounts.get_mut(address)?.code.as_mut()? {
            Code::Clone { instance, .. } => Some(instance),
            Code::Template { .. } => None,
        }
    }

    fn balance(&self, address: &Pubkey) -> u64 {
        self.accounts.get(address).map_or(0, |account| account.lamports)
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, lamports: u64) -> FactoryResult<()> {
        if lamports == 0 || from == to {
            return Ok(());
        }

        let balance = self.balance(from);
        if balance < lamports {
            return Err(FactoryError::InsufficientFunds {
                balance,
                needed: lamports,
            });
        }
        if self.accounts.get(to).is_some_and(|account| account.rejects_deposits) {
            return Err(FactoryError::DepositRejected(to.to_string()));
        }

        let credited = self
            .balance(to)
            .checked_add(lamports)
            .ok_or(FactoryError::MathOverflow)?;
        self.accounts.entry(*from).or_default().lamports = balance - lamports;
        self.accounts.entry(*to).or_default().lamports = credited;
        Ok(())
    }

    fn emit_event(&mut self, event: FactoryEvent) {
        self.events.push(event);
    }

    fn events(&self) -> &[FactoryEvent] {
        &self.events
    }
}
