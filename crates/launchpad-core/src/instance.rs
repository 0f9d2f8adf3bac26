//! Token instance state behind a delegate clone.
//!
//! The factory only ever calls [`TokenInstance::initialize`] and reads the
//! feature-query surface. Which flags an instance accepts is decided by its
//! [`TemplateKind`]; unsupported flags are rejected at initialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::errors::{FactoryError, FactoryResult};
use crate::serde_helpers::{pubkey_map_serde, pubkey_serde};
use crate::types::{FeatureFlags, TemplateKind, TokenConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInstance {
    kind: TemplateKind,
    initialized: bool,
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: u64,
    max_supply: u64,
    features: FeatureFlags,
    #[serde(with = "pubkey_serde")]
    owner: Pubkey,
    #[serde(with = "pubkey_map_serde")]
    balances: HashMap<Pubkey, u64>,
}

impl TokenInstance {
    /// Fresh, uninitialized instance of the given template
    pub fn new(kind: TemplateKind) -> Self {
        Self {
            kind,
            initialized: false,
            name: String::new(),
            symbol: String::new(),
            decimals: 0,
            total_supply: 0,
            max_supply: 0,
            features: FeatureFlags::NONE,
            owner: Pubkey::default(),
            balances: HashMap::new(),
        }
    }

    /// One-time initialization; mints the total supply to the owner
    pub fn initialize(&mut self, config: &TokenConfig) -> FactoryResult<()> {
        if self.initialized {
            return Err(FactoryError::AlreadyInitialized);
        }
        self.kind.check_features(&config.features)?;

        self.name = config.name.clone();
        self.symbol = config.symbol.clone();
        self.decimals = config.decimals;
        self.total_supply = config.total_supply;
        self.features = config.features;
        self.max_supply = if config.features.capped {
            config.max_supply
        } else {
            0
        };
        self.owner = config.initial_owner;
        self.balances.insert(config.initial_owner, config.total_supply);
        self.initialized = true;
        Ok(())
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_mintable(&self) -> bool {
        self.features.mintable
    }

    pub fn is_burnable(&self) -> bool {
        self.features.burnable
    }

    pub fn is_pausable(&self) -> bool {
        self.features.pausable
    }

    pub fn is_capped(&self) -> bool {
        self.features.capped
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    /// Zero when the token is not capped
    pub fn max_supply(&self) -> u64 {
        self.max_supply
    }

    pub fn owner(&self) -> Pubkey {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }
}
