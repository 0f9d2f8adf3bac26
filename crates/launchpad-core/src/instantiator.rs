//! # Deterministic Instantiator
//!
//! Deployment pipeline: preconditions, salt, address derivation, delegate
//! creation, one-time initialization, bookkeeping, fee collection, event.
//! The whole pipeline is a single atomic unit; the nonce only moves on a
//! fully successful deployment.

use std::collections::{BTreeSet, HashMap};

use log::info;
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::address::{compute_salt, config_hash, derive_instance_address};
use crate::authority::DeploymentLock;
use crate::errors::{FactoryError, FactoryResult};
use crate::events::FactoryEvent;
use crate::factory::TokenFactory;
use crate::instance::TokenInstance;
use crate::ledger::Ledger;
use crate::registry::select_template;
use crate::serde_helpers::{pubkey_map_serde, pubkey_vec_serde};
use crate::types::TokenConfig;
use crate::validation::validate_config;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRecord {
    #[serde(with = "pubkey_vec_serde")]
    pub(crate) tokens: Vec<Pubkey>,
    pub(crate) count: u64,
}

/// Who deployed what. Monotonic for the life of the factory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub(crate) total_tokens_created: u64,
    #[serde(with = "pubkey_map_serde")]
    pub(crate) creators: HashMap<Pubkey, CreatorRecord>,
    /// Claimed symbols are never released
    pub(crate) deployed_symbols: BTreeSet<String>,
}

impl DeploymentRecord {
    pub fn is_symbol_deployed(&self, symbol: &str) -> bool {
        self.deployed_symbols.contains(symbol)
    }

    pub fn record(&mut self, creator: Pubkey, instance: Pubkey, symbol: &str) -> FactoryResult<()> {
        if !self.deployed_symbols.insert(symbol.to_string()) {
            return Err(FactoryError::SymbolAlreadyExists(symbol.to_string()));
        }

        let entry = self.creators.entry(creator).or_default();
        entry.tokens.push(instance);
        entry.count = entry.count.checked_add(1).ok_or(FactoryError::MathOverflow)?;
        self.total_tokens_created = self
            .total_tokens_created
            .checked_add(1)
            .ok_or(FactoryError::MathOverflow)?;
        Ok(())
    }
}

impl<L: Ledger> TokenFactory<L> {
    /// Deploy a token instance for `caller`, paying `paid_value` lamports
    pub fn create_token(
        &mut self,
        caller: Pubkey,
        config: &TokenConfig,
        paid_value: u64,
    ) -> FactoryResult<Pubkey> {
        self.transact(|factory| {
            factory.ensure_not_deploying()?;
            factory.ensure_initialized()?;
            if factory.state.authority.paused {
                return Err(FactoryError::Paused);
            }

            let required = factory.state.fees.service_fee;
            if paid_value < required {
                return Err(FactoryError::InsufficientFee {
                    paid: paid_value,
                    required,
                });
            }

            validate_config(config)?;
            if factory.state.deployments.is_symbol_deployed(&config.symbol) {
                return Err(FactoryError::SymbolAlreadyExists(config.symbol.clone()));
            }

            let template_id = select_template(&config.features);
            let implementation = factory
                .state
                .registry
                .get(&template_id)
                .ok_or_else(|| FactoryError::TemplateNotFound(template_id.to_string()))?;

            factory.state.authority.lock = DeploymentLock::Deploying;

            let nonce = factory.state.nonce;
            let salt = compute_salt(&caller, &config.name, &config.symbol, nonce);
            let instance = derive_instance_address(&implementation, &salt);

            factory.ledger.deploy_clone(instance, &implementation)?;
            factory
                .ledger
                .instance_mut(&instance)
                .ok_or(FactoryError::InvalidImplementation)?
                .initialize(config)?;

            factory.state.deployments.record(caller, instance, &config.symbol)?;
            factory.state.nonce = nonce.checked_add(1).ok_or(FactoryError::MathOverflow)?;
            factory.collect_fee(&caller, paid_value)?;

            factory.emit(FactoryEvent::TokenCreated {
                instance,
                creator: caller,
                name: config.name.clone(),
                symbol: config.symbol.clone(),
                total_supply: config.total_supply,
                decimals: config.decimals,
                config_hash: config_hash(config),
            });

            factory.state.authority.lock = DeploymentLock::Idle;
            info!(
                "Deployed {} ({}) at {} for {} using template {} [nonce {}]",
                config.name, config.symbol, instance, caller, template_id, nonce
            );
            Ok(instance)
        })
    }

    /// Address `creator` would receive for `config` if deployed next
    pub fn predict_instance_address(
        &self,
        creator: &Pubkey,
        config: &TokenConfig,
    ) -> FactoryResult<Pubkey> {
        let template_id = select_template(&config.features);
        let implementation = self
            .state
            .registry
            .get(&template_id)
            .ok_or_else(|| FactoryError::TemplateNotFound(template_id.to_string()))?;
        let salt = compute_salt(creator, &config.name, &config.symbol, self.state.nonce);
        Ok(derive_instance_address(&implementation, &salt))
    }

    pub fn tokens_by_creator(&self, creator: &Pubkey) -> Vec<Pubkey> {
        self.state
            .deployments
            .creators
            .get(creator)
            .map(|record| record.tokens.clone())
            .unwrap_or_default()
    }

    pub fn tokens_created_by(&self, creator: &Pubkey) -> u64 {
        self.state
            .deployments
            .creators
            .get(creator)
            .map_or(0, |record| record.count)
    }

    pub fn is_token_deployed(&self, symbol: &str) -> bool {
        self.state.deployments.is_symbol_deployed(symbol)
    }

    pub fn total_tokens_created(&self) -> u64 {
        self.state.deployments.total_tokens_created
    }

    /// Deployed instance state, if `address` holds one
    pub fn instance(&self, address: &Pubkey) -> Option<&TokenInstance> {
        self.ledger.instance(address)
    }
}
