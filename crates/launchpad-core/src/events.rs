use serde::{Deserialize, Serialize};
use solana_program::{hash::Hash, pubkey::Pubkey};

use crate::serde_helpers::{hash_serde, pubkey_serde};
use crate::types::TemplateId;

/// State-change events emitted by the factory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum FactoryEvent {
    FactoryInitialized {
        #[serde(with = "pubkey_serde")]
        owner: Pubkey,
        #[serde(with = "pubkey_serde")]
        fee_recipient: Pubkey,
        service_fee: u64,
    },
    TokenCreated {
        #[serde(with = "pubkey_serde")]
        instance: Pubkey,
        #[serde(with = "pubkey_serde")]
        creator: Pubkey,
        name: String,
        symbol: String,
        total_supply: u64,
        decimals: u8,
        #[serde(with = "hash_serde")]
        config_hash: Hash,
    },
    TemplateAdded {
        id: TemplateId,
        #[serde(with = "pubkey_serde")]
        implementation: Pubkey,
    },
    TemplateRemoved {
        id: TemplateId,
    },
    ServiceFeeUpdated {
        old_fee: u64,
        new_fee: u64,
    },
    FeeRecipientUpdated {
        #[serde(with = "pubkey_serde")]
        old_recipient: Pubkey,
        #[serde(with = "pubkey_serde")]
        new_recipient: Pubkey,
    },
    FeesWithdrawn {
        #[serde(with = "pubkey_serde")]
        recipient: Pubkey,
        amount: u64,
    },
    Paused {
        #[serde(with = "pubkey_serde")]
        by: Pubkey,
    },
    Unpaused {
        #[serde(with = "pubkey_serde")]
        by: Pubkey,
    },
    OwnershipTransferred {
        #[serde(with = "pubkey_serde")]
        previous_owner: Pubkey,
        #[serde(with = "pubkey_serde")]
        new_owner: Pubkey,
    },
    Upgraded {
        #[serde(with = "pubkey_serde")]
        logic: Pubkey,
        version: u32,
    },
}
