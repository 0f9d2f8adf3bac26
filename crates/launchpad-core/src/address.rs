//! # Deterministic Addressing
//!
//! Version 1 of the instance address derivation, all SHA-256:
//!
//! ```text
//! salt    = H(creator ‖ u32le(|name|) ‖ name ‖ u32le(|symbol|) ‖ symbol ‖ u64le(nonce))
//! address = H("launchpad/clone/v1" ‖ implementation ‖ salt)
//! ```
//!
//! The address depends only on the implementation and the salt, so clients
//! can predict it before submitting a deployment.

use solana_program::{
    hash::{hashv, Hash},
    pubkey::Pubkey,
};

use crate::constants::CLONE_ADDRESS_DOMAIN;
use crate::types::TokenConfig;

/// Salt for a deployment by `creator` at `nonce`
pub fn compute_salt(creator: &Pubkey, name: &str, symbol: &str, nonce: u64) -> Hash {
    let name_len = (name.len() as u32).to_le_bytes();
    let symbol_len = (symbol.len() as u32).to_le_bytes();
    hashv(&[
        creator.as_ref(),
        &name_len,
        name.as_bytes(),
        &symbol_len,
        symbol.as_bytes(),
        &nonce.to_le_bytes(),
    ])
}

/// Address of the delegate instance of `implementation` created with `salt`
pub fn derive_instance_address(implementation: &Pubkey, salt: &Hash) -> Pubkey {
    let digest = hashv(&[CLONE_ADDRESS_DOMAIN, implementation.as_ref(), salt.as_ref()]);
    Pubkey::new_from_array(digest.to_bytes())
}

/// Content hash of the full configuration, emitted for off-chain indexing
pub fn config_hash(config: &TokenConfig) -> Hash {
    let name_len = (config.name.len() as u32).to_le_bytes();
    let symbol_len = (config.symbol.len() as u32).to_le_bytes();
    hashv(&[
        &name_len,
        config.name.as_bytes(),
        &symbol_len,
        config.symbol.as_bytes(),
        &config.total_supply.to_le_bytes(),
        &[config.decimals, config.features.bits()],
        &config.max_supply.to_le_bytes(),
        config.initial_owner.as_ref(),
    ])
}
