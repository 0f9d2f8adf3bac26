use launchpad_core::{FeatureFlags, TokenConfig};
use solana_program::pubkey::Pubkey;

/// Deterministic identity built from a single repeated byte
pub fn key(byte: u8) -> Pubkey {
    Pubkey::new_from_array([byte; 32])
}

/// Fixed-supply, 18-decimal config with every feature disabled
pub fn basic_config(name: &str, symbol: &str, owner: Pubkey) -> TokenConfig {
    TokenConfig::new(name, symbol, 1_000_000, 18, owner)
}

pub fn mintable_config(name: &str, symbol: &str, owner: Pubkey) -> TokenConfig {
    basic_config(name, symbol, owner).with_features(FeatureFlags {
        mintable: true,
        ..FeatureFlags::NONE
    })
}

/// Every feature enabled, capped at twice the initial supply
pub fn full_config(name: &str, symbol: &str, owner: Pubkey) -> TokenConfig {
    basic_config(name, symbol, owner)
        .with_features(FeatureFlags::ALL)
        .capped(2_000_000)
}
