//! Token configuration validation.
//!
//! Pure and reads nothing beyond the constants in [`crate::constants`], so
//! clients can run the exact same checks before paying the service fee.
//! Rules are checked in a fixed order and the first violation wins.

use solana_program::pubkey::Pubkey;

use crate::constants::{MAX_DECIMALS, MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH};
use crate::errors::ValidationError;
use crate::types::TokenConfig;

/// Outcome of [`validate_config`]: `ok` plus the first violated rule
pub type ValidationResult = Result<(), ValidationError>;

/// Validate a token configuration before any state change
pub fn validate_config(config: &TokenConfig) -> ValidationResult {
    let name_len = config.name.chars().count();
    if name_len == 0 || name_len > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidNameLength);
    }

    let symbol_len = config.symbol.chars().count();
    if symbol_len == 0 || symbol_len > MAX_SYMBOL_LENGTH {
        return Err(ValidationError::InvalidSymbolLength);
    }

    if config.total_supply == 0 {
        return Err(ValidationError::ZeroTotalSupply);
    }

    if config.decimals > MAX_DECIMALS {
        return Err(ValidationError::DecimalsTooLarge);
    }

    if config.initial_owner == Pubkey::default() {
        return Err(ValidationError::NullInitialOwner);
    }

    if config.features.capped {
        if config.max_supply == 0 {
            return Err(ValidationError::ZeroMaxSupply);
        }
        if config.max_supply < config.total_supply {
            return Err(ValidationError::MaxSupplyBelowTotalSupply);
        }
    }

    Ok(())
}

/// `(ok, reason)` form of [`validate_config`]; the reason is empty when ok
pub fn check_config(config: &TokenConfig) -> (bool, String) {
    match validate_config(config) {
        Ok(()) => (true, String::new()),
        Err(reason) => (false, reason.to_string()),
    }
}
