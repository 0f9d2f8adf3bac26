//! # Launchpad Constants
//!
//! Fixed bounds shared by the on-ledger factory and off-chain clients:
//! - Token configuration limits
//! - Fee defaults and ceiling
//! - Address derivation domain
//! - Cost estimator increments
//! - Recognized clusters

use solana_program::native_token::LAMPORTS_PER_SOL;

// ============================================================================
// Token Configuration Limits
// ============================================================================

/// Maximum token name length in characters
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum token symbol length in characters
pub const MAX_SYMBOL_LENGTH: usize = 10;

/// Maximum number of decimals a token may declare
pub const MAX_DECIMALS: u8 = 18;

// ============================================================================
// Fee Structure
// ============================================================================

/// Default service fee charged per deployment (0.001 SOL)
pub const DEFAULT_SERVICE_FEE: u64 = LAMPORTS_PER_SOL / 1_000;

/// Hard ceiling on the service fee (1 SOL)
pub const MAX_SERVICE_FEE: u64 = LAMPORTS_PER_SOL;

// ============================================================================
// Deterministic Addressing
// ============================================================================

/// Version of the instance address derivation algorithm
pub const ADDRESS_DERIVATION_VERSION: u8 = 1;

/// Domain separator hashed in front of every derived instance address
pub const CLONE_ADDRESS_DOMAIN: &[u8] = b"launchpad/clone/v1";

// ============================================================================
// Deployment Cost Estimator (compute units)
// ============================================================================

pub const BASE_DEPLOYMENT_UNITS: u64 = 200_000;
pub const MINTABLE_UNITS: u64 = 50_000;
pub const BURNABLE_UNITS: u64 = 30_000;
pub const PAUSABLE_UNITS: u64 = 40_000;
pub const CAPPED_UNITS: u64 = 20_000;

// ============================================================================
// Networks
// ============================================================================

/// Clusters the factory is recognized on
pub const SUPPORTED_CLUSTERS: &[&str] = &["mainnet-beta", "devnet", "testnet", "localnet"];
