//! # Launchpad Core
//!
//! Factory for parameterized fungible-token instances:
//!
//! - Configuration validation shared with off-chain clients
//! - Template registry and feature-based template selection
//! - Deterministic instance addressing and one-time initialization
//! - Service fee accounting and withdrawal
//! - Single-owner administration, pause and upgrade gating
//!
//! State lives in an explicit [`FactoryState`] and runs against any
//! [`Ledger`] host; [`InMemoryLedger`] backs tests and the operator CLI.

pub mod address;
pub mod authority;
pub mod constants;
pub mod errors;
pub mod events;
pub mod factory;
pub mod fees;
pub mod instance;
pub mod instantiator;
pub mod ledger;
pub mod registry;
pub mod serde_helpers;
pub mod types;
pub mod validation;

pub use address::{compute_salt, config_hash, derive_instance_address};
pub use authority::DeploymentLock;
pub use constants::*;
pub use errors::{ErrorCategory, FactoryError, FactoryResult, ValidationError};
pub use events::FactoryEvent;
pub use factory::{is_cluster_supported, FactoryState, TokenFactory};
pub use fees::estimate_compute_units;
pub use instance::TokenInstance;
pub use ledger::{InMemoryLedger, Ledger};
pub use registry::select_template;
pub use types::*;
pub use validation::{check_config, validate_config};
