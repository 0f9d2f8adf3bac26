//! # Factory Error Types
//!
//! Every failure is a whole-call failure with a distinct reason so callers can
//! render an actionable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_DECIMALS, MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH};

/// Result type alias using the factory error type
pub type FactoryResult<T> = std::result::Result<T, FactoryError>;

/// First violated rule of a token configuration
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Name must be between 1 and {} characters", MAX_NAME_LENGTH)]
    InvalidNameLength,

    #[error("Symbol must be between 1 and {} characters", MAX_SYMBOL_LENGTH)]
    InvalidSymbolLength,

    #[error("Total supply must be greater than zero")]
    ZeroTotalSupply,

    #[error("Decimals must not exceed {}", MAX_DECIMALS)]
    DecimalsTooLarge,

    #[error("Initial owner must not be the null address")]
    NullInitialOwner,

    #[error("Max supply must be greater than zero when capped")]
    ZeroMaxSupply,

    #[error("Max supply must be at least the total supply")]
    MaxSupplyBelowTotalSupply,
}

/// Coarse error taxonomy exposed to front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Authorization,
    StateConflict,
    Payment,
    UnsupportedFeature,
    Configuration,
    Transfer,
    Arithmetic,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid token configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================
    #[error("Caller is not the factory owner")]
    Unauthorized,

    // ========================================================================
    // State Conflict Errors
    // ========================================================================
    #[error("Symbol {0} has already been deployed")]
    SymbolAlreadyExists(String),

    #[error("Template {0} is not registered")]
    TemplateNotFound(String),

    #[error("An instance already exists at {0}")]
    InstanceAlreadyExists(String),

    #[error("Already initialized")]
    AlreadyInitialized,

    #[error("Factory is not initialized")]
    NotInitialized,

    #[error("A deployment is already in progress")]
    ReentrantCall,

    #[error("Factory is paused")]
    Paused,

    #[error("Factory is not paused")]
    NotPaused,

    // ========================================================================
    // Payment Errors
    // ========================================================================
    #[error("Insufficient fee: paid {paid} lamports, required {required}")]
    InsufficientFee { paid: u64, required: u64 },

    #[error("Insufficient funds: balance {balance} lamports, needed {needed}")]
    InsufficientFunds { balance: u64, needed: u64 },

    #[error("Service fee {fee} exceeds the ceiling of {max} lamports")]
    FeeTooHigh { fee: u64, max: u64 },

    // ========================================================================
    // Unsupported Feature Errors
    // ========================================================================
    #[error("Template {template} does not support the {feature} feature")]
    UnsupportedFeature {
        template: &'static str,
        feature: &'static str,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Implementation must not be the null address")]
    InvalidImplementation,

    #[error("Implementation {0} has no executable code")]
    ImplementationHasNoCode(String),

    #[error("Fee recipient must not be the null address")]
    InvalidFeeRecipient,

    #[error("Owner must not be the null address")]
    InvalidOwner,

    // ========================================================================
    // Transfer Errors
    // ========================================================================
    #[error("Withdrawal of {amount} lamports to {recipient} failed")]
    WithdrawalFailed { recipient: String, amount: u64 },

    #[error("Account {0} does not accept deposits")]
    DepositRejected(String),

    #[error("Math overflow")]
    MathOverflow,
}

impl FactoryError {
    /// Taxonomy bucket for this error
    pub fn category(&self) -> ErrorCategory {
        use FactoryError::*;
        match self {
            InvalidConfig(_) => ErrorCategory::Validation,
            Unauthorized => ErrorCategory::Authorization,
            SymbolAlreadyExists(_)
            | TemplateNotFound(_)
            | InstanceAlreadyExists(_)
            | AlreadyInitialized
            | NotInitialized
            | ReentrantCall
            | Paused
            | NotPaused => ErrorCategory::StateConflict,
            InsufficientFee { .. } | InsufficientFunds { .. } | FeeTooHigh { .. } => {
                ErrorCategory::Payment
            }
            UnsupportedFeature { .. } => ErrorCategory::UnsupportedFeature,
            InvalidImplementation
            | ImplementationHasNoCode(_)
            | InvalidFeeRecipient
            | InvalidOwner => ErrorCategory::Configuration,
            WithdrawalFailed { .. } | DepositRejected(_) => ErrorCategory::Transfer,
            MathOverflow => ErrorCategory::Arithmetic,
        }
    }
}
