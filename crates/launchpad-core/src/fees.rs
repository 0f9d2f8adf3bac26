//! # Fee & Accounting Ledger
//!
//! The whole paid value is retained on deployment, overpayment included.
//! Collected lamports sit in the factory account until the owner withdraws
//! them to the fee recipient.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::constants::{
    BASE_DEPLOYMENT_UNITS, BURNABLE_UNITS, CAPPED_UNITS, MAX_SERVICE_FEE, MINTABLE_UNITS,
    PAUSABLE_UNITS,
};
use crate::errors::{FactoryError, FactoryResult};
use crate::events::FactoryEvent;
use crate::factory::TokenFactory;
use crate::ledger::Ledger;
use crate::serde_helpers::pubkey_serde;
use crate::types::{CostEstimate, FeatureFlags};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeState {
    /// Lamports charged per deployment
    pub(crate) service_fee: u64,
    #[serde(with = "pubkey_serde")]
    pub(crate) fee_recipient: Pubkey,
    /// Lifetime total; never reduced by withdrawals
    pub(crate) total_fees_collected: u64,
}

impl FeeState {
    /// Validated fee settings for the factory whose balance lives at `vault`
    pub fn new(service_fee: u64, fee_recipient: Pubkey, vault: &Pubkey) -> FactoryResult<Self> {
        check_service_fee(service_fee)?;
        check_fee_recipient(&fee_recipient, vault)?;
        Ok(Self {
            service_fee,
            fee_recipient,
            total_fees_collected: 0,
        })
    }

    pub fn record_payment(&mut self, paid: u64) -> FactoryResult<()> {
        self.total_fees_collected = self
            .total_fees_collected
            .checked_add(paid)
            .ok_or(FactoryError::MathOverflow)?;
        Ok(())
    }
}

fn check_service_fee(fee: u64) -> FactoryResult<()> {
    if fee > MAX_SERVICE_FEE {
        return Err(FactoryError::FeeTooHigh {
            fee,
            max: MAX_SERVICE_FEE,
        });
    }
    Ok(())
}

/// Recipient must be a real identity other than the factory vault itself
fn check_fee_recipient(recipient: &Pubkey, vault: &Pubkey) -> FactoryResult<()> {
    if *recipient == Pubkey::default() || recipient == vault {
        return Err(FactoryError::InvalidFeeRecipient);
    }
    Ok(())
}

/// Compute units a deployment with `features` is expected to consume
pub fn estimate_compute_units(features: &FeatureFlags) -> u64 {
    let mut units = BASE_DEPLOYMENT_UNITS;
    if features.mintable {
        units += MINTABLE_UNITS;
    }
    if features.burnable {
        units += BURNABLE_UNITS;
    }
    if features.pausable {
        units += PAUSABLE_UNITS;
    }
    if features.capped {
        units += CAPPED_UNITS;
    }
    units
}

impl<L: Ledger> TokenFactory<L> {
    /// Move `paid` lamports from the payer into the factory and account for them
    pub(crate) fn collect_fee(&mut self, payer: &Pubkey, paid: u64) -> FactoryResult<()> {
        let vault = self.address;
        self.ledger.transfer(payer, &vault, paid)?;
        self.state.fees.record_payment(paid)?;
        debug!(
            "Collected {} lamports from {} (lifetime total {})",
            paid, payer, self.state.fees.total_fees_collected
        );
        Ok(())
    }

    pub fn set_service_fee(&mut self, caller: Pubkey, new_fee: u64) -> FactoryResult<()> {
        self.admin(caller, |factory| {
            check_service_fee(new_fee)?;
            let old_fee = std::mem::replace(&mut factory.state.fees.service_fee, new_fee);
            factory.emit(FactoryEvent::ServiceFeeUpdated { old_fee, new_fee });
            Ok(())
        })
    }

    pub fn set_fee_recipient(&mut self, caller: Pubkey, new_recipient: Pubkey) -> FactoryResult<()> {
        self.admin(caller, |factory| {
            check_fee_recipient(&new_recipient, &factory.address)?;
            let old_recipient =
                std::mem::replace(&mut factory.state.fees.fee_recipient, new_recipient);
            factory.emit(FactoryEvent::FeeRecipientUpdated {
                old_recipient,
                new_recipient,
            });
            Ok(())
        })
    }

    /// Send the factory's entire balance to the fee recipient.
    ///
    /// Returns the amount moved; an empty balance is a no-op.
    pub fn withdraw(&mut self, caller: Pubkey) -> FactoryResult<u64> {
        self.admin(caller, |factory| {
            let vault = factory.address;
            let amount = factory.ledger.balance(&vault);
            if amount == 0 {
                debug!("Nothing to withdraw");
                return Ok(0);
            }

            let recipient = factory.state.fees.fee_recipient;
            if recipient == vault {
                return Err(FactoryError::WithdrawalFailed {
                    recipient: recipient.to_string(),
                    amount,
                });
            }
            factory
                .ledger
                .transfer(&vault, &recipient, amount)
                .map_err(|e| {
                    warn!("Withdrawal to {} failed: {}", recipient, e);
                    FactoryError::WithdrawalFailed {
                        recipient: recipient.to_string(),
                        amount,
                    }
                })?;

            info!("Withdrew {} lamports to {}", amount, recipient);
            factory.emit(FactoryEvent::FeesWithdrawn { recipient, amount });
            Ok(amount)
        })
    }

    pub fn service_fee(&self) -> u64 {
        self.state.fees.service_fee
    }

    pub fn fee_recipient(&self) -> Pubkey {
        self.state.fees.fee_recipient
    }

    pub fn total_fees_collected(&self) -> u64 {
        self.state.fees.total_fees_collected
    }

    /// Lamports currently held by the factory
    pub fn balance(&self) -> u64 {
        self.ledger.balance(&self.address)
    }

    /// Estimated compute units for `features` alongside the current fee
    pub fn estimate_deployment_cost(&self, features: &FeatureFlags) -> CostEstimate {
        CostEstimate {
            compute_units: estimate_compute_units(features),
            service_fee: self.state.fees.service_fee,
        }
    }
}
