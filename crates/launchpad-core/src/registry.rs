//! # Template Registry
//!
//! Maps template ids to implementation addresses. An ordered id list mirrors
//! map membership for enumeration; removal swaps the last id into the freed
//! slot, so list order is not stable across removals.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::errors::{FactoryError, FactoryResult};
use crate::events::FactoryEvent;
use crate::factory::TokenFactory;
use crate::ledger::Ledger;
use crate::serde_helpers::pubkey_values_serde;
use crate::types::{
    FeatureFlags, TemplateId, BASIC_TEMPLATE, FULL_FEATURED_TEMPLATE, MINTABLE_TEMPLATE,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRegistry {
    #[serde(with = "pubkey_values_serde")]
    implementations: HashMap<TemplateId, Pubkey>,
    ids: Vec<TemplateId>,
}

impl TemplateRegistry {
    /// Insert or repoint `id`. Returns true when the id is new.
    pub fn upsert(&mut self, id: TemplateId, implementation: Pubkey) -> bool {
        let is_new = self.implementations.insert(id, implementation).is_none();
        if is_new {
            self.ids.push(id);
        }
        is_new
    }

    /// Remove `id` and return the implementation it pointed at
    pub fn remove(&mut self, id: &TemplateId) -> FactoryResult<Pubkey> {
        let implementation = self
            .implementations
            .remove(id)
            .ok_or_else(|| FactoryError::TemplateNotFound(id.to_string()))?;

        if let Some(position) = self.ids.iter().position(|candidate| candidate == id) {
            self.ids.swap_remove(position);
        }
        Ok(implementation)
    }

    pub fn get(&self, id: &TemplateId) -> Option<Pubkey> {
        self.implementations.get(id).copied()
    }

    /// Registered ids in enumeration order
    pub fn ids(&self) -> &[TemplateId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Fixed decision table from requested features to a template id.
///
/// `capped` never influences the choice, and combinations other than
/// "all of mintable/burnable/pausable" or "mintable alone" fall back to the
/// basic template, which rejects flags it cannot honour at initialization.
pub fn select_template(features: &FeatureFlags) -> TemplateId {
    match (features.mintable, features.burnable, features.pausable) {
        (true, true, true) => FULL_FEATURED_TEMPLATE,
        (true, false, false) => MINTABLE_TEMPLATE,
        _ => BASIC_TEMPLATE,
    }
}

impl<L: Ledger> TokenFactory<L> {
    /// Register a new template or repoint an existing id
    pub fn add_template(
        &mut self,
        caller: Pubkey,
        id: TemplateId,
        implementation: Pubkey,
    ) -> FactoryResult<()> {
        self.admin(caller, |factory| {
            if implementation == Pubkey::default() {
                return Err(FactoryError::InvalidImplementation);
            }
            if !factory.ledger.has_code(&implementation) {
                return Err(FactoryError::ImplementationHasNoCode(
                    implementation.to_string(),
                ));
            }

            let is_new = factory.state.registry.upsert(id, implementation);
            debug!(
                "Template {} {} -> {}",
                id,
                if is_new { "added" } else { "updated" },
                implementation
            );
            factory.emit(FactoryEvent::TemplateAdded { id, implementation });
            Ok(())
        })
    }

    pub fn remove_template(&mut self, caller: Pubkey, id: TemplateId) -> FactoryResult<()> {
        self.admin(caller, |factory| {
            let implementation = factory.state.registry.remove(&id)?;
            debug!("Template {} removed (was {})", id, implementation);
            factory.emit(FactoryEvent::TemplateRemoved { id });
            Ok(())
        })
    }

    pub fn get_template(&self, id: &TemplateId) -> Option<Pubkey> {
        self.state.registry.get(id)
    }

    /// All registered template ids
    pub fn get_all_templates(&self) -> Vec<TemplateId> {
        self.state.registry.ids().to_vec()
    }
}
