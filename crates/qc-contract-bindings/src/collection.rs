//! # Contract Collection
//!
//! Keyed registry of bound contracts produced by one bind pass.
//!
//! Keys are kept in registration order. Adding under an existing key replaces
//! the contract and keeps the original slot.

use crate::contract::BoundContract;
use crate::errors::ProviderError;
use crate::ports::inbound::ContractEntity;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Name-keyed snapshot returned by [`ContractCollection::connect`].
pub type ConnectedContracts = IndexMap<String, Arc<BoundContract>>;

/// Registry of bound contracts.
#[derive(Clone, Debug, Default)]
pub struct ContractCollection {
    contracts: IndexMap<String, Arc<BoundContract>>,
}

impl ContractCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a contract, replacing any contract under the same key.
    ///
    /// Returns the replaced contract.
    pub fn add(
        &mut self,
        key: impl Into<String>,
        contract: impl Into<Arc<BoundContract>>,
    ) -> Option<Arc<BoundContract>> {
        let key = key.into();
        let replaced = self.contracts.insert(key.clone(), contract.into());
        if replaced.is_some() {
            debug!(key = %key, "Registry key reassigned");
        }
        replaced
    }

    /// Looks up a contract. Unknown keys yield `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<BoundContract>> {
        self.contracts.get(key).cloned()
    }

    /// Looks up a contract whose entity is a `T`.
    #[must_use]
    pub fn get_contract<T: ContractEntity>(&self, key: &str) -> Option<Arc<BoundContract>> {
        self.contracts
            .get(key)
            .filter(|contract| contract.entity::<T>().is_some())
            .cloned()
    }

    /// Looks up a contract regardless of its entity type.
    #[must_use]
    pub fn get_dynamic_contract(&self, key: &str) -> Option<Arc<BoundContract>> {
        self.get(key)
    }

    /// Returns true if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.contracts.contains_key(key)
    }

    /// Number of registered contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<BoundContract>)> {
        self.contracts.iter().map(|(key, contract)| (key.as_str(), contract))
    }

    /// Runs every contract's `connect` hook in registration order.
    ///
    /// # Errors
    ///
    /// Stops at the first provider failure and returns it.
    #[instrument(skip(self), fields(contracts = self.contracts.len()))]
    pub fn connect(&self) -> Result<ConnectedContracts, ProviderError> {
        let mut connected = ConnectedContracts::with_capacity(self.contracts.len());
        for (key, contract) in &self.contracts {
            contract.connect()?;
            connected.insert(key.clone(), Arc::clone(contract));
        }
        info!(count = connected.len(), "Contracts connected");
        Ok(connected)
    }
}

// =============================================================================
// TESTS
// =============================================================================
