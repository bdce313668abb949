//! # Driven Ports (SPI - Outbound)
//!
//! These are the interfaces the binding engine depends on.
//! Chain integrations implement these traits to provide:
//! - Method calls and event access against one target chain
//! - Per-instance configuration
//! - Argument validation rules
//!
//! Network transport, ABI encoding and topic hashing beyond
//! [`TopicSignature`](crate::domain::TopicSignature) belong to the provider.

use crate::config::ProviderInstanceOptions;
use crate::domain::abi::InterfaceImport;
use crate::domain::entities::EventFilterOptions;
use crate::domain::value_objects::ProviderType;
use crate::errors::{ProviderError, ValidationError};
use async_trait::async_trait;
use serde_json::Value;

/// Provider-owned handle to a subscribable event.
pub type EventHandle = Value;

/// Provider-owned result of an event query.
pub type EventQueryResult = Value;

/// Provider-owned reference to a callable method.
pub type MethodReference = Value;

// =============================================================================
// CONTRACT PROVIDER
// =============================================================================

/// Capability set of one provider instance.
///
/// A fresh instance is created for every bound contract, so an implementation
/// may keep per-contract state (connection, options, encoded ABI) behind
/// interior mutability.
///
/// ## Concurrency
///
/// The core adds no locking around these calls. Concurrent dispatch against
/// one bound contract is exactly as safe as the implementation makes it.
#[async_trait]
pub trait ContractProvider: Send + Sync {
    /// Identity of the provider implementation.
    fn provider_type(&self) -> ProviderType;

    /// Invoke a contract method.
    ///
    /// # Arguments
    ///
    /// * `name` - Method name as it appears in the ABI
    /// * `args` - Call arguments
    async fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, ProviderError>;

    /// Get a handle to an event.
    fn get_event(&self, name: &str) -> Result<EventHandle, ProviderError>;

    /// Query past occurrences of an event.
    async fn get_events(
        &self,
        name: &str,
        options: &EventFilterOptions,
    ) -> Result<EventQueryResult, ProviderError>;

    /// Get a reference to a method without invoking it.
    fn get_method(&self, name: &str) -> Result<MethodReference, ProviderError>;

    /// Lifecycle hook run by `ContractCollection::connect`.
    ///
    /// Must be idempotent and must not block.
    fn connect(&self) -> Result<(), ProviderError>;

    /// Apply per-provider-type options after construction.
    fn set_instance_options(&self, options: &ProviderInstanceOptions);

    /// Receives the interface import during composition.
    ///
    /// Runs before topic ingestion and stub derivation.
    fn on_import(&self, _import: &InterfaceImport) {}
}

// =============================================================================
// PROVIDER PLUGIN
// =============================================================================

/// What a module is constructed with: a source of provider instances.
pub trait ProviderPlugin: Send + Sync {
    /// Create a provider instance for one bound contract.
    fn instantiate(&self) -> Box<dyn ContractProvider>;
}

impl<P> ProviderPlugin for P
where
    P: ContractProvider + Clone + 'static,
{
    fn instantiate(&self) -> Box<dyn ContractProvider> {
        Box::new(self.clone())
    }
}

// =============================================================================
// ARGUMENT VALIDATOR
// =============================================================================

/// Validation applied to read arguments before dispatch.
pub trait ArgumentValidator: Send + Sync {
    /// Validate call arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first rejected argument.
    fn validate(&self, args: &[Value]) -> Result<(), ValidationError>;
}

impl<F> ArgumentValidator for F
where
    F: Fn(&[Value]) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, args: &[Value]) -> Result<(), ValidationError> {
        self(args)
    }
}

// =============================================================================
// TESTS
// =============================================================================
