//! # Composition Engine
//!
//! Turns one `(provider, declaration)` pair into a registered bound contract.
//!
//! ## Steps
//!
//! 1. Reject a missing provider or import
//! 2. Pick the entity (the declared one, or [`EmptyEntity`] with dynamic stubs)
//! 3. Instantiate a fresh provider and assemble the contract
//! 4. Derive the registry key and register
//! 5. Apply instance options for the provider type, if supplied

use crate::collection::ContractCollection;
use crate::config::{BindingConfig, SetupOptions};
use crate::contract::BoundContract;
use crate::domain::entities::ContractDeclaration;
use crate::domain::services::registry_key;
use crate::errors::BindingError;
use crate::ports::inbound::{ContractEntity, EmptyEntity};
use crate::ports::outbound::ProviderPlugin;
use std::sync::Arc;
use tracing::debug;

/// Binding mode of a bind pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingMode {
    /// One declaration shared by every module provider; keys are prefixed
    /// with the provider type name.
    ShortForm,
    /// Each declaration brings its own provider; keys are declaration names.
    Explicit,
}

/// Composes and registers one bound contract.
///
/// Returns the registry key.
///
/// # Errors
///
/// `MissingProvider`, `MissingImport`, `MissingEntity`, or `DuplicateKey`
/// when strict registry keys are configured.
pub fn bind_contract(
    provider: Option<&dyn ProviderPlugin>,
    declaration: &ContractDeclaration,
    mode: BindingMode,
    config: &BindingConfig,
    setup: Option<&SetupOptions>,
    collection: &mut ContractCollection,
) -> Result<String, BindingError> {
    let contract_name = declaration.name.clone();

    let plugin = provider.ok_or_else(|| BindingError::MissingProvider {
        contract: contract_name.clone(),
    })?;
    let import = declaration
        .import
        .clone()
        .ok_or_else(|| BindingError::MissingImport {
            contract: contract_name.clone(),
        })?;

    let dynamic_stubs = declaration
        .enable_dynamic_stubs
        .unwrap_or(config.default_dynamic_stubs);
    let entity: Arc<dyn ContractEntity> = match (&declaration.entity, dynamic_stubs) {
        (Some(entity), _) => Arc::clone(entity),
        (None, true) => Arc::new(EmptyEntity),
        (None, false) => {
            return Err(BindingError::MissingEntity {
                contract: contract_name,
            })
        }
    };

    let instance = plugin.instantiate();
    let provider_type = instance.provider_type();
    let key = registry_key(
        &declaration.name,
        &provider_type,
        mode == BindingMode::ShortForm,
    );
    if config.strict_registry_keys && collection.contains(&key) {
        return Err(BindingError::DuplicateKey { key });
    }

    let contract = Arc::new(BoundContract::assemble(
        key.clone(),
        contract_name,
        entity,
        instance,
        import,
        dynamic_stubs,
    ));
    collection.add(key.clone(), Arc::clone(&contract));

    if let Some(options) = setup.and_then(|setup| setup.for_provider(&provider_type)) {
        contract.set_instance_options(options);
    }

    debug!(key = %key, provider = %provider_type, ?mode, "Contract bound");
    Ok(key)
}

// =============================================================================
// TESTS
// =============================================================================
