//! Binding configuration and per-provider instance options
//!
//! # Example
//!
//! ```ignore
//! let config = BindingConfig::default()
//!     .with_default_dynamic_stubs(true)
//!     .with_strict_registry_keys(true);
//! config.validate()?;
//!
//! let mut setup = SetupOptions::new();
//! setup.insert(ProviderType::Ethereum, json!({ "from": "0xabc..." }));
//! let contracts = module.bind_contracts(Some(setup))?;
//! ```

use crate::domain::value_objects::ProviderType;
use crate::errors::BindingError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

// =============================================================================
// BINDING CONFIG
// =============================================================================

/// Module-wide binding configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Dynamic stubs for declarations that leave the flag unset.
    pub default_dynamic_stubs: bool,
    /// Fail a bind pass when two contracts map to the same registry key
    /// instead of keeping the last one.
    pub strict_registry_keys: bool,
    /// Filter directive for [`crate::telemetry::init_tracing`].
    pub log_level: String,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            default_dynamic_stubs: false,
            strict_registry_keys: false,
            log_level: "info".to_string(),
        }
    }
}

impl BindingConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::InvalidConfig`] if `log_level` is not a valid
    /// filter directive (`info`, `warn,qc_contract_bindings=debug`, ...).
    pub fn validate(&self) -> Result<(), BindingError> {
        EnvFilter::try_new(&self.log_level).map_err(|e| {
            BindingError::InvalidConfig(format!("invalid log level {:?}: {e}", self.log_level))
        })?;
        Ok(())
    }

    /// Builder-style method to set the dynamic stub default
    #[must_use]
    pub fn with_default_dynamic_stubs(mut self, enabled: bool) -> Self {
        self.default_dynamic_stubs = enabled;
        self
    }

    /// Builder-style method to reject registry key collisions
    #[must_use]
    pub fn with_strict_registry_keys(mut self, strict: bool) -> Self {
        self.strict_registry_keys = strict;
        self
    }

    /// Builder-style method to set the log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

// =============================================================================
// PROVIDER INSTANCE OPTIONS
// =============================================================================

/// Options applied to a bound contract whose provider type matches.
///
/// The shape is owned by the provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderInstanceOptions(pub Value);

impl ProviderInstanceOptions {
    /// Looks up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Value> for ProviderInstanceOptions {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// =============================================================================
// SETUP OPTIONS
// =============================================================================

/// Instance options per provider type, supplied to a bind pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetupOptions(HashMap<ProviderType, ProviderInstanceOptions>);

impl SetupOptions {
    /// Creates empty setup options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the options for one provider type.
    pub fn insert(
        &mut self,
        provider_type: ProviderType,
        options: impl Into<ProviderInstanceOptions>,
    ) -> &mut Self {
        self.0.insert(provider_type, options.into());
        self
    }

    /// Options for a provider type, if any.
    #[must_use]
    pub fn for_provider(&self, provider_type: &ProviderType) -> Option<&ProviderInstanceOptions> {
        self.0.get(provider_type)
    }

    /// Number of configured provider types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no provider type is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config_is_valid() {
        let config = BindingConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.default_dynamic_stubs);
        assert!(!config.strict_registry_keys);
    }

    #[test]
    fn test_config_rejects_unknown_log_level() {
        let config = BindingConfig::default().with_log_level("qc_contract_bindings=loud");
        assert!(matches!(config.validate(), Err(BindingError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_accepts_filter_directives() {
        let config = BindingConfig::default().with_log_level("info,qc_contract_bindings=debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserializes_partial() {
        let config: BindingConfig =
            serde_json::from_value(json!({ "strict_registry_keys": true })).unwrap();
        assert!(config.strict_registry_keys);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_setup_options_lookup() {
        let mut setup = SetupOptions::new();
        setup
            .insert(ProviderType::Ethereum, json!({ "from": "0x01" }))
            .insert(ProviderType::from("A"), json!({ "gas": 21000 }));

        assert_eq!(setup.len(), 2);
        let eth = setup.for_provider(&ProviderType::Ethereum).unwrap();
        assert_eq!(eth.get("from"), Some(&json!("0x01")));
        assert!(setup.for_provider(&ProviderType::Vechain).is_none());
    }

    #[test]
    fn test_setup_options_from_json() {
        let setup: SetupOptions =
            serde_json::from_value(json!({ "Vechain": { "chainTag": 39 } })).unwrap();
        let opts = setup.for_provider(&ProviderType::Vechain).unwrap();
        assert_eq!(opts.get("chainTag"), Some(&json!(39)));
    }
}
