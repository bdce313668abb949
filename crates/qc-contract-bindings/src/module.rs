//! # Contract Module
//!
//! Owns the declarations and providers of one application and runs bind
//! passes over them.
//!
//! ## Binding Modes
//!
//! | Declarations | Providers | Mode | Keys |
//! |--------------|-----------|------|------|
//! | exactly 1 | 1 or more | short form | `<provider type><name>` per provider |
//! | anything else | any | explicit | declaration name |
//!
//! A bind pass builds a fresh collection and returns it only if every pair
//! composed; the first failure aborts the pass.
//!
//! ## Concurrency
//!
//! Binding is synchronous. `bind_contracts` and `rebind` take `&mut self`,
//! so overlapping re-binds on one module are ruled out by the borrow checker.

use crate::collection::ContractCollection;
use crate::composition::{bind_contract, BindingMode};
use crate::config::{BindingConfig, SetupOptions};
use crate::domain::entities::ContractDeclaration;
use crate::errors::BindingError;
use crate::ports::outbound::ProviderPlugin;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Binds contract declarations to providers.
pub struct ContractModule {
    declarations: Vec<ContractDeclaration>,
    providers: Vec<Arc<dyn ProviderPlugin>>,
    config: BindingConfig,
    /// Setup options of the last successful bind; `None` until one succeeds.
    last_setup: Option<Option<SetupOptions>>,
}

impl ContractModule {
    /// Creates a module with the default configuration.
    #[must_use]
    pub fn new(
        declarations: Vec<ContractDeclaration>,
        providers: Vec<Arc<dyn ProviderPlugin>>,
    ) -> Self {
        Self {
            declarations,
            providers,
            config: BindingConfig::default(),
            last_setup: None,
        }
    }

    /// Replaces the binding configuration.
    #[must_use]
    pub fn with_config(mut self, config: BindingConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a declaration. It takes part from the next bind pass on.
    pub fn add_contract_mapping(&mut self, declaration: ContractDeclaration) {
        self.declarations.push(declaration);
    }

    /// Declarations, in insertion order.
    #[must_use]
    pub fn declarations(&self) -> &[ContractDeclaration] {
        &self.declarations
    }

    /// Providers supplied at construction.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn ProviderPlugin>] {
        &self.providers
    }

    /// Binding configuration.
    #[must_use]
    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Setup options captured by the last successful bind.
    #[must_use]
    pub fn last_setup_options(&self) -> Option<&SetupOptions> {
        self.last_setup.as_ref().and_then(Option::as_ref)
    }

    /// Mode the next bind pass will use.
    #[must_use]
    pub fn binding_mode(&self) -> BindingMode {
        if self.declarations.len() == 1 && !self.providers.is_empty() {
            BindingMode::ShortForm
        } else {
            BindingMode::Explicit
        }
    }

    /// Runs a bind pass.
    ///
    /// # Errors
    ///
    /// Any configuration error from composition, `MissingName` for an unnamed
    /// declaration in short form, or `InvalidConfig`. No collection is
    /// returned on error.
    #[instrument(skip_all, fields(
        declarations = self.declarations.len(),
        providers = self.providers.len(),
    ))]
    pub fn bind_contracts(
        &mut self,
        setup_options: Option<SetupOptions>,
    ) -> Result<ContractCollection, BindingError> {
        self.config.validate()?;

        let mut collection = ContractCollection::new();
        let mode = self.binding_mode();
        let result = match mode {
            BindingMode::ShortForm => self.bind_short_form(setup_options.as_ref(), &mut collection),
            BindingMode::Explicit => self.bind_explicit(setup_options.as_ref(), &mut collection),
        };
        if let Err(e) = result {
            warn!(error = %e, ?mode, "Bind pass failed");
            return Err(e);
        }

        self.last_setup = Some(setup_options);
        info!(contracts = collection.len(), ?mode, "Contracts bound");
        Ok(collection)
    }

    /// Replays the last successful bind pass with its setup options.
    ///
    /// # Errors
    ///
    /// `NotBound` if no bind pass has succeeded yet, otherwise the errors of
    /// [`ContractModule::bind_contracts`].
    pub fn rebind(&mut self) -> Result<ContractCollection, BindingError> {
        let setup = self.last_setup.clone().ok_or(BindingError::NotBound)?;
        self.bind_contracts(setup)
    }

    fn bind_short_form(
        &self,
        setup: Option<&SetupOptions>,
        collection: &mut ContractCollection,
    ) -> Result<(), BindingError> {
        let declaration = &self.declarations[0];
        if declaration.name.is_empty() {
            return Err(BindingError::MissingName);
        }
        for provider in &self.providers {
            bind_contract(
                Some(provider.as_ref()),
                declaration,
                BindingMode::ShortForm,
                &self.config,
                setup,
                collection,
            )?;
        }
        Ok(())
    }

    fn bind_explicit(
        &self,
        setup: Option<&SetupOptions>,
        collection: &mut ContractCollection,
    ) -> Result<(), BindingError> {
        for declaration in &self.declarations {
            bind_contract(
                declaration.provider.as_deref(),
                declaration,
                BindingMode::Explicit,
                &self.config,
                setup,
                collection,
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContractModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractModule")
            .field("declarations", &self.declarations)
            .field("providers", &self.providers.len())
            .field("config", &self.config)
            .field("bound", &self.last_setup.is_some())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
