//! # QC Contract Bindings - Contract Composition Subsystem
//!
//! Binds declarative contract descriptions to chain providers and exposes the
//! result as a keyed registry of callable contract objects.
//!
//! ## Purpose
//!
//! An application declares which contracts it uses (name, interface import,
//! optional entity shape, provider). A [`module::ContractModule`] composes
//! each declaration with a fresh provider instance and registers the result in
//! a [`collection::ContractCollection`]. Bound contracts dispatch through five
//! primitives: read, write, single event, event query and method reference.
//!
//! ## Binding Rules
//!
//! | Rule | Enforcement Location |
//! |------|---------------------|
//! | Provider and import are required | `composition.rs` - `bind_contract()` |
//! | Entity required unless dynamic stubs are on | `composition.rs` - `bind_contract()` |
//! | Short form needs a named declaration | `module.rs` - `bind_short_form()` |
//! | Every binding gets its own provider instance | `ports/outbound.rs` - `ProviderPlugin` |
//! | Event query name is pinned at bind time | `domain/services.rs` - `merge_event_options()` |
//! | `rebind` requires a prior successful bind | `module.rs` - `rebind()` |
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | ABI model | `domain/abi.rs` | Lenient interface document parsing |
//! | Topics | `domain/value_objects.rs` | `TopicSignature`, `TopicFilter` |
//! | Stub derivation | `domain/services.rs` | Entry classification, topic tables |
//! | Bound contract | `contract.rs` | Entity + provider + derived tables |
//! | Dispatch | `dispatch.rs` | Read, Write, GetEvent, GetEvents, GetMethod |
//! | Registry | `collection.rs` | Keyed, ordered, `connect` |
//! | Engine | `composition.rs`, `module.rs` | Bind passes |
//! | In-memory provider | `adapters/in_memory_provider.rs` | Tests and local wiring |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_contract_bindings::prelude::*;
//!
//! let token = ContractDeclaration::new("Token", InterfaceImport::from_json_str(abi)?)
//!     .with_dynamic_stubs(true);
//! let mut module = ContractModule::new(vec![token], vec![Arc::new(eth_plugin)]);
//!
//! let contracts = module.bind_contracts(None)?;
//! let token = contracts.get("EthereumToken").ok_or("not bound")?;
//! let balance = token.call("balanceOf", &[json!("0xabc...")]).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod collection;
pub mod composition;
pub mod config;
pub mod contract;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod module;
pub mod ports;
pub mod telemetry;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        BlockTag, ContractDeclaration, DispatchKind, EventFilterOptions, EventStub, MemberBinding,
        MemberOptions, MethodStub, StubKind, StubTables,
    };

    // ABI model
    pub use crate::domain::abi::{AbiParam, EntryKind, InterfaceDefinitionEntry, InterfaceImport};

    // Value objects
    pub use crate::domain::value_objects::{ProviderType, TopicFilter, TopicHash, TopicSignature};

    // Ports
    pub use crate::ports::inbound::{ContractEntity, EmptyEntity};
    pub use crate::ports::outbound::{
        ArgumentValidator, ContractProvider, EventHandle, EventQueryResult, MethodReference,
        ProviderPlugin,
    };

    // Engine
    pub use crate::collection::{ConnectedContracts, ContractCollection};
    pub use crate::composition::BindingMode;
    pub use crate::config::{BindingConfig, ProviderInstanceOptions, SetupOptions};
    pub use crate::contract::BoundContract;
    pub use crate::module::ContractModule;

    // Errors
    pub use crate::errors::{
        AbiError, BindingError, DispatchError, ProviderError, TelemetryError, ValidationError,
    };
}

// =============================================================================
// VERSION
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
