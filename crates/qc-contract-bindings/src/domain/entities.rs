//! # Core Domain Entities
//!
//! Declarations supplied by callers before binding, the declarative member
//! table an entity exposes, and the stub tables derived from an ABI.

use crate::domain::abi::InterfaceImport;
use crate::domain::value_objects::{TopicFilter, TopicSignature};
use crate::ports::inbound::ContractEntity;
use crate::ports::outbound::{ArgumentValidator, ProviderPlugin};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// CONTRACT DECLARATION
// =============================================================================

/// Caller-supplied description of one contract to bind.
///
/// Consumed by a bind pass; the module never mutates it.
#[derive(Clone, Default)]
pub struct ContractDeclaration {
    /// Logical name, used as (or inside) the registry key.
    pub name: String,
    /// Interface import handed to the provider.
    pub import: Option<InterfaceImport>,
    /// Entity shape. Optional when dynamic stubs are enabled.
    pub entity: Option<Arc<dyn ContractEntity>>,
    /// Provider used in explicit binding mode.
    pub provider: Option<Arc<dyn ProviderPlugin>>,
    /// Derive method/event stubs from the ABI. `None` defers to the module config.
    pub enable_dynamic_stubs: Option<bool>,
}

impl ContractDeclaration {
    /// Creates a declaration with a name and an import.
    pub fn new(name: impl Into<String>, import: InterfaceImport) -> Self {
        Self {
            name: name.into(),
            import: Some(import),
            ..Self::default()
        }
    }

    /// Sets the entity shape.
    #[must_use]
    pub fn with_entity(mut self, entity: impl ContractEntity) -> Self {
        self.entity = Some(Arc::new(entity));
        self
    }

    /// Sets the provider for explicit binding mode.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn ProviderPlugin>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Enables or disables dynamic stubs.
    #[must_use]
    pub fn with_dynamic_stubs(mut self, enabled: bool) -> Self {
        self.enable_dynamic_stubs = Some(enabled);
        self
    }
}

impl fmt::Debug for ContractDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractDeclaration")
            .field("name", &self.name)
            .field("has_import", &self.import.is_some())
            .field("has_entity", &self.entity.is_some())
            .field("has_provider", &self.provider.is_some())
            .field("enable_dynamic_stubs", &self.enable_dynamic_stubs)
            .finish()
    }
}

// =============================================================================
// DISPATCH KIND
// =============================================================================

/// How a declared member is dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchKind {
    /// Call a read-only method.
    Read,
    /// Call a state-changing method.
    Write,
    /// Return the provider's event handle.
    Event,
    /// Query past events.
    Events,
    /// Return a method reference without invoking it.
    Method,
}

impl DispatchKind {
    /// Short name used in errors and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Event => "event",
            Self::Events => "events",
            Self::Method => "method",
        }
    }
}

// =============================================================================
// EVENT FILTER OPTIONS
// =============================================================================

/// Block bound of an event query: a number or a provider tag (`latest`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTag {
    /// Block number.
    Number(u64),
    /// Named block, forwarded verbatim.
    Tag(String),
}

impl From<u64> for BlockTag {
    fn from(number: u64) -> Self {
        Self::Number(number)
    }
}

impl From<&str> for BlockTag {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

/// Options for an event query.
///
/// Keys this crate does not model are kept in `extra` and forwarded to the
/// provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilterOptions {
    /// Event name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// First block (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<BlockTag>,
    /// Last block (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<BlockTag>,
    /// Topic filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<TopicFilter>,
    /// `asc` or `desc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Maximum number of results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Provider specific keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventFilterOptions {
    /// Options pinned to an event name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the first block.
    #[must_use]
    pub fn from_block(mut self, block: u64) -> Self {
        self.from_block = Some(BlockTag::Number(block));
        self
    }

    /// Sets the first block to a named block.
    #[must_use]
    pub fn from_block_tag(mut self, tag: impl Into<String>) -> Self {
        self.from_block = Some(BlockTag::Tag(tag.into()));
        self
    }

    /// Sets the last block.
    #[must_use]
    pub fn to_block(mut self, block: u64) -> Self {
        self.to_block = Some(BlockTag::Number(block));
        self
    }

    /// Sets the last block to a named block.
    #[must_use]
    pub fn to_block_tag(mut self, tag: impl Into<String>) -> Self {
        self.to_block = Some(BlockTag::Tag(tag.into()));
        self
    }

    /// Sets the topic filter.
    #[must_use]
    pub fn with_topics(mut self, topics: TopicFilter) -> Self {
        self.topics = Some(topics);
        self
    }
}

// =============================================================================
// MEMBER BINDING
// =============================================================================

/// Static options attached to a declared member.
#[derive(Clone, Default)]
pub struct MemberOptions {
    /// Name to dispatch under, when it differs from the property.
    pub name: Option<String>,
    /// Argument validation run before a read.
    pub validations: Option<Arc<dyn ArgumentValidator>>,
    /// Bind-time event query options.
    pub event_filter: EventFilterOptions,
}

impl MemberOptions {
    /// `name` if set, else `property`.
    #[must_use]
    pub fn resolve<'a>(&'a self, property: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(property)
    }
}

impl fmt::Debug for MemberOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberOptions")
            .field("name", &self.name)
            .field("has_validations", &self.validations.is_some())
            .field("event_filter", &self.event_filter)
            .finish()
    }
}

/// One statically declared member of an entity.
#[derive(Clone, Debug)]
pub struct MemberBinding {
    /// Property name the member is declared under.
    pub property: String,
    /// Dispatch kind.
    pub kind: DispatchKind,
    /// Static options.
    pub options: MemberOptions,
}

impl MemberBinding {
    fn new(property: impl Into<String>, kind: DispatchKind) -> Self {
        Self {
            property: property.into(),
            kind,
            options: MemberOptions::default(),
        }
    }

    /// A read member.
    pub fn read(property: impl Into<String>) -> Self {
        Self::new(property, DispatchKind::Read)
    }

    /// A write member.
    pub fn write(property: impl Into<String>) -> Self {
        Self::new(property, DispatchKind::Write)
    }

    /// An event handle member.
    pub fn event(property: impl Into<String>) -> Self {
        Self::new(property, DispatchKind::Event)
    }

    /// An event query member with bind-time options.
    pub fn events(property: impl Into<String>, filter: EventFilterOptions) -> Self {
        let mut member = Self::new(property, DispatchKind::Events);
        member.options.event_filter = filter;
        member
    }

    /// A method reference member.
    pub fn method(property: impl Into<String>) -> Self {
        Self::new(property, DispatchKind::Method)
    }

    /// Dispatch under `name` instead of the property.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    /// Attach argument validation.
    #[must_use]
    pub fn with_validations(mut self, validator: impl ArgumentValidator + 'static) -> Self {
        self.options.validations = Some(Arc::new(validator));
        self
    }

    /// Name the member dispatches under.
    #[must_use]
    pub fn resolved_name(&self) -> &str {
        self.options.resolve(&self.property)
    }
}

// =============================================================================
// STUB TABLES
// =============================================================================

/// Classification of a dynamic method stub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StubKind {
    /// Dispatched through the read path.
    Read,
    /// Dispatched through the write path.
    Write,
}

/// Dynamic stub for one ABI function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodStub {
    /// Function name.
    pub name: String,
    /// Read or write.
    pub kind: StubKind,
}

/// Dynamic stub for one ABI event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventStub {
    /// Event name.
    pub name: String,
    /// Topic of the event, when the ABI entry carried a signature.
    pub topic: Option<TopicSignature>,
}

/// Method and event stubs derived from an ABI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StubTables {
    /// Function stubs by name.
    pub methods: HashMap<String, MethodStub>,
    /// Event stubs by name.
    pub events: HashMap<String, EventStub>,
}

impl StubTables {
    /// Returns true if no stub was derived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.events.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
