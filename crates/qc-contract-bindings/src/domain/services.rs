//! # Domain Services
//!
//! Pure functions behind ABI ingestion, stub derivation, registry key
//! derivation and event option merging.
//!
//! - NO I/O operations
//! - NO async code
//! - Deterministic for a given input

use crate::domain::abi::{EntryKind, InterfaceDefinitionEntry};
use crate::domain::entities::{EventFilterOptions, EventStub, MethodStub, StubKind, StubTables};
use crate::domain::value_objects::{ProviderType, TopicSignature};
use std::collections::HashMap;

// =============================================================================
// ABI INGESTION
// =============================================================================

/// Builds the topic map from event entries carrying a signature.
///
/// Later entries with the same name overwrite earlier ones.
#[must_use]
pub fn build_topics(entries: &[InterfaceDefinitionEntry]) -> HashMap<String, TopicSignature> {
    entries
        .iter()
        .filter(|entry| entry.kind() == EntryKind::Event)
        .filter_map(|entry| {
            entry
                .signature
                .as_ref()
                .map(|signature| (entry.name.clone(), TopicSignature::new(signature.as_str())))
        })
        .collect()
}

// =============================================================================
// STUB DERIVATION
// =============================================================================

/// Classification of one entry: a method stub, an event stub, or nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryClass {
    /// Function stub.
    Method(StubKind),
    /// Event stub.
    Event,
    /// Ignored.
    Ignored,
}

/// Classifies an entry, first matching rule wins.
///
/// 1. function, `view` or `constant: true` -> read
/// 2. function, `nonpayable` or not constant -> write
/// 3. event -> event
/// 4. anything else -> ignored
///
/// Rule 2 is satisfied by every function rule 1 rejects, so `pure` and
/// `payable` functions are writes.
#[must_use]
pub fn classify_entry(entry: &InterfaceDefinitionEntry) -> EntryClass {
    match entry.kind() {
        EntryKind::Function if entry.is_read_only() => EntryClass::Method(StubKind::Read),
        EntryKind::Function
            if entry.state_mutability.as_deref() == Some("nonpayable")
                || entry.constant != Some(true) =>
        {
            EntryClass::Method(StubKind::Write)
        }
        EntryKind::Event => EntryClass::Event,
        _ => EntryClass::Ignored,
    }
}

/// Derives method and event stubs from the ABI.
///
/// Overloads collapse to the last entry of a given name.
#[must_use]
pub fn derive_stubs(
    entries: &[InterfaceDefinitionEntry],
    topics: &HashMap<String, TopicSignature>,
) -> StubTables {
    let mut tables = StubTables::default();
    for entry in entries {
        match classify_entry(entry) {
            EntryClass::Method(kind) => {
                tables.methods.insert(
                    entry.name.clone(),
                    MethodStub {
                        name: entry.name.clone(),
                        kind,
                    },
                );
            }
            EntryClass::Event => {
                tables.events.insert(
                    entry.name.clone(),
                    EventStub {
                        name: entry.name.clone(),
                        topic: topics.get(&entry.name).cloned(),
                    },
                );
            }
            EntryClass::Ignored => {}
        }
    }
    tables
}

// =============================================================================
// REGISTRY KEYS
// =============================================================================

/// Registry key for a bound contract.
///
/// Explicit mode keeps the declaration name; short module syntax prefixes the
/// provider type name so that one declaration yields one key per provider.
#[must_use]
pub fn registry_key(declaration: &str, provider_type: &ProviderType, short_form: bool) -> String {
    if short_form {
        format!("{}{declaration}", provider_type.name())
    } else {
        declaration.to_string()
    }
}

// =============================================================================
// EVENT OPTION MERGE
// =============================================================================

/// Merges bind-time and call-time event options.
///
/// Call-time values win, except `name` which always comes from the bind-time
/// options.
#[must_use]
pub fn merge_event_options(
    bound: &EventFilterOptions,
    overrides: Option<&EventFilterOptions>,
) -> EventFilterOptions {
    let Some(call) = overrides else {
        return bound.clone();
    };

    let mut extra = bound.extra.clone();
    extra.extend(call.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

    EventFilterOptions {
        name: bound.name.clone(),
        from_block: call.from_block.clone().or_else(|| bound.from_block.clone()),
        to_block: call.to_block.clone().or_else(|| bound.to_block.clone()),
        topics: call.topics.clone().or_else(|| bound.topics.clone()),
        order: call.order.clone().or_else(|| bound.order.clone()),
        limit: call.limit.or(bound.limit),
        extra,
    }
}

// =============================================================================
// TESTS
// =============================================================================
