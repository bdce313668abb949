//! # Dispatch Primitives
//!
//! Shared call paths for statically declared members and dynamic stubs.
//! Each primitive resolves the target name (`options.name` if set, else the
//! property) and delegates to the bound contract's provider.
//!
//! | Primitive | Provider call |
//! |-----------|---------------|
//! | `read` | `call_method` after optional validation |
//! | `write` | same path as `read` |
//! | `get_event` | `get_event` |
//! | `get_events` | `get_events` with merged options |
//! | `get_method` | `get_method` |
//!
//! Provider errors are passed through unchanged.

use crate::contract::BoundContract;
use crate::domain::entities::{EventFilterOptions, MemberOptions};
use crate::domain::services::merge_event_options;
use crate::errors::DispatchError;
use crate::ports::outbound::{EventHandle, EventQueryResult, MethodReference};
use serde_json::Value;
use tracing::{debug, instrument};

async fn call(
    contract: &BoundContract,
    property: &str,
    args: &[Value],
    options: &MemberOptions,
) -> Result<Value, DispatchError> {
    let name = options.resolve(property);
    if let Some(validator) = &options.validations {
        validator.validate(args)?;
    }
    Ok(contract.call_method(name, args).await?)
}

/// Read: validate, then call.
///
/// # Errors
///
/// `Validation` when the validator rejects the arguments (the provider is
/// not reached), `Provider` for anything the provider reports.
#[instrument(skip(contract, args, options), fields(contract = %contract.key()))]
pub async fn read(
    contract: &BoundContract,
    property: &str,
    args: &[Value],
    options: &MemberOptions,
) -> Result<Value, DispatchError> {
    debug!(method = options.resolve(property), args = args.len(), "Dispatching read");
    call(contract, property, args, options).await
}

/// Write: same path as [`read`].
///
/// Whether the call changes state is decided by the provider.
///
/// # Errors
///
/// Same as [`read`].
#[instrument(skip(contract, args, options), fields(contract = %contract.key()))]
pub async fn write(
    contract: &BoundContract,
    property: &str,
    args: &[Value],
    options: &MemberOptions,
) -> Result<Value, DispatchError> {
    debug!(method = options.resolve(property), args = args.len(), "Dispatching write");
    call(contract, property, args, options).await
}

/// Returns the provider's event handle.
///
/// # Errors
///
/// Provider error.
pub fn get_event(
    contract: &BoundContract,
    property: &str,
    options: &MemberOptions,
) -> Result<EventHandle, DispatchError> {
    Ok(contract.get_event(options.resolve(property))?)
}

/// Queries events with bind-time options merged with call-time overrides.
///
/// The event name comes from the bind-time filter, then `options.name`, then
/// the property. Overrides never change it.
///
/// # Errors
///
/// Provider error.
#[instrument(skip(contract, options, overrides), fields(contract = %contract.key()))]
pub async fn get_events(
    contract: &BoundContract,
    property: &str,
    options: &MemberOptions,
    overrides: Option<&EventFilterOptions>,
) -> Result<EventQueryResult, DispatchError> {
    let bound = &options.event_filter;
    let name = bound
        .name
        .as_deref()
        .unwrap_or_else(|| options.resolve(property));
    let merged = merge_event_options(bound, overrides);
    debug!(event = name, from_block = ?merged.from_block, "Querying events");
    Ok(contract.get_events(name, &merged).await?)
}

/// Returns a method reference without invoking it.
///
/// # Errors
///
/// Provider error.
pub fn get_method(
    contract: &BoundContract,
    property: &str,
    options: &MemberOptions,
) -> Result<MethodReference, DispatchError> {
    Ok(contract.get_method(options.resolve(property))?)
}

// =============================================================================
// TESTS
// =============================================================================
