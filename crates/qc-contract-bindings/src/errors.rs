//! # Error Types
//!
//! All error types for contract binding and dispatch.
//!
//! Binding failures are configuration errors: they are raised synchronously,
//! abort the whole bind pass and are never retried. Dispatch failures are
//! either argument validation errors raised before the provider is reached,
//! or provider errors passed through unchanged.

use thiserror::Error;

// =============================================================================
// BINDING ERRORS (Configuration)
// =============================================================================

/// Configuration errors raised while composing contracts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// No provider was supplied for a declaration.
    #[error("missing provider for {contract}")]
    MissingProvider { contract: String },

    /// The declaration carries no interface import.
    #[error("missing import for {contract}")]
    MissingImport { contract: String },

    /// No entity shape and dynamic stubs disabled.
    #[error("must provide an entity for {contract} when dynamic stubs are disabled")]
    MissingEntity { contract: String },

    /// Short module syntax used with an unnamed declaration.
    #[error("short module syntax requires a name")]
    MissingName,

    /// `rebind` called before any successful bind.
    #[error("bind_contracts must have been called previously")]
    NotBound,

    /// Registry key already taken (strict registry keys only).
    #[error("duplicate registry key: {key}")]
    DuplicateKey { key: String },

    /// Invalid binding configuration.
    #[error("invalid binding config: {0}")]
    InvalidConfig(String),
}

// =============================================================================
// VALIDATION ERRORS
// =============================================================================

/// Argument validation failure, raised before dispatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("validation failed for {method}: {reason}")]
pub struct ValidationError {
    /// Member or method whose arguments were rejected.
    pub method: String,
    /// Human readable reason.
    pub reason: String,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// PROVIDER ERRORS
// =============================================================================

/// Errors originating from a provider implementation.
///
/// The binding core never inspects these; they reach the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network or node transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node rejected the call (revert, bad nonce, ...).
    #[error("call rejected: {0}")]
    Rejected(String),

    /// Dispatch attempted before `connect`.
    #[error("provider not connected")]
    NotConnected,

    /// Method not present in the provider's view of the ABI.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Event not present in the provider's view of the ABI.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Other provider error.
    #[error("provider error: {0}")]
    Other(String),
}

// =============================================================================
// DISPATCH ERRORS
// =============================================================================

/// Errors returned by the dispatch primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Arguments rejected before dispatch.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Error reported by the provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// No statically declared member under this property name.
    #[error("unknown member: {0}")]
    UnknownMember(String),

    /// No dynamic stub under this name.
    #[error("unknown stub: {0}")]
    UnknownStub(String),

    /// Member exists but has a different dispatch kind.
    #[error("member {property} is {actual}, not {expected}")]
    KindMismatch {
        property: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Call-time event filter overrides could not be decoded.
    #[error("invalid event filter overrides: {0}")]
    InvalidOverrides(String),
}

// =============================================================================
// ABI ERRORS
// =============================================================================

/// Errors while reading an interface-definition document.
#[derive(Debug, Error)]
pub enum AbiError {
    /// The document is not valid JSON.
    #[error("invalid interface document: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// TELEMETRY ERRORS
// =============================================================================

/// Errors while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed.
    #[error("subscriber init failed: {0}")]
    SubscriberInit(String),
}

// =============================================================================
// TESTS
// =============================================================================
