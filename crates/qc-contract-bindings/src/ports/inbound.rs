//! # Driving Ports (API - Inbound)
//!
//! Entity shapes are how applications describe a contract statically: a list
//! of members, each mapped to one dispatch primitive. The binding engine
//! turns that list into a member table on every bound contract.
//!
//! ## Usage
//!
//! ```ignore
//! struct Token;
//!
//! impl ContractEntity for Token {
//!     fn members(&self) -> Vec<MemberBinding> {
//!         vec![
//!             MemberBinding::read("balanceOf"),
//!             MemberBinding::write("transfer"),
//!             MemberBinding::events("transfers", EventFilterOptions::named("Transfer")),
//!         ]
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//! ```

use crate::domain::entities::MemberBinding;
use std::any::Any;

// =============================================================================
// CONTRACT ENTITY
// =============================================================================

/// A statically declared contract shape.
pub trait ContractEntity: Send + Sync + 'static {
    /// Declared members, in declaration order.
    ///
    /// A later member with the same property replaces an earlier one.
    fn members(&self) -> Vec<MemberBinding>;

    /// Downcast support for typed access to the entity.
    fn as_any(&self) -> &dyn Any;
}

// =============================================================================
// EMPTY ENTITY
// =============================================================================

/// Capability-free shape used when a declaration relies on dynamic stubs only.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyEntity;

impl ContractEntity for EmptyEntity {
    fn members(&self) -> Vec<MemberBinding> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
