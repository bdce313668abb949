//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions at the seams of the binding engine.
//!
//! - **Inbound**: `ContractEntity` (entity shapes supplied by applications)
//! - **Outbound**: `ContractProvider`, `ProviderPlugin`, `ArgumentValidator`
//! - No concrete chain implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
