//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the outbound ports.
//!
//! - Adapters implement domain ports
//! - Chain-specific providers live in their own crates

pub mod in_memory_provider;

pub use in_memory_provider::*;
