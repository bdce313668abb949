//! # Domain Layer (Inner Hexagon)
//!
//! Declarations, ABI model, value objects and the pure functions that turn an
//! interface document into topic and stub tables.
//!
//! - NO provider calls
//! - NO async code

pub mod abi;
pub mod entities;
pub mod services;
pub mod value_objects;

pub use abi::*;
pub use entities::*;
pub use services::*;
pub use value_objects::*;
