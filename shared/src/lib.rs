//! Shared types and models for the Inventory Management System
//!
//! This crate contains types shared between the client runtime, the browser
//! bindings (via WASM), and other components of the system.

pub mod models;
pub mod permissions;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
