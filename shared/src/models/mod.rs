//! Domain models for the Inventory Management System

mod dispense;
mod library;
mod procurement;
mod product;
mod report;
mod requisition;
mod user;
pub mod wire;

pub use dispense::*;
pub use library::*;
pub use procurement::*;
pub use product::*;
pub use report::*;
pub use requisition::*;
pub use user::*;
