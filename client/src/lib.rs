//! Inventory Management System client
//!
//! Typed access to the IMS REST API plus the page logic of the requisition
//! to dispense workflow: cached queries, lifecycle guards, toasts and route
//! guards. The `ims` binary drives it from the terminal.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod routes;
pub mod session;
pub mod views;

pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use notify::{MemoryNotifier, Notification, Notifier};
pub use session::{Session, SessionState};
pub use views::Context;
