//! Page controllers
//!
//! A view owns the page state (tab, filters, page, open forms) and runs the
//! page's queries and mutations through the shared [`Context`]. Successful
//! mutations raise their own toast and invalidate the affected cache keys;
//! failed requests were already reported by the HTTP client.

mod auth;
mod crud;
mod dispenses;
mod inspections;
mod reports;
mod requisitions;

pub use auth::AuthView;
pub use crud::{
    CrudAction, CrudResource, CrudView, LibraryResource, ProductResource, PurchaseOrderResource,
    RoleResource, UserResource,
};
pub use dispenses::{ConfirmForm, DispenseDetailView, DispenseListView};
pub use inspections::{InspectionDetailView, InspectionListView, INSPECTION_REQUIRED};
pub use reports::{DashboardView, SystemLogsView};
pub use requisitions::{
    InlineEdit, MarkOutcome, RequisitionDetailView, RequisitionListView, StockPicker,
};

use std::sync::Arc;

use crate::api::Api;
use crate::cache::QueryCache;
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::notify::{Notification, Notifier};
use crate::session::Session;

/// Everything a view needs, cloned into each view
#[derive(Clone)]
pub struct Context {
    pub api: Api,
    pub cache: Arc<QueryCache>,
    pub session: Arc<Session>,
    pub notifier: Arc<dyn Notifier>,
    /// Backend domain for printable pages
    pub domain: String,
}

impl Context {
    pub fn new(
        config: &Config,
        session: Arc<Session>,
        notifier: Arc<dyn Notifier>,
    ) -> ClientResult<Self> {
        let http = HttpClient::new(config, session.clone(), notifier.clone())?;
        Ok(Self {
            api: Api::new(Arc::new(http)),
            cache: Arc::new(QueryCache::new()),
            session,
            notifier,
            domain: config.api.domain().to_string(),
        })
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Toast a success
    pub fn success(&self, title: &str, message: impl Into<String>) {
        self.notify(Notification::success(title, message));
    }

    /// Report an error raised before any request was sent and return it
    pub fn reject<T>(&self, err: ClientError) -> ClientResult<T> {
        if !matches!(err, ClientError::Cancelled) {
            self.notify(err.notification());
        }
        tracing::debug!(error = %err, "rejected locally");
        Err(err)
    }

    /// Report a validation failure under a fixed message
    pub fn reject_with<T>(&self, err: ClientError, message: &str) -> ClientResult<T> {
        self.notify(Notification::error("Validation", message));
        tracing::debug!(error = %err, "rejected locally");
        Err(err)
    }
}
