//! Typed wrappers over the IMS REST endpoints
//!
//! One struct per resource. Each holds the shared [`HttpClient`] and knows
//! only paths and payload shapes; caching, validation and toasts for
//! successful operations belong to the views.

mod auth;
mod dispenses;
mod libraries;
mod procurement;
mod products;
mod reports;
mod requisitions;
mod users;

pub use auth::AuthApi;
pub use dispenses::DispensesApi;
pub use libraries::LibraryApi;
pub use procurement::{InspectionsApi, PurchaseOrdersApi};
pub use products::ProductsApi;
pub use reports::{DashboardApi, SystemLogsApi};
pub use requisitions::RequisitionsApi;
pub use users::{RolesApi, UsersApi};

use std::sync::Arc;

use serde::Serialize;
use shared::models::LibraryKind;
use shared::types::PageParams;

use crate::http::HttpClient;

/// Query string of a paginated listing: the resource filters plus the page
#[derive(Debug, Clone, Serialize)]
pub struct ListQuery<'a, F: Serialize> {
    #[serde(flatten)]
    pub filters: &'a F,
    #[serde(flatten)]
    pub page: PageParams,
}

impl<'a, F: Serialize> ListQuery<'a, F> {
    pub fn new(filters: &'a F, page: PageParams) -> Self {
        Self { filters, page }
    }
}

/// Filters for listings that only take a free-text search
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl SearchFilters {
    pub fn new(search: Option<String>) -> Self {
        Self {
            search: search.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Every resource API over one HTTP client
#[derive(Clone)]
pub struct Api {
    http: Arc<HttpClient>,
    pub auth: AuthApi,
    pub products: ProductsApi,
    pub requisitions: RequisitionsApi,
    pub dispenses: DispensesApi,
    pub purchase_orders: PurchaseOrdersApi,
    pub inspections: InspectionsApi,
    pub users: UsersApi,
    pub roles: RolesApi,
    pub dashboard: DashboardApi,
    pub system_logs: SystemLogsApi,
}

impl Api {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            auth: AuthApi::new(http.clone()),
            products: ProductsApi::new(http.clone()),
            requisitions: RequisitionsApi::new(http.clone()),
            dispenses: DispensesApi::new(http.clone()),
            purchase_orders: PurchaseOrdersApi::new(http.clone()),
            inspections: InspectionsApi::new(http.clone()),
            users: UsersApi::new(http.clone()),
            roles: RolesApi::new(http.clone()),
            dashboard: DashboardApi::new(http.clone()),
            system_logs: SystemLogsApi::new(http.clone()),
            http,
        }
    }

    /// API for one library table
    pub fn library(&self, kind: LibraryKind) -> LibraryApi {
        LibraryApi::new(self.http.clone(), kind)
    }

    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }
}
