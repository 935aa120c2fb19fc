use std::sync::Arc;

use shared::models::{ActivityLog, ActivityLogFilters, DashboardStats};
use shared::types::{ListResponse, PageParams, SingleResponse};

use super::ListQuery;
use crate::error::ClientResult;
use crate::http::HttpClient;

/// `dashboard` endpoint
#[derive(Clone)]
pub struct DashboardApi {
    http: Arc<HttpClient>,
}

impl DashboardApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn stats(&self) -> ClientResult<DashboardStats> {
        let res: SingleResponse<DashboardStats> = self.http.get("dashboard").await?;
        Ok(res.data)
    }
}

/// `settings/system-logs` endpoint
#[derive(Clone)]
pub struct SystemLogsApi {
    http: Arc<HttpClient>,
}

impl SystemLogsApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        filters: &ActivityLogFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<ActivityLog>> {
        self.http
            .get_with("settings/system-logs", &ListQuery::new(filters, page))
            .await
    }
}
