//! Dashboard and system log pages

use shared::models::{ActivityLog, ActivityLogFilters, DashboardStats};
use shared::types::{ListResponse, PageParams};

use super::Context;
use crate::api::ListQuery;
use crate::cache::{QueryKey, Resource};
use crate::error::ClientResult;

/// `/dashboard`
pub struct DashboardView {
    ctx: Context,
}

impl DashboardView {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    pub async fn load(&self) -> ClientResult<DashboardStats> {
        let api = self.ctx.api.dashboard.clone();
        self.ctx
            .cache
            .query(QueryKey::list(Resource::Dashboard), move || async move {
                api.stats().await
            })
            .await
    }
}

/// `/settings/logs`
pub struct SystemLogsView {
    ctx: Context,
    filters: ActivityLogFilters,
    page: PageParams,
}

impl SystemLogsView {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            filters: ActivityLogFilters::default(),
            page: PageParams::default(),
        }
    }

    pub fn set_filters(&mut self, filters: ActivityLogFilters) {
        self.filters = filters;
        self.page.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = PageParams::new(page, self.page.page_size);
    }

    pub async fn load(&self) -> ClientResult<ListResponse<ActivityLog>> {
        let filters = self.filters.clone();
        let page = self.page;
        let key = QueryKey::list(Resource::SystemLogs)
            .with_params(&ListQuery::new(&filters, page))?;
        let api = self.ctx.api.system_logs.clone();
        self.ctx
            .cache
            .query(key, move || async move { api.list(&filters, page).await })
            .await
    }
}
