//! Dashboard and system log commands

use shared::models::ActivityLogFilters;

use crate::cli::output;
use crate::views::{Context, DashboardView, SystemLogsView};

pub async fn dashboard(ctx: &Context) -> anyhow::Result<()> {
    let stats = DashboardView::new(ctx.clone()).load().await?;
    output::print_dashboard(&stats);
    Ok(())
}

pub async fn logs(ctx: &Context, filters: ActivityLogFilters, page: u32) -> anyhow::Result<()> {
    let mut view = SystemLogsView::new(ctx.clone());
    view.set_filters(filters);
    view.set_page(page);
    let list = view.load().await?;
    output::print_logs(&list);
    Ok(())
}
