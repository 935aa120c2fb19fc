//! Dashboard cards and the system activity log

mod support;

use shared::models::ActivityLogFilters;

use ims_client::views::{DashboardView, SystemLogsView};
use support::Harness;

#[tokio::test]
async fn test_dashboard_is_served_from_cache() {
    let h = Harness::signed_in().await;
    h.backend.seed_stock("LOT-A", 4, 10);
    h.backend.seed_stock("LOT-B", 80, 10);
    h.backend.seed_inspection("IAR-001", false);

    let view = DashboardView::new(h.ctx.clone());
    let stats = view.load().await.unwrap();
    assert_eq!(stats.product_count, 2);
    assert_eq!(stats.low_stock_count, 1);
    assert_eq!(stats.inspection_count, Some(1));
    assert_eq!(stats.product_per_category[0].name, "Medicines");

    // A second page visit reuses the cached cards
    DashboardView::new(h.ctx.clone()).load().await.unwrap();
    assert_eq!(h.backend.hits("GET", "dashboard"), 1);
}

#[tokio::test]
async fn test_log_filters_are_sent_as_query() {
    let h = Harness::signed_in().await;
    let mut view = SystemLogsView::new(h.ctx.clone());
    view.set_filters(ActivityLogFilters {
        causer: Some("Admin".into()),
        subject: Some("Requisition".into()),
        ..Default::default()
    });
    view.set_page(2);

    let logs = view.load().await.unwrap();
    assert_eq!(logs.data.len(), 1);
    assert_eq!(logs.data[0].causer_name(), "Admin");
    assert!(logs.data[0].created_at.is_some());

    let sent = h.backend.log_queries().pop().unwrap();
    assert_eq!(sent.get("causer").map(String::as_str), Some("Admin"));
    assert_eq!(sent.get("subject").map(String::as_str), Some("Requisition"));
    assert_eq!(sent.get("page").map(String::as_str), Some("2"));
    assert!(!sent.contains_key("event"));

    // Changing filters is a new query
    view.set_filters(ActivityLogFilters::default());
    view.load().await.unwrap();
    assert_eq!(h.backend.hits("GET", "settings/system-logs"), 2);
    assert!(!h.backend.log_queries()[1].contains_key("causer"));
}
