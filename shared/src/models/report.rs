//! Dashboard statistics and system activity log

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire;

/// Count of products grouped by a library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupTotal {
    pub total: u64,
    pub name: String,
}

/// Dashboard summary cards and charts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub product_count: u64,
    pub category_count: u64,
    pub low_stock_count: u64,
    #[serde(default)]
    pub purchase_order_count: Option<u64>,
    #[serde(default)]
    pub requisition_count: Option<u64>,
    #[serde(default)]
    pub inspection_count: Option<u64>,
    #[serde(default)]
    pub dispense_count: Option<u64>,
    #[serde(default)]
    pub total_stock_value: Option<Decimal>,
    #[serde(default)]
    pub product_per_category: Vec<GroupTotal>,
    #[serde(default)]
    pub product_per_fund_cluster: Vec<GroupTotal>,
}

/// Who performed a logged action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Causer {
    pub id: u64,
    pub name: String,
}

/// Entry of the system activity log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityLog {
    pub id: u64,
    pub log_name: Option<String>,
    pub description: String,
    pub subject_type: Option<String>,
    pub subject_id: Option<u64>,
    pub causer_type: Option<String>,
    pub causer_id: Option<u64>,
    #[serde(default)]
    pub properties: serde_json::Value,
    #[serde(default, with = "wire::option_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub causer: Option<Causer>,
}

impl ActivityLog {
    pub fn causer_name(&self) -> &str {
        self.causer
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("System")
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ActivityLogFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
