//! Product catalogue and warehouse stock models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wire;
use crate::types::NamedRef;
use crate::validation::{non_blank, non_negative};

/// A catalogue product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub product_code: String,
    pub generic_name_id: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    pub unit_id: u64,
    pub category_id: u64,
    pub fund_cluster_id: u64,
    /// Reorder threshold
    pub critical_level: Option<Decimal>,
    #[serde(default)]
    pub available_quantity: Option<Decimal>,
    #[serde(default)]
    pub unit: Option<NamedRef>,
    #[serde(default)]
    pub category: Option<NamedRef>,
    #[serde(default)]
    pub fund_cluster: Option<NamedRef>,
    #[serde(default)]
    pub generic_name: Option<NamedRef>,
}

impl Product {
    /// Whether the available quantity has fallen to the critical level
    pub fn is_low_stock(&self) -> bool {
        match (self.available_quantity, self.critical_level) {
            (Some(available), Some(critical)) => available <= critical,
            _ => false,
        }
    }
}

/// Create/update payload for a product
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[validate(range(min = 1, message = "Generic name must be a valid selection"))]
    pub generic_name_id: Option<u64>,
    #[validate(custom = "non_blank")]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Unit is required"))]
    pub unit_id: u64,
    #[validate(range(min = 1, message = "Category is required"))]
    pub category_id: u64,
    #[validate(range(min = 1, message = "Fund cluster is required"))]
    pub fund_cluster_id: u64,
    #[validate(custom = "non_negative")]
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub critical_level: Option<Decimal>,
}

/// Filters for the products table
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProductFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_cluster_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_name_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

/// A warehouse batch: one lot of a product with its running balance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stock {
    pub id: u64,
    pub product_id: u64,
    pub brand_id: Option<u64>,
    pub lot_no: Option<String>,
    /// Remaining quantity, maintained by the server
    pub running_balance: Decimal,
    pub unit_price: Option<Decimal>,
    #[serde(default, with = "wire::option_date")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub product: Option<Box<Product>>,
    #[serde(default)]
    pub brand: Option<NamedRef>,
}

impl Stock {
    pub fn product_name(&self) -> &str {
        self.product.as_ref().map(|p| p.name.as_str()).unwrap_or("—")
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.map(|d| d < today).unwrap_or(false)
    }
}

/// Search parameters for the warehouse stock picker
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StockSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_cluster_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_name_id: Option<u64>,
}
