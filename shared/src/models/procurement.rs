//! Purchase order, inspection (IAR) and delivery models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::product::Product;
use super::requisition::TransitionError;
use super::wire;
use crate::types::NamedRef;
use crate::validation::{non_blank, positive};

/// A purchase order issued to a supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseOrder {
    pub id: u64,
    #[serde(default, with = "wire::option_date")]
    pub po_date: Option<NaiveDate>,
    pub po_number: String,
    pub remarks: Option<String>,
    pub supplier_id: u64,
    #[serde(default)]
    pub supplier: Option<NamedRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct PurchaseOrderPayload {
    pub po_date: NaiveDate,
    #[validate(custom = "non_blank")]
    pub po_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[validate(range(min = 1, message = "Supplier is required"))]
    pub supplier_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PurchaseOrderFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_id: Option<u64>,
}

/// Delivery attached to an inspection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Delivery {
    pub id: u64,
    #[serde(default)]
    pub supplier: Option<NamedRef>,
    #[serde(default, with = "wire::option_date")]
    pub delivery_date: Option<NaiveDate>,
}

/// Inspection and acceptance report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Inspection {
    pub id: u64,
    pub iar_no: String,
    #[serde(default, deserialize_with = "wire::flag::deserialize")]
    pub for_warehouse: bool,
    #[serde(default, deserialize_with = "wire::flag::deserialize")]
    pub is_forward: bool,
    pub remarks: Option<String>,
    #[serde(default)]
    pub delivery: Option<Delivery>,
    #[serde(default)]
    pub purchase_order: Option<PurchaseOrder>,
}

/// Inspection plus its computed delivery total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspectionDetail {
    pub inspection: Inspection,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct InspectionPayload {
    #[validate(custom = "non_blank")]
    pub iar_no: String,
    #[validate(range(min = 1, message = "Supplier is required"))]
    pub supplier_id: u64,
    pub delivery_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dr_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[validate(range(min = 1, message = "Purchase order must be a valid selection"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_warehouse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Partial header update for an inspection
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct InspectionUpdate {
    #[validate(custom = "non_blank")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iar_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Inspector/acceptor sign-off fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InspectionSignatories {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector_designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector_department_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspected_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptor_designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptor_department_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct InspectionFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iar_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dr_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_warehouse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_forward: Option<bool>,
}

/// Tabs of the inspections page, each backed by its own endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InspectionTab {
    #[default]
    All,
    ToForward,
    Forwarded,
}

impl InspectionTab {
    pub fn slug(&self) -> &'static str {
        match self {
            InspectionTab::All => "all",
            InspectionTab::ToForward => "to-forward",
            InspectionTab::Forwarded => "forwarded",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "all" => Some(InspectionTab::All),
            "to-forward" => Some(InspectionTab::ToForward),
            "forwarded" => Some(InspectionTab::Forwarded),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InspectionTab::All => "Inspections",
            InspectionTab::ToForward => "To Forward",
            InspectionTab::Forwarded => "Forwarded",
        }
    }
}

impl Inspection {
    /// Forwarded inspections have become warehouse stock and are frozen
    pub fn check_editable(&self) -> Result<(), TransitionError> {
        if self.is_forward {
            return Err(TransitionError::AlreadyForwarded);
        }
        Ok(())
    }
}

/// Delivered line on an inspection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryItem {
    pub id: u64,
    pub product_id: u64,
    pub brand_id: Option<u64>,
    pub lot_no: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default, with = "wire::option_date")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default)]
    pub brand: Option<NamedRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct DeliveryItemPayload {
    #[validate(range(min = 1, message = "Product is required"))]
    pub product_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_no: Option<String>,
    #[validate(custom = "positive")]
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[validate(custom = "positive")]
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct DeliveryItemUpdate {
    #[validate(custom = "positive")]
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[validate(custom = "positive")]
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}
