//! Requisition (RIS) models and the requisition lifecycle

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use super::product::Product;
use super::wire;
use crate::types::NamedRef;
use crate::validation::{non_blank, positive};

/// A requisition and issue slip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requisition {
    pub id: u64,
    pub department_id: u64,
    /// Human-readable RIS number
    pub ris_no: String,
    /// Stock comes from an inspection (issuance) rather than the warehouse
    #[serde(deserialize_with = "wire::flag::deserialize")]
    pub with_inspection: bool,
    #[serde(default, deserialize_with = "wire::flag::deserialize")]
    pub is_for_dispense: bool,
    #[serde(default, deserialize_with = "wire::flag::deserialize")]
    pub is_dispense: bool,
    pub requested_by: String,
    pub designation: String,
    pub purpose: Option<String>,
    #[serde(default)]
    pub department: Option<NamedRef>,
}

impl Requisition {
    pub fn status(&self) -> RequisitionStatus {
        RequisitionStatus::from_flags(self.is_for_dispense, self.is_dispense)
    }

    pub fn source_label(&self) -> &'static str {
        if self.with_inspection {
            "From Issuance"
        } else {
            "From Warehouse"
        }
    }

    pub fn department_name(&self) -> &str {
        self.department
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or("—")
    }
}

/// A line item drawn from one warehouse stock batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequisitionItem {
    pub id: u64,
    pub requisition_id: u64,
    pub stock_id: u64,
    pub product_id: u64,
    pub brand_id: Option<u64>,
    pub lot_no: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    #[serde(default, with = "wire::option_date")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default)]
    pub brand: Option<NamedRef>,
}

impl RequisitionItem {
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.map(|price| price * self.quantity)
    }
}

/// Requisition header plus its items, as returned by the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequisitionDetail {
    pub requisition: Requisition,
    #[serde(default)]
    pub requisition_items: Vec<RequisitionItem>,
}

impl RequisitionDetail {
    pub fn status(&self) -> RequisitionStatus {
        self.requisition.status()
    }

    pub fn item(&self, item_id: u64) -> Option<&RequisitionItem> {
        self.requisition_items.iter().find(|i| i.id == item_id)
    }

    pub fn allowed_actions(&self) -> Vec<RequisitionAction> {
        self.status().allowed_actions(
            self.requisition_items.len(),
            self.requisition.with_inspection,
        )
    }

    pub fn check(&self, action: RequisitionAction) -> Result<(), TransitionError> {
        self.status().check(
            action,
            self.requisition_items.len(),
            self.requisition.with_inspection,
        )
    }
}

/// Header payload for creating or editing a requisition
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct RequisitionPayload {
    #[validate(custom = "non_blank")]
    pub ris_no: String,
    #[validate(range(min = 1, message = "Department is required"))]
    pub department_id: u64,
    #[validate(custom = "non_blank")]
    pub requested_by: String,
    #[validate(custom = "non_blank")]
    pub designation: String,
    #[serde(default)]
    pub purpose: String,
    pub with_inspection: bool,
}

impl From<&Requisition> for RequisitionPayload {
    fn from(r: &Requisition) -> Self {
        Self {
            ris_no: r.ris_no.clone(),
            department_id: r.department_id,
            requested_by: r.requested_by.clone(),
            designation: r.designation.clone(),
            purpose: r.purpose.clone().unwrap_or_default(),
            with_inspection: r.with_inspection,
        }
    }
}

/// Body for adding a warehouse batch to a requisition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddItemPayload {
    pub stock_id: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
}

/// Body for editing a requisition item in place
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct UpdateItemPayload {
    #[validate(custom = "positive")]
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub quantity: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub unit_price: Option<Decimal>,
}

/// Reference to the dispense created from a requisition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispenseRef {
    pub id: u64,
    pub requisition_id: u64,
    pub dispense_code: String,
}

/// Filters for the requisition tables
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RequisitionFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ris_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_for_dispense: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dispense: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Lifecycle of a requisition. Transitions happen on the server; the client
/// only decides which actions to offer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RequisitionStatus {
    Pending,
    ForDispensing,
    Dispensed,
}

impl RequisitionStatus {
    pub fn from_flags(is_for_dispense: bool, is_dispense: bool) -> Self {
        if is_dispense {
            RequisitionStatus::Dispensed
        } else if is_for_dispense {
            RequisitionStatus::ForDispensing
        } else {
            RequisitionStatus::Pending
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequisitionStatus::Dispensed)
    }

    /// Actions legal in this state
    pub fn allowed_actions(&self, item_count: usize, with_inspection: bool) -> Vec<RequisitionAction> {
        RequisitionAction::ALL
            .iter()
            .copied()
            .filter(|a| self.check(*a, item_count, with_inspection).is_ok())
            .collect()
    }

    pub fn check(
        &self,
        action: RequisitionAction,
        item_count: usize,
        with_inspection: bool,
    ) -> Result<(), TransitionError> {
        use RequisitionAction::*;
        use RequisitionStatus::*;

        match (self, action) {
            (Pending, EditHeader) | (Pending, EditItem) | (Pending, RemoveItem) => Ok(()),
            (Pending, AddItem) if with_inspection => Err(TransitionError::SourcedFromInspection),
            (Pending, AddItem) => Ok(()),
            (Pending, MarkForDispense) if item_count == 0 => Err(TransitionError::NoItems),
            (Pending, MarkForDispense) => Ok(()),
            (ForDispensing, Dispense) => Ok(()),
            (status, action) => Err(TransitionError::NotAllowed {
                action,
                status: *status,
            }),
        }
    }
}

impl std::fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequisitionStatus::Pending => write!(f, "Pending"),
            RequisitionStatus::ForDispensing => write!(f, "For Dispensing"),
            RequisitionStatus::Dispensed => write!(f, "Dispensed"),
        }
    }
}

/// User-triggered operations on a requisition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RequisitionAction {
    EditHeader,
    AddItem,
    EditItem,
    RemoveItem,
    MarkForDispense,
    Dispense,
}

impl RequisitionAction {
    pub const ALL: [RequisitionAction; 6] = [
        RequisitionAction::EditHeader,
        RequisitionAction::AddItem,
        RequisitionAction::EditItem,
        RequisitionAction::RemoveItem,
        RequisitionAction::MarkForDispense,
        RequisitionAction::Dispense,
    ];
}

impl std::fmt::Display for RequisitionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequisitionAction::EditHeader => "edit requisition",
            RequisitionAction::AddItem => "add item",
            RequisitionAction::EditItem => "edit item",
            RequisitionAction::RemoveItem => "remove item",
            RequisitionAction::MarkForDispense => "mark as for dispensing",
            RequisitionAction::Dispense => "create dispense",
        };
        f.write_str(label)
    }
}

/// Why an action is not offered
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} while the requisition is {status}")]
    NotAllowed {
        action: RequisitionAction,
        status: RequisitionStatus,
    },

    #[error("requisition has no items")]
    NoItems,

    #[error("requisition draws its stock from an inspection")]
    SourcedFromInspection,

    #[error("dispense is already confirmed")]
    AlreadyConfirmed,

    #[error("dispense has no items")]
    NoDispenseItems,

    #[error("inspection is already forwarded")]
    AlreadyForwarded,
}

/// Tabs of the requisitions page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RequisitionTab {
    #[default]
    Pending,
    ForDispensing,
    Dispensed,
}

impl RequisitionTab {
    pub fn slug(&self) -> &'static str {
        match self {
            RequisitionTab::Pending => "pending",
            RequisitionTab::ForDispensing => "for-dispensing",
            RequisitionTab::Dispensed => "dispensed",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "pending" => Some(RequisitionTab::Pending),
            "for-dispensing" => Some(RequisitionTab::ForDispensing),
            "dispensed" => Some(RequisitionTab::Dispensed),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RequisitionTab::Pending => "Pending Requisitions",
            RequisitionTab::ForDispensing => "For Dispensing",
            RequisitionTab::Dispensed => "Dispensed",
        }
    }

    /// Write the tab's status filters into `filters`
    pub fn apply(&self, filters: &mut RequisitionFilters) {
        let (for_dispense, dispense) = match self {
            RequisitionTab::Pending => (Some(0), None),
            RequisitionTab::ForDispensing => (Some(1), None),
            RequisitionTab::Dispensed => (None, Some(1)),
        };
        filters.is_for_dispense = for_dispense;
        filters.is_dispense = dispense;
    }
}
