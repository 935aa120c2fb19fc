//! Dispense models

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::product::Product;
use super::requisition::{Requisition, TransitionError};
use super::wire;
use crate::validation::non_blank;

/// Record of stock released against a requisition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dispense {
    pub id: u64,
    pub requisition_id: u64,
    pub dispense_code: String,
    #[serde(default, deserialize_with = "wire::flag::deserialize")]
    pub is_dispense: bool,
    pub receive_by: Option<String>,
    #[serde(default, with = "wire::option_datetime")]
    pub dispense_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub requisition: Option<Requisition>,
}

impl Dispense {
    pub fn status(&self) -> DispenseStatus {
        if self.is_dispense {
            DispenseStatus::Confirmed
        } else {
            DispenseStatus::AwaitingConfirmation
        }
    }

    pub fn ris_no(&self) -> &str {
        self.requisition
            .as_ref()
            .map(|r| r.ris_no.as_str())
            .unwrap_or("—")
    }
}

/// What was released, mirrored from the requisition items at dispense time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispenseItem {
    pub id: u64,
    pub product_id: u64,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub product: Option<Product>,
}

impl DispenseItem {
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Lifecycle of a dispense
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DispenseStatus {
    AwaitingConfirmation,
    Confirmed,
}

impl DispenseStatus {
    /// Confirmation happens once, and only for a dispense with items
    pub fn check_confirm(&self, item_count: usize) -> Result<(), TransitionError> {
        match self {
            DispenseStatus::Confirmed => Err(TransitionError::AlreadyConfirmed),
            DispenseStatus::AwaitingConfirmation if item_count == 0 => {
                Err(TransitionError::NoDispenseItems)
            }
            DispenseStatus::AwaitingConfirmation => Ok(()),
        }
    }
}

impl std::fmt::Display for DispenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispenseStatus::AwaitingConfirmation => write!(f, "Pending"),
            DispenseStatus::Confirmed => write!(f, "Dispensed"),
        }
    }
}

/// Body for confirming a dispense
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ConfirmDispensePayload {
    #[validate(custom = "non_blank")]
    pub receive_by: String,
    #[serde(with = "wire::dispense_at")]
    pub dispense_at: NaiveDateTime,
}

/// Tabs of the dispenses page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DispenseTab {
    #[default]
    ForDispense,
    Dispensed,
}

impl DispenseTab {
    pub fn slug(&self) -> &'static str {
        match self {
            DispenseTab::ForDispense => "for-dispense",
            DispenseTab::Dispensed => "dispensed",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "for-dispense" => Some(DispenseTab::ForDispense),
            "dispensed" => Some(DispenseTab::Dispensed),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DispenseTab::ForDispense => "For Dispense",
            DispenseTab::Dispensed => "Dispensed",
        }
    }
}

/// Filters for the generic dispense listing
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DispenseFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispense_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ris_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dispense: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}
