//! WebAssembly bindings for the IMS browser shell
//!
//! Exposes the checks the pages run before talking to the server:
//! - Requisition header and dispense confirmation validation
//! - Add-item and inline quantity checks
//! - Lifecycle gating (which actions a requisition or dispense offers)
//! - Permission checks for guarded pages and buttons

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use validator::Validate;
use wasm_bindgen::prelude::*;

use shared::models::wire::DISPENSE_AT_FORMAT;
use shared::models::{
    ConfirmDispensePayload, DispenseStatus, RequisitionPayload, RequisitionStatus,
};
use shared::validation::{self, summarize, validate_payload};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("ims-wasm loaded"));
}

fn check<T: DeserializeOwned + Validate>(json: &str) -> Result<(), String> {
    let payload: T = serde_json::from_str(json).map_err(|e| format!("Invalid payload: {e}"))?;
    validate_payload(&payload).map_err(|failures| summarize(&failures))
}

/// Validate the create/edit requisition form
#[wasm_bindgen]
pub fn validate_requisition_header(payload_json: &str) -> Result<(), JsValue> {
    check::<RequisitionPayload>(payload_json).map_err(|e| JsValue::from_str(&e))
}

/// Validate the confirm-dispense form (`receive_by`, `dispense_at`)
#[wasm_bindgen]
pub fn validate_confirm_dispense(payload_json: &str) -> Result<(), JsValue> {
    check::<ConfirmDispensePayload>(payload_json).map_err(|e| JsValue::from_str(&e))
}

/// Whether the add-item dialog may submit
#[wasm_bindgen]
pub fn can_add_item(stock_id: Option<u32>, quantity: &str) -> bool {
    validation::validate_add_item(
        stock_id.map(u64::from),
        validation::parse_quantity(quantity),
    )
    .is_ok()
}

/// Whether an inline quantity edit may be saved
#[wasm_bindgen]
pub fn is_valid_quantity(raw: &str) -> bool {
    validation::validate_quantity(validation::parse_quantity(raw)).is_ok()
}

/// Quantity times price, rounded to cents; empty when either is unparsable
#[wasm_bindgen]
pub fn line_total(quantity: &str, unit_price: &str) -> String {
    match (
        validation::parse_quantity(quantity),
        validation::parse_quantity(unit_price),
    ) {
        (Some(q), Some(p)) => (q * p).round_dp(2).to_string(),
        _ => String::new(),
    }
}

/// Status label from the requisition's flags
#[wasm_bindgen]
pub fn requisition_status(is_for_dispense: bool, is_dispense: bool) -> String {
    RequisitionStatus::from_flags(is_for_dispense, is_dispense).to_string()
}

/// Actions the detail page offers, as a JSON array of kebab-case names
#[wasm_bindgen]
pub fn requisition_actions(
    is_for_dispense: bool,
    is_dispense: bool,
    item_count: u32,
    with_inspection: bool,
) -> String {
    let actions = RequisitionStatus::from_flags(is_for_dispense, is_dispense)
        .allowed_actions(item_count as usize, with_inspection);
    serde_json::to_string(&actions).unwrap_or_else(|_| "[]".into())
}

/// Whether the confirm button is shown on a dispense
#[wasm_bindgen]
pub fn can_confirm_dispense(is_dispense: bool, item_count: u32) -> bool {
    let status = if is_dispense {
        DispenseStatus::Confirmed
    } else {
        DispenseStatus::AwaitingConfirmation
    };
    status.check_confirm(item_count as usize).is_ok()
}

/// Permission check with the super-admin bypass; `permissions_json` is the
/// session's permission array
#[wasm_bindgen]
pub fn has_permission(role: Option<String>, permissions_json: &str, name: &str) -> bool {
    let permissions: Vec<String> = serde_json::from_str(permissions_json).unwrap_or_default();
    shared::permissions::has_permission(role.as_deref(), &permissions, name)
}

/// Default value of the dispense timestamp field: the current minute
#[wasm_bindgen]
pub fn default_dispense_at() -> String {
    format_dispense_at(js_sys::Date::now())
}

fn format_dispense_at(epoch_ms: f64) -> String {
    let minute = (epoch_ms as i64).div_euclid(60_000) * 60_000;
    DateTime::from_timestamp_millis(minute)
        .map(|t| t.naive_utc().format(DISPENSE_AT_FORMAT).to_string())
        .unwrap_or_default()
}

/// Quantity as the API expects it, or `None` when not a number
pub fn normalized_quantity(raw: &str) -> Option<Decimal> {
    validation::parse_quantity(raw).map(|q| q.normalize())
}
