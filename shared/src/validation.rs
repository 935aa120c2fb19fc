//! Client-side validation for the Inventory Management System
//!
//! Payloads derive `validator::Validate`; this module holds the custom rules
//! they reference and flattens failures into a list the views can display.
//! A payload that fails here never reaches the network layer.

use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

// ============================================================================
// Custom rules
// ============================================================================

/// Required text: rejects empty and whitespace-only values
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Strictly positive amount
pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some(Cow::from("Must be greater than zero"));
        return Err(err);
    }
    Ok(())
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("non_negative");
        err.message = Some(Cow::from("Cannot be negative"));
        return Err(err);
    }
    Ok(())
}

/// New passwords need at least eight characters
pub fn password_strength(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < 8 {
        let mut err = ValidationError::new("password");
        err.message = Some(Cow::from("Password must be at least 8 characters"));
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Failure reporting
// ============================================================================

/// One field-level validation failure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Human label for a payload field
pub fn field_label(field: &str) -> String {
    match field {
        "ris_no" => "RIS No".to_string(),
        "iar_no" => "IAR No".to_string(),
        "po_number" => "PO Number".to_string(),
        "department_id" => "Department".to_string(),
        "requested_by" => "Requested by".to_string(),
        "receive_by" => "Receiver name".to_string(),
        "stock_id" => "Stock".to_string(),
        other => {
            let trimmed = other.strip_suffix("_id").unwrap_or(other);
            let mut label = trimmed.replace('_', " ");
            if let Some(first) = label.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            label
        }
    }
}

/// Flatten `validator` errors into display-ready failures, sorted by field
pub fn collect_failures(errors: &ValidationErrors) -> Vec<ValidationFailure> {
    let mut failures: Vec<ValidationFailure> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = match (&err.message, err.code.as_ref()) {
                    (Some(msg), _) => msg.to_string(),
                    (None, "required") => format!("{} is required", field_label(field)),
                    (None, "email") => "Enter a valid email address".to_string(),
                    (None, code) => format!("{} is invalid ({code})", field_label(field)),
                };
                ValidationFailure::new(field, message)
            })
        })
        .collect();
    failures.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
    failures
}

/// Run a payload's derived checks
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), Vec<ValidationFailure>> {
    payload.validate().map_err(|e| collect_failures(&e))
}

/// Join failures into one notification message
pub fn summarize(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Requisition and dispense form checks
// ============================================================================

/// Parse a quantity typed into a numeric input
pub fn parse_quantity(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

/// Both a stock batch and a positive quantity are required to add an item
pub fn validate_add_item(
    stock_id: Option<u64>,
    quantity: Option<Decimal>,
) -> Result<(u64, Decimal), Vec<ValidationFailure>> {
    match (stock_id, quantity) {
        (Some(stock), Some(qty)) if stock > 0 && qty > Decimal::ZERO => Ok((stock, qty)),
        _ => Err(vec![ValidationFailure::new(
            "stock_id",
            "Select a stock and enter a valid quantity.",
        )]),
    }
}

/// Inline quantity edits must stay positive
pub fn validate_quantity(quantity: Option<Decimal>) -> Result<Decimal, Vec<ValidationFailure>> {
    match quantity {
        Some(qty) if qty > Decimal::ZERO => Ok(qty),
        _ => Err(vec![ValidationFailure::new(
            "quantity",
            "Quantity must be greater than zero.",
        )]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LibraryPayload, RequisitionPayload};
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_non_blank() {
        assert!(non_blank("RIS-001").is_ok());
        assert!(non_blank("").is_err());
        assert!(non_blank(" \t ").is_err());
    }

    #[test]
    fn test_requisition_payload_failures_are_labelled() {
        let payload = RequisitionPayload {
            ris_no: " ".into(),
            department_id: 0,
            requested_by: "J. Cruz".into(),
            designation: String::new(),
            purpose: String::new(),
            with_inspection: false,
        };
        let failures = validate_payload(&payload).unwrap_err();
        let fields: Vec<&str> = failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["department_id", "designation", "ris_no"]);
        assert_eq!(failures[0].message, "Department is required");
        assert_eq!(failures[1].message, "Designation is required");
        assert_eq!(failures[2].message, "RIS No is required");
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_payload(&LibraryPayload::new("Tablet")).is_ok());
    }

    #[test]
    fn test_add_item_needs_stock_and_quantity() {
        assert!(validate_add_item(None, Some(dec("1"))).is_err());
        assert!(validate_add_item(Some(4), None).is_err());
        assert!(validate_add_item(Some(4), Some(dec("0"))).is_err());
        assert!(validate_add_item(Some(4), Some(dec("-2"))).is_err());
        assert_eq!(validate_add_item(Some(4), Some(dec("0.5"))), Ok((4, dec("0.5"))));
    }

    #[test]
    fn test_quantity_edit() {
        assert!(validate_quantity(parse_quantity("abc")).is_err());
        assert!(validate_quantity(parse_quantity("0")).is_err());
        assert_eq!(validate_quantity(parse_quantity(" 12.5 ")), Ok(dec("12.5")));
    }

    /// Decimals with up to four places built from an integer mantissa
    fn quantity_strategy(mantissa: impl Strategy<Value = i64>) -> impl Strategy<Value = Decimal> {
        (mantissa, 0u32..=4).prop_map(|(m, scale)| Decimal::new(m, scale))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Zero and negative quantities never pass either check
        #[test]
        fn prop_non_positive_quantity_rejected(
            qty in quantity_strategy(-1_000_000i64..=0),
            stock in 1u64..10_000,
        ) {
            prop_assert!(validate_add_item(Some(stock), Some(qty)).is_err());
            prop_assert!(validate_quantity(Some(qty)).is_err());
            prop_assert!(validate_quantity(parse_quantity(&qty.to_string())).is_err());
        }

        /// Positive quantities come back unchanged, also through the text input
        #[test]
        fn prop_positive_quantity_accepted(
            qty in quantity_strategy(1i64..=1_000_000),
            stock in 1u64..10_000,
        ) {
            prop_assert_eq!(validate_add_item(Some(stock), Some(qty)), Ok((stock, qty)));
            prop_assert_eq!(validate_quantity(Some(qty)), Ok(qty));
            prop_assert_eq!(validate_quantity(parse_quantity(&qty.to_string())), Ok(qty));
        }

        /// A missing stock fails whatever the quantity
        #[test]
        fn prop_missing_stock_rejected(qty in quantity_strategy(any::<i32>().prop_map(i64::from))) {
            prop_assert!(validate_add_item(None, Some(qty)).is_err());
            prop_assert!(validate_add_item(Some(0), Some(qty)).is_err());
        }
    }

    #[test]
    fn test_field_label_fallback() {
        assert_eq!(field_label("fund_cluster_id"), "Fund cluster");
        assert_eq!(field_label("name"), "Name");
    }

    #[test]
    fn test_password_strength() {
        assert!(password_strength("s3cret-pass").is_ok());
        assert!(password_strength("short").is_err());
    }

    #[test]
    fn test_summarize() {
        let failures = vec![
            ValidationFailure::new("a", "A is required"),
            ValidationFailure::new("b", "B is required"),
        ];
        assert_eq!(summarize(&failures), "A is required B is required");
    }
}
