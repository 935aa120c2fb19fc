//! User, role and authentication models

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validation::{non_blank, password_strength, validate_payload, ValidationFailure};

/// Identity held in the session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Row of the users table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role_id: Option<u64>,
    #[serde(default)]
    pub role_name: Option<String>,
}

/// Body of `POST auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(custom = "non_blank")]
    pub password: String,
}

/// Data of a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub user: SessionUser,
    pub token: String,
    pub role: Option<String>,
    #[serde(default)]
    pub permission: Vec<String>,
}

/// Data of `GET auth/user`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    pub user: SessionUser,
    pub role: Option<String>,
    #[serde(default)]
    pub permission: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_password_change", skip_on_field_errors = true))]
pub struct ChangePasswordPayload {
    #[validate(custom = "non_blank")]
    pub password: String,
    #[validate(custom = "password_strength")]
    pub new_password: String,
    pub new_password_confirmation: String,
}

fn validate_password_change(payload: &ChangePasswordPayload) -> Result<(), ValidationError> {
    if payload.new_password != payload.new_password_confirmation {
        let mut err = ValidationError::new("confirmation");
        err.message = Some("Passwords do not match".into());
        return Err(err);
    }
    Ok(())
}

/// Create/update payload for a user. Password fields are optional on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_user_password", skip_on_field_errors = true))]
pub struct UserPayload {
    #[validate(custom = "non_blank")]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(custom = "password_strength")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
    #[validate(range(min = 1, message = "Role must be a valid selection"))]
    pub role_id: Option<u64>,
}

impl UserPayload {
    /// Checks for a new account, which must come with a password
    pub fn validate_for_create(&self) -> Result<(), Vec<ValidationFailure>> {
        let mut failures = validate_payload(self).err().unwrap_or_default();
        if self.password.as_deref().map_or(true, |p| p.trim().is_empty()) {
            failures.push(ValidationFailure::new("password", "Password is required"));
        }
        if failures.is_empty() {
            Ok(())
        } else {
            failures.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
            Err(failures)
        }
    }
}

fn validate_user_password(payload: &UserPayload) -> Result<(), ValidationError> {
    if payload.password.is_some() && payload.password != payload.password_confirmation {
        let mut err = ValidationError::new("confirmation");
        err.message = Some("Passwords do not match".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UserFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<u64>,
}

/// A role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: u64,
    pub name: String,
}

/// Role with its granted permission names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleWithPermissions {
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct RolePayload {
    #[validate(custom = "non_blank")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}
