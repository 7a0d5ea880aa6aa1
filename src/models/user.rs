//! User model for storage and API.

use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// User record stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Generated identifier (also used as document ID)
    pub id: String,
    /// Display name, stored trimmed
    pub name: String,
    /// 5-digit US ZIP code
    pub zip_code: String,
    /// Derived from `zip_code`
    pub latitude: f64,
    /// Derived from `zip_code`
    pub longitude: f64,
    /// Seconds offset from UTC, derived from `zip_code`
    pub timezone: i64,
}

/// Fields a caller may change on an existing user.
///
/// Absent fields are left as stored.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub zip_code: Option<String>,
}

/// Response for `GET /api/users/{id}/utc-offset`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UtcOffsetResponse {
    pub id: String,
    pub zip_code: String,
    pub timezone_seconds: i64,
    pub utc_offset: String,
}

/// A ZIP code is exactly five ASCII digits.
pub fn is_valid_zip_code(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

/// A name must contain something other than whitespace.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new("blank_name"))
    }
}

fn validate_zip_code(zip: &str) -> Result<(), ValidationError> {
    if is_valid_zip_code(zip) {
        Ok(())
    } else {
        Err(ValidationError::new("zip_code_format"))
    }
}

/// Map validator output to the message for the first failing field.
///
/// `name` is reported before `zip_code`.
fn first_failure(
    errors: &ValidationErrors,
    name_message: &str,
    zip_message: &str,
) -> AppError {
    let fields = errors.field_errors();
    let message = if fields.contains_key("name") {
        name_message
    } else if fields.contains_key("zip_code") {
        zip_message
    } else {
        "Invalid request body"
    };
    AppError::Validation(message.to_string())
}

const CREATE_NAME_MESSAGE: &str = "name is required (non-empty string)";
const CREATE_ZIP_MESSAGE: &str = "zip_code is required (5 digits)";
const UPDATE_NAME_MESSAGE: &str = "name must be a non-empty string";
const UPDATE_ZIP_MESSAGE: &str = "zip_code must be 5 digits";

/// Body of `POST /api/users`. Both fields are required.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(required, custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(required, custom(function = "validate_zip_code"))]
    pub zip_code: Option<String>,
}

impl CreateUserRequest {
    /// Validate and return `(name, zip_code)`.
    pub fn into_validated(self) -> Result<(String, String), AppError> {
        self.validate()
            .map_err(|e| first_failure(&e, CREATE_NAME_MESSAGE, CREATE_ZIP_MESSAGE))?;

        let name = self
            .name
            .ok_or_else(|| AppError::Validation(CREATE_NAME_MESSAGE.to_string()))?;
        let zip_code = self
            .zip_code
            .ok_or_else(|| AppError::Validation(CREATE_ZIP_MESSAGE.to_string()))?;
        Ok((name, zip_code))
    }
}

/// Deserialize a field so that an explicit `null` is kept as `Some(None)`.
///
/// Combined with `#[serde(default)]`, a missing field stays `None`.
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Body of `PUT /api/users/{id}`. Each provided field is validated.
///
/// A field sent as `null` counts as provided and is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "explicit_null")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub zip_code: Option<Option<String>>,
}

/// Check a provided field: `null` fails with `null_code`, a value goes to `check`.
fn validate_provided(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<Option<String>>,
    null_code: &'static str,
    check: fn(&str) -> Result<(), ValidationError>,
) {
    let result = match value {
        None => Ok(()),
        Some(None) => Err(ValidationError::new(null_code)),
        Some(Some(v)) => check(v),
    };
    if let Err(e) = result {
        errors.add(field, e);
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_provided(&mut errors, "name", &self.name, "null_name", validate_name);
        validate_provided(
            &mut errors,
            "zip_code",
            &self.zip_code,
            "null_zip_code",
            validate_zip_code,
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateUserRequest {
    /// Validate and convert into a service-level update.
    pub fn into_validated(self) -> Result<UserUpdate, AppError> {
        self.validate()
            .map_err(|e| first_failure(&e, UPDATE_NAME_MESSAGE, UPDATE_ZIP_MESSAGE))?;

        Ok(UserUpdate {
            name: self.name.flatten(),
            zip_code: self.zip_code.flatten(),
        })
    }
}
