//! Shared validation helpers for inbound HTTP adapters.
//!
//! Query strings and path segments arrive as raw strings so that every
//! malformed value produces the same JSON error shape:
//! `{"field": ..., "code": ..., "value": ...}` under `details`.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::ports::AdvancedSearchError;
use crate::domain::{
    CredentialsValidationError, Error, RideId, RideQueryError, RideStatus, RideValidationError,
    UserId, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidNumber,
    InvalidStatus,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

/// Unwrap a required query parameter.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

fn parse_uuid_like<T: std::str::FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.trim().parse::<T>().map_err(|_| {
        let name = field.as_str();
        ValidationError::new(field, format!("{name} must be a valid UUID"))
            .with_value(ErrorCode::InvalidUuid, value)
    })
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid_like(value, field)
}

pub(crate) fn parse_ride_id(value: &str, field: FieldName) -> Result<RideId, Error> {
    parse_uuid_like(value, field)
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let name = field.as_str();
        ValidationError::new(field, format!("{name} must be an ISO date (YYYY-MM-DD)"))
            .with_value(ErrorCode::InvalidDate, value)
    })
}

pub(crate) fn parse_number(value: &str, field: FieldName) -> Result<f64, Error> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| {
            let name = field.as_str();
            ValidationError::new(field, format!("{name} must be a finite number"))
                .with_value(ErrorCode::InvalidNumber, value)
        })
}

pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<RideStatus, Error> {
    value.parse::<RideStatus>().map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidStatus, value)
    })
}

pub(crate) fn map_ride_validation_error(err: RideValidationError) -> Error {
    let field = match &err {
        RideValidationError::BlankPickup => "pickupLocation",
        RideValidationError::BlankDrop => "dropLocation",
        RideValidationError::InvalidDistance => "distanceKm",
        RideValidationError::InvalidFare => "fare",
        RideValidationError::UnknownStatus { .. } => "status",
        RideValidationError::MissingDriver { .. } | RideValidationError::UnexpectedDriver => {
            "driverId"
        }
    };
    ValidationError::new(FieldName::new(field), err.to_string()).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let field = match &err {
        CredentialsValidationError::EmptyUsername
        | CredentialsValidationError::User(
            UserValidationError::EmptyUsername
            | UserValidationError::UsernameLength { .. }
            | UserValidationError::UsernameInvalidCharacters,
        ) => "username",
        CredentialsValidationError::User(UserValidationError::UnknownRole) => "role",
        CredentialsValidationError::EmptyPassword
        | CredentialsValidationError::PasswordTooShort { .. }
        | CredentialsValidationError::PasswordTooLong { .. } => "password",
    };
    ValidationError::new(FieldName::new(field), err.to_string()).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn map_advanced_search_error(err: AdvancedSearchError) -> Error {
    let field = match &err {
        AdvancedSearchError::Status(_) => "status",
        AdvancedSearchError::Query(RideQueryError::UnknownSortField { .. }) => "sort",
        AdvancedSearchError::Query(RideQueryError::PageSizeOutOfRange { .. }) => "size",
        AdvancedSearchError::Query(RideQueryError::NonFiniteDistance) => "distance",
    };
    ValidationError::new(FieldName::new(field), err.to_string()).with_code(ErrorCode::InvalidValue)
}
