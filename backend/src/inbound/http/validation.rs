//! Shared validation helpers for inbound HTTP adapters.
//!
//! Validation failures are `invalid_request` errors whose `details` carry
//! the offending field and a machine-readable code.

use serde_json::json;

use crate::domain::{CardKey, CardKeyValidationError, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCode {
    MissingField,
    InvalidCardName,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidCardName => "invalid_card_name",
        }
    }
}

/// Wire name of a request field.
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
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    ValidationError::new(field, format!("missing required field: {}", field.as_str()))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_card_name_error(field: FieldName, reason: &CardKeyValidationError) -> Error {
    ValidationError::new(field, format!("{}: {reason}", field.as_str()))
        .with_code(ErrorCode::InvalidCardName)
}

/// Build a card key from a required name and an optional number.
///
/// A missing or blank name is `missing_field`; a name the key encoding
/// cannot carry is `invalid_card_name`.
pub(crate) fn parse_card_key(
    name: Option<&str>,
    number: Option<&str>,
    field: FieldName,
) -> Result<CardKey, Error> {
    let name = name
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))?;
    CardKey::new(name, number).map_err(|reason| match reason {
        CardKeyValidationError::EmptyName => missing_field_error(field),
        other => invalid_card_name_error(field, &other),
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;

    const NAME: FieldName = FieldName::new("name");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|value| value.get(key)).and_then(|value| value.as_str())
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_names_are_missing(#[case] name: Option<&str>) {
        let error = parse_card_key(name, Some("A-1"), NAME).expect_err("name is required");

        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(error.message(), "missing required field: name");
        assert_eq!(detail(&error, "field"), Some("name"));
        assert_eq!(detail(&error, "code"), Some("missing_field"));
    }

    #[rstest]
    fn delimiter_in_name_is_rejected() {
        let error = parse_card_key(Some("A|B"), None, NAME).expect_err("delimiter is reserved");

        assert_eq!(detail(&error, "code"), Some("invalid_card_name"));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(Some(" A-1 "), Some("A-1"))]
    fn numbers_are_trimmed_and_optional(
        #[case] number: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let key = parse_card_key(Some(" Jinx "), number, NAME).expect("valid key");

        assert_eq!(key.name(), "Jinx");
        assert_eq!(key.number(), expected);
    }
}
