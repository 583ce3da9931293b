use crate::errors::{ValidationError, DomainResult, DomainError};
use regex::Regex;
use std::sync::OnceLock;

/// A trait that entities should implement for validation.
pub trait Validate {
    /// Validates the entity and returns an error if validation fails.
    fn validate(&self) -> DomainResult<()>;
}

fn http_url_regex() -> &'static Regex {
    static HTTP_URL_REGEX: OnceLock<Regex> = OnceLock::new();
    HTTP_URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap())
}

fn currency_code_regex() -> &'static Regex {
    static CURRENCY_CODE_REGEX: OnceLock<Regex> = OnceLock::new();
    CURRENCY_CODE_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z]{3}$").unwrap())
}

/// Struct for configuring validations in a fluent style
#[derive(Default)]
pub struct ValidationBuilder<T> {
    field_name: String,
    value: Option<T>,
    errors: Vec<ValidationError>,
}

/// Generic validation implementations
impl<T> ValidationBuilder<T> {
    pub fn new(field_name: &str, value: Option<T>) -> Self {
        Self {
            field_name: field_name.to_string(),
            value,
            errors: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self
    where T: Default + PartialEq {
        if self.value.is_none() || self.value == Some(T::default()) {
            self.errors.push(ValidationError::required(&self.field_name));
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> DomainResult<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(DomainError::Validation(first)),
        }
    }
}

/// String-specific validations
impl ValidationBuilder<String> {
    pub fn matches_pattern(mut self, pattern: &Regex, message: &str) -> Self {
        if let Some(value) = &self.value {
            if !pattern.is_match(value) {
                self.errors.push(ValidationError::format(&self.field_name, message));
            }
        }
        self
    }

    pub fn http_url(self) -> Self {
        self.matches_pattern(http_url_regex(), "must be an http(s) URL")
    }

    pub fn currency_code(self) -> Self {
        self.matches_pattern(currency_code_regex(), "must be a 3-letter currency code")
    }
}

/// Numeric validations
impl<T> ValidationBuilder<T>
where T: PartialOrd + Clone + std::fmt::Display
{
    pub fn min(mut self, min: T) -> Self {
        if let Some(value) = &self.value {
            if value < &min {
                self.errors.push(ValidationError::invalid_value(
                    &self.field_name,
                    &format!("must be at least {}", min),
                ));
            }
        }
        self
    }
}

pub mod common {
    use super::*;
    use crate::utils::parse_date_bound;

    /// Date filters accept `YYYY-MM-DD` or a full ISO 8601 timestamp.
    pub fn validate_date_bound(value: &str, field_name: &str) -> DomainResult<()> {
        match parse_date_bound(value) {
            Some(_) => Ok(()),
            None => Err(DomainError::Validation(ValidationError::format(
                field_name,
                "must be a date (YYYY-MM-DD) or an ISO 8601 timestamp",
            ))),
        }
    }
}
