//! Request validation rule tables
//!
//! Every request field is described by a [`FieldRules`] table: the message to
//! report when the field is absent, followed by an ordered list of
//! `(predicate, message)` rules. Evaluation of a field stops at its first
//! failing rule, but every field is evaluated, so one response reports all
//! offending fields at once.
//!
//! # Examples
//!
//! ```rust,ignore
//! use agro_server::features::shared::validation::{FieldRules, Rule, Validator};
//!
//! const CITY: FieldRules<str> = FieldRules {
//!     field: "city",
//!     required: "The city must be provided.",
//!     rules: &[Rule::new(at_most_chars::<25>, "The city must have at most 25 characters.")],
//! };
//!
//! let mut validator = Validator::new();
//! let city = validator.text(&CITY, Some("Tubarão".to_string()));
//! let city = validator.finish(|| city)?;
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Field name reported when the request body itself cannot be read
pub const BODY_FIELD: &str = "body";

/// One predicate over a field value together with the message reported when
/// it does not hold.
pub struct Rule<T: ?Sized> {
    pub check: fn(&T) -> bool,
    pub message: &'static str,
}

impl<T: ?Sized> Rule<T> {
    pub const fn new(check: fn(&T) -> bool, message: &'static str) -> Self {
        Self { check, message }
    }
}

/// Rule table for a single request field
pub struct FieldRules<T: ?Sized + 'static> {
    /// Name of the field as it appears in the request (camelCase)
    pub field: &'static str,
    /// Reported when the field is missing, null, or blank text
    pub required: &'static str,
    /// Checked in order once the field is present
    pub rules: &'static [Rule<T>],
}

impl<T: ?Sized + 'static> FieldRules<T> {
    fn first_violation(&self, value: &T) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| !(rule.check)(value))
            .map(|rule| rule.message)
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// All violations found in one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Shorthand for a single violation
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field,
                message: message.into(),
            }],
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Append the violations of another validation pass
    pub fn merge(&mut self, other: ValidationErrors) {
        self.violations.extend(other.violations);
    }

    /// Message of the first offending field
    pub fn first_message(&self) -> &str {
        self.violations
            .first()
            .map(|v| v.message.as_str())
            .unwrap_or("The request is not valid.")
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        if messages.is_empty() {
            f.write_str("The request is not valid.")
        } else {
            f.write_str(&messages.join(" "))
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl From<JsonRejection> for ValidationErrors {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self::single(
            BODY_FIELD,
            format!("The request body is not valid JSON: {}", rejection.body_text()),
        )
    }
}

impl From<PathRejection> for ValidationErrors {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected path parameters");
        Self::single("path", "The path parameters are not valid.")
    }
}

/// Collects violations while extracting validated values from a request
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a text field. Blank text counts as missing.
    ///
    /// Returns the value only when every rule passed.
    pub fn text(&mut self, rules: &FieldRules<str>, value: Option<String>) -> Option<String> {
        match value {
            Some(text) if !text.trim().is_empty() => match rules.first_violation(&text) {
                None => Some(text),
                Some(message) => self.reject(rules.field, message),
            },
            _ => self.reject(rules.field, rules.required),
        }
    }

    /// Validate any other field.
    ///
    /// Returns the value only when every rule passed.
    pub fn value<T: 'static>(&mut self, rules: &FieldRules<T>, value: Option<T>) -> Option<T> {
        match value {
            Some(value) => match rules.first_violation(&value) {
                None => Some(value),
                Some(message) => self.reject(rules.field, message),
            },
            None => self.reject(rules.field, rules.required),
        }
    }

    fn reject<T>(&mut self, field: &'static str, message: &str) -> Option<T> {
        self.errors.violations.push(FieldViolation {
            field,
            message: message.to_string(),
        });
        None
    }

    /// Finish validation.
    ///
    /// `build` assembles the validated value from the `Option`s returned by
    /// the field checks. It only runs when no violation was recorded, in
    /// which case every checked field is `Some`.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        build().ok_or(self.errors)
    }
}

// ============================================================================
// Predicates
// ============================================================================

static LETTERS_AND_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÀ-ÿ\s]+$").expect("letters regex is valid"));

static HYPHENATED_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zÀ-ÿ-]+(?:\s[A-Za-zÀ-ÿ-]+)*$").expect("hyphenated words regex is valid")
});

static HARVEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z\s-]+$").expect("harvest regex is valid"));

/// Letters (Latin-1 accents included) and whitespace, with at least one
/// whitespace separating a surname.
pub fn is_full_name(value: &str) -> bool {
    LETTERS_AND_SPACES.is_match(value) && value.chars().any(char::is_whitespace)
}

pub fn is_letters_and_spaces(value: &str) -> bool {
    LETTERS_AND_SPACES.is_match(value)
}

/// Words of letters and hyphens separated by single spaces
pub fn is_hyphenated_words(value: &str) -> bool {
    HYPHENATED_WORDS.is_match(value)
}

pub fn is_harvest(value: &str) -> bool {
    HARVEST.is_match(value)
}

/// Length limit counted in characters, not bytes
pub fn at_most_chars<const N: usize>(value: &str) -> bool {
    value.chars().count() <= N
}

/// Length limit of the upper-cased text, which can be longer (`ß` becomes `SS`)
pub fn at_most_upper_chars<const N: usize>(value: &str) -> bool {
    value.to_uppercase().chars().count() <= N
}

pub fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn fits_in_i64(value: &str) -> bool {
    value.parse::<i64>().is_ok()
}

pub fn is_non_negative(value: &Decimal) -> bool {
    *value >= Decimal::ZERO
}

/// Areas are stored as `NUMERIC(14, 2)`, which leaves twelve integer digits
pub const MAX_AREA_EXCLUSIVE: i64 = 1_000_000_000_000;

pub fn fits_area_column(value: &Decimal) -> bool {
    *value < Decimal::from(MAX_AREA_EXCLUSIVE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_common::area::has_at_most_two_decimals;
    use std::str::FromStr;

    const NAME: FieldRules<str> = FieldRules {
        field: "name",
        required: "name is required",
        rules: &[
            Rule::new(is_letters_and_spaces, "name has invalid characters"),
            Rule::new(at_most_chars::<5>, "name is too long"),
        ],
    };

    const AREA: FieldRules<Decimal> = FieldRules {
        field: "area",
        required: "area is required",
        rules: &[
            Rule::new(is_non_negative, "area is negative"),
            Rule::new(has_at_most_two_decimals, "area has too many decimals"),
        ],
    };

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_text_passes_all_rules() {
        let mut validator = Validator::new();
        let name = validator.text(&NAME, Some("Ana".to_string()));
        assert_eq!(validator.finish(|| name).unwrap(), "Ana");
    }

    #[test]
    fn test_missing_and_blank_text_report_required() {
        let mut validator = Validator::new();
        validator.text(&NAME, None);
        validator.text(&NAME, Some("   ".to_string()));
        let errors = validator.finish(|| Some(())).unwrap_err();

        assert_eq!(errors.violations().len(), 2);
        assert!(errors
            .violations()
            .iter()
            .all(|v| v.field == "name" && v.message == "name is required"));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let mut validator = Validator::new();
        // Fails both rules; only the first is reported.
        validator.text(&NAME, Some("Ana Maria 2".to_string()));
        let errors = validator.finish(|| Some(())).unwrap_err();

        assert_eq!(errors.violations().len(), 1);
        assert_eq!(errors.first_message(), "name has invalid characters");
    }

    #[test]
    fn test_every_field_is_reported() {
        let mut validator = Validator::new();
        validator.text(&NAME, Some("Abcdefg".to_string()));
        validator.value(&AREA, Some(dec("-1")));
        validator.value(&AREA, None);
        let errors = validator.finish(|| Some(())).unwrap_err();

        let messages: Vec<_> = errors.violations().iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["name is too long", "area is negative", "area is required"]
        );
        assert_eq!(
            errors.to_string(),
            "name is too long area is negative area is required"
        );
    }

    #[test]
    fn test_decimal_rules() {
        let mut validator = Validator::new();
        assert_eq!(validator.value(&AREA, Some(dec("10.55"))), Some(dec("10.55")));
        assert_eq!(validator.value(&AREA, Some(dec("10.555"))), None);
        assert_eq!(validator.value(&AREA, Some(Decimal::ZERO)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_full_name() {
        assert!(is_full_name("Gustavo Egidio Rigoni"));
        assert!(is_full_name("João Araújo"));
        assert!(!is_full_name("Gustavo"));
        assert!(!is_full_name("Gustavo R1goni"));
        assert!(!is_full_name("Ana-Maria Souza"));
    }

    #[test]
    fn test_hyphenated_words() {
        assert!(is_hyphenated_words("Feijão Vermelho"));
        assert!(is_hyphenated_words("Cana-de-açúcar"));
        assert!(!is_hyphenated_words("Soja  Transgênica"));
        assert!(!is_hyphenated_words(" Soja"));
        assert!(!is_hyphenated_words("Soja 2"));
    }

    #[test]
    fn test_harvest() {
        assert!(is_harvest("2021"));
        assert!(is_harvest("21-B"));
        assert!(!is_harvest("20/21"));
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(at_most_chars::<5>("Açaís"));
        assert!(!at_most_chars::<5>("Açaíss"));
    }

    #[test]
    fn test_upper_case_length() {
        assert!(at_most_upper_chars::<4>("ßß"));
        assert!(!at_most_upper_chars::<4>("ßßa"));
        assert!(at_most_chars::<4>("ßßa"));
    }

    #[test]
    fn test_area_column_limit() {
        assert!(fits_area_column(&dec("999999999999.99")));
        assert!(!fits_area_column(&dec("1000000000000")));
        assert!(!fits_area_column(&Decimal::from_scientific("5e28").unwrap()));
    }

    #[test]
    fn test_identifier_predicates() {
        assert!(is_ascii_digits("291"));
        assert!(!is_ascii_digits(""));
        assert!(!is_ascii_digits("-1"));
        assert!(!is_ascii_digits("1a"));
        assert!(fits_in_i64("9223372036854775807"));
        assert!(!fits_in_i64("9223372036854775808"));
    }

    #[test]
    fn test_single_and_merge() {
        let mut errors = ValidationErrors::single("producerId", "bad id");
        errors.merge(ValidationErrors::single("fullName", "bad name"));
        assert_eq!(errors.violations().len(), 2);
        assert_eq!(errors.first_message(), "bad id");
    }
}
