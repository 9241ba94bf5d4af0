//! Producer field rules shared by the create, update and delete commands

use agro_common::document::is_valid_document;

use crate::features::shared::validation::{
    at_most_chars, fits_in_i64, is_ascii_digits, is_full_name, FieldRules, Rule, Validator,
};
use crate::models::NewProducer;

pub const FULL_NAME: FieldRules<str> = FieldRules {
    field: "fullName",
    required: "The producer's full name must be provided.",
    rules: &[
        Rule::new(
            is_full_name,
            "The producer's full name must contain only letters and must include a surname.",
        ),
        Rule::new(
            at_most_chars::<75>,
            "The producer's full name must have at most 75 characters.",
        ),
    ],
};

pub const DOCUMENT: FieldRules<str> = FieldRules {
    field: "document",
    required: "The producer's document (CPF/CNPJ) must be provided.",
    rules: &[Rule::new(
        is_valid_document,
        "The document provided is not a valid CPF or CNPJ.",
    )],
};

/// `producerId` path segment
pub const PRODUCER_ID: FieldRules<str> = FieldRules {
    field: "producerId",
    required: "The producer identifier must be provided.",
    rules: &[
        Rule::new(is_ascii_digits, "The producer identifier is not of a valid type."),
        Rule::new(fits_in_i64, "The producer identifier is not of a valid type."),
    ],
};

/// Check the body fields of a producer write
pub fn check_producer_fields(
    validator: &mut Validator,
    full_name: Option<String>,
    document: Option<String>,
) -> Option<NewProducer> {
    let full_name = validator.text(&FULL_NAME, full_name);
    let document = validator.text(&DOCUMENT, document);

    Some(NewProducer {
        full_name: full_name?,
        document: document?,
    })
}

/// Check a raw `producerId` path segment
pub fn check_producer_id(validator: &mut Validator, raw: String) -> Option<i64> {
    validator
        .text(&PRODUCER_ID, Some(raw))
        .and_then(|id| id.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_fields() {
        let mut validator = Validator::new();
        let producer = check_producer_fields(
            &mut validator,
            Some("Gustavo Egidio Rigoni".to_string()),
            Some("46751972059".to_string()),
        );
        let producer = validator.finish(|| producer).unwrap();
        assert_eq!(producer.document, "46751972059");
    }

    #[test]
    fn test_every_invalid_field_is_reported() {
        let mut validator = Validator::new();
        check_producer_fields(
            &mut validator,
            Some("Gustavo".to_string()),
            Some("46751972052".to_string()),
        );
        let errors = validator.finish(|| Some(())).unwrap_err();

        let fields: Vec<_> = errors.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["fullName", "document"]);
        assert_eq!(
            errors.violations()[1].message,
            "The document provided is not a valid CPF or CNPJ."
        );
    }

    #[test]
    fn test_long_name_is_rejected() {
        let mut validator = Validator::new();
        let name = format!("{} {}", "A".repeat(40), "B".repeat(40));
        check_producer_fields(&mut validator, Some(name), Some("46751972059".to_string()));
        let errors = validator.finish(|| Some(())).unwrap_err();
        assert_eq!(
            errors.first_message(),
            "The producer's full name must have at most 75 characters."
        );
    }

    #[test]
    fn test_producer_id() {
        for (raw, expected) in [
            ("291", Some(291)),
            ("abc", None),
            ("-1", None),
            ("1.5", None),
            ("99999999999999999999", None),
        ] {
            let mut validator = Validator::new();
            assert_eq!(check_producer_id(&mut validator, raw.to_string()), expected, "{raw}");
        }
    }
}
