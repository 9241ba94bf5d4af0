//! Farm and cultivation field rules

use agro_common::area::has_at_most_two_decimals;
use agro_common::StateCode;
use rust_decimal::Decimal;

use crate::features::shared::validation::{
    at_most_chars, at_most_upper_chars, fits_area_column, is_harvest, is_hyphenated_words,
    is_letters_and_spaces, is_non_negative, FieldRules, Rule,
};

/// Rule table for a non-negative area with at most two decimal places that
/// fits the area columns
macro_rules! area_field {
    ($field:literal, $label:literal) => {
        FieldRules {
            field: $field,
            required: concat!("The ", $label, " must be provided."),
            rules: &[
                Rule::new(is_non_negative, concat!("The ", $label, " cannot be negative.")),
                Rule::new(
                    fits_area_column,
                    concat!("The ", $label, " must be less than 1000000000000."),
                ),
                Rule::new(
                    has_at_most_two_decimals,
                    concat!("The ", $label, " must have at most 2 decimal places."),
                ),
            ],
        }
    };
}

pub const FARM_NAME: FieldRules<str> = FieldRules {
    field: "farmName",
    required: "The farm name must be provided.",
    rules: &[
        Rule::new(at_most_chars::<100>, "The farm name must have at most 100 characters."),
        Rule::new(is_letters_and_spaces, "The farm name must contain only letters and spaces."),
    ],
};

pub const FARM_PRODUCER_ID: FieldRules<i64> = FieldRules {
    field: "producerId",
    required: "The producer that owns the farm must be provided.",
    rules: &[],
};

pub const CITY: FieldRules<str> = FieldRules {
    field: "city",
    required: "The city must be provided.",
    rules: &[Rule::new(at_most_chars::<25>, "The city must have at most 25 characters.")],
};

fn is_state_code(value: &str) -> bool {
    value.parse::<StateCode>().is_ok()
}

pub const STATE: FieldRules<str> = FieldRules {
    field: "state",
    required: "The state must be provided.",
    rules: &[Rule::new(is_state_code, "The state provided is not valid.")],
};

pub const TOTAL_AREA: FieldRules<Decimal> = area_field!("totalArea", "total area");
pub const CULTIVABLE_AREA: FieldRules<Decimal> = area_field!("cultivableArea", "cultivable area");
pub const PRESERVED_AREA: FieldRules<Decimal> = area_field!("preservedArea", "preserved area");

pub const CULTIVATION_NAME: FieldRules<str> = FieldRules {
    field: "cultivationName",
    required: "The cultivation name must be provided.",
    rules: &[
        Rule::new(
            at_most_upper_chars::<50>,
            "The cultivation name must have at most 50 characters.",
        ),
        Rule::new(
            is_hyphenated_words,
            "The cultivation name must contain only letters, spaces and hyphens.",
        ),
    ],
};

pub const CULTIVATION_FARM_ID: FieldRules<i64> = FieldRules {
    field: "farmId",
    required: "The farm of the cultivation must be provided.",
    rules: &[],
};

pub const CULTIVATED_AREA: FieldRules<Decimal> = area_field!("cultivatedArea", "cultivated area");

pub const HARVEST: FieldRules<str> = FieldRules {
    field: "harvest",
    required: "The harvest must be provided.",
    rules: &[
        Rule::new(at_most_chars::<4>, "The harvest must have at most 4 characters."),
        Rule::new(is_harvest, "The harvest provided is not valid."),
    ],
};
