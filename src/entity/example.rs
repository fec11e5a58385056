//! The joke record and its write payload.

use crate::entity::validation::{FieldRules, RequestValidator, Rule};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_AVERAGE_RATING: f64 = 3.0;
pub const DEFAULT_RATING_COUNT: i32 = 1;
pub const TYPE_MAX_LENGTH: usize = 20;

/// Rule set per field, checked before any write reaches a store.
pub const EXAMPLE_RULES: &[FieldRules] = &[
    FieldRules {
        field: "type",
        rules: &[Rule::Text, Rule::MaxLength(TYPE_MAX_LENGTH)],
    },
    FieldRules {
        field: "setup",
        rules: &[Rule::Required("Setup is Required"), Rule::Text],
    },
    FieldRules {
        field: "punchline",
        rules: &[Rule::Required("Punchline is Required"), Rule::Text],
    },
    FieldRules {
        field: "averageRating",
        rules: &[
            Rule::Minimum(1.0, "Lowest rating possible is 1.0"),
            Rule::Maximum(5.0, "Highest rating possible is 5.0"),
        ],
    },
    FieldRules {
        field: "ratingCount",
        rules: &[Rule::Integer, Rule::Minimum(1.0, "Lowest Rating Count is 1")],
    },
];

/// A persisted joke. Column names mirror the JSON field names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
    pub setup: String,
    pub punchline: String,
    #[sqlx(rename = "averageRating")]
    pub average_rating: f64,
    #[sqlx(rename = "ratingCount")]
    pub rating_count: i32,
}

/// Validated body of a create or update request. A client-supplied `id` is ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleDraft {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub setup: String,
    pub punchline: String,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<i32>,
}

impl ExampleDraft {
    /// An absent body validates as `{}`, so the field messages are reported.
    pub fn from_json(body: Option<Value>) -> Result<Self, AppError> {
        let body = match body {
            Some(Value::Object(map)) => map,
            None => serde_json::Map::new(),
            Some(_) => return Err(AppError::BadRequest("body must be a JSON object".into())),
        };
        RequestValidator::validate(&body, EXAMPLE_RULES)?;
        serde_json::from_value(Value::Object(body)).map_err(|e| AppError::Validation(e.to_string()))
    }
}

impl Example {
    /// New record from a draft, filling rating defaults.
    pub fn create(id: i32, draft: ExampleDraft) -> Self {
        Example {
            id,
            kind: draft.kind,
            setup: draft.setup,
            punchline: draft.punchline,
            average_rating: draft.average_rating.unwrap_or(DEFAULT_AVERAGE_RATING),
            rating_count: draft.rating_count.unwrap_or(DEFAULT_RATING_COUNT),
        }
    }

    /// Whole-record replace. Rating fields absent from the draft keep their stored values.
    pub fn replace_with(&mut self, draft: ExampleDraft) {
        self.kind = draft.kind;
        self.setup = draft.setup;
        self.punchline = draft.punchline;
        if let Some(rating) = draft.average_rating {
            self.average_rating = rating;
        }
        if let Some(count) = draft.rating_count {
            self.rating_count = count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(v: Value) -> Result<ExampleDraft, AppError> {
        ExampleDraft::from_json(Some(v))
    }

    fn validation_message(v: Value) -> String {
        match draft(v) {
            Err(AppError::Validation(m)) => m,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_full_record() {
        let d = draft(json!({
            "type": "general", "setup": "Why?", "punchline": "Because.",
            "averageRating": 4.0, "ratingCount": 2
        }))
        .unwrap();
        assert_eq!(d.kind.as_deref(), Some("general"));
        assert_eq!(d.average_rating, Some(4.0));
        assert_eq!(d.rating_count, Some(2));
    }

    #[test]
    fn empty_setup_or_punchline_rejected() {
        assert_eq!(validation_message(json!({"setup": "", "punchline": "x"})), "Setup is Required");
        assert_eq!(validation_message(json!({"setup": "x", "punchline": ""})), "Punchline is Required");
        assert_eq!(
            validation_message(json!({})),
            "Setup is Required, Punchline is Required"
        );
    }

    #[test]
    fn rating_bounds() {
        let base = |rating: f64| json!({"setup": "a", "punchline": "b", "averageRating": rating});
        assert!(draft(base(1.0)).is_ok());
        assert!(draft(base(5.0)).is_ok());
        assert_eq!(validation_message(base(0.5)), "Lowest rating possible is 1.0");
        assert_eq!(validation_message(base(6.0)), "Highest rating possible is 5.0");
    }

    #[test]
    fn rating_count_must_be_positive_integer() {
        let base = |count: Value| json!({"setup": "a", "punchline": "b", "ratingCount": count});
        assert!(draft(base(json!(1))).is_ok());
        assert_eq!(validation_message(base(json!(0))), "Lowest Rating Count is 1");
        assert_eq!(validation_message(base(json!(1.5))), "ratingCount must be an integer");
    }

    #[test]
    fn type_longer_than_twenty_rejected() {
        let long = "x".repeat(21);
        assert_eq!(
            validation_message(json!({"type": long, "setup": "a", "punchline": "b"})),
            "type must be at most 20 characters"
        );
    }

    #[test]
    fn non_object_body_is_bad_request() {
        assert!(matches!(draft(json!([1, 2])), Err(AppError::BadRequest(_))));
        assert!(matches!(draft(json!("text")), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn absent_body_reports_required_fields() {
        match ExampleDraft::from_json(None) {
            Err(AppError::Validation(m)) => assert_eq!(m, "Setup is Required, Punchline is Required"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_fills_defaults_and_replace_keeps_ratings() {
        let d = draft(json!({"setup": "a", "punchline": "b"})).unwrap();
        let mut example = Example::create(7, d);
        assert_eq!(example.average_rating, DEFAULT_AVERAGE_RATING);
        assert_eq!(example.rating_count, DEFAULT_RATING_COUNT);

        example.replace_with(draft(json!({"setup": "c", "punchline": "d", "ratingCount": 4})).unwrap());
        assert_eq!(example.id, 7);
        assert_eq!(example.setup, "c");
        assert_eq!(example.average_rating, DEFAULT_AVERAGE_RATING);
        assert_eq!(example.rating_count, 4);
    }

    #[test]
    fn serializes_with_wire_names() {
        let example = Example::create(
            1,
            draft(json!({"type": "pun", "setup": "a", "punchline": "b"})).unwrap(),
        );
        let v = serde_json::to_value(&example).unwrap();
        assert_eq!(v["id"], 1);
        assert_eq!(v["type"], "pun");
        assert_eq!(v["averageRating"], 3.0);
        assert_eq!(v["ratingCount"], 1);
    }
}
