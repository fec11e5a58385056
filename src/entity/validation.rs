//! Field rule table and the validator that enforces it on incoming JSON bodies.

use crate::error::AppError;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug)]
pub enum Rule {
    /// Present, non-null and not an empty string.
    Required(&'static str),
    Text,
    /// Maximum length in characters.
    MaxLength(usize),
    Integer,
    Minimum(f64, &'static str),
    Maximum(f64, &'static str),
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

impl FieldRules {
    fn required(&self) -> Option<&'static str> {
        self.rules.iter().find_map(|r| match r {
            Rule::Required(message) => Some(*message),
            _ => None,
        })
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Checks `body` against every field's rules and reports all failures at once.
    /// Fields without a `Required` rule are optional: absent or null skips their checks.
    pub fn validate(body: &Map<String, Value>, table: &[FieldRules]) -> Result<(), AppError> {
        let mut failures = Vec::new();
        for field in table {
            let value = body.get(field.field).filter(|v| !v.is_null());
            match value {
                None => {
                    if let Some(message) = field.required() {
                        failures.push(message.to_string());
                    }
                }
                Some(v) => {
                    if let Err(message) = check_field(field, v) {
                        failures.push(message);
                    }
                }
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(failures.join(", ")))
        }
    }
}

fn check_field(field: &FieldRules, v: &Value) -> Result<(), String> {
    let name = field.field;
    for rule in field.rules {
        match *rule {
            Rule::Required(message) => {
                if v.as_str().is_some_and(str::is_empty) {
                    return Err(message.to_string());
                }
            }
            Rule::Text => {
                if !v.is_string() {
                    return Err(format!("{} must be a string", name));
                }
            }
            Rule::MaxLength(max) => {
                if let Some(s) = v.as_str() {
                    if s.chars().count() > max {
                        return Err(format!("{} must be at most {} characters", name, max));
                    }
                }
            }
            Rule::Integer => {
                if v.as_i64().is_none() {
                    return Err(format!("{} must be an integer", name));
                }
            }
            Rule::Minimum(min, message) => match v.as_f64() {
                Some(n) if n < min => return Err(message.to_string()),
                Some(_) => {}
                None => return Err(format!("{} must be a number", name)),
            },
            Rule::Maximum(max, message) => match v.as_f64() {
                Some(n) if n > max => return Err(message.to_string()),
                Some(_) => {}
                None => return Err(format!("{} must be a number", name)),
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[FieldRules] = &[
        FieldRules {
            field: "name",
            rules: &[Rule::Required("Name is Required"), Rule::Text, Rule::MaxLength(3)],
        },
        FieldRules {
            field: "score",
            rules: &[Rule::Minimum(1.0, "too low"), Rule::Maximum(5.0, "too high")],
        },
    ];

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn message(body: Value) -> String {
        match RequestValidator::validate(&obj(body), RULES) {
            Err(AppError::Validation(m)) => m,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn missing_null_and_empty_required_fail() {
        assert_eq!(message(json!({})), "Name is Required");
        assert_eq!(message(json!({"name": null})), "Name is Required");
        assert_eq!(message(json!({"name": ""})), "Name is Required");
    }

    #[test]
    fn optional_field_may_be_absent_or_null() {
        assert!(RequestValidator::validate(&obj(json!({"name": "abc"})), RULES).is_ok());
        assert!(RequestValidator::validate(&obj(json!({"name": "abc", "score": null})), RULES).is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(RequestValidator::validate(&obj(json!({"name": "a", "score": 1.0})), RULES).is_ok());
        assert!(RequestValidator::validate(&obj(json!({"name": "a", "score": 5})), RULES).is_ok());
        assert_eq!(message(json!({"name": "a", "score": 0.99})), "too low");
        assert_eq!(message(json!({"name": "a", "score": 5.01})), "too high");
    }

    #[test]
    fn max_length_counts_characters() {
        assert!(RequestValidator::validate(&obj(json!({"name": "äöü"})), RULES).is_ok());
        assert_eq!(message(json!({"name": "abcd"})), "name must be at most 3 characters");
    }

    #[test]
    fn reports_every_failing_field() {
        assert_eq!(message(json!({"name": 7, "score": "high"})), "name must be a string, score must be a number");
    }
}
