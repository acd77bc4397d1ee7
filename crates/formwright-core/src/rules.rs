//! Validation rule evaluation for one field.
//!
//! [`evaluate_field`] is a pure function of a field definition and its
//! current string value. Checks run in a fixed order and every failing check
//! overwrites the previous failure, so the last applicable failure wins.
//! Calling code relies on this fold; short-circuiting on the first failure
//! would change which message surfaces.
//!
//! Check order:
//! 1. required (checkbox: value must be `"true"`; otherwise trimmed non-empty)
//! 2. minLength (text, textarea)
//! 3. maxLength (text, textarea)
//! 4. email shape (text, non-empty values only)
//! 5. password rule (text, non-empty values only)
//! 6. minNumber / maxNumber (number, non-empty parseable values only)
//! 7. minDate / maxDate (date, non-empty parseable values only)
//!
//! Malformed numeric or date input never raises an error here; a value that
//! does not parse is passed through unchecked.

use once_cell::sync::Lazy;
use regex::Regex;
use time::format_description::well_known::Iso8601;
use time::Date;

use crate::model::{FieldDefinition, TypedRules, CHECKBOX_TRUE};

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Evaluate every applicable rule for a non-derived field against `value`.
///
/// Returns the last failing check's message, or `None` when all checks pass.
/// Derived fields are always exempt.
pub fn evaluate_field(field: &FieldDefinition, value: &str) -> Option<String> {
    if field.is_derived {
        return None;
    }

    let mut failure = None;

    if field.is_required() {
        let missing = if field.field_type == crate::model::FieldType::Checkbox {
            value != CHECKBOX_TRUE
        } else {
            value.trim().is_empty()
        };
        if missing {
            failure = Some(format!("{} is required", field.error_label()));
        }
    }

    let typed = field
        .validations
        .clone()
        .unwrap_or_default()
        .typed(field.field_type);

    match typed {
        TypedRules::Text {
            min_length,
            max_length,
            email,
            password,
        } => {
            check_length(field, value, min_length, max_length, &mut failure);
            if email && !value.is_empty() && !EMAIL_SHAPE.is_match(value) {
                failure = Some(format!("{} must be a valid email", field.label));
            }
            if password && !value.is_empty() && !password_ok(value) {
                failure = Some(format!(
                    "{} must be at least 8 characters and contain a number",
                    field.label
                ));
            }
        }
        TypedRules::Textarea {
            min_length,
            max_length,
        } => {
            check_length(field, value, min_length, max_length, &mut failure);
        }
        TypedRules::Number { min, max } => {
            if let Ok(n) = value.trim().parse::<f64>() {
                if let Some(min) = min {
                    if n < min {
                        failure = Some(format!(
                            "{} must be at least {}",
                            field.label,
                            fmt_bound(min)
                        ));
                    }
                }
                if let Some(max) = max {
                    if n > max {
                        failure = Some(format!(
                            "{} must be at most {}",
                            field.label,
                            fmt_bound(max)
                        ));
                    }
                }
            }
        }
        TypedRules::Date { min, max } => {
            if let Some(d) = parse_date(value) {
                if let Some(bound) = min.as_deref().and_then(parse_date_ref) {
                    if d < bound {
                        failure = Some(format!(
                            "{} must be on or after {}",
                            field.label,
                            min.as_deref().unwrap_or_default()
                        ));
                    }
                }
                if let Some(bound) = max.as_deref().and_then(parse_date_ref) {
                    if d > bound {
                        failure = Some(format!(
                            "{} must be on or before {}",
                            field.label,
                            max.as_deref().unwrap_or_default()
                        ));
                    }
                }
            }
        }
        TypedRules::Unconstrained => {}
    }

    failure
}

fn check_length(
    field: &FieldDefinition,
    value: &str,
    min_length: Option<u32>,
    max_length: Option<u32>,
    failure: &mut Option<String>,
) {
    let len = value.chars().count();
    if let Some(min) = min_length {
        if len < min as usize {
            *failure = Some(format!(
                "{} must be at least {} characters",
                field.label, min
            ));
        }
    }
    if let Some(max) = max_length {
        if len > max as usize {
            *failure = Some(format!("{} must be at most {} characters", field.label, max));
        }
    }
}

fn password_ok(value: &str) -> bool {
    value.chars().count() >= 8 && value.chars().any(|c| c.is_ascii_digit())
}

fn parse_date(value: &str) -> Option<Date> {
    if value.trim().is_empty() {
        return None;
    }
    Date::parse(value.trim(), &Iso8601::DEFAULT).ok()
}

fn parse_date_ref(value: &str) -> Option<Date> {
    Date::parse(value, &Iso8601::DEFAULT).ok()
}

fn fmt_bound(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, ValidationRules};

    fn field(field_type: FieldType, label: &str) -> FieldDefinition {
        let mut f = FieldDefinition::new(field_type);
        f.label = label.to_string();
        f
    }

    #[test]
    fn required_text_fails_on_whitespace() {
        let mut f = field(FieldType::Text, "Name");
        f.required = true;
        assert_eq!(evaluate_field(&f, "   "), Some("Name is required".to_string()));
        assert_eq!(evaluate_field(&f, "Ann"), None);
    }

    #[test]
    fn required_without_label_uses_fallback() {
        let mut f = field(FieldType::Text, "");
        f.required = true;
        assert_eq!(evaluate_field(&f, ""), Some("Field is required".to_string()));
    }

    #[test]
    fn required_checkbox_only_accepts_true() {
        let mut f = field(FieldType::Checkbox, "Terms");
        f.required = true;
        assert_eq!(
            evaluate_field(&f, "false"),
            Some("Terms is required".to_string())
        );
        assert_eq!(evaluate_field(&f, "true"), None);
    }

    #[test]
    fn required_is_skipped_for_derived_fields() {
        let mut f = field(FieldType::Text, "Total");
        f.required = true;
        f.is_derived = true;
        assert_eq!(evaluate_field(&f, ""), None);
    }

    #[test]
    fn length_bounds_three_to_five() {
        let mut f = field(FieldType::Text, "Code");
        f.validations = Some(ValidationRules {
            min_length: Some(3),
            max_length: Some(5),
            ..ValidationRules::default()
        });
        assert_eq!(
            evaluate_field(&f, "ab"),
            Some("Code must be at least 3 characters".to_string())
        );
        assert_eq!(
            evaluate_field(&f, "abcdef"),
            Some("Code must be at most 5 characters".to_string())
        );
        for ok in ["abc", "abcd", "abcde"] {
            assert_eq!(evaluate_field(&f, ok), None, "length {}", ok.len());
        }
    }

    #[test]
    fn email_shape_check() {
        let mut f = field(FieldType::Text, "Email");
        f.validations = Some(ValidationRules {
            email: Some(true),
            ..ValidationRules::default()
        });
        assert_eq!(evaluate_field(&f, "a@b.com"), None);
        assert_eq!(
            evaluate_field(&f, "abc"),
            Some("Email must be a valid email".to_string())
        );
        // Optional unless also required.
        assert_eq!(evaluate_field(&f, ""), None);
    }

    #[test]
    fn password_rule() {
        let mut f = field(FieldType::Text, "Password");
        f.validations = Some(ValidationRules {
            password: Some(true),
            ..ValidationRules::default()
        });
        assert_eq!(evaluate_field(&f, "abcdefg1"), None);
        assert_eq!(
            evaluate_field(&f, "abcdefgh"),
            Some("Password must be at least 8 characters and contain a number".to_string())
        );
        assert_eq!(
            evaluate_field(&f, "ab1"),
            Some("Password must be at least 8 characters and contain a number".to_string())
        );
    }

    #[test]
    fn later_failure_overwrites_earlier_one() {
        // Empty value fails required, then minLength; the fold keeps the
        // min-length message because it runs later.
        let mut f = field(FieldType::Text, "Code");
        f.required = true;
        f.validations = Some(ValidationRules {
            min_length: Some(3),
            ..ValidationRules::default()
        });
        assert_eq!(
            evaluate_field(&f, ""),
            Some("Code must be at least 3 characters".to_string())
        );
    }

    #[test]
    fn number_bounds() {
        let mut f = field(FieldType::Number, "Age");
        f.validations = Some(ValidationRules {
            min_number: Some(0.0),
            max_number: Some(100.0),
            ..ValidationRules::default()
        });
        assert_eq!(
            evaluate_field(&f, "-1"),
            Some("Age must be at least 0".to_string())
        );
        assert_eq!(
            evaluate_field(&f, "101"),
            Some("Age must be at most 100".to_string())
        );
        assert_eq!(evaluate_field(&f, "50"), None);
        // Malformed numeric strings never error.
        assert_eq!(evaluate_field(&f, "abc"), None);
        assert_eq!(evaluate_field(&f, ""), None);
    }

    #[test]
    fn date_bounds() {
        let mut f = field(FieldType::Date, "Start");
        f.validations = Some(ValidationRules {
            min_date: Some("2024-01-01".to_string()),
            max_date: Some("2024-12-31".to_string()),
            ..ValidationRules::default()
        });
        assert_eq!(
            evaluate_field(&f, "2023-12-31"),
            Some("Start must be on or after 2024-01-01".to_string())
        );
        assert_eq!(
            evaluate_field(&f, "2025-01-01"),
            Some("Start must be on or before 2024-12-31".to_string())
        );
        assert_eq!(evaluate_field(&f, "2024-06-15"), None);
        assert_eq!(evaluate_field(&f, "not-a-date"), None);
    }

    #[test]
    fn inapplicable_keys_are_ignored() {
        // minLength stored on a number field must not fire.
        let mut f = field(FieldType::Number, "Age");
        f.validations = Some(ValidationRules {
            min_length: Some(10),
            ..ValidationRules::default()
        });
        assert_eq!(evaluate_field(&f, "5"), None);
    }

    #[test]
    fn length_counts_scalar_values() {
        let mut f = field(FieldType::Text, "Name");
        f.validations = Some(ValidationRules {
            min_length: Some(3),
            ..ValidationRules::default()
        });
        assert_eq!(evaluate_field(&f, "héé"), None);
    }
}
