//! Constraint validators
//!
//! Enum membership, pattern, length, numeric bounds and item counts.
//! Each check is skipped when its keyword is absent.

use std::cmp::Ordering;

use regex::Regex;

use crate::schema::{FatalError, Schema, SchemaResult, ValidationError};
use crate::value::Value;

/// The value must equal one of `schema.enum`.
pub(crate) fn check_enum(value: &Value, schema: &Schema) -> Result<(), ValidationError> {
    let Some(allowed) = &schema.enum_values else {
        return Ok(());
    };
    if allowed.iter().any(|candidate| candidate.same_literal(value)) {
        return Ok(());
    }
    Err(ValidationError::InvalidEnumValue {
        value: value.clone(),
        allowed: allowed.clone(),
        reference: schema.object_reference.clone(),
    })
}

/// The string must contain a match for `schema.pattern` (unanchored).
///
/// A pattern that does not compile is fatal.
pub(crate) fn check_pattern(value: &str, schema: &Schema) -> SchemaResult<()> {
    let Some(pattern) = &schema.pattern else {
        return Ok(());
    };
    let regex = Regex::new(pattern).map_err(|source| FatalError::MalformedPattern {
        pattern: pattern.clone(),
        reference: schema.object_reference.clone(),
        source,
    })?;
    if regex.is_match(value) {
        return Ok(());
    }
    Err(ValidationError::InvalidPattern {
        value: Value::from(value),
        pattern: pattern.clone(),
        reference: schema.object_reference.clone(),
    }
    .into())
}

/// Length in Unicode scalar values; max is checked before min.
pub(crate) fn check_length(value: &str, schema: &Schema) -> Result<(), ValidationError> {
    let length = value.chars().count();

    if let Some(max_length) = schema.max_length {
        if length > max_length {
            return Err(ValidationError::MoreThanMaxLength {
                value: Value::from(value),
                max_length,
                reference: schema.object_reference.clone(),
            });
        }
    }
    if let Some(min_length) = schema.min_length {
        if length < min_length {
            return Err(ValidationError::LessThanMinLength {
                value: Value::from(value),
                min_length,
                reference: schema.object_reference.clone(),
            });
        }
    }
    Ok(())
}

/// `minimum`/`maximum` with their exclusive flags.
///
/// Integer values are compared exactly against integral bounds.
pub(crate) fn check_bounds(value: &Value, schema: &Schema) -> Result<(), ValidationError> {
    if let Some(minimum) = schema.minimum {
        let below = match compare_to_bound(value, minimum) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => schema.exclusive_minimum,
            _ => false,
        };
        if below {
            return Err(ValidationError::LessThanMinimum {
                value: value.clone(),
                minimum,
                exclusive: schema.exclusive_minimum,
                reference: schema.object_reference.clone(),
            });
        }
    }
    if let Some(maximum) = schema.maximum {
        let above = match compare_to_bound(value, maximum) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => schema.exclusive_maximum,
            _ => false,
        };
        if above {
            return Err(ValidationError::MoreThanMaximum {
                value: value.clone(),
                maximum,
                exclusive: schema.exclusive_maximum,
                reference: schema.object_reference.clone(),
            });
        }
    }
    Ok(())
}

fn compare_to_bound(value: &Value, bound: f64) -> Option<Ordering> {
    match value.as_integer() {
        // Every integral f64 below 2^127 converts to i128 without loss
        Some(exact) if bound.fract() == 0.0 && bound.abs() < 1.0e38 => {
            Some(exact.cmp(&(bound as i128)))
        }
        _ => value.as_f64()?.partial_cmp(&bound),
    }
}

pub(crate) fn check_item_count(value: &Value, count: usize, schema: &Schema) -> Result<(), ValidationError> {
    if let Some(max_items) = schema.max_items {
        if count > max_items {
            return Err(ValidationError::MoreThanMaxItems {
                value: value.clone(),
                max_items,
                reference: schema.object_reference.clone(),
            });
        }
    }
    if let Some(min_items) = schema.min_items {
        if count < min_items {
            return Err(ValidationError::LessThanMinItems {
                value: value.clone(),
                min_items,
                reference: schema.object_reference.clone(),
            });
        }
    }
    Ok(())
}

pub(crate) fn check_unique_items(value: &Value, items: &[Value], schema: &Schema) -> Result<(), ValidationError> {
    if !schema.unique_items {
        return Ok(());
    }
    for (i, item) in items.iter().enumerate() {
        if items[i + 1..].iter().any(|other| other.same_literal(item)) {
            return Err(ValidationError::NotUniqueItems {
                value: value.clone(),
                reference: schema.object_reference.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaError;
    use serde_json::json;

    #[test]
    fn test_enum_membership() {
        let schema = Schema::string().with_enum(["a", "b", "c"]);
        assert!(check_enum(&Value::from("b"), &schema).is_ok());

        let err = check_enum(&Value::from("d"), &schema).unwrap_err();
        match err {
            ValidationError::InvalidEnumValue { value, allowed, .. } => {
                assert_eq!(value, Value::from("d"));
                assert_eq!(allowed.len(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_enum_absent_allows_anything() {
        assert!(check_enum(&Value::from("anything"), &Schema::string()).is_ok());
    }

    #[test]
    fn test_pattern_is_containment() {
        let schema = Schema::string().with_pattern("[0-9]{3}");
        assert!(check_pattern("abc123def", &schema).is_ok());
        assert!(matches!(
            check_pattern("abc12", &schema),
            Err(SchemaError::Validation(ValidationError::InvalidPattern { .. }))
        ));

        let anchored = Schema::string().with_pattern("^[0-9]{3}$");
        assert!(check_pattern("abc123def", &anchored).is_err());
    }

    #[test]
    fn test_malformed_pattern_is_fatal() {
        let schema = Schema::string().with_pattern("([a-z]");
        let err = check_pattern("abc", &schema).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, SchemaError::Fatal(FatalError::MalformedPattern { .. })));
    }

    #[test]
    fn test_length_counts_scalars() {
        let schema = Schema::string().with_length(None, Some(3));
        assert!(check_length("héé", &schema).is_ok());
        assert!(matches!(
            check_length("héél", &schema),
            Err(ValidationError::MoreThanMaxLength { max_length: 3, .. })
        ));
    }

    #[test]
    fn test_max_checked_before_min() {
        // Contradictory bounds surface the max violation first
        let schema = Schema::string().with_length(Some(10), Some(2));
        assert!(matches!(
            check_length("abcd", &schema),
            Err(ValidationError::MoreThanMaxLength { .. })
        ));
        let schema = Schema::string().with_length(Some(3), None);
        assert!(matches!(
            check_length("ab", &schema),
            Err(ValidationError::LessThanMinLength { min_length: 3, .. })
        ));
    }

    #[test]
    fn test_bounds() {
        let mut schema = Schema::integer();
        schema.minimum = Some(1.0);
        schema.maximum = Some(10.0);
        assert!(check_bounds(&Value::from(1), &schema).is_ok());
        assert!(check_bounds(&Value::from(10), &schema).is_ok());
        assert!(check_bounds(&Value::from(json!(9.5)), &schema).is_ok());
        assert!(matches!(
            check_bounds(&Value::from(0), &schema),
            Err(ValidationError::LessThanMinimum { exclusive: false, .. })
        ));
        assert!(matches!(
            check_bounds(&Value::from(json!(0.5)), &schema),
            Err(ValidationError::LessThanMinimum { .. })
        ));

        schema.exclusive_maximum = true;
        assert!(matches!(
            check_bounds(&Value::from(10), &schema),
            Err(ValidationError::MoreThanMaximum { exclusive: true, .. })
        ));
    }

    #[test]
    fn test_integer_bounds_are_exact() {
        let mut schema = Schema::integer();
        schema.maximum = Some(9_007_199_254_740_992.0);
        let at = Value::from(json!(9007199254740992u64));
        let over = Value::from(json!(9007199254740993u64));

        assert!(check_bounds(&at, &schema).is_ok());
        assert!(matches!(
            check_bounds(&over, &schema),
            Err(ValidationError::MoreThanMaximum { .. })
        ));
    }

    #[test]
    fn test_large_integers_outside_enum_rejected() {
        let schema = Schema::integer().with_enum([Value::from(json!(9007199254740992u64))]);
        assert!(check_enum(&Value::from(json!(9007199254740992u64)), &schema).is_ok());
        assert!(matches!(
            check_enum(&Value::from(json!(9007199254740993u64)), &schema),
            Err(ValidationError::InvalidEnumValue { .. })
        ));

        let mut list = Schema::array(Schema::integer());
        list.unique_items = true;
        let items = Value::from(json!([9007199254740992u64, 9007199254740993u64]));
        assert!(check_unique_items(&items, items.as_array().unwrap(), &list).is_ok());
    }

    #[test]
    fn test_item_count_and_uniqueness() {
        let mut schema = Schema::array(Schema::integer());
        schema.max_items = Some(2);
        schema.unique_items = true;

        let items = Value::from(json!([1, 2, 3]));
        let list = items.as_array().unwrap();
        assert!(matches!(
            check_item_count(&items, list.len(), &schema),
            Err(ValidationError::MoreThanMaxItems { .. })
        ));

        let dupes = Value::from(json!([1, 1.0]));
        assert!(matches!(
            check_unique_items(&dupes, dupes.as_array().unwrap(), &schema),
            Err(ValidationError::NotUniqueItems { .. })
        ));
    }
}
