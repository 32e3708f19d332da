//! Lenient access to nested JSON.
//!
//! A missing key or a `null` at any step reads as absent. A value that is
//! present but cannot be walked into (say a string where an object was
//! expected) is reported as [`TransformError::UnexpectedShape`].

use serde_json::Value;

use super::error::TransformError;

/// Follow `path` through nested objects starting at `root`.
///
/// Returns `Ok(None)` if any step is missing or `null`.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Result<Option<&'a Value>, TransformError> {
    let mut current = root;
    for (depth, key) in path.iter().enumerate() {
        let object = match current {
            Value::Null => return Ok(None),
            Value::Object(map) => map,
            _ => {
                return Err(TransformError::UnexpectedShape {
                    path: path[..depth].join("."),
                    expected: "object",
                });
            }
        };
        match object.get(*key) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }

    if current.is_null() {
        Ok(None)
    } else {
        Ok(Some(current))
    }
}

/// Read an optional identifier-like string.
///
/// Numbers are accepted and rendered in their JSON form, since TfL is not
/// consistent about quoting numeric identifiers.
pub fn optional_string(root: &Value, path: &[&str]) -> Result<Option<String>, TransformError> {
    match lookup(root, path)? {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(TransformError::UnexpectedShape {
            path: path.join("."),
            expected: "string",
        }),
    }
}

/// Read an array, treating an absent value as empty.
pub fn array_or_empty<'a>(root: &'a Value, path: &[&str]) -> Result<&'a [Value], TransformError> {
    match lookup(root, path)? {
        None => Ok(&[] as &[Value]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(TransformError::UnexpectedShape {
            path: path.join("."),
            expected: "array",
        }),
    }
}

/// Coerce a journey time component to an integer.
///
/// Accepts integers, floats (truncated toward zero), booleans, and strings
/// holding an integer with optional surrounding whitespace. Anything else,
/// including an absent value, is an error.
pub fn coerce_int(value: Option<&Value>, field: &'static str) -> Result<i64, TransformError> {
    let invalid = || TransformError::InvalidTimeComponent {
        field,
        value: value.map_or_else(|| "<missing>".to_string(), Value::to_string),
    };

    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                _ => Err(invalid()),
            }
        }
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid()),
        Some(Value::Bool(b)) => Ok(i64::from(*b)),
        _ => Err(invalid()),
    }
}
