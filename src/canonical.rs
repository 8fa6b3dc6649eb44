use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Canonicalizes a JSON value using the default [`Config`].
///
/// # Arguments
///
/// * `value` - The JSON value to canonicalize.
///
/// # Returns
///
/// The canonical string: no whitespace, object keys in descending UTF-16 order,
/// array elements in their original order.
pub fn canonicalize(value: &Value) -> Result<String> {
    canonicalize_with_config(value, &Config::default())
}

/// Canonicalizes a JSON value, rejecting nesting deeper than `config.max_depth`.
///
/// # Arguments
///
/// * `value` - The JSON value to canonicalize.
/// * `config` - Supplies the depth limit.
///
/// # Returns
///
/// The canonical string, or [`Error::TooDeep`] if the limit is exceeded.
pub fn canonicalize_with_config(value: &Value, config: &Config) -> Result<String> {
    let mut out = String::new();
    write_value(&mut out, value, 0, config.max_depth)?;

    log::trace!("Canonicalized {} bytes", out.len());

    Ok(out)
}

/// Serializes an object to a JSON value, then canonicalizes it.
///
/// # Arguments
///
/// * `obj` - The serializable object to canonicalize.
///
/// # Returns
///
/// The canonical string, or [`Error::UnsupportedValue`] if `obj` has no JSON
/// representation (for example a map with non-string keys).
pub fn canonicalize_serializable<T: Serialize + ?Sized>(obj: &T) -> Result<String> {
    let value = serde_json::to_value(obj).map_err(|e| Error::UnsupportedValue(e.to_string()))?;
    canonicalize(&value)
}

/// Orders object keys descending by UTF-16 code units.
fn compare_keys(a: &str, b: &str) -> Ordering {
    b.encode_utf16().cmp(a.encode_utf16())
}

fn write_value(out: &mut String, value: &Value, depth: usize, max_depth: usize) -> Result<()> {
    match value {
        Value::Number(n) => write_number(out, n)?,
        Value::Null | Value::Bool(_) | Value::String(_) => {
            write_scalar(out, value)?;
        }
        Value::Array(elements) => {
            let depth = descend(depth, max_depth)?;

            out.push('[');
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, element, depth, max_depth)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let depth = descend(depth, max_depth)?;

            let mut entries = map.iter().collect::<Vec<_>>();
            entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));

            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_scalar(out, key)?;
                out.push(':');
                write_value(out, value, depth, max_depth)?;
            }
            out.push('}');
        }
    }

    Ok(())
}

/// Largest integer magnitude an IEEE double represents exactly.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

// Integers beyond 2^53 render as the nearest double, as every number is a
// double in the canonical form.
fn write_number(out: &mut String, n: &Number) -> Result<()> {
    let exact = n
        .as_u64()
        .or_else(|| n.as_i64().map(i64::unsigned_abs))
        .is_some_and(|magnitude| magnitude <= MAX_SAFE_INTEGER);

    match n.as_f64() {
        Some(double) if !exact && !n.is_f64() => write_scalar(out, &double),
        _ => write_scalar(out, n),
    }
}

fn descend(depth: usize, max_depth: usize) -> Result<usize> {
    if depth >= max_depth {
        return Err(Error::TooDeep { max_depth });
    }
    Ok(depth + 1)
}

// Scalars use the RFC 8785 (JCS) literal encoding.
fn write_scalar<T: Serialize + ?Sized>(out: &mut String, scalar: &T) -> Result<()> {
    let literal =
        serde_jcs::to_string(scalar).map_err(|e| Error::UnsupportedValue(e.to_string()))?;
    out.push_str(&literal);
    Ok(())
}
