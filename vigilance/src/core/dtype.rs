//! Column dtype tokens and the vocabulary accepted in dtype conditions.
//!
//! Arrow types are rendered as short dtype tokens so that a schema can
//! declare `["float64", "int64", "category"]` without naming Arrow types.

use arrow::datatypes::{DataType, TimeUnit};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// The dtype tokens a dtype condition may name.
pub const RECOGNIZED_DTYPES: [&str; 9] = [
    "int16",
    "int32",
    "int64",
    "float16",
    "float32",
    "float64",
    "category",
    "object",
    "datetime64[ns]",
];

static RECOGNIZED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RECOGNIZED_DTYPES.iter().copied().collect());

/// Returns true if `token` belongs to the dtype condition vocabulary.
pub fn is_recognized(token: &str) -> bool {
    RECOGNIZED.contains(token)
}

fn unit_suffix(unit: &TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Second => "s",
        TimeUnit::Millisecond => "ms",
        TimeUnit::Microsecond => "us",
        TimeUnit::Nanosecond => "ns",
    }
}

/// Renders an Arrow data type as a dtype token.
///
/// # Examples
///
/// ```rust
/// use arrow::datatypes::{DataType, TimeUnit};
/// use vigilance::core::dtype_token;
///
/// assert_eq!(dtype_token(&DataType::Float64), "float64");
/// assert_eq!(dtype_token(&DataType::Utf8), "object");
/// assert_eq!(
///     dtype_token(&DataType::Timestamp(TimeUnit::Nanosecond, None)),
///     "datetime64[ns]"
/// );
/// ```
pub fn dtype_token(data_type: &DataType) -> String {
    match data_type {
        DataType::Boolean => "bool".to_string(),
        DataType::Int8 => "int8".to_string(),
        DataType::Int16 => "int16".to_string(),
        DataType::Int32 => "int32".to_string(),
        DataType::Int64 => "int64".to_string(),
        DataType::UInt8 => "uint8".to_string(),
        DataType::UInt16 => "uint16".to_string(),
        DataType::UInt32 => "uint32".to_string(),
        DataType::UInt64 => "uint64".to_string(),
        DataType::Float16 => "float16".to_string(),
        DataType::Float32 => "float32".to_string(),
        DataType::Float64 => "float64".to_string(),
        DataType::Dictionary(_, _) => "category".to_string(),
        DataType::Timestamp(unit, None) => format!("datetime64[{}]", unit_suffix(unit)),
        DataType::Timestamp(unit, Some(tz)) => {
            format!("datetime64[{}, {tz}]", unit_suffix(unit))
        }
        DataType::Duration(unit) => format!("timedelta64[{}]", unit_suffix(unit)),
        _ => "object".to_string(),
    }
}
