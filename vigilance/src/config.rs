//! Declarative schema configuration in JSON.
//!
//! A configuration document has up to two sections, `meta` and `data`, each
//! mapping a property name to a condition:
//!
//! ```json
//! {
//!   "meta": {
//!     "row-count": { "range": { "min": 5, "max": 11 } },
//!     "columns": ["mpg", "cyl"]
//!   },
//!   "data": {
//!     "vs": { "contains": { "items": [0, 1], "only": true } },
//!     "mpg": { "min": 0 }
//!   }
//! }
//! ```
//!
//! Conditions are written as:
//!
//! | JSON | Condition |
//! |------|-----------|
//! | integer | exact scalar |
//! | array | exact sequence |
//! | `{"range": {...}}` | [`Range`] with its fields |
//! | `{"min": 5}` or `{"min": {...}}` | [`Min`] |
//! | `{"max": 5}` or `{"max": {...}}` | [`Max`] |
//! | `{"contains": [...]}` or `{"contains": {...}}` | [`Contains`] |
//! | `{"excludes": [...]}` or `{"excludes": {...}}` | [`Excludes`] |
//!
//! Any other shape is rejected with
//! [`VigilanceError::SchemaCondition`](crate::error::VigilanceError::SchemaCondition).
//! Sections keep the order properties are written in.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::constraints::{Condition, Contains, Excludes, Max, Min, Range, Value};
use crate::core::{MetaProperty, Schema, Validator};
use crate::error::{Result, VigilanceError};

/// The serialized form of a [`Schema`].
///
/// # Examples
///
/// ```rust
/// use vigilance::config::SchemaConfig;
///
/// let config: SchemaConfig = r#"{"meta": {"row-count": 32, "ncols": {"max": 11}}}"#
///     .parse()
///     .unwrap();
/// let schema = config.to_schema().unwrap();
/// assert_eq!(schema.meta_conditions().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    #[serde(default)]
    pub meta: Map<String, JsonValue>,
    #[serde(default)]
    pub data: Map<String, JsonValue>,
}

impl SchemaConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            meta = config.meta.len(),
            data = config.data.len(),
            "loaded schema configuration"
        );
        Ok(config)
    }

    /// Builds the schema, resolving every property and condition.
    pub fn to_schema(&self) -> Result<Schema> {
        let mut schema = Schema::new();
        for (name, condition) in &self.meta {
            let property: MetaProperty = name.parse()?;
            schema.set_meta(property, condition_from_json(condition)?);
        }
        for (column, condition) in &self.data {
            schema.set_data(column.as_str(), condition_from_json(condition)?);
        }
        Ok(schema)
    }
}

impl FromStr for SchemaConfig {
    type Err = VigilanceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json_str(s)
    }
}

impl TryFrom<&SchemaConfig> for Schema {
    type Error = VigilanceError;

    fn try_from(config: &SchemaConfig) -> Result<Self> {
        config.to_schema()
    }
}

impl Schema {
    /// Parses a schema from a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        SchemaConfig::from_json_str(text)?.to_schema()
    }

    /// Reads a schema from a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        SchemaConfig::from_path(path)?.to_schema()
    }
}

impl Validator {
    /// Creates a validator whose schema comes from a configuration.
    pub fn from_config(config: &SchemaConfig) -> Result<Self> {
        Ok(Self::with_schema(config.to_schema()?))
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "float",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "sequence",
        JsonValue::Object(_) => "object",
    }
}

fn parse<T: DeserializeOwned>(params: &JsonValue) -> Result<T> {
    Ok(serde_json::from_value(params.clone())?)
}

fn number(params: &JsonValue) -> Option<f64> {
    params.as_f64()
}

fn items(params: &JsonValue) -> Result<Option<Vec<Value>>> {
    match params {
        JsonValue::Array(_) => Ok(Some(parse(params)?)),
        _ => Ok(None),
    }
}

/// Converts one JSON condition into a [`Condition`].
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use vigilance::config::condition_from_json;
///
/// assert_eq!(condition_from_json(&json!(10)).unwrap().shape(), "exact scalar");
/// assert_eq!(condition_from_json(&json!({"min": 0})).unwrap().shape(), "min");
/// assert!(condition_from_json(&json!("ten")).is_err());
/// ```
pub fn condition_from_json(value: &JsonValue) -> Result<Condition> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .map(Condition::ExactScalar)
            .ok_or_else(|| VigilanceError::schema_condition(json_type_name(value))),
        JsonValue::Array(_) => Condition::try_from(parse::<Value>(value)?),
        JsonValue::Object(map) if map.len() == 1 => {
            let Some((key, params)) = map.iter().next() else {
                return Err(VigilanceError::schema_condition("object"));
            };
            predicate_from_json(key, params)
        }
        other => Err(VigilanceError::schema_condition(json_type_name(other))),
    }
}

fn predicate_from_json(key: &str, params: &JsonValue) -> Result<Condition> {
    let condition: Condition = match key {
        "range" => parse::<Range>(params)?.into(),
        "min" => match number(params) {
            Some(min) => Min::new(min).into(),
            None => parse::<Min>(params)?.into(),
        },
        "max" => match number(params) {
            Some(max) => Max::new(max).into(),
            None => parse::<Max>(params)?.into(),
        },
        "contains" => match items(params)? {
            Some(items) => Contains::new(items).into(),
            None => parse::<Contains>(params)?.into(),
        },
        "excludes" => match items(params)? {
            Some(items) => Excludes::new(items).into(),
            None => parse::<Excludes>(params)?.into(),
        },
        other => {
            return Err(VigilanceError::schema_condition(format!(
                "object with key '{other}'"
            )))
        }
    };
    Ok(condition)
}
