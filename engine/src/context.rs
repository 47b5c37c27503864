//! Per-query context written during macro expansion.
//!
//! The context is a JSON key/value bag owned by the caller. Expansion only
//! writes the fill policy keys below; a later gap-filling stage reads them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether gaps between time buckets should be filled.
pub const FILL: &str = "fill";
/// Bucket width in seconds used for gap filling.
pub const FILL_INTERVAL: &str = "fillInterval";
/// Fill gaps with NULL.
pub const FILL_NULL: &str = "fillNull";
/// Fill gaps with this numeric value.
pub const FILL_VALUE: &str = "fillValue";

/// Mutable key/value store scoped to one query.
///
/// # Example
///
/// ```
/// use engine::QueryContext;
///
/// let mut context = QueryContext::new();
/// context.set("fill", true);
/// assert_eq!(context.get("fill"), Some(&serde_json::json!(true)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryContext {
    model: Map<String, Value>,
}

impl QueryContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.model.insert(key.into(), value.into());
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.model.get(key)
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn model(&self) -> &Map<String, Value> {
        &self.model
    }

    /// Consumes the context, returning the underlying JSON object.
    #[must_use]
    pub fn into_model(self) -> Map<String, Value> {
        self.model
    }

    /// Reads the fill policy written by `__timeGroup`, if any.
    ///
    /// Returns `None` unless `fill` is `true` and the interval plus either
    /// `fillNull` or `fillValue` are present. `fillNull` takes precedence.
    #[must_use]
    pub fn fill_policy(&self) -> Option<FillPolicy> {
        if self.get(FILL).and_then(Value::as_bool) != Some(true) {
            return None;
        }

        let interval_secs = self.get(FILL_INTERVAL).and_then(Value::as_f64)?;
        let value = if self.get(FILL_NULL).and_then(Value::as_bool) == Some(true) {
            FillValue::Null
        } else {
            FillValue::Number(self.get(FILL_VALUE).and_then(Value::as_f64)?)
        };

        Some(FillPolicy {
            interval_secs,
            value,
        })
    }
}

impl From<Map<String, Value>> for QueryContext {
    fn from(model: Map<String, Value>) -> Self {
        Self { model }
    }
}

/// How missing time buckets should be filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillPolicy {
    /// Bucket width in seconds.
    pub interval_secs: f64,
    /// Value used for missing buckets.
    pub value: FillValue,
}

/// The value written into a missing bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillValue {
    /// SQL NULL.
    Null,
    /// A fixed number.
    Number(f64),
}
