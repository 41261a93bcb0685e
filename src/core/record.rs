//! Flat key-value records for persistence.
//!
//! `Settings` and `MatchState` persist as a flat mapping from field name to
//! a primitive value (an integer, or nested integer arrays for the grid and
//! player lists). Each type lists its fields explicitly through [`Schema`];
//! loading goes through the same validated setters as normal mutation, so a
//! corrupt field is dropped and the rest of the record still applies.

use serde_json::{Map, Value};

/// A flat persisted record.
pub type Record = Map<String, Value>;

/// Explicit persistence schema of a record type.
pub trait Schema: Sized {
    /// Field names, in persistence order.
    const FIELDS: &'static [&'static str];

    /// Read one field as a primitive value.
    fn field_value(&self, name: &str) -> Option<Value>;

    /// Validated write of one field by name. Unknown names and invalid
    /// values leave `self` untouched and return `false`.
    fn try_set_named(&mut self, name: &str, value: &Value) -> bool;

    /// Emit every schema field.
    fn to_record(&self) -> Record {
        Self::FIELDS
            .iter()
            .filter_map(|name| self.field_value(name).map(|v| ((*name).to_string(), v)))
            .collect()
    }

    /// Apply every field of `record` on top of `self`.
    ///
    /// Returns the names of fields that were rejected. Unknown keys are
    /// ignored and not reported.
    fn apply_record(&mut self, record: &Record) -> Vec<String> {
        let mut rejected = Vec::new();
        for name in Self::FIELDS {
            if let Some(value) = record.get(*name) {
                if !self.try_set_named(name, value) {
                    log::warn!("dropping invalid persisted field `{}`: {}", name, value);
                    rejected.push((*name).to_string());
                }
            }
        }
        rejected
    }

    /// Encode as a JSON object string.
    fn to_json(&self) -> String {
        Value::Object(self.to_record()).to_string()
    }
}

/// Decode a JSON string into a record.
///
/// Fails only when the text is not a JSON object; individual fields are
/// validated later by [`Schema::apply_record`].
pub fn parse_record(json: &str) -> Result<Record, serde_json::Error> {
    serde_json::from_str(json)
}
