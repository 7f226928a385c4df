use serde_json::{json, Map, Value};

/// Accumulates per-field `{from, to}` diffs for audit payloads.
///
/// Only fields that actually differ are recorded; callers decide which
/// proposed values count as "supplied" before applying them here.
#[derive(Debug, Default)]
pub struct ChangeSet {
    fields: Map<String, Value>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change for `field` if the proposed value differs from the
    /// current one. Returns the effective value to persist.
    pub fn apply(&mut self, field: &str, current: &str, proposed: Option<&str>) -> String {
        match proposed {
            Some(value) if value != current => {
                self.fields
                    .insert(field.to_string(), json!({ "from": current, "to": value }));
                value.to_string()
            }
            _ => current.to_string(),
        }
    }

    /// Like `apply`, for nullable fields where `Some(None)` is an explicit
    /// clear and `None` means "not supplied."
    pub fn apply_optional(
        &mut self,
        field: &str,
        current: Option<&str>,
        proposed: Option<Option<&str>>,
    ) -> Option<String> {
        match proposed {
            Some(value) if value != current => {
                self.fields
                    .insert(field.to_string(), json!({ "from": current, "to": value }));
                value.map(str::to_string)
            }
            _ => current.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Treat a present-but-empty string as "field not supplied."
pub fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
