//! # Change sets
//!
//! Collects the field changes of one logical mutation. A change set becomes
//! a single Activity's `data` map, `{ field: { from, to } }`, plus one
//! human-readable description joining a phrase per field.

use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: &'static str,
    pub label: &'static str,
    pub from: Value,
    pub to: Value,
}

impl FieldChange {
    fn phrase(&self) -> String {
        match (&self.from, &self.to) {
            (Value::Null, to) => format!("set {} to {}", self.label, display(to)),
            (_, Value::Null) => format!("removed {}", self.label),
            (from, to) => format!(
                "changed {} from {} to {}",
                self.label,
                display(from),
                display(to)
            ),
        }
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    changes: Vec<FieldChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `field` only when `from != to`. Returns whether it did.
    pub fn track<T>(&mut self, field: &'static str, label: &'static str, from: &T, to: &T) -> bool
    where
        T: Serialize + PartialEq + ?Sized,
    {
        if from == to {
            return false;
        }
        self.changes.push(FieldChange {
            field,
            label,
            from: serde_json::to_value(from).unwrap_or(Value::Null),
            to: serde_json::to_value(to).unwrap_or(Value::Null),
        });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    pub fn contains(&self, field: &str) -> bool {
        self.changes.iter().any(|c| c.field == field)
    }

    pub fn to_data(&self) -> Value {
        let map: Map<String, Value> = self
            .changes
            .iter()
            .map(|c| (c.field.to_string(), json!({ "from": c.from, "to": c.to })))
            .collect();
        Value::Object(map)
    }

    pub fn describe(&self) -> String {
        self.changes
            .iter()
            .map(FieldChange::phrase)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_fields_are_not_tracked() {
        let mut changes = ChangeSet::new();
        assert!(!changes.track("title", "title", "Todo", "Todo"));
        assert!(changes.is_empty());
    }

    #[test]
    fn multiple_fields_share_one_map() {
        let mut changes = ChangeSet::new();
        changes.track("title", "title", "Old", "New");
        changes.track("due_date", "due date", &None::<String>, &Some("2026-01-01".to_string()));
        changes.track("cover_url", "cover", &Some("a.png".to_string()), &None);

        assert_eq!(
            changes.to_data(),
            json!({
                "title": { "from": "Old", "to": "New" },
                "due_date": { "from": null, "to": "2026-01-01" },
                "cover_url": { "from": "a.png", "to": null },
            })
        );
        assert_eq!(
            changes.describe(),
            "changed title from Old to New; set due date to 2026-01-01; removed cover"
        );
    }
}
