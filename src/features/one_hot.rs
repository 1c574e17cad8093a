//! One-hot expansion of categorical input fields.

use serde_json::{Map, Value};

/// Replace each categorical field with a `<field>_<value>` indicator set to 1.
///
/// Every other field passes through untouched. A field that is absent or
/// `null` contributes no indicator at all, which leaves all of its dummies at
/// 0 once the record is reconciled against the trained columns.
pub fn expand(record: &Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    let mut out = Map::with_capacity(record.len());
    for (name, value) in record {
        if !fields.contains(&name.as_str()) {
            out.insert(name.clone(), value.clone());
        }
    }

    for &field in fields {
        let Some(label) = record.get(field).and_then(category_label) else {
            continue;
        };
        out.insert(indicator_name(field, &label), Value::from(1));
    }

    out
}

/// Column name of the indicator for `field == label`.
pub fn indicator_name(field: &str, label: &str) -> String {
    format!("{field}_{label}")
}

fn category_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        // Dummy columns were named from Python labels.
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        // Numbers and nested values use their JSON text.
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: [&str; 2] = ["Day of Week", "Public Holiday"];

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn expands_strings_and_keeps_other_fields() {
        let rec = obj(json!({"Day of Week": "Monday", "Public Holiday": "No", "Rain (mm)": 0}));
        let out = expand(&rec, &FIELDS);
        assert_eq!(out.get("Day of Week_Monday"), Some(&json!(1)));
        assert_eq!(out.get("Public Holiday_No"), Some(&json!(1)));
        assert_eq!(out.get("Rain (mm)"), Some(&json!(0)));
        assert!(!out.contains_key("Day of Week"));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn null_and_missing_fields_add_nothing() {
        let rec = obj(json!({"Day of Week": null}));
        let out = expand(&rec, &FIELDS);
        assert!(out.is_empty());
    }

    #[test]
    fn numbers_use_json_text() {
        let rec = obj(json!({"Public Holiday": 0}));
        let out = expand(&rec, &FIELDS);
        assert!(out.contains_key("Public Holiday_0"));
    }

    #[test]
    fn bools_are_capitalised() {
        let out = expand(&obj(json!({"Public Holiday": true, "Day of Week": false})), &FIELDS);
        assert!(out.contains_key("Public Holiday_True"));
        assert!(out.contains_key("Day of Week_False"));
        assert!(!out.contains_key("Public Holiday_true"));
    }
}
