use serde_json::{Map, Value};

use super::{DecodedPayload, WireFormat};
use crate::core::FieldMap;

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn flatten_object(
    prefix: &str,
    object: &Map<String, Value>,
    fields: &mut FieldMap,
    records: &mut Vec<FieldMap>,
) {
    for (key, value) in object {
        let path = join(prefix, key);
        match value {
            Value::Object(inner) => flatten_object(&path, inner, fields, records),
            Value::Array(items) => flatten_array(&path, items, fields, records),
            other => {
                if let Some(s) = scalar(other) {
                    fields.insert(path, s);
                }
            }
        }
    }
}

/// Arrays of objects become records; arrays of scalars become indexed keys
fn flatten_array(prefix: &str, items: &[Value], fields: &mut FieldMap, records: &mut Vec<FieldMap>) {
    for (index, item) in items.iter().enumerate() {
        let path = join(prefix, &index.to_string());
        match item {
            Value::Object(object) => {
                let mut record = FieldMap::new();
                let mut nested = Vec::new();
                flatten_object("", object, &mut record, &mut nested);
                records.push(record);
                records.extend(nested);
            }
            Value::Array(inner) => flatten_array(&path, inner, fields, records),
            other => {
                if let Some(s) = scalar(other) {
                    fields.insert(path, s);
                }
            }
        }
    }
}

/// Decodes a JSON object or array of objects
pub fn decode(text: &str) -> std::result::Result<DecodedPayload, String> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| e.to_string())?;

    let mut fields = FieldMap::new();
    let mut records = Vec::new();
    match &value {
        Value::Object(object) => flatten_object("", object, &mut fields, &mut records),
        Value::Array(items) => flatten_array("", items, &mut fields, &mut records),
        _ => return Err("top-level JSON value is not an object or array".to_string()),
    }

    let mut payload = DecodedPayload::new(WireFormat::Json, fields);
    payload.records = records;
    Ok(payload)
}
