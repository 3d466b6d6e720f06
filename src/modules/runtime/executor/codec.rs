//! Decoding of result records into field maps

use asterbench_core::AsterbenchError;
use asterbench_types::FieldValues;
use serde_json::{Map, Value};

/// Decode one record line into the requested fields.
///
/// The line must be a single JSON object; every requested field must be
/// present as a hex string.
pub fn decode_record(line: &str, fields: &[String]) -> Result<FieldValues, AsterbenchError> {
    let trimmed = line.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return Err(AsterbenchError::Decode(format!(
            "Record is not a JSON object: {}",
            trimmed
        )));
    }

    let object: Map<String, Value> = serde_json::from_str(trimmed)
        .map_err(|e| AsterbenchError::Decode(format!("Malformed record {}: {}", trimmed, e)))?;

    let mut values = FieldValues::with_capacity(fields.len());
    for field in fields {
        let encoded = match object.get(field) {
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(AsterbenchError::Decode(format!(
                    "Field '{}' is not a hex string: {}",
                    field, other
                )))
            }
            None => {
                return Err(AsterbenchError::Decode(format!(
                    "Field '{}' is missing from record",
                    field
                )))
            }
        };

        let bytes = hex::decode(encoded).map_err(|e| {
            AsterbenchError::Decode(format!("Field '{}' has invalid hex: {}", field, e))
        })?;
        values.insert(field.clone(), bytes);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_decode_record() {
        let record = r#"{ "id": "user1", "field0": "6162", "field1": "CAFE" }"#;
        let values = decode_record(record, &fields(&["field0", "field1"])).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["field0"], b"ab".to_vec());
        assert_eq!(values["field1"], vec![0xca, 0xfe]);
    }

    #[test]
    fn test_decode_only_requested_fields() {
        let record = r#"{"id":"user1","field0":"00","field1":"01"}"#;
        let values = decode_record(record, &fields(&["field1"])).unwrap();
        assert_eq!(values.len(), 1);
        assert!(values.contains_key("field1"));

        assert!(decode_record(record, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_malformed() {
        let requested = fields(&["field0"]);
        assert!(decode_record("[1, 2]", &requested).is_err());
        assert!(decode_record("{\"field0\": \"01\"} ]", &requested).is_err());
        assert!(decode_record("{\"field0\": ", &requested).is_err());
        assert!(decode_record("{\"field0\": 1}", &requested).is_err());
        assert!(decode_record("{\"field0\": \"0g\"}", &requested).is_err());
        assert!(decode_record("{\"id\": \"user1\"}", &requested).is_err());
    }
}
