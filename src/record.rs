use crate::dto::RecordSchema;
use crate::error::ServiceError;
use crate::normalize::tokenize_name;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named entity. All derived fields are computed at construction so the
/// raw backing item can be dropped; records are never mutated afterwards.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    /// Sorted, deduplicated name tokens.
    pub name_tokens: Vec<String>,
    /// First four characters of the raw birth-date field, when present.
    pub birth_year: Option<String>,
}

impl Record {
    /// Builds a record from one decoded line. Id and name are required;
    /// the birth-year field is optional and an empty value counts as
    /// absent.
    pub fn from_raw(raw: &Value, schema: &RecordSchema) -> Result<Record, ServiceError> {
        let id = required_field(raw, &schema.id_field)?.to_owned();
        let name = required_field(raw, &schema.name_field)?.to_owned();
        let name_tokens = tokenize_name(&name);
        let birth_year = schema
            .birth_year_field
            .as_deref()
            .and_then(|field| field_value(raw, field))
            .map(|value| value.chars().take(4).collect::<String>())
            .filter(|year| !year.is_empty());
        Ok(Record {
            id,
            name,
            name_tokens,
            birth_year,
        })
    }
}

fn required_field<'a>(raw: &'a Value, field: &str) -> Result<&'a str, ServiceError> {
    field_value(raw, field)
        .ok_or_else(|| ServiceError::source_format(format!("missing field '{}'", field)))
}

/// Field values come either as plain JSON strings or as SPARQL-result-style
/// `{"value": ...}` bindings, depending on the export that produced the
/// file.
fn field_value<'a>(raw: &'a Value, field: &str) -> Option<&'a str> {
    match raw.get(field)? {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("value").and_then(Value::as_str),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn schema() -> RecordSchema {
        RecordSchema {
            id_field: "uri".to_string(),
            name_field: "name".to_string(),
            birth_year_field: Some("byear".to_string()),
        }
    }

    #[test]
    fn derives_all_fields_from_sparql_bindings() {
        let raw = json!({
            "uri": { "value": "u1" },
            "name": { "value": "Jean Smith" },
            "byear": { "value": "1920-04-01" }
        });
        let record = Record::from_raw(&raw, &schema()).unwrap();
        assert_eq!(record.id, "u1");
        assert_eq!(record.name, "Jean Smith");
        assert_eq!(record.name_tokens, vec!["jean", "smith"]);
        assert_eq!(record.birth_year.as_deref(), Some("1920"));
    }

    #[test]
    fn accepts_plain_string_fields() {
        let raw = json!({ "uri": "a1", "name": "Jean Smith", "byear": "1920" });
        let record = Record::from_raw(&raw, &schema()).unwrap();
        assert_eq!(record.id, "a1");
        assert_eq!(record.birth_year.as_deref(), Some("1920"));
    }

    #[test]
    fn missing_birth_year_is_absent_not_an_error() {
        let raw = json!({ "uri": "a1", "name": "Jean Smith" });
        let record = Record::from_raw(&raw, &schema()).unwrap();
        assert!(record.birth_year.is_none());
    }

    #[test]
    fn empty_birth_year_counts_as_absent() {
        let raw = json!({ "uri": "a1", "name": "Jean Smith", "byear": "" });
        let record = Record::from_raw(&raw, &schema()).unwrap();
        assert!(record.birth_year.is_none());
    }

    #[test]
    fn missing_id_is_a_source_format_error() {
        let raw = json!({ "name": "Jean Smith" });
        let err = Record::from_raw(&raw, &schema()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SourceFormat);
    }
}
