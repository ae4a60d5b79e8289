//! Selector queries over JSON records
//!
//! A selector is a JSON object of the form `{"selector": {<field>: <value>}}`.
//! A record matches when every listed top-level field is present in the
//! record and equal to the given value. Records that are not JSON objects
//! never match.

use crate::error::{MagnitError, MagnitResult};
use serde_json::{Map, Value};

/// Parsed selector query
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    fields: Map<String, Value>,
}

impl Selector {
    /// Selector matching records whose `field` equals `value`
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert(field.into(), value.into());
        Self { fields }
    }

    /// Parse a selector query string
    ///
    /// # Errors
    ///
    /// InvalidArgument if the text is not JSON, has no `selector` member, or
    /// the selector is not an object.
    pub fn parse(query: &str) -> MagnitResult<Self> {
        let doc: Value = serde_json::from_str(query)
            .map_err(|e| MagnitError::invalid_argument(format!("malformed selector query: {}", e)))?;
        match doc.get("selector") {
            Some(Value::Object(fields)) => Ok(Self {
                fields: fields.clone(),
            }),
            Some(_) => Err(MagnitError::invalid_argument(
                "selector must be a JSON object",
            )),
            None => Err(MagnitError::invalid_argument(
                "query has no selector member",
            )),
        }
    }

    /// Render as a query string accepted by [`Selector::parse`]
    pub fn to_query_string(&self) -> String {
        let mut doc = Map::new();
        doc.insert("selector".to_string(), Value::Object(self.fields.clone()));
        Value::Object(doc).to_string()
    }

    /// Whether a parsed record satisfies every field condition
    pub fn matches(&self, record: &Value) -> bool {
        let Some(obj) = record.as_object() else {
            return false;
        };
        self.fields
            .iter()
            .all(|(field, expected)| obj.get(field) == Some(expected))
    }

    /// Whether raw record bytes satisfy the selector
    pub fn matches_bytes(&self, bytes: &[u8]) -> bool {
        serde_json::from_slice::<Value>(bytes)
            .map(|record| self.matches(&record))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_doc_type_selector() {
        let sel = Selector::parse(r#"{"selector":{"docType":"Agreement"}}"#).unwrap();
        assert_eq!(sel, Selector::field_equals("docType", "Agreement"));
    }

    #[test]
    fn test_matches_equal_field() {
        let sel = Selector::field_equals("docType", "Agreement");
        assert!(sel.matches(&json!({"docType": "Agreement", "name": "x"})));
        assert!(!sel.matches(&json!({"docType": "model"})));
        assert!(!sel.matches(&json!({"counter": 3})));
    }

    #[test]
    fn test_all_fields_must_match() {
        let sel =
            Selector::parse(r#"{"selector":{"docType":"Agreement","status":"ISSUED"}}"#).unwrap();
        assert!(sel.matches(&json!({"docType": "Agreement", "status": "ISSUED"})));
        assert!(!sel.matches(&json!({"docType": "Agreement", "status": "APPROVED"})));
    }

    #[test]
    fn test_non_object_records_never_match() {
        let sel = Selector::field_equals("docType", "Agreement");
        assert!(!sel.matches(&json!([1, 2])));
        assert!(!sel.matches_bytes(b"not json"));
    }

    #[test]
    fn test_round_trip_query_string() {
        let sel = Selector::field_equals("docType", "Agreement");
        assert_eq!(Selector::parse(&sel.to_query_string()).unwrap(), sel);
    }

    #[test]
    fn test_malformed_queries_rejected() {
        for bad in ["", "{", r#"{"docType":"Agreement"}"#, r#"{"selector":"x"}"#] {
            let err = Selector::parse(bad).unwrap_err();
            assert!(matches!(err, MagnitError::InvalidArgument { .. }), "{}", bad);
        }
    }
}
