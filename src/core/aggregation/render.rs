//! BSON to JSON rendering for HTTP responses
//!
//! ObjectIds become their 24-hex string and dates become RFC 3339 strings,
//! matching what a JavaScript client would see from the driver's JSON
//! serializer. Anything else falls back to relaxed extended JSON.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Number, Value};

/// Renders one document as a JSON object
pub fn document_to_json(document: Document) -> Value {
    let mut map = Map::with_capacity(document.len());
    for (key, value) in document {
        map.insert(key, bson_to_json(value));
    }
    Value::Object(map)
}

/// Renders a list of documents as a JSON array
pub fn documents_to_json(documents: Vec<Document>) -> Value {
    Value::Array(documents.into_iter().map(document_to_json).collect())
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::String(s) => Value::String(s),
        Bson::Int32(n) => Value::Number(n.into()),
        Bson::Int64(n) => Value::Number(n.into()),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::Number(dt.timestamp_millis().into()),
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use mongodb::bson::{doc, DateTime};

    #[test]
    fn test_object_id_renders_as_hex() {
        let oid = ObjectId::new();
        let rendered = document_to_json(doc! { "_id": oid });
        assert_eq!(rendered["_id"], Value::String(oid.to_hex()));
    }

    #[test]
    fn test_datetime_renders_as_rfc3339() {
        let dt = DateTime::from_millis(0);
        let rendered = document_to_json(doc! { "createdAt": dt });
        assert_eq!(rendered["createdAt"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_nested_values() {
        let oid = ObjectId::new();
        let rendered = document_to_json(doc! {
            "name": "Jane Doe",
            "avatarUrl": null,
            "requisitions": [ { "physicianId": oid, "samples": ["S-1"] } ],
            "address": { "city": "Toronto" },
        });

        assert_eq!(rendered["name"], "Jane Doe");
        assert!(rendered["avatarUrl"].is_null());
        assert_eq!(rendered["requisitions"][0]["physicianId"], oid.to_hex());
        assert_eq!(rendered["requisitions"][0]["samples"][0], "S-1");
        assert_eq!(rendered["address"]["city"], "Toronto");
    }

    #[test]
    fn test_documents_to_json_preserves_order() {
        let rendered = documents_to_json(vec![doc! { "n": 1 }, doc! { "n": 2 }]);
        assert_eq!(rendered[0]["n"], 1);
        assert_eq!(rendered[1]["n"], 2);
    }
}
