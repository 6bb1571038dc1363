//! Flat JSON document codec for record lists.
//!
//! Layout: one JSON object keyed by record identifier, each value holding
//! `id`, `name`, `quantity` and `price`, pretty-printed with two-space
//! indentation and a trailing newline.
//!
//! # Invariants
//! - `encode` writes entries in the given order; `decode` keeps file order.
//! - `decode(encode(x)) == x` and encoding is deterministic, so repeated
//!   saves of unchanged state are byte-identical.
//! - Every map key must equal its record's normalized `id`.

use crate::model::record::{Record, RecordId};
use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Formatter;

/// Serializes `records` into the persisted document text.
pub fn encode(records: &[Record]) -> Result<String, String> {
    let mut text =
        serde_json::to_string_pretty(&DocumentRef(records)).map_err(|err| err.to_string())?;
    text.push('\n');
    Ok(text)
}

/// Parses persisted document text.
///
/// Blank input decodes to an empty list. A top-level array of records (the
/// layout used by older exports) is accepted as well.
pub fn decode(text: &str) -> Result<Vec<Record>, String> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: Document = serde_json::from_str(text).map_err(|err| err.to_string())?;
    let mut seen = HashSet::with_capacity(document.entries.len());
    let mut records = Vec::with_capacity(document.entries.len());

    for (key, record) in document.entries {
        if let Some(key) = key {
            let key_id = RecordId::parse(&key).map_err(|err| format!("key `{key}`: {err}"))?;
            if &key_id != record.id() {
                return Err(format!(
                    "key `{key}` does not match record id `{}`",
                    record.id()
                ));
            }
        }
        if !seen.insert(record.id().clone()) {
            return Err(format!("duplicate record id `{}`", record.id()));
        }
        records.push(record);
    }

    Ok(records)
}

struct DocumentRef<'a>(&'a [Record]);

impl Serialize for DocumentRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for record in self.0 {
            map.serialize_entry(record.id().as_str(), record)?;
        }
        map.end()
    }
}

/// Decoded entries; the key is `None` for the array layout.
struct Document {
    entries: Vec<(Option<String>, Record)>,
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("an object keyed by record id or an array of records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, record)) = access.next_entry::<String, Record>()? {
            entries.push((Some(key), record));
        }
        Ok(Document { entries })
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(record) = access.next_element::<Record>()? {
            entries.push((None, record));
        }
        Ok(Document { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::model::record::{NewRecord, Record, RecordId};

    fn record(id: &str, name: &str, quantity: i64, price: f64) -> Record {
        Record::new(
            RecordId::parse(id).expect("id should parse"),
            NewRecord::new(name, quantity, price),
        )
        .expect("record should validate")
    }

    #[test]
    fn encode_uses_two_space_indent_and_keeps_order() {
        let text = encode(&[record("B2", "Mouse", 3, 9.5), record("A1", "Laptop", 1, 900.0)])
            .expect("encode should succeed");

        assert!(text.starts_with("{\n  \"B2\": {\n    \"id\": \"B2\","));
        assert!(text.ends_with("}\n"));
        assert!(text.find("\"B2\"").unwrap() < text.find("\"A1\"").unwrap());
    }

    #[test]
    fn decode_preserves_file_order() {
        let text = encode(&[record("Z9", "Zeta", 1, 1.0), record("A1", "Alpha", 2, 2.0)])
            .expect("encode should succeed");
        let decoded = decode(&text).expect("decode should succeed");

        let ids: Vec<_> = decoded.iter().map(|r| r.id().as_str().to_string()).collect();
        assert_eq!(ids, vec!["Z9", "A1"]);
    }

    #[test]
    fn decode_blank_text_is_empty() {
        assert!(decode("  \n").expect("blank decodes").is_empty());
    }

    #[test]
    fn decode_rejects_key_id_mismatch() {
        let text = r#"{"A1": {"id": "B2", "name": "x", "quantity": 1, "price": 1.0}}"#;
        let err = decode(text).unwrap_err();
        assert!(err.contains("does not match"), "unexpected error: {err}");
    }

    #[test]
    fn decode_rejects_duplicate_normalized_keys() {
        let text = r#"{
            "a1": {"id": "a1", "name": "x", "quantity": 1, "price": 1.0},
            "A1": {"id": "A1", "name": "y", "quantity": 1, "price": 1.0}
        }"#;
        let err = decode(text).unwrap_err();
        assert!(err.contains("duplicate"), "unexpected error: {err}");
    }

    #[test]
    fn decode_accepts_legacy_array_layout() {
        let text = r#"[
            {"id_producto": "p1", "nombre": "Teclado", "cantidad": 4, "precio": 25.0}
        ]"#;
        let decoded = decode(text).expect("legacy layout decodes");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id().as_str(), "P1");
        assert_eq!(decoded[0].quantity(), 4);
    }

    #[test]
    fn decode_rejects_negative_quantity() {
        let text = r#"{"A1": {"id": "A1", "name": "x", "quantity": -1, "price": 1.0}}"#;
        let err = decode(text).unwrap_err();
        assert!(err.contains("quantity (-1) must be >= 0"), "unexpected error: {err}");
    }
}
