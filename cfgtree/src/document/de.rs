//! `serde` support: any self-describing format can produce a [`Document`].
//!
//! JSON numbers arrive through `serde_json`'s `arbitrary_precision` map, so
//! they keep the digits and exponent they were written with.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use super::{Document, DocumentNode};

/// Field name `serde_json` uses to pass a number's literal text through
/// `deserialize_any`.
const JSON_NUMBER_FIELD: &str = "$serde_json::private::Number";

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match DocumentNode::deserialize(deserializer)? {
            DocumentNode::Nested(document) => Ok(document),
            DocumentNode::Scalar(value) => Err(de::Error::custom(format!(
                "expected a table at the top level, found scalar '{value}'"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = DocumentNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, a sequence or a map")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(DocumentNode::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(DocumentNode::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(DocumentNode::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(DocumentNode::Scalar(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(DocumentNode::Scalar(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(DocumentNode::Scalar(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DocumentNode::Scalar("null".to_owned()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        self.visit_unit()
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        DocumentNode::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut document = Document::new();
        while let Some(item) = seq.next_element::<DocumentNode>()? {
            document.push("", item);
        }
        Ok(DocumentNode::Nested(document))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut document = Document::new();
        while let Some((key, value)) = map.next_entry::<String, DocumentNode>()? {
            document.push(key, value);
        }
        if let [(key, DocumentNode::Scalar(value))] = document.entries()
            && key == JSON_NUMBER_FIELD
        {
            return Ok(DocumentNode::Scalar(value.clone()));
        }
        Ok(DocumentNode::Nested(document))
    }
}
