//! TOML reader working on the spanned parse tree, so numbers keep their
//! literal spelling.

use std::fmt::Display;

use toml::Spanned;
use toml::de::{DeTable, DeValue};

use super::{Document, DocumentNode};
use crate::error::{ConfigError, ConfigResult};

const FORMAT: &str = "toml";

pub(super) fn parse(text: &str) -> ConfigResult<Document> {
    let table = DeTable::parse(text).map_err(|err| ConfigError::document(FORMAT, err))?;
    Ok(table_document(text, table.get_ref()))
}

fn table_document(source: &str, table: &DeTable<'_>) -> Document {
    let mut document = Document::new();
    for (key, value) in table {
        document.push(key.get_ref().clone(), node(source, value));
    }
    document
}

fn node(source: &str, value: &Spanned<DeValue<'_>>) -> DocumentNode {
    match value.get_ref() {
        DeValue::String(text) => DocumentNode::Scalar(text.clone().into_owned()),
        DeValue::Integer(number) => literal(source, value, number),
        DeValue::Float(number) => literal(source, value, number),
        DeValue::Boolean(flag) => DocumentNode::Scalar(flag.to_string()),
        DeValue::Datetime(datetime) => DocumentNode::Scalar(datetime.to_string()),
        DeValue::Array(items) => {
            let mut document = Document::new();
            for item in items {
                document.push("", node(source, item));
            }
            DocumentNode::Nested(document)
        }
        DeValue::Table(table) => DocumentNode::Nested(table_document(source, table)),
    }
}

/// The number as written in `source`, or the parser's normalised form when
/// the span does not cover it.
fn literal(source: &str, value: &Spanned<DeValue<'_>>, parsed: &impl Display) -> DocumentNode {
    let text = source
        .get(value.span())
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map_or_else(|| parsed.to_string(), str::to_owned);
    DocumentNode::Scalar(text)
}
