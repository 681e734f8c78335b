//! Unit tests for format detection and the document parsers.

#![expect(
    clippy::panic_in_result_fn,
    reason = "assertions read better than ensure! for value comparisons"
)]

use anyhow::Result;
use rstest::rstest;

use super::{Document, DocumentNode, Format};
use crate::error::ConfigError;

#[rstest]
#[case("  <Config/>", Some(Format::Xml))]
#[case("\n{ \"a\": 1 }", Some(Format::Json))]
#[case("key = 'value'", Some(Format::Toml))]
#[case("[table]\nkey = 1", Some(Format::Toml))]
#[case("   \n\t", None)]
fn detects_format_from_first_character(#[case] text: &str, #[case] expected: Option<Format>) {
    assert_eq!(Format::detect(text), expected);
}

#[test]
fn blank_text_is_an_empty_document() -> Result<()> {
    assert!(Document::parse("  \n ")?.is_empty());
    Ok(())
}

#[test]
fn json_keeps_order_duplicates_and_arrays() -> Result<()> {
    let doc = Document::parse(
        r#"{
            "Repeated": { "Rep": "Value1", "Rep": "Value2" },
            "Array": ["Elem1", 2, true, null],
            "Empty": {}
        }"#,
    )?;
    let expected = Document::new()
        .with_node(
            "Repeated",
            Document::new()
                .with_value("Rep", "Value1")
                .with_value("Rep", "Value2"),
        )
        .with_node(
            "Array",
            Document::new()
                .with_value("", "Elem1")
                .with_value("", "2")
                .with_value("", "true")
                .with_value("", "null"),
        )
        .with_node("Empty", Document::new());
    assert_eq!(doc, expected);
    Ok(())
}

#[test]
fn json_scalar_root_is_rejected() {
    let err = Format::Json.parse("\"just text\"").err();
    assert!(matches!(err, Some(ConfigError::Document { format: "json", .. })));
}

#[test]
fn toml_tables_and_arrays() -> Result<()> {
    let doc = Document::parse(
        "[System]\nSessionId = \"STH\"\nInstance = 20\nRatio = 0.5\n\n[[Gateways]]\nName = \"XETRA\"\n",
    )?;
    let expected = Document::new()
        .with_node(
            "System",
            Document::new()
                .with_value("SessionId", "STH")
                .with_value("Instance", "20")
                .with_value("Ratio", "0.5"),
        )
        .with_node(
            "Gateways",
            Document::new().with_node("", Document::new().with_value("Name", "XETRA")),
        );
    assert_eq!(doc, expected);
    Ok(())
}

#[test]
fn toml_datetimes_become_scalars() -> Result<()> {
    let doc = Document::parse("Started = 1979-05-27T07:32:00Z\n")?;
    assert_eq!(
        doc.entries(),
        [(
            "Started".to_owned(),
            DocumentNode::Scalar("1979-05-27T07:32:00Z".to_owned())
        )]
    );
    Ok(())
}

fn flat(doc: &Document) -> Vec<String> {
    doc.entries()
        .iter()
        .map(|(key, node)| match node {
            DocumentNode::Scalar(value) => format!("{key}={value}"),
            DocumentNode::Nested(_) => format!("{key}={{..}}"),
        })
        .collect()
}

#[rstest]
#[case::json(
    r#"{"V": 1.10, "W": 1e3, "X": 1.0, "Neg": -0, "Big": 123456789012345678901234}"#,
    &["V=1.10", "W=1e3", "X=1.0", "Neg=-0", "Big=123456789012345678901234"]
)]
#[case::toml(
    "V = 1.10\nW = 1e3\nX = 1.0\nHex = 0x1F\nPlain = 42\n",
    &["V=1.10", "W=1e3", "X=1.0", "Hex=0x1F", "Plain=42"]
)]
fn numbers_keep_their_literal_text(#[case] text: &str, #[case] expected: &[&str]) -> Result<()> {
    assert_eq!(flat(&Document::parse(text)?), expected);
    Ok(())
}

#[test]
fn xml_elements_attributes_and_placeholders() -> Result<()> {
    let doc = Document::parse(
        r#"<?xml version='1.0' encoding='UTF-8'?>
        <Config>
            <Gateway id="g1">
                <Name> XETRA </Name>
                <Ext/>
            </Gateway>
            <Array>
                <.>Elem1</.>
                <.>Elem2</.>
            </Array>
            <%template.Config.Gateway%>
                <LinkId>155</LinkId>
            </%template.Config.Gateway%>
            <Escaped>a &amp; b</Escaped>
            <Raw><![CDATA[<kept>]]></Raw>
        </Config>"#,
    )?;
    let config = Document::new()
        .with_node(
            "Gateway",
            Document::new()
                .with_value("id", "g1")
                .with_value("Name", "XETRA")
                .with_value("Ext", ""),
        )
        .with_node(
            "Array",
            Document::new().with_value(".", "Elem1").with_value(".", "Elem2"),
        )
        .with_node(
            "%template.Config.Gateway%",
            Document::new().with_value("LinkId", "155"),
        )
        .with_value("Escaped", "a & b")
        .with_value("Raw", "<kept>");
    assert_eq!(doc, Document::new().with_node("Config", config));
    Ok(())
}

#[test]
fn xml_text_next_to_attributes_is_kept() -> Result<()> {
    let doc = Document::parse(
        r#"<Config><Timeout unit="s">30</Timeout><Mixed>head<Child>1</Child></Mixed></Config>"#,
    )?;
    let config = Document::new()
        .with_node(
            "Timeout",
            Document::new().with_value("unit", "s").with_value("#text", "30"),
        )
        .with_node(
            "Mixed",
            Document::new().with_value("Child", "1").with_value("#text", "head"),
        );
    assert_eq!(doc, Document::new().with_node("Config", config));
    Ok(())
}

#[rstest]
#[case("<Config><Open></Config>")]
#[case("<Config>")]
fn malformed_xml_is_reported(#[case] text: &str) {
    let err = Document::parse(text).err();
    assert!(matches!(err, Some(ConfigError::Document { format: "xml", .. })));
}
