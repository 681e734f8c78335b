//! XML reader built on `quick-xml`.
//!
//! Elements become keys, trimmed text becomes a scalar, attributes become
//! scalar children and elements without content become the empty string.
//! Text inside an element that also has attributes or child elements is kept
//! under the `#text` key.
//! Element names are taken verbatim, which lets `<.>` mark array items and
//! `<%template.A.B%>` mark template sites.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{Document, DocumentNode};
use crate::error::{ConfigError, ConfigResult};

const FORMAT: &str = "xml";

/// Key holding the text of an element that also has children.
const TEXT_KEY: &str = "#text";

#[derive(Default)]
struct Frame {
    name: String,
    children: Document,
    text: String,
}

impl Frame {
    fn into_node(mut self) -> (String, DocumentNode) {
        let node = if self.children.is_empty() {
            DocumentNode::Scalar(self.text)
        } else {
            if !self.text.is_empty() {
                self.children.push_value(TEXT_KEY, self.text);
            }
            DocumentNode::Nested(self.children)
        };
        (self.name, node)
    }
}

fn utf8(bytes: &[u8]) -> ConfigResult<&str> {
    std::str::from_utf8(bytes).map_err(|err| ConfigError::document(FORMAT, err))
}

fn open(start: &BytesStart<'_>) -> ConfigResult<Frame> {
    let mut frame = Frame {
        name: utf8(start.name().as_ref())?.to_owned(),
        ..Frame::default()
    };
    for entry in start.attributes() {
        let attribute = entry.map_err(|err| ConfigError::document(FORMAT, err))?;
        let key = utf8(attribute.key.as_ref())?.to_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| ConfigError::document(FORMAT, err))?;
        frame.children.push_value(key, value.into_owned());
    }
    Ok(frame)
}

fn close(stack: &mut Vec<Frame>) -> ConfigResult<()> {
    let frame = stack
        .pop()
        .ok_or_else(|| ConfigError::document(FORMAT, "unbalanced closing tag"))?;
    let parent = stack
        .last_mut()
        .ok_or_else(|| ConfigError::document(FORMAT, "unbalanced closing tag"))?;
    let (name, node) = frame.into_node();
    parent.children.push(name, node);
    Ok(())
}

fn current(stack: &mut [Frame]) -> ConfigResult<&mut Frame> {
    stack
        .last_mut()
        .ok_or_else(|| ConfigError::document(FORMAT, "text outside the document"))
}

pub(super) fn parse(text: &str) -> ConfigResult<Document> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut stack = vec![Frame::default()];
    loop {
        match reader
            .read_event()
            .map_err(|err| ConfigError::document(FORMAT, err))?
        {
            Event::Start(start) => stack.push(open(&start)?),
            Event::Empty(start) => {
                stack.push(open(&start)?);
                close(&mut stack)?;
            }
            Event::End(_) => close(&mut stack)?,
            Event::Text(raw) => {
                let content = raw
                    .unescape()
                    .map_err(|err| ConfigError::document(FORMAT, err))?;
                current(&mut stack)?.text.push_str(&content);
            }
            Event::CData(raw) => {
                let bytes = raw.into_inner();
                let content = match bytes {
                    Cow::Borrowed(slice) => utf8(slice)?.to_owned(),
                    Cow::Owned(buffer) => String::from_utf8(buffer)
                        .map_err(|err| ConfigError::document(FORMAT, err))?,
                };
                current(&mut stack)?.text.push_str(&content);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    match stack.pop() {
        Some(root) if stack.is_empty() => Ok(root.children),
        _ => Err(ConfigError::document(FORMAT, "unclosed element at end of input")),
    }
}
