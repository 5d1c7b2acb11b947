//! Generic element tree built from `quick-xml` events
//!
//! The tree keeps local names only, so `ns3:TPX` and `TPX` are the same
//! element. Lookups use `>`-separated paths relative to an element, e.g.
//! `HeartRateBpm>Value`.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::DecodeError;

/// Separator between steps of an element path
pub const PATH_SEPARATOR: char = '>';

/// A decoded element with its attributes, direct text and child elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Value of the attribute with the given local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every element reached by following `path` from this element, in
    /// document order
    pub fn select(&self, path: &str) -> Vec<&Element> {
        path.split(PATH_SEPARATOR)
            .fold(vec![self], |nodes, step| {
                nodes
                    .into_iter()
                    .flat_map(|node| node.children.iter().filter(move |child| child.name == step))
                    .collect()
            })
    }

    /// Text of the last element at `path`, exactly as written
    pub fn raw_text_at(&self, path: &str) -> Option<&str> {
        self.select(path).last().map(|element| element.text.as_str())
    }

    /// Trimmed text of the last element at `path`, if present and non-empty
    pub fn text_at(&self, path: &str) -> Option<&str> {
        self.raw_text_at(path)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Read a whole document and return its root element
///
/// Reading stops once the root element closes; anything after it is ignored.
pub fn read_document<R: BufRead>(source: R) -> Result<Element, DecodeError> {
    // Text is kept untrimmed: string fields carry their whitespace
    let mut reader = Reader::from_reader(source);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut open: Vec<Element> = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|source| DecodeError::Syntax {
                position: reader.buffer_position(),
                source,
            })?;

        let closed = match event {
            Event::Start(start) => {
                open.push(open_element(&reader, &start)?);
                None
            }
            Event::Empty(start) => Some(open_element(&reader, &start)?),
            Event::End(end) => match open.pop() {
                Some(element) => Some(element),
                None => {
                    let name = reader
                        .decoder()
                        .decode(end.local_name().as_ref())
                        .map_err(|source| syntax(&reader, source))?
                        .into_owned();
                    return Err(DecodeError::UnexpectedEnd { name });
                }
            },
            Event::Text(text) => {
                if let Some(current) = open.last_mut() {
                    let text = text.unescape().map_err(|source| syntax(&reader, source))?;
                    current.text.push_str(&text);
                }
                None
            }
            Event::CData(data) => {
                if let Some(current) = open.last_mut() {
                    let text = reader
                        .decoder()
                        .decode(&data)
                        .map_err(|source| syntax(&reader, source))?;
                    current.text.push_str(&text);
                }
                None
            }
            Event::Eof => {
                return Err(match open.pop() {
                    Some(element) => DecodeError::UnclosedElement { name: element.name },
                    None => DecodeError::MissingRoot,
                });
            }
            _ => None,
        };

        if let Some(element) = closed {
            match open.last_mut() {
                Some(parent) => parent.children.push(element),
                None => return Ok(element),
            }
        }

        buf.clear();
    }
}

fn open_element<R>(reader: &Reader<R>, start: &BytesStart<'_>) -> Result<Element, DecodeError> {
    let decoder = reader.decoder();
    let name = decoder
        .decode(start.local_name().as_ref())
        .map_err(|source| syntax(reader, source))?
        .into_owned();

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|err| syntax(reader, quick_xml::Error::from(err)))?;
        let key = decoder
            .decode(attribute.key.local_name().as_ref())
            .map_err(|source| syntax(reader, source))?
            .into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|source| syntax(reader, source))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn syntax<R>(reader: &Reader<R>, source: quick_xml::Error) -> DecodeError {
    DecodeError::Syntax {
        position: reader.buffer_position(),
        source,
    }
}
