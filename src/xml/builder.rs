//! Tree builder over the external XML tokenizer
//!
//! Consumes quick-xml events and assembles a generic tree value: one
//! in-progress mapping per open element, a single pending-text accumulator
//! for the innermost element, repeated child names collapsed into sequences.
//! The working state lives in a [`Context`] owned by one build call; nothing
//! is retained across calls.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{Error, Result};
use crate::value::{Array, Object, Value};

/// Reserved key for character data inside elements that also carry
/// attributes or child elements.
pub const TEXT_KEY: &str = "#text";

/// Convert an XML document into a tree value.
///
/// The outermost element's tag name is discarded; only its content survives.
/// A text-only element collapses to a bare text scalar, so `<id>1</id>`
/// contributes `"1"`, not a nested mapping.
pub fn build(input: &[u8]) -> Result<Value> {
    build_document(input, None)
}

/// Convert an XML document, requiring the outermost element to be `root`.
///
/// Fails with [`Error::RootElementMismatch`] as soon as a differently-named
/// root opens; the result is the root element's content, exactly as with
/// [`build`].
pub fn build_with_root(input: &[u8], root: &str) -> Result<Value> {
    build_document(input, Some(root))
}

fn build_document(input: &[u8], expected_root: Option<&str>) -> Result<Value> {
    debug!(bytes = input.len(), "building tree from xml document");

    let mut reader = Reader::from_reader(input);
    let mut context = Context::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(Error::malformed)? {
            Event::Start(start) => {
                let name = element_name(&start)?;
                context.open(&name, &start, expected_root)?;
            }
            Event::Empty(start) => {
                let name = element_name(&start)?;
                context.open(&name, &start, expected_root)?;
                context.close(&name)?;
            }
            Event::End(end) => {
                let name = name_from_bytes(end.name().as_ref())?;
                context.close(&name)?;
            }
            Event::Text(text) => {
                let raw = std::str::from_utf8(text.as_ref()).map_err(Error::malformed)?;
                context.text.push_str(raw);
            }
            Event::CData(data) => {
                let raw = data.into_inner();
                let decoded = std::str::from_utf8(&raw).map_err(Error::malformed)?;
                context.text.push_str(decoded);
            }
            Event::GeneralRef(reference) => {
                let name = name_from_bytes(&reference)?;
                context.text.push(resolve_entity(&name)?);
            }
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
        buf.clear();
    }

    context.finish()
}

/// One open element: its in-progress mapping plus the names of entries that
/// still hold attribute values. A child element with the same name as an
/// attribute overwrites it instead of forming a sequence with it.
#[derive(Default)]
struct Level {
    mapping: Object,
    attribute_keys: Vec<String>,
}

/// Working state for one build call.
#[derive(Default)]
struct Context {
    stack: Vec<Level>,
    text: String,
    root: Option<Value>,
}

impl Context {
    fn open(
        &mut self,
        name: &str,
        start: &BytesStart<'_>,
        expected_root: Option<&str>,
    ) -> Result<()> {
        if self.stack.is_empty() {
            if self.root.is_some() {
                return Err(Error::MalformedInput(
                    "document has more than one root element".to_string(),
                ));
            }
            if let Some(expected) = expected_root {
                if name != expected {
                    return Err(Error::RootElementMismatch {
                        expected: expected.to_owned(),
                        found: name.to_owned(),
                    });
                }
            }
        }

        self.flush_text();

        let mut level = Level::default();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(Error::malformed)?;
            let key = name_from_bytes(attribute.key.as_ref())?;
            let value = attribute.unescape_value().map_err(Error::malformed)?;
            level.mapping.insert(key.clone(), Value::String(value.into_owned()));
            level.attribute_keys.push(key);
        }
        self.stack.push(level);
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.flush_text();
        let level = self.stack.pop().ok_or_else(|| {
            Error::MalformedInput(format!("unexpected closing tag `{name}`"))
        })?;
        let value = collapse(level.mapping);
        match self.stack.last_mut() {
            Some(parent) => insert_child(parent, name, value),
            None => self.root = Some(value),
        }
        Ok(())
    }

    /// Merges the pending character data into the innermost open element
    /// under [`TEXT_KEY`]. Whitespace-only text is discarded. Text outside
    /// any element has nowhere to go and is dropped.
    fn flush_text(&mut self) {
        if self.text.trim().is_empty() {
            self.text.clear();
            return;
        }
        let text = std::mem::take(&mut self.text);
        if let Some(level) = self.stack.last_mut() {
            match level.mapping.get_mut(TEXT_KEY) {
                Some(Value::String(existing)) => existing.push_str(&text),
                _ => {
                    level.mapping.insert(TEXT_KEY, Value::String(text));
                }
            }
        }
    }

    fn finish(self) -> Result<Value> {
        if !self.stack.is_empty() {
            return Err(Error::MalformedInput(
                "unexpected end of document inside an element".to_string(),
            ));
        }
        self.root.ok_or(Error::EmptyDocument)
    }
}

/// A mapping holding nothing but flushed text collapses to the bare scalar;
/// this is what lets `<id>1</id>` populate a scalar field directly.
fn collapse(mut mapping: Object) -> Value {
    if mapping.len() == 1 {
        if let Some(text) = mapping.remove(TEXT_KEY) {
            return text;
        }
    }
    Value::Object(mapping)
}

/// Inserts a completed child under its tag name: first occurrence directly,
/// a repeat converts the entry into a two-element sequence, further repeats
/// append. An entry still holding an attribute value is overwritten instead.
fn insert_child(parent: &mut Level, name: &str, value: Value) {
    if let Some(position) = parent.attribute_keys.iter().position(|key| key == name) {
        parent.attribute_keys.swap_remove(position);
        parent.mapping.insert(name, value);
        return;
    }
    match parent.mapping.get_mut(name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::take(existing);
            *existing = Value::Array(Array::from(vec![first, value]));
        }
        None => {
            parent.mapping.insert(name, value);
        }
    }
}

fn element_name(start: &BytesStart<'_>) -> Result<String> {
    name_from_bytes(start.name().as_ref())
}

fn name_from_bytes(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(Error::malformed)
}

fn resolve_entity(name: &str) -> Result<char> {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => resolve_char_ref(name),
    };
    resolved.ok_or_else(|| Error::MalformedInput(format!("unknown entity `&{name};`")))
}

fn resolve_char_ref(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_element_collapses_to_scalar() -> Result<()> {
        let tree = build(b"<company><name>Acme</name></company>")?;
        let obj = tree.as_object().ok_or(Error::EmptyDocument)?;
        assert_eq!(obj.get("name"), Some(&Value::String("Acme".to_string())));
        Ok(())
    }

    #[test]
    fn test_repeated_children_collapse_into_sequence() -> Result<()> {
        let tree = build(b"<company><tag>a</tag><tag>b</tag><tag>c</tag></company>")?;
        let obj = tree.as_object().ok_or(Error::EmptyDocument)?;
        let tags = obj.get("tag").and_then(Value::as_array).ok_or(Error::EmptyDocument)?;
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0], Value::String("a".to_string()));
        assert_eq!(tags[2], Value::String("c".to_string()));
        Ok(())
    }

    #[test]
    fn test_single_child_stays_a_mapping() -> Result<()> {
        // One repetition of a repeatable element is indistinguishable from a
        // singular child here; promoting it is the mapper's job.
        let tree = build_with_root(b"<root><item><id>1</id></item></root>", "root")?;
        let obj = tree.as_object().ok_or(Error::EmptyDocument)?;
        let item = obj.get("item").and_then(Value::as_object).ok_or(Error::EmptyDocument)?;
        assert_eq!(item.get("id"), Some(&Value::String("1".to_string())));
        Ok(())
    }

    #[test]
    fn test_attributes_share_the_element_namespace() -> Result<()> {
        let tree = build(b"<company id=\"7\"><name>Acme</name></company>")?;
        let obj = tree.as_object().ok_or(Error::EmptyDocument)?;
        assert_eq!(obj.get("id"), Some(&Value::String("7".to_string())));
        assert_eq!(obj.get("name"), Some(&Value::String("Acme".to_string())));
        Ok(())
    }

    #[test]
    fn test_mixed_content_keeps_text_under_reserved_key() -> Result<()> {
        let tree = build(b"<note>urgent<flag>true</flag></note>")?;
        let obj = tree.as_object().ok_or(Error::EmptyDocument)?;
        assert_eq!(obj.get(TEXT_KEY), Some(&Value::String("urgent".to_string())));
        assert_eq!(obj.get("flag"), Some(&Value::String("true".to_string())));
        Ok(())
    }

    #[test]
    fn test_self_closing_element_becomes_empty_mapping() -> Result<()> {
        let tree = build(b"<company><address/></company>")?;
        let obj = tree.as_object().ok_or(Error::EmptyDocument)?;
        assert_eq!(obj.get("address"), Some(&Value::Object(Object::new())));
        Ok(())
    }

    #[test]
    fn test_root_mismatch() {
        let result = build_with_root(b"<employee/>", "company");
        assert_eq!(
            result,
            Err(Error::RootElementMismatch {
                expected: "company".to_string(),
                found: "employee".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(build(b""), Err(Error::EmptyDocument));
        assert_eq!(
            build(b"<?xml version=\"1.0\" encoding=\"utf-8\"?>"),
            Err(Error::EmptyDocument)
        );
    }

    #[test]
    fn test_entity_resolution() {
        assert_eq!(resolve_entity("amp"), Ok('&'));
        assert_eq!(resolve_entity("#65"), Ok('A'));
        assert_eq!(resolve_entity("#x41"), Ok('A'));
        assert!(resolve_entity("nbsp").is_err());
    }
}
