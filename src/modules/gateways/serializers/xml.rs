//! XML envelopes with dotted-key nesting.
//!
//! `Extra.ORDERSTATUS = QUERY` under root `CC5Request` encodes as
//! `<CC5Request><Extra><ORDERSTATUS>QUERY</ORDERSTATUS></Extra></CC5Request>`,
//! and decoding flattens nested elements back into the same dotted keys.

use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{DecodedPayload, WireFormat};
use crate::core::{FieldMap, PosError, Result};

enum Node<'a> {
    Leaf(&'a str),
    Branch(IndexMap<&'a str, Node<'a>>),
}

fn build_tree(fields: &FieldMap) -> Result<IndexMap<&str, Node<'_>>> {
    let mut root: IndexMap<&str, Node<'_>> = IndexMap::new();

    for (key, value) in fields {
        let mut segments = key.split('.').peekable();
        let mut level = &mut root;
        while let Some(segment) = segments.next() {
            if segment.is_empty() {
                return Err(PosError::serialization(format!("invalid field key '{}'", key)));
            }
            if segments.peek().is_none() {
                if level.insert(segment, Node::Leaf(value.as_str())).is_some() {
                    return Err(PosError::serialization(format!("duplicate field '{}'", key)));
                }
                break;
            }
            let node = level
                .entry(segment)
                .or_insert_with(|| Node::Branch(IndexMap::new()));
            level = match node {
                Node::Branch(children) => children,
                Node::Leaf(_) => {
                    return Err(PosError::serialization(format!(
                        "field '{}' nests under a scalar",
                        key
                    )))
                }
            };
        }
    }

    Ok(root)
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> std::result::Result<(), String> {
    writer.write_event(event).map_err(|e| e.to_string())
}

fn write_nodes(
    writer: &mut Writer<Vec<u8>>,
    nodes: &IndexMap<&str, Node<'_>>,
) -> std::result::Result<(), String> {
    for (name, node) in nodes {
        emit(writer, Event::Start(BytesStart::new(*name)))?;
        match node {
            Node::Leaf(value) => {
                if !value.is_empty() {
                    emit(writer, Event::Text(BytesText::new(value)))?;
                }
            }
            Node::Branch(children) => write_nodes(writer, children)?,
        }
        emit(writer, Event::End(BytesEnd::new(*name)))?;
    }
    Ok(())
}

/// Encodes `fields` under `root`, preceded by a UTF-8 declaration
pub fn encode(root: &str, fields: &FieldMap) -> Result<String> {
    let tree = build_tree(fields)?;

    let mut writer = Writer::new(Vec::new());
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .and_then(|_| emit(&mut writer, Event::Start(BytesStart::new(root))))
        .and_then(|_| write_nodes(&mut writer, &tree))
        .and_then(|_| emit(&mut writer, Event::End(BytesEnd::new(root))))
        .map_err(|e| PosError::serialization(format!("XML write failed: {}", e)))?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| PosError::serialization(format!("XML is not UTF-8: {}", e)))
}

struct OpenElement {
    name: String,
    has_children: bool,
    text: String,
}

fn leaf_path(stack: &[OpenElement], name: &str) -> String {
    // The root element is implied
    let mut path: Vec<&str> = stack.iter().skip(1).map(|e| e.name.as_str()).collect();
    if !stack.is_empty() {
        path.push(name);
    }
    if path.is_empty() {
        name.to_string()
    } else {
        path.join(".")
    }
}

fn insert_leaf(fields: &mut FieldMap, path: String, value: String) {
    if !fields.contains_key(&path) {
        fields.insert(path, value);
        return;
    }
    let mut n = 1;
    while fields.contains_key(&format!("{}.{}", path, n)) {
        n += 1;
    }
    fields.insert(format!("{}.{}", path, n), value);
}

/// Flattens the children of the root element into dotted keys.
///
/// Repeated elements get numeric suffixes: `Item`, `Item.1`, `Item.2`.
pub fn decode(text: &str) -> std::result::Result<DecodedPayload, String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut fields = FieldMap::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.is_empty() && saw_root {
                    return Err("multiple root elements".to_string());
                }
                saw_root = true;
                if let Some(parent) = stack.last_mut() {
                    parent.has_children = true;
                }
                stack.push(OpenElement {
                    name: String::from_utf8_lossy(e.local_name().as_ref()).to_string(),
                    has_children: false,
                    text: String::new(),
                });
            }
            Ok(Event::End(_)) => {
                let Some(element) = stack.pop() else {
                    return Err("unbalanced closing tag".to_string());
                };
                if !element.has_children && !stack.is_empty() {
                    let path = leaf_path(&stack, &element.name);
                    insert_leaf(&mut fields, path, element.text);
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match stack.last_mut() {
                    Some(parent) => {
                        parent.has_children = true;
                        let path = leaf_path(&stack, &name);
                        insert_leaf(&mut fields, path, String::new());
                    }
                    None => saw_root = true,
                }
            }
            Ok(Event::Text(e)) => {
                let value = e.unescape().map_err(|e| e.to_string())?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(value.trim()),
                    None => return Err("text outside of the root element".to_string()),
                }
            }
            Ok(Event::CData(e)) => {
                let value = String::from_utf8_lossy(&e.into_inner()).to_string();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&value);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("XML parse error at {}: {}", reader.buffer_position(), e)),
        }
    }

    if !saw_root {
        return Err("no root element".to_string());
    }
    if !stack.is_empty() {
        return Err("unexpected end of document".to_string());
    }

    Ok(DecodedPayload::new(WireFormat::Xml, fields))
}
