//! Lightweight markup node model.
//!
//! The renderer never mutates a live browser DOM; it works on a small tree of
//! element and text nodes built from the host document and serialized back to
//! HTML. Attribute order is preserved, attribute values and text are escaped
//! on output, and void elements are emitted without a closing tag.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use scraper::ElementRef;

/// Characters left intact by `encode_uri`.
///
/// Matches the set JavaScript's `encodeURI` leaves unescaped: alphanumerics
/// plus `; , / ? : @ & = + $ - _ . ! ~ * ' ( ) #`. Everything else, including
/// spaces and non-ASCII bytes, is percent-encoded.
const ENCODE_URI_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Percent-encode a resource path for use as a link target or image source.
pub fn encode_uri(input: &str) -> String {
    utf8_percent_encode(input, ENCODE_URI_SET).to_string()
}

// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn escape_text(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// A single node in the markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_html(out),
            Node::Text(text) => escape_text(text, out),
        }
    }

    /// Serialize this node to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

/// An element node with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Convert a parsed element into an owned node tree, preserving document
    /// order of attributes and children.
    pub fn from_element_ref(node: ElementRef) -> Self {
        let mut el = Element::new(node.value().name());
        for (name, value) in node.value().attrs() {
            el.attrs.push((name.to_string(), value.to_string()));
        }
        for child in node.children() {
            if let Some(child_el) = ElementRef::wrap(child) {
                el.children.push(Node::Element(Element::from_element_ref(child_el)));
            } else if let Some(text) = child.value().as_text() {
                el.children.push(Node::Text(text.to_string()));
            }
        }
        el
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            existing.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child element nodes, skipping interleaved text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Concatenated text content of this element and its descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_attr(value, out);
            out.push('"');
        }
        out.push('>');
        if is_void(&self.tag) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    /// Serialize this element and its subtree to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}
