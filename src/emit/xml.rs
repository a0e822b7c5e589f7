//! A small XML element tree with the indented layout MSBuild files use.

use crate::emit::{LINE_ENDING, UTF8_BOM};

/// MSBuild project namespace.
pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

/// An XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute. Attributes render in insertion order.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append `<key>value</key>`.
    pub fn push_key(&mut self, key: &str, value: impl Into<String>) {
        self.push(Element::new(key).text(value));
    }

    /// True when the element has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn has_child_elements(&self) -> bool {
        self.children.iter().any(|c| matches!(c, Node::Element(_)))
    }

    fn render(&self, depth: usize, out: &mut String) {
        let indent = INDENT.repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value, true));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');

        if !self.has_child_elements() {
            for child in &self.children {
                if let Node::Text(text) = child {
                    out.push_str(&escape(text, false));
                }
            }
        } else {
            for child in &self.children {
                out.push_str(LINE_ENDING);
                match child {
                    Node::Element(element) => element.render(depth + 1, out),
                    Node::Text(text) => {
                        out.push_str(&INDENT.repeat(depth + 1));
                        out.push_str(&escape(text, false));
                    }
                }
            }
            out.push_str(LINE_ENDING);
            out.push_str(&indent);
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Render a document: BOM, XML declaration, then the root element.
pub fn render_document(root: &Element) -> Vec<u8> {
    let mut text = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>");
    text.push_str(LINE_ENDING);
    root.render(0, &mut text);

    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(text.as_bytes());
    bytes
}
