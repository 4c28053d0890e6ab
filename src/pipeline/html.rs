//! HTML string → owned, immutable node tree.
//!
//! html5ever builds an `RcDom` full of `Rc<RefCell<…>>` cells. The mapper only
//! ever reads the tree, so it is copied once into plain owned [`HtmlNode`]s:
//! no interior mutability, no reference counting, and nodes can be borrowed
//! freely across the classification and mapping passes.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// One parsed HTML node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Element {
        /// Lower-case local tag name, e.g. `"p"`.
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<HtmlNode>,
    },
    Text(String),
}

impl HtmlNode {
    /// Tag name for elements, `None` for text.
    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Element { tag, .. } => Some(tag),
            HtmlNode::Text(_) => None,
        }
    }

    pub fn is_element(&self, name: &str) -> bool {
        self.tag() == Some(name)
    }

    pub fn children(&self) -> &[HtmlNode] {
        match self {
            HtmlNode::Element { children, .. } => children,
            HtmlNode::Text(_) => &[],
        }
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            HtmlNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            HtmlNode::Text(_) => None,
        }
    }

    /// Concatenated text of this node and all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            HtmlNode::Text(t) => out.push_str(t),
            HtmlNode::Element { tag, children, .. } => {
                if tag == "br" {
                    out.push('\n');
                }
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// First descendant element (excluding `self`) with the given tag.
    pub fn find(&self, name: &str) -> Option<&HtmlNode> {
        for child in self.children() {
            if child.is_element(name) {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// All descendant elements (excluding `self`) with the given tag, in document order.
    pub fn find_all(&self, name: &str) -> Vec<&HtmlNode> {
        let mut out = Vec::new();
        self.collect_all(name, &mut out);
        out
    }

    fn collect_all<'a>(&'a self, name: &str, out: &mut Vec<&'a HtmlNode>) {
        for child in self.children() {
            if child.is_element(name) {
                out.push(child);
            }
            child.collect_all(name, out);
        }
    }
}

/// Parse an HTML fragment and return the children of its `<body>`.
///
/// html5ever always builds a full document; fragments produced from markdown
/// land inside `<body>`, whose children are the top-level nodes the mapper
/// walks. The returned root is a synthetic `body` element.
pub fn parse_html(html: &str) -> HtmlNode {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let body = find_body(&dom.document);
    let children = match body {
        Some(body) => convert_children(&body),
        None => Vec::new(),
    };
    HtmlNode::Element {
        tag: "body".to_string(),
        attrs: Vec::new(),
        children,
    }
}

fn find_body(handle: &Handle) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = handle.data {
        if name.local.as_ref() == "body" {
            return Some(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_body(child) {
            return Some(found);
        }
    }
    None
}

fn convert_children(handle: &Handle) -> Vec<HtmlNode> {
    let mut out = Vec::new();
    for child in handle.children.borrow().iter() {
        match child.data {
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect();
                out.push(HtmlNode::Element {
                    tag: name.local.as_ref().to_ascii_lowercase(),
                    attrs,
                    children: convert_children(child),
                });
            }
            NodeData::Text { ref contents } => {
                let text = contents.borrow().to_string();
                // html5ever may split one run of text into adjacent nodes
                if let Some(HtmlNode::Text(prev)) = out.last_mut() {
                    prev.push_str(&text);
                } else {
                    out.push(HtmlNode::Text(text));
                }
            }
            // Comments, doctypes and processing instructions carry no content.
            _ => {}
        }
    }
    out
}
