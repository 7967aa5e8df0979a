//! Minimal HTML element tree.
//!
//! Views, templates and the menu exchange `Node` values; nothing here knows
//! about routing or reactivity. Rendering escapes text and attribute values,
//! `Node::raw` bypasses escaping for trusted fragments.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Elements that never carry children and render without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Escape `&`, `<`, `>`, `"` and `'` for safe interpolation into HTML.
pub fn escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// One node of a UI element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Escaped on render.
    Text(String),
    /// Rendered verbatim. Only for fragments the caller controls.
    Raw(String),
    /// A sequence of siblings without a wrapping element.
    Fragment(Vec<Node>),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn raw(value: impl Into<String>) -> Self {
        Node::Raw(value.into())
    }

    pub fn fragment(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Fragment(children.into_iter().collect())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_to(out),
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Raw(raw) => out.push_str(raw),
            Node::Fragment(children) => {
                for child in children {
                    child.write_to(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An HTML element with attributes in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Node::text(value))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// An external asset reference: a bare URL or a full attribute map
/// (e.g. `src` plus `defer`/`integrity`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asset {
    Url(String),
    Attrs(BTreeMap<String, String>),
}

impl Asset {
    pub fn url(value: impl Into<String>) -> Self {
        Asset::Url(value.into())
    }

    /// `<link rel="stylesheet">` node for this asset.
    pub fn stylesheet_node(&self) -> Node {
        match self {
            Asset::Url(href) => Element::new("link")
                .attr("rel", "stylesheet")
                .attr("href", href)
                .into(),
            Asset::Attrs(attrs) => {
                let mut el = Element::new("link");
                if !attrs.contains_key("rel") {
                    el = el.attr("rel", "stylesheet");
                }
                for (name, value) in attrs {
                    el = el.attr(name, value);
                }
                el.into()
            }
        }
    }

    /// `<script>` node for this asset.
    pub fn script_node(&self) -> Node {
        match self {
            Asset::Url(src) => Element::new("script").attr("src", src).into(),
            Asset::Attrs(attrs) => {
                let mut el = Element::new("script");
                for (name, value) in attrs {
                    el = el.attr(name, value);
                }
                el.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_elements() {
        let node: Node = Element::new("div")
            .class("box")
            .child(Element::new("span").text("hi"))
            .into();
        assert_eq!(node.render(), r#"<div class="box"><span>hi</span></div>"#);
    }

    #[test]
    fn escapes_text_and_attributes() {
        let node: Node = Element::new("a")
            .attr("href", "/x?a=1&b=2")
            .text("<script>")
            .into();
        assert_eq!(
            node.render(),
            r#"<a href="/x?a=1&amp;b=2">&lt;script&gt;</a>"#
        );
    }

    #[test]
    fn raw_is_not_escaped() {
        assert_eq!(Node::raw("<b>x</b>").render(), "<b>x</b>");
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node: Node = Element::new("link").attr("rel", "stylesheet").into();
        assert_eq!(node.render(), r#"<link rel="stylesheet">"#);
    }

    #[test]
    fn fragment_renders_siblings_in_order() {
        let node = Node::fragment([Node::text("a"), Node::text("b")]);
        assert_eq!(node.render(), "ab");
    }

    #[test]
    fn asset_url_nodes() {
        let css = Asset::url("https://cdn.example/x.css");
        assert_eq!(
            css.stylesheet_node().render(),
            r#"<link rel="stylesheet" href="https://cdn.example/x.css">"#
        );
        let js = Asset::url("https://cdn.example/x.js");
        assert_eq!(
            js.script_node().render(),
            r#"<script src="https://cdn.example/x.js"></script>"#
        );
    }

    #[test]
    fn asset_attr_map_is_rendered_in_key_order() {
        let mut attrs = BTreeMap::new();
        attrs.insert("src".to_string(), "/app.js".to_string());
        attrs.insert("defer".to_string(), "defer".to_string());
        let js = Asset::Attrs(attrs);
        assert_eq!(
            js.script_node().render(),
            r#"<script defer="defer" src="/app.js"></script>"#
        );
    }

    #[test]
    fn asset_deserializes_from_url_or_map() {
        let url: Asset = serde_json::from_str(r#""https://cdn.example/a.css""#).unwrap();
        assert_eq!(url, Asset::url("https://cdn.example/a.css"));

        let map: Asset = serde_json::from_str(r#"{"src": "/a.js", "defer": "defer"}"#).unwrap();
        match map {
            Asset::Attrs(attrs) => assert_eq!(attrs.get("src").unwrap(), "/a.js"),
            other => panic!("expected attrs, got {other:?}"),
        }
    }
}
