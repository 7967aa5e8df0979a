//! Pluggable look-and-feel strategies for the page shell.
//!
//! A strategy produces the navbar, the content container and the footer, and
//! may inject client-side behaviors into a view. Strategies hold no state;
//! everything they need arrives as explicit parameters.

mod plain;
mod themed;

use std::sync::Arc;

pub use plain::PlainTemplate;
pub use themed::ThemedTemplate;

use crate::markup::{Asset, Element, Node};
use crate::menu::MenuNode;
use crate::view::ViewAdapter;

/// Rendering strategy invoked fresh on every request.
pub trait TemplateStrategy: Send + Sync + 'static {
    /// Navigation bar built from the current accessible menu nodes plus the
    /// registry's extra link elements.
    fn navbar(&self, brand: &str, items: &[Arc<MenuNode>], extra_links: &[Node]) -> Node;

    /// Compose navbar, sub-app content and footer into the page body.
    fn app_container(&self, navbar: Node, content: Node, footer: Node) -> Node;

    fn footer(&self) -> Node;

    /// Link elements the strategy contributes to every navbar (e.g. a theme
    /// toggle). Collected once at registry construction.
    fn extra_links(&self) -> Vec<Node> {
        Vec::new()
    }

    /// Register client-side behaviors on a view during its embed step.
    fn add_callbacks(&self, view: &ViewAdapter) {
        let _ = view;
    }

    fn external_scripts(&self) -> Vec<Asset> {
        Vec::new()
    }

    fn external_stylesheets(&self) -> Vec<Asset> {
        Vec::new()
    }
}

/// Which strategy a registry uses. `Custom` carries a user-supplied
/// implementation of [`TemplateStrategy`].
pub enum TemplateMode {
    /// Minimalist markup, zero external assets.
    Plain,
    /// Bootstrap-based shell with collapsible navbar and a persisted
    /// light/dark theme toggle.
    Themed,
    Custom(Arc<dyn TemplateStrategy>),
}

impl TemplateMode {
    pub(crate) fn strategy(self) -> Arc<dyn TemplateStrategy> {
        match self {
            TemplateMode::Plain => Arc::new(PlainTemplate),
            TemplateMode::Themed => Arc::new(ThemedTemplate),
            TemplateMode::Custom(strategy) => strategy,
        }
    }
}

/// Render the full HTML document around a composed shell body.
pub fn render_document(
    title: &str,
    stylesheets: &[Asset],
    scripts: &[Asset],
    body: Node,
    inline_scripts: &[String],
) -> String {
    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1"),
        )
        .child(Element::new("title").text(title))
        .children(stylesheets.iter().map(Asset::stylesheet_node));

    let body = Element::new("body")
        .child(body)
        .children(scripts.iter().map(Asset::script_node))
        .children(
            inline_scripts
                .iter()
                .map(|js| Element::new("script").child(Node::raw(js.clone())).into()),
        );

    let html = Element::new("html")
        .attr("lang", "en")
        .child(head)
        .child(body);

    let mut out = String::from("<!doctype html>");
    out.push_str(&Node::from(html).render());
    out
}
