use std::collections::BTreeMap;
use std::sync::Arc;

use crate::markup::{Asset, Element, Node};
use crate::menu::MenuNode;
use crate::template::TemplateStrategy;
use crate::view::ViewAdapter;

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js";

/// Restores the persisted theme on load and flips it from the navbar toggle.
/// The chosen theme lives in localStorage and is applied as `data-bs-theme`
/// on the document root.
const THEME_SCRIPT: &str = "\
(function () {\
  var key = 'dashmux-theme';\
  var root = document.documentElement;\
  var saved = localStorage.getItem(key);\
  if (saved) { root.setAttribute('data-bs-theme', saved); }\
  var toggle = document.getElementById('dashmux-theme-toggle');\
  if (!toggle) { return; }\
  toggle.addEventListener('click', function () {\
    var next = root.getAttribute('data-bs-theme') === 'dark' ? 'light' : 'dark';\
    root.setAttribute('data-bs-theme', next);\
    localStorage.setItem(key, next);\
  });\
})();";

/// Bootstrap 5 shell: brand + collapsible navbar on narrow viewports,
/// dropdown categories, and a light/dark toggle persisted client-side.
pub struct ThemedTemplate;

impl ThemedTemplate {
    fn leaf_link(node: &MenuNode, class: &str) -> Node {
        let href = node.url().unwrap_or_else(|| "/".to_string());
        let mut link = Element::new("a").class(class).attr("href", href);
        if let Some(icon) = node.icon() {
            link = link.child(icon);
        }
        link.text(node.name()).into()
    }

    fn item(node: &Arc<MenuNode>) -> Node {
        if !node.is_category() {
            return Element::new("li")
                .class("nav-item")
                .child(Self::leaf_link(node, "nav-link"))
                .into();
        }
        let children = node
            .children()
            .into_iter()
            .filter(|c| c.is_accessible())
            .map(|c| Node::from(Element::new("li").child(Self::leaf_link(&c, "dropdown-item"))));
        Element::new("li")
            .class("nav-item dropdown")
            .child(
                Element::new("a")
                    .class("nav-link dropdown-toggle")
                    .attr("href", "#")
                    .attr("role", "button")
                    .attr("data-bs-toggle", "dropdown")
                    .attr("aria-expanded", "false")
                    .text(node.name()),
            )
            .child(Element::new("ul").class("dropdown-menu").children(children))
            .into()
    }
}

impl TemplateStrategy for ThemedTemplate {
    fn navbar(&self, brand: &str, items: &[Arc<MenuNode>], extra_links: &[Node]) -> Node {
        let toggler = Element::new("button")
            .class("navbar-toggler")
            .attr("type", "button")
            .attr("data-bs-toggle", "collapse")
            .attr("data-bs-target", "#dashmux-navbar")
            .attr("aria-controls", "dashmux-navbar")
            .attr("aria-expanded", "false")
            .attr("aria-label", "Toggle navigation")
            .child(Element::new("span").class("navbar-toggler-icon"));

        let left = Element::new("ul")
            .class("navbar-nav me-auto")
            .children(items.iter().map(Self::item));
        let right = Element::new("ul").class("navbar-nav ms-auto").children(
            extra_links
                .iter()
                .map(|link| Element::new("li").class("nav-item").child(link.clone()).into()),
        );

        Element::new("nav")
            .class("navbar navbar-expand-lg border-bottom")
            .child(
                Element::new("div")
                    .class("container-fluid")
                    .child(
                        Element::new("a")
                            .class("navbar-brand")
                            .attr("href", "/")
                            .text(brand),
                    )
                    .child(toggler)
                    .child(
                        Element::new("div")
                            .class("collapse navbar-collapse")
                            .id("dashmux-navbar")
                            .child(left)
                            .child(right),
                    ),
            )
            .into()
    }

    fn app_container(&self, navbar: Node, content: Node, footer: Node) -> Node {
        Element::new("div")
            .child(navbar)
            .child(Element::new("main").class("container py-3").child(content))
            .child(footer)
            .into()
    }

    fn footer(&self) -> Node {
        Element::new("footer")
            .class("border-top py-3 mt-auto")
            .child(Element::new("div").class("container-fluid"))
            .into()
    }

    fn extra_links(&self) -> Vec<Node> {
        vec![Element::new("button")
            .class("btn nav-link")
            .id("dashmux-theme-toggle")
            .attr("type", "button")
            .attr("aria-label", "Toggle theme")
            .text("\u{25d0}")
            .into()]
    }

    fn add_callbacks(&self, view: &ViewAdapter) {
        view.inject_script(THEME_SCRIPT);
    }

    fn external_scripts(&self) -> Vec<Asset> {
        let mut attrs = BTreeMap::new();
        attrs.insert("src".to_string(), BOOTSTRAP_JS.to_string());
        attrs.insert("defer".to_string(), "defer".to_string());
        vec![Asset::Attrs(attrs)]
    }

    fn external_stylesheets(&self) -> Vec<Asset> {
        vec![Asset::url(BOOTSTRAP_CSS)]
    }
}
