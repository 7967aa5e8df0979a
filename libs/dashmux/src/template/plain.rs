use std::sync::Arc;

use crate::markup::{Element, Node};
use crate::menu::MenuNode;
use crate::template::TemplateStrategy;

/// Minimalist shell: semantic markup only, no external assets, no scripts.
pub struct PlainTemplate;

impl PlainTemplate {
    fn leaf_link(node: &MenuNode) -> Node {
        let href = node.url().unwrap_or_else(|| "/".to_string());
        let mut link = Element::new("a").attr("href", href);
        if let Some(icon) = node.icon() {
            link = link.child(icon);
        }
        link.text(node.name()).into()
    }

    fn item(node: &Arc<MenuNode>) -> Node {
        if !node.is_category() {
            return Element::new("li").child(Self::leaf_link(node)).into();
        }
        let children = node
            .children()
            .into_iter()
            .filter(|c| c.is_accessible())
            .map(|c| Node::from(Element::new("li").child(Self::leaf_link(&c))));
        Element::new("li")
            .child(
                Element::new("details")
                    .child(Element::new("summary").text(node.name()))
                    .child(Element::new("ul").children(children)),
            )
            .into()
    }
}

impl TemplateStrategy for PlainTemplate {
    fn navbar(&self, brand: &str, items: &[Arc<MenuNode>], extra_links: &[Node]) -> Node {
        let list = Element::new("ul")
            .children(items.iter().map(Self::item))
            .children(
                extra_links
                    .iter()
                    .map(|link| Element::new("li").child(link.clone()).into()),
            );
        Element::new("nav")
            .child(Element::new("a").attr("href", "/").text(brand))
            .child(list)
            .into()
    }

    fn app_container(&self, navbar: Node, content: Node, footer: Node) -> Node {
        Element::new("div")
            .child(navbar)
            .child(Element::new("main").child(content))
            .child(footer)
            .into()
    }

    fn footer(&self) -> Node {
        Element::new("footer").into()
    }
}
