//! Navigation menu forest: flat leaves and two-level categories.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::markup::Node;
use crate::view::{AccessFn, ViewAdapter};

/// What a node points at. Only `Category` nodes may carry children.
pub enum MenuKind {
    Category,
    /// Leaf bound to a mounted view; resolves its URL from the adapter.
    View(Arc<ViewAdapter>),
    /// Leaf pointing at an externally registered route group.
    Route { href: String, access: AccessFn },
}

/// A node in the navigation forest. Children keep insertion order, which is
/// also display order.
pub struct MenuNode {
    name: String,
    icon: Option<Node>,
    parent: RwLock<Weak<MenuNode>>,
    children: RwLock<Vec<Arc<MenuNode>>>,
    kind: MenuKind,
}

impl MenuNode {
    pub fn category(name: impl Into<String>, icon: Option<Node>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            icon,
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
            kind: MenuKind::Category,
        })
    }

    pub fn view(view: &Arc<ViewAdapter>) -> Arc<Self> {
        Arc::new(Self {
            name: view.display_name().to_string(),
            icon: view.icon(),
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
            kind: MenuKind::View(Arc::clone(view)),
        })
    }

    pub fn route(name: impl Into<String>, href: impl Into<String>, icon: Option<Node>) -> Arc<Self> {
        Self::route_with_access(name, href, icon, Arc::new(|| true))
    }

    pub fn route_with_access(
        name: impl Into<String>,
        href: impl Into<String>,
        icon: Option<Node>,
        access: AccessFn,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            icon,
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
            kind: MenuKind::Route {
                href: href.into(),
                access,
            },
        })
    }

    /// Append a child and set its parent backlink. Leaves reject children.
    pub fn add_child(self: &Arc<Self>, child: &Arc<MenuNode>) {
        if !self.is_category() {
            tracing::warn!(node = %self.name, "only category nodes may have children");
            return;
        }
        *child.parent.write() = Arc::downgrade(self);
        self.children.write().push(Arc::clone(child));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> Option<Node> {
        self.icon.clone()
    }

    pub fn parent(&self) -> Option<Arc<MenuNode>> {
        self.parent.read().upgrade()
    }

    /// Full child sequence, unfiltered; accessibility filtering is the
    /// caller's responsibility.
    pub fn children(&self) -> Vec<Arc<MenuNode>> {
        self.children.read().clone()
    }

    pub fn is_category(&self) -> bool {
        matches!(self.kind, MenuKind::Category)
    }

    /// `None` for categories, the view's base path for view leaves, the
    /// stored prefix for route leaves.
    pub fn url(&self) -> Option<String> {
        match &self.kind {
            MenuKind::Category => None,
            MenuKind::View(view) => Some(view.base_path().to_string()),
            MenuKind::Route { href, .. } => Some(href.clone()),
        }
    }

    /// Derived accessibility: a category is accessible iff at least one child
    /// is; leaves delegate to their predicate. Evaluated fresh on every call.
    pub fn is_accessible(&self) -> bool {
        match &self.kind {
            MenuKind::Category => self.children.read().iter().any(|c| c.is_accessible()),
            MenuKind::View(view) => view.is_accessible(),
            MenuKind::Route { access, .. } => access(),
        }
    }
}
