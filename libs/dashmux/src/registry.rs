//! Process-wide registry: owns the shared router, the mounted views, the menu
//! forest and the selected template strategy.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::response::Html;
use axum::Router;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::markup::{Asset, Node};
use crate::menu::MenuNode;
use crate::template::{self, TemplateMode, TemplateStrategy};
use crate::view::{AccessFn, ViewAdapter};

/// Registry-level configuration. Named, typed fields only; unknown keys in a
/// config file are a hard error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ManagerConfig {
    /// Brand text shown at the left edge of every navbar.
    pub brand: String,
    /// Scripts appended to every view's own script list at embed time.
    pub external_scripts: Vec<Asset>,
    /// Stylesheets appended to every view's own stylesheet list at embed time.
    pub external_stylesheets: Vec<Asset>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            brand: "Dashmux".to_string(),
            external_scripts: Vec::new(),
            external_stylesheets: Vec::new(),
        }
    }
}

/// An externally built route group mounted directly on the shared server,
/// bypassing the view embed pipeline.
pub struct RouteGroup {
    pub name: String,
    pub prefix: String,
    pub router: Router,
    pub icon: Option<Node>,
    pub category: Option<String>,
    pub visible: bool,
    pub access: Option<AccessFn>,
}

impl RouteGroup {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, router: Router) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            router,
            icon: None,
            category: None,
            visible: true,
            access: None,
        }
    }

    pub fn with_icon(mut self, icon: Node) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_access(mut self, access: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.access = Some(Arc::new(access));
        self
    }
}

/// Collection of the mounted dashboard apps. Also manages the menu structure.
///
/// All registration happens single-threaded before the server starts serving;
/// request-time work only reads.
pub struct ViewRegistry {
    router: RwLock<Router>,
    views: RwLock<Vec<Arc<ViewAdapter>>>,
    menu_root: RwLock<Vec<Arc<MenuNode>>>,
    category_index: DashMap<String, Arc<MenuNode>>,
    category_icons: DashMap<String, Node>,
    extra_links: RwLock<Vec<Node>>,
    template: Arc<dyn TemplateStrategy>,
    config: ArcSwap<ManagerConfig>,
}

impl ViewRegistry {
    pub fn new(mode: TemplateMode) -> Arc<Self> {
        Self::with_config(mode, ManagerConfig::default())
    }

    pub fn with_config(mode: TemplateMode, config: ManagerConfig) -> Arc<Self> {
        let template = mode.strategy();
        let registry = Arc::new(Self {
            router: RwLock::new(Router::new()),
            views: RwLock::new(Vec::new()),
            menu_root: RwLock::new(Vec::new()),
            category_index: DashMap::new(),
            category_icons: DashMap::new(),
            extra_links: RwLock::new(template.extra_links()),
            template,
            config: ArcSwap::from_pointee(config),
        });
        tracing::debug!(brand = %registry.config().brand, "view registry created");
        registry
    }

    /// Current configuration (cheap clone from ArcSwap).
    pub fn config(&self) -> ManagerConfig {
        (**self.config.load()).clone()
    }

    pub fn set_config(&self, config: ManagerConfig) {
        self.config.store(Arc::new(config));
    }

    pub fn template(&self) -> Arc<dyn TemplateStrategy> {
        Arc::clone(&self.template)
    }

    /// Embed a view and mount it on the shared router; visible views also get
    /// a menu entry. Returns the shared adapter handle so callers can keep
    /// adjusting the accessibility predicate afterwards.
    pub fn add_view(self: &Arc<Self>, view: impl Into<Arc<ViewAdapter>>) -> Arc<ViewAdapter> {
        let view: Arc<ViewAdapter> = view.into();
        if let Some(sub) = view.embed(self) {
            self.mount(view.base_path(), sub);
        }
        self.views.write().push(Arc::clone(&view));
        if view.visible() {
            let node = MenuNode::view(&view);
            self.add_menu_item(node, view.category());
        }
        tracing::info!(view = %view.display_name(), base_path = %view.base_path(), "view registered");
        view
    }

    /// Mount an external route group directly on the shared server and
    /// optionally list it in the menu.
    pub fn add_route_group(self: &Arc<Self>, group: RouteGroup) {
        let RouteGroup {
            name,
            prefix,
            router,
            icon,
            category,
            visible,
            access,
        } = group;
        let prefix = crate::view::normalize_base_path(&prefix);
        self.mount(&prefix, router);
        if visible {
            let node = match access {
                Some(access) => MenuNode::route_with_access(&name, &prefix, icon, access),
                None => MenuNode::route(&name, &prefix, icon),
            };
            self.add_menu_item(node, category.as_deref());
        }
        tracing::info!(group = %name, prefix = %prefix, "route group registered");
    }

    /// Insert a menu node, lazily creating its category on first use. The
    /// category picks its icon from the registry-level icon mapping at
    /// creation time.
    pub fn add_menu_item(&self, node: Arc<MenuNode>, category: Option<&str>) {
        match category {
            None => self.menu_root.write().push(node),
            Some(name) => {
                let category_node = self
                    .category_index
                    .entry(name.to_string())
                    .or_insert_with(|| {
                        let icon = self.category_icons.get(name).map(|icon| icon.value().clone());
                        let created = MenuNode::category(name, icon);
                        self.menu_root.write().push(Arc::clone(&created));
                        created
                    })
                    .clone();
                category_node.add_child(&node);
            }
        }
    }

    /// Icon assigned to a category when it is first created.
    pub fn add_category_icon(&self, category: impl Into<String>, icon: Node) {
        self.category_icons.insert(category.into(), icon);
    }

    /// Extra UI element appended to every navbar (after the menu items).
    pub fn add_link(&self, link: Node) {
        self.extra_links.write().push(link);
    }

    pub fn extra_links(&self) -> Vec<Node> {
        self.extra_links.read().clone()
    }

    /// Accessible top-level menu nodes, evaluated fresh on every call so
    /// per-request predicate changes are reflected immediately.
    pub fn menu(&self) -> Vec<Arc<MenuNode>> {
        self.menu_root
            .read()
            .iter()
            .filter(|node| node.is_accessible())
            .cloned()
            .collect()
    }

    pub fn views(&self) -> Vec<Arc<ViewAdapter>> {
        self.views.read().clone()
    }

    /// The shell builder: re-reads the current menu and links, composes the
    /// view's content through the template and renders the whole document.
    pub fn render_page(&self, view: &ViewAdapter) -> Html<String> {
        let config = self.config();
        let items = self.menu();
        let links = self.extra_links();

        let navbar = self.template.navbar(&config.brand, &items, &links);
        let footer = self.template.footer();
        let shell = self.template.app_container(navbar, view.content(), footer);

        Html(template::render_document(
            &view.page_title(),
            &view.stylesheets(),
            &view.scripts(),
            shell,
            &view.injected_scripts(),
        ))
    }

    /// Snapshot of the shared router with the request tracing layer applied.
    pub fn router(&self) -> Router {
        self.router.read().clone().layer(TraceLayer::new_for_http())
    }

    fn mount(&self, prefix: &str, sub: Router) {
        let mut router = self.router.write();
        let current = std::mem::take(&mut *router);
        *router = if prefix == "/" {
            current.merge(sub)
        } else {
            current.nest(prefix, sub)
        };
    }
}
