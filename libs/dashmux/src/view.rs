//! Sub-application contract and the adapter that mounts one onto the shared
//! server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::routing::get;
use axum::Router;
use parking_lot::RwLock;

use crate::markup::{Asset, Node};
use crate::middleware::access_gate;
use crate::registry::ViewRegistry;

/// Accessibility predicate, evaluated fresh on every menu render and on every
/// gated request.
pub type AccessFn = Arc<dyn Fn() -> bool + Send + Sync + 'static>;

/// One independently authored dashboard, mountable under a URL prefix.
///
/// The registry only ever talks to this interface: it reads the root content
/// through [`DashboardApp::content`] on every request and mounts
/// [`DashboardApp::router`] under the base path. Implementations stay unaware
/// of the navigation shell wrapped around them.
pub trait DashboardApp: Send + Sync + 'static {
    /// Display name, also the default menu label.
    fn name(&self) -> &str;

    /// URL prefix the app is mounted under.
    fn base_path(&self) -> &str {
        "/"
    }

    /// Root page content, re-evaluated per request.
    fn content(&self) -> Node;

    /// The app's own routes (data endpoints etc.), nested under the base
    /// path and gated together with the root page.
    fn router(&self) -> Router {
        Router::new()
    }

    fn external_scripts(&self) -> Vec<Asset> {
        Vec::new()
    }

    fn external_stylesheets(&self) -> Vec<Asset> {
        Vec::new()
    }
}

/// Wraps one [`DashboardApp`] with its registration metadata and performs the
/// one-time embed step when the registry mounts it.
pub struct ViewAdapter {
    app: Arc<dyn DashboardApp>,
    name: String,
    category: Option<String>,
    icon: Option<Node>,
    visible: bool,
    base_path: String,
    access: RwLock<AccessFn>,
    page_title: RwLock<Option<String>>,
    scripts: RwLock<Vec<Asset>>,
    stylesheets: RwLock<Vec<Asset>>,
    injected_scripts: RwLock<Vec<String>>,
    embedded: AtomicBool,
}

impl ViewAdapter {
    pub fn new(app: impl DashboardApp) -> Self {
        Self::from_app(Arc::new(app))
    }

    pub fn from_app(app: Arc<dyn DashboardApp>) -> Self {
        let name = app.name().to_string();
        let base_path = normalize_base_path(app.base_path());
        Self {
            app,
            name,
            category: None,
            icon: None,
            visible: true,
            base_path,
            access: RwLock::new(Arc::new(|| true)),
            page_title: RwLock::new(None),
            scripts: RwLock::new(Vec::new()),
            stylesheets: RwLock::new(Vec::new()),
            injected_scripts: RwLock::new(Vec::new()),
            embedded: AtomicBool::new(false),
        }
    }

    /// Override the display name used in the menu and the page title.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Group this view under a two-level menu category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_icon(mut self, icon: Node) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Mount the view without a menu entry.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_access(self, access: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        *self.access.write() = Arc::new(access);
        self
    }

    /// Swap the accessibility predicate after registration. Takes effect on
    /// the next menu render and the next gated request.
    pub fn set_access(&self, access: impl Fn() -> bool + Send + Sync + 'static) {
        *self.access.write() = Arc::new(access);
    }

    pub fn is_accessible(&self) -> bool {
        (self.access.read())()
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn icon(&self) -> Option<Node> {
        self.icon.clone()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn content(&self) -> Node {
        self.app.content()
    }

    pub fn page_title(&self) -> String {
        self.page_title
            .read()
            .clone()
            .unwrap_or_else(|| self.name.clone())
    }

    pub fn scripts(&self) -> Vec<Asset> {
        self.scripts.read().clone()
    }

    pub fn stylesheets(&self) -> Vec<Asset> {
        self.stylesheets.read().clone()
    }

    /// Inline scripts injected by the template's client-side callbacks,
    /// rendered at the end of every page of this view.
    pub fn injected_scripts(&self) -> Vec<String> {
        self.injected_scripts.read().clone()
    }

    pub fn inject_script(&self, script: impl Into<String>) {
        self.injected_scripts.write().push(script.into());
    }

    /// One-time embed: merge asset lists, derive the page title, assemble the
    /// gated sub-router, and let the template register client-side callbacks.
    ///
    /// Returns `None` when the adapter was embedded before; re-registration
    /// is a no-op apart from an informational log line.
    pub(crate) fn embed(self: &Arc<Self>, registry: &Arc<ViewRegistry>) -> Option<Router> {
        if self.embedded.swap(true, Ordering::SeqCst) {
            tracing::info!(view = %self.name, "view already embedded, skipping route mount");
            return None;
        }

        let config = registry.config();
        let template = registry.template();

        // Concatenation, not deduplication: duplicate URLs stay duplicated.
        {
            let mut scripts = self.scripts.write();
            scripts.extend(self.app.external_scripts());
            scripts.extend(config.external_scripts.iter().cloned());
            scripts.extend(template.external_scripts());

            let mut stylesheets = self.stylesheets.write();
            stylesheets.extend(self.app.external_stylesheets());
            stylesheets.extend(config.external_stylesheets.iter().cloned());
            stylesheets.extend(template.external_stylesheets());
        }

        let title = match &self.category {
            Some(category) => format!("{} - {}", self.name, category),
            None => self.name.clone(),
        };
        *self.page_title.write() = Some(title);

        let shell = {
            let registry = Arc::clone(registry);
            let view = Arc::clone(self);
            move || {
                let registry = registry.clone();
                let view = view.clone();
                async move { registry.render_page(&view) }
            }
        };
        let sub = Router::new()
            .route("/", get(shell))
            .merge(self.app.router());

        template.add_callbacks(self);

        // The gate layer covers every handler under this view's base path.
        let view = Arc::clone(self);
        let sub = sub.layer(middleware::from_fn(move |req: Request, next: Next| {
            let view = view.clone();
            async move { access_gate(view, req, next).await }
        }));

        tracing::debug!(view = %self.name, base_path = %self.base_path, "view embedded");
        Some(sub)
    }
}

/// Normalize a configured URL prefix: leading slash, no trailing slash
/// (except the bare root).
pub(crate) fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return "/".to_string();
    }
    let mut path = String::new();
    if !trimmed.starts_with('/') {
        path.push('/');
    }
    path.push_str(trimmed.trim_end_matches('/'));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Element;

    struct Dummy;

    impl DashboardApp for Dummy {
        fn name(&self) -> &str {
            "Dummy"
        }
        fn base_path(&self) -> &str {
            "/two/"
        }
        fn content(&self) -> Node {
            Element::new("div").text("dummy").into()
        }
    }

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path(""), "/");
        assert_eq!(normalize_base_path("/two/"), "/two");
        assert_eq!(normalize_base_path("two"), "/two");
        assert_eq!(normalize_base_path("/a/b/"), "/a/b");
    }

    #[test]
    fn adapter_takes_name_and_path_from_app() {
        let view = ViewAdapter::new(Dummy);
        assert_eq!(view.display_name(), "Dummy");
        assert_eq!(view.base_path(), "/two");
        assert!(view.visible());
        assert!(view.is_accessible());
    }

    #[test]
    fn access_predicate_is_swappable() {
        let view = ViewAdapter::new(Dummy).with_access(|| false);
        assert!(!view.is_accessible());
        view.set_access(|| true);
        assert!(view.is_accessible());
    }

    #[test]
    fn page_title_falls_back_to_name_before_embed() {
        let view = ViewAdapter::new(Dummy).with_category("Ops");
        assert_eq!(view.page_title(), "Dummy");
    }
}
