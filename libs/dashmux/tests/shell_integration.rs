//! End-to-end composition: two views mounted on one router, shell rendering,
//! menu filtering and the access gate, all exercised through real requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use dashmux::{
    DashboardApp, Element, Node, RouteGroup, TemplateMode, ViewAdapter, ViewRegistry,
};

struct FirstDash;

impl DashboardApp for FirstDash {
    fn name(&self) -> &str {
        "First Dashboard"
    }
    fn content(&self) -> Node {
        Element::new("div").text("This is the first dashboard").into()
    }
}

struct SecondDash {
    hits: Arc<AtomicUsize>,
}

impl DashboardApp for SecondDash {
    fn name(&self) -> &str {
        "Second Dashboard"
    }
    fn base_path(&self) -> &str {
        "/two/"
    }
    fn content(&self) -> Node {
        Element::new("div").text("This is the second dashboard").into()
    }
    fn router(&self) -> Router {
        let hits = self.hits.clone();
        let handler = move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                "42"
            }
        };
        Router::new().route("/data", get(handler))
    }
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn shell_wraps_each_view_with_the_shared_navigation() {
    let registry = ViewRegistry::new(TemplateMode::Plain);
    registry.add_view(ViewAdapter::new(FirstDash));
    registry.add_view(ViewAdapter::new(SecondDash {
        hits: Arc::new(AtomicUsize::new(0)),
    }));
    let router = registry.router();

    let root = router.clone().oneshot(get_request("/")).await.unwrap();
    assert_eq!(root.status(), StatusCode::OK);
    let page = body_text(root).await;
    assert!(page.contains("This is the first dashboard"));
    assert!(page.contains(r#"href="/two""#));
    assert!(page.contains("First Dashboard"));
    assert!(page.contains("Second Dashboard"));

    let second = router.oneshot(get_request("/two")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let page = body_text(second).await;
    assert!(page.contains("This is the second dashboard"));
    assert!(page.contains("<title>Second Dashboard</title>"));
}

#[tokio::test]
async fn gate_denies_the_whole_prefix_and_skips_handlers() {
    let hits = Arc::new(AtomicUsize::new(0));
    let registry = ViewRegistry::new(TemplateMode::Plain);
    registry.add_view(ViewAdapter::new(FirstDash));
    let second = registry.add_view(ViewAdapter::new(SecondDash { hits: hits.clone() }).with_access(|| false));
    let router = registry.router();

    // Both the page and the view's own data route are gated.
    let page = router.clone().oneshot(get_request("/two")).await.unwrap();
    assert_eq!(page.status(), StatusCode::UNAUTHORIZED);
    let data = router.clone().oneshot(get_request("/two/data")).await.unwrap();
    assert_eq!(data.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    // The other view keeps serving, and its menu no longer lists the gated one.
    let root = router.clone().oneshot(get_request("/")).await.unwrap();
    assert_eq!(root.status(), StatusCode::OK);
    let body = body_text(root).await;
    assert!(!body.contains(r#"href="/two""#));

    // Flipping the predicate re-opens the prefix on the next request.
    second.set_access(|| true);
    let data = router.oneshot(get_request("/two/data")).await.unwrap();
    assert_eq!(data.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn route_groups_are_mounted_without_the_gate() {
    let registry = ViewRegistry::new(TemplateMode::Plain);
    registry.add_view(ViewAdapter::new(FirstDash));
    registry.add_route_group(RouteGroup::new(
        "Status",
        "/status",
        Router::new().route("/", get(|| async { "ok" })),
    ));
    let router = registry.router();

    let status = router.clone().oneshot(get_request("/status")).await.unwrap();
    assert_eq!(status.status(), StatusCode::OK);

    let root = router.oneshot(get_request("/")).await.unwrap();
    let body = body_text(root).await;
    assert!(body.contains(r#"href="/status""#));
    assert!(body.contains("Status"));
}

#[tokio::test]
async fn themed_shell_carries_assets_and_theme_script() {
    let registry = ViewRegistry::new(TemplateMode::Themed);
    registry.add_view(ViewAdapter::new(FirstDash));
    let router = registry.router();

    let root = router.oneshot(get_request("/")).await.unwrap();
    let page = body_text(root).await;
    assert!(page.contains("bootstrap.min.css"));
    assert!(page.contains("bootstrap.bundle.min.js"));
    assert!(page.contains("dashmux-theme-toggle"));
    assert!(page.contains("data-bs-theme"));
    assert!(page.contains("navbar-toggler"));
}
