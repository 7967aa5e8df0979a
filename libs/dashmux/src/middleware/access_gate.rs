use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::view::ViewAdapter;

/// Gate every route under a view's base path behind the view's accessibility
/// predicate. Denied requests short-circuit with 401 before the inner handler
/// runs; allowed requests pass through unchanged.
pub async fn access_gate(view: Arc<ViewAdapter>, req: Request, next: Next) -> Response {
    if !view.is_accessible() {
        tracing::debug!(
            view = %view.display_name(),
            path = %req.uri().path(),
            "access denied"
        );
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::middleware;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use crate::markup::{Element, Node};
    use crate::view::DashboardApp;

    struct App;

    impl DashboardApp for App {
        fn name(&self) -> &str {
            "App"
        }
        fn content(&self) -> Node {
            Element::new("div").into()
        }
    }

    fn gated_router(view: Arc<ViewAdapter>, hits: Arc<AtomicUsize>) -> Router {
        let handler = move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        };
        Router::new()
            .route("/data", get(handler))
            .layer(middleware::from_fn(move |req: Request, next: Next| {
                let view = view.clone();
                async move { access_gate(view, req, next).await }
            }))
    }

    #[tokio::test]
    async fn denied_request_never_reaches_the_handler() {
        let view = Arc::new(ViewAdapter::new(App).with_access(|| false));
        let hits = Arc::new(AtomicUsize::new(0));
        let router = gated_router(view, hits.clone());

        let response = router
            .oneshot(
                http::Request::builder()
                    .uri("/data")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn allowed_request_passes_through() {
        let view = Arc::new(ViewAdapter::new(App));
        let hits = Arc::new(AtomicUsize::new(0));
        let router = gated_router(view, hits.clone());

        let response = router
            .oneshot(
                http::Request::builder()
                    .uri("/data")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn predicate_change_applies_to_the_next_request() {
        let view = Arc::new(ViewAdapter::new(App));
        let hits = Arc::new(AtomicUsize::new(0));
        let router = gated_router(view.clone(), hits.clone());

        let ok = router
            .clone()
            .oneshot(
                http::Request::builder()
                    .uri("/data")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        view.set_access(|| false);
        let denied = router
            .oneshot(
                http::Request::builder()
                    .uri("/data")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
