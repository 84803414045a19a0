//! Router configuration for the web API.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers::{
    authenticate, box_authenticate, box_callback, box_is_authorized, box_tree_node, dm_callback,
    dm_tree_node, logoff, profile, send_to_box, send_to_data_management, token, AppState,
};
use super::middleware::create_cors_layer;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // Data-management sign-in and session
    let user_routes = Router::new()
        .route("/user/authenticate", get(authenticate))
        .route("/user/token", get(token))
        .route("/user/logoff", get(logoff))
        .route("/user/profile", get(profile))
        .route("/api/forge/callback/oauth", get(dm_callback));

    // Box sign-in
    let box_routes = Router::new()
        .route("/box/authenticate", get(box_authenticate))
        .route("/box/isAuthorized", get(box_is_authorized))
        .route("/api/box/callback/oauth", get(box_callback));

    let tree_routes = Router::new()
        .route("/dm/getTreeNode", get(dm_tree_node))
        .route("/box/getTreeNode", get(box_tree_node));

    let integration_routes = Router::new()
        .route("/sendToBox", post(send_to_box))
        .route("/sendToDataManagement", post(send_to_data_management));

    Router::new()
        .merge(user_routes)
        .merge(box_routes)
        .merge(tree_routes)
        .nest("/integration", integration_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving the browser UI, if `static_path` exists.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let path = std::path::Path::new(static_path);
    if !path.is_dir() {
        tracing::warn!("Static path does not exist: {}", static_path);
        return None;
    }

    let index = path.join("index.html");
    let service = ServeDir::new(path).fallback(ServeFile::new(index));
    Some(Router::new().fallback_service(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_text(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get_text(create_health_router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[test]
    fn test_create_static_router_missing_dir() {
        assert!(create_static_router("/nonexistent/dmbridge/www").is_none());
    }

    #[tokio::test]
    async fn test_static_router_falls_back_to_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>bridge</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        let router = create_static_router(dir.path().to_str().unwrap()).unwrap();

        let (status, body) = get_text(router.clone(), "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log(1)");

        let (status, body) = get_text(router, "/some/client/route").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<html>bridge</html>");
    }
}
