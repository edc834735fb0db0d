use axum::{http::StatusCode, routing::get, Router};

pub const HEALTH_BODY: &str = "^-^";

pub fn router() -> Router {
    Router::new().route("/api/health", get(health))
}

pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTH_BODY)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::health::{health, router, HEALTH_BODY};

    #[tokio::test]
    async fn health_returns_ok_with_fixed_body() {
        let (status, body) = health().await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "^-^");
    }

    #[tokio::test]
    async fn health_route_is_mounted_under_api() {
        let response = router()
            .oneshot(Request::get("/api/health").body(Body::empty()).expect("request"))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&body[..], HEALTH_BODY.as_bytes());
    }
}
