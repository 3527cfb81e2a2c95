//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::PartnerService;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::{health, metrics, partners, request_id};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        partners::list_partners,
        partners::get_partner,
        partners::get_partner_limit,
        partners::set_partner_promo_code_limit,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            partners::PartnerDto,
            partners::PartnerPromoCodeLimitDto,
            partners::SetPartnerPromoCodeLimitRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Partners", description = "Partners and their promo code limit history"),
    ),
    info(
        title = "Promo Code Factory API",
        version = "1.0.0",
        description = "Partner promo code limit management",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `db` is `None` on the in-memory backend; `prometheus` is `None` when no
/// recorder is installed, in which case `/metrics` is not mounted.
pub fn create_api_router(
    partner_service: Arc<PartnerService>,
    db: Option<DatabaseConnection>,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let partner_state = partners::PartnerHandlerState {
        service: partner_service,
    };

    let partner_routes = Router::new()
        .route("/", get(partners::list_partners))
        .route("/{id}", get(partners::get_partner))
        .route(
            "/{id}/limits",
            post(partners::set_partner_promo_code_limit),
        )
        .route(
            "/{id}/limits/{limit_id}",
            get(partners::get_partner_limit),
        )
        .with_state(partner_state);

    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // route_layer so the metrics middleware sees the matched route template
    let mut router = Router::new()
        .merge(health_routes)
        .nest("/api/v1/partners", partner_routes)
        .route_layer(middleware::from_fn(metrics::http_metrics_middleware))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = prometheus {
        let metrics_routes = Router::new()
            .route("/metrics", get(metrics::prometheus_metrics))
            .with_state(metrics::MetricsState { handle });
        router = router.merge(metrics_routes);
    }

    router
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::Service;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{Partner, PartnerPromoCodeLimit, PartnerRepository};
    use crate::infrastructure::InMemoryPartnerRepository;

    async fn app_with(partners: Vec<Partner>) -> Router {
        let repo = Arc::new(InMemoryPartnerRepository::new());
        for p in partners {
            repo.insert(p).await.unwrap();
        }
        create_api_router(Arc::new(PartnerService::new(repo)), None, None)
    }

    fn active_partner(issued: u32) -> Partner {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let limit = PartnerPromoCodeLimit {
            id: Uuid::new_v4(),
            partner_id: id,
            limit: 50,
            create_date: now - Duration::days(3),
            end_date: now + Duration::days(3),
            cancel_date: None,
        };
        Partner::restore(id, "Super Toys", true, issued, vec![limit])
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Option<String>, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.into_service().call(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, location, json)
    }

    fn limit_body(limit: i32) -> Value {
        json!({ "limit": limit, "end_date": (Utc::now() + Duration::days(1)).to_rfc3339() })
    }

    #[tokio::test]
    async fn set_limit_returns_created_with_location() {
        let partner = active_partner(10);
        let id = partner.id;
        let app = app_with(vec![partner]).await;

        let (status, location, body) = send(
            app.clone(),
            Method::POST,
            &format!("/api/v1/partners/{}/limits", id),
            Some(limit_body(100)),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["limit"], 100);
        assert_eq!(body["data"]["partner_id"], id.to_string());
        let limit_id = body["data"]["id"].as_str().unwrap().to_string();
        let location = location.unwrap();
        assert_eq!(location, format!("/api/v1/partners/{}/limits/{}", id, limit_id));

        let (status, _, fetched) = send(app.clone(), Method::GET, &location, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["id"], limit_id);

        let (_, _, partner) = send(app, Method::GET, &format!("/api/v1/partners/{}", id), None).await;
        assert_eq!(partner["data"]["number_issued_promo_codes"], 0);
        assert_eq!(partner["data"]["limits"].as_array().unwrap().len(), 2);
        assert!(partner["data"]["limits"][0]["cancel_date"].is_string());
    }

    #[tokio::test]
    async fn unknown_partner_is_not_found() {
        let app = app_with(vec![]).await;
        let (status, _, body) = send(
            app,
            Method::POST,
            &format!("/api/v1/partners/{}/limits", Uuid::new_v4()),
            Some(limit_body(100)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Partner not found");
    }

    #[tokio::test]
    async fn inactive_partner_is_bad_request() {
        let mut partner = active_partner(0);
        partner.is_active = false;
        let id = partner.id;
        let app = app_with(vec![partner]).await;

        let (status, location, body) = send(
            app,
            Method::POST,
            &format!("/api/v1/partners/{}/limits", id),
            Some(limit_body(100)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(location.is_none());
        assert_eq!(body["error"], "partner not active");
    }

    #[tokio::test]
    async fn zero_limit_is_rejected_by_validation() {
        let partner = active_partner(0);
        let id = partner.id;
        let app = app_with(vec![partner]).await;

        let (status, _, body) = send(
            app.clone(),
            Method::POST,
            &format!("/api/v1/partners/{}/limits", id),
            Some(limit_body(0)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("limit must be greater than 0"));

        let (_, _, partner) = send(app, Method::GET, &format!("/api/v1/partners/{}", id), None).await;
        assert_eq!(partner["data"]["limits"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let partner = active_partner(0);
        let id = partner.id;
        let app = app_with(vec![partner]).await;

        let (status, _, _) = send(
            app,
            Method::POST,
            &format!("/api/v1/partners/{}/limits", id),
            Some(json!({ "limit": 5, "end_date": "tomorrow" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_limit_is_not_found() {
        let partner = active_partner(0);
        let id = partner.id;
        let app = app_with(vec![partner]).await;

        let (status, _, body) = send(
            app,
            Method::GET,
            &format!("/api/v1/partners/{}/limits/{}", id, Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Promo code limit not found");
    }

    #[tokio::test]
    async fn list_and_health() {
        let app = app_with(vec![active_partner(0), Partner::new("Alpha")]).await;

        let (status, _, body) = send(app.clone(), Method::GET, "/api/v1/partners", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alpha", "Super Toys"]);

        let (status, _, health) = send(app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["status"], "ok");
        assert_eq!(health["database"]["status"], "in-memory");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = app_with(vec![]).await;
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.into_service().call(request).await.unwrap();
        assert_eq!(
            response.headers().get("x-request-id").unwrap(),
            "abc-123"
        );
    }
}
