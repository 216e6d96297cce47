use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse, rejection::GraphQLRejection};
use axum::{
    Json, Router,
    extract::State,
    http::{self, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use platform_store::EmployerStore;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{config::AppConfig, graphql::SchemaType};

const GRAPHQL_PATH: &str = "/graphql";

#[derive(Clone)]
pub struct AppState {
    pub schema: SchemaType,
    pub store: Arc<EmployerStore>,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "staff server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::POST, Method::GET])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route(GRAPHQL_PATH, get(graphql_get_handler).post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn graphql_handler(State(state): State<AppState>, request: GraphQLRequest) -> Response {
    let response = state.schema.execute(request.into_inner()).await;
    render(response, state.config.pretty)
}

/// Browsers get the GraphiQL IDE; every other GET is executed from the query string.
///
/// A GET without a `query` parameter is a bad request rather than an empty
/// document handed to the executor.
async fn graphql_get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Result<GraphQLRequest, GraphQLRejection>,
) -> Response {
    if state.config.graphiql && accepts_html(&headers) {
        return Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish()).into_response();
    }
    match request {
        Ok(request) => {
            let request = request.into_inner();
            if request.query.trim().is_empty() {
                return HttpError::bad_request("missing `query` parameter").into_response();
            }
            let response = state.schema.execute(request).await;
            render(response, state.config.pretty)
        }
        Err(rejection) => rejection.into_response(),
    }
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render(response: async_graphql::Response, pretty: bool) -> Response {
    if !pretty {
        return GraphQLResponse::from(response).into_response();
    }
    match serde_json::to_string_pretty(&response) {
        Ok(body) => {
            let mut http_response =
                ([(header::CONTENT_TYPE, "application/json")], body).into_response();
            http_response.headers_mut().extend(response.http_headers);
            http_response
        }
        Err(err) => HttpError::internal(err.into()).into_response(),
    }
}

async fn health_handler(State(state): State<AppState>) -> Response {
    match state.store.len() {
        Ok(employers) => Json(HealthResponse {
            ok: true,
            employers,
            version: env!("CARGO_PKG_VERSION"),
        })
        .into_response(),
        Err(err) => HttpError::internal(err.into()).into_response(),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    employers: usize,
    version: &'static str,
}

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, message = %self.message, "request failed");
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::{GraphqlData, build_schema};
    use axum::body::Body;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use staff_tests::assert_contains_subset;
    use tower::ServiceExt;

    fn test_router(config: AppConfig) -> Router {
        let store = Arc::new(EmployerStore::seeded());
        let schema = build_schema(GraphqlData {
            store: store.clone(),
        });
        build_router(AppState {
            schema,
            store,
            config: Arc::new(config),
        })
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_graphql(query: &str) -> http::Request<Body> {
        http::Request::builder()
            .method(Method::POST)
            .uri(GRAPHQL_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_store_size() {
        let response = test_router(AppConfig::default())
            .oneshot(http::Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_contains_subset(&body, &json!({"ok": true, "employers": 7}));
    }

    #[tokio::test]
    async fn post_executes_and_pretty_prints() {
        let response = test_router(AppConfig::default())
            .oneshot(post_graphql("{ employer(id: 101) { FirstName } }"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let text = body_text(response).await;
        assert!(text.contains('\n'), "expected indented JSON, got {text}");
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_contains_subset(&body, &json!({"data": {"employer": {"FirstName": "Kate"}}}));
    }

    #[tokio::test]
    async fn compact_output_when_pretty_disabled() {
        let config = AppConfig {
            pretty: false,
            ..AppConfig::default()
        };
        let response = test_router(config)
            .oneshot(post_graphql("{ list { id } }"))
            .await
            .unwrap();
        let text = body_text(response).await;
        assert!(!text.contains('\n'));
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_contains_subset(&body, &json!({"data": {"list": [{"id": 100}, {"id": 106}]}}));
    }

    #[tokio::test]
    async fn mutations_persist_across_requests() {
        let router = test_router(AppConfig::default());
        let created = router
            .clone()
            .oneshot(post_graphql(
                r#"mutation { create(FirstName: "Inca", Salary: 6000) { id } }"#,
            ))
            .await
            .unwrap();
        let created: Value = serde_json::from_str(&body_text(created).await).unwrap();
        assert_contains_subset(&created, &json!({"data": {"create": {"id": 107}}}));

        let fetched = router
            .oneshot(post_graphql("{ employer(id: 107) { FirstName Salary } }"))
            .await
            .unwrap();
        let fetched: Value = serde_json::from_str(&body_text(fetched).await).unwrap();
        assert_contains_subset(
            &fetched,
            &json!({"data": {"employer": {"FirstName": "Inca", "Salary": 6000}}}),
        );
    }

    #[tokio::test]
    async fn browsers_get_graphiql() {
        let response = test_router(AppConfig::default())
            .oneshot(
                http::Request::get(GRAPHQL_PATH)
                    .header(header::ACCEPT, "text/html,application/xhtml+xml")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.to_lowercase().contains("graphiql"));
    }

    #[tokio::test]
    async fn get_with_query_string_executes() {
        let response = test_router(AppConfig::default())
            .oneshot(
                http::Request::get("/graphql?query=%7B%20employer(id%3A%20106)%20%7B%20Position%20%7D%20%7D")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_contains_subset(&body, &json!({"data": {"employer": {"Position": "backend"}}}));
    }

    #[tokio::test]
    async fn graphiql_can_be_disabled() {
        let config = AppConfig {
            graphiql: false,
            ..AppConfig::default()
        };
        let response = test_router(config)
            .oneshot(
                http::Request::get(GRAPHQL_PATH)
                    .header(header::ACCEPT, "text/html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let text = body_text(response).await;
        assert!(!text.to_lowercase().contains("graphiql"));
    }

    #[tokio::test]
    async fn get_without_query_is_bad_request() {
        let response = test_router(AppConfig::default())
            .oneshot(
                http::Request::get("/graphql?query=%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("missing `query`"));
    }
}
