//! Axum-based API Gateway for the researcher agent. Config-driven via CoreConfig.
//!
//! Research and trend requests are resolved against the static knowledge base through the
//! orchestrator; feedback is logged and acknowledged. Nothing is kept between requests.

mod handlers;
mod logging;

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method},
    response::sse::{Event, Sse},
    routing::{get, post, put},
    Router,
};
use research_core::{
    CoreConfig, EventSink, FocusArea, Goal, KnowledgeResolver, Orchestrator, SessionContext, Topic, TracingEventSink,
    TrendDomain,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Pre-flight check: config loads, knowledge tables are complete, and the port is available.
fn run_verify(config: &CoreConfig) -> Result<(), String> {
    print!("Checking topic table... ");
    for topic in Topic::ALL {
        for focus in FocusArea::ALL {
            if topic.insight(focus).trim().is_empty() {
                return Err(format!("Missing insight for {} / {}", topic.label(), focus.label()));
            }
        }
    }
    println!("OK ({} topics x {} focus areas)", Topic::ALL.len(), FocusArea::ALL.len());

    print!("Checking trend table... ");
    for domain in TrendDomain::ALL {
        if domain.analysis().render().trim().is_empty() {
            return Err(format!("Missing trend analysis for {}", domain.label()));
        }
    }
    println!("OK ({} domains)", TrendDomain::ALL.len());

    let addr = config.bind_addr();
    print!("Checking {}... ", addr);
    match std::net::TcpListener::bind(&addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => return Err(format!("{} BLOCKED: {}", addr, e)),
    }

    println!("\nSUCCESS: All systems GO. Ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[research-gateway] .env not loaded: {} (using system environment)", e);
    }

    let config = match CoreConfig::load() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("[research-gateway] config load failed: {}", e);
            std::process::exit(1);
        }
    };

    // Handle --verify flag for pre-flight check
    if std::env::args().any(|a| a == "--verify") {
        match run_verify(&config) {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    let (log_tx, _) = broadcast::channel(1000);
    logging::init(&config.log_level, log_tx.clone());

    tracing::info!(
        target: "research::gateway",
        "Stateless mode: no session service. Sessions are acknowledged but never stored."
    );

    let sink: Arc<dyn EventSink> = Arc::new(TracingEventSink::new(
        config.app_name.clone(),
        config.telemetry_debug,
    ));
    let state = build_state(Arc::clone(&config), sink, log_tx);
    tracing::info!(
        target: "research::gateway",
        skills = ?state.orchestrator.skill_names(),
        "Skill registry ready"
    );
    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(target: "research::gateway", addr = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("{} listening on {}", config.app_name, addr);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(target: "research::gateway", error = %e, "Server exited with error");
        std::process::exit(1);
    }
}

/// Wires the resolver, skills and orchestrator around one telemetry sink.
fn build_state(config: Arc<CoreConfig>, sink: Arc<dyn EventSink>, log_tx: broadcast::Sender<String>) -> AppState {
    let resolver = Arc::new(KnowledgeResolver::new(Arc::clone(&sink)));
    let registry = research_skills::default_registry(resolver);
    AppState {
        config,
        orchestrator: Arc::new(Orchestrator::new(Arc::new(registry))),
        sink,
        log_tx,
    }
}

fn cors_layer(config: &CoreConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(target: "research::gateway", origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/v1/status", get(status))
        .route("/v1/execute", post(execute))
        .route("/api/v1/health", get(health))
        .route("/api/v1/logs", get(logs_stream))
        .route("/api/v1/research", post(handlers::research::research))
        .route("/api/v1/trends", post(handlers::research::trends))
        .route(
            "/apps/:app_name/users/:user_id/sessions/:session_id",
            put(handlers::conversation::put_session),
        )
        .route(
            "/apps/:app_name/users/:user_id/conversations",
            post(handlers::conversation::converse),
        )
        .route("/feedback", post(handlers::feedback::collect_feedback))
        .with_state(state)
        .layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) orchestrator: Arc<Orchestrator>,
    pub(crate) sink: Arc<dyn EventSink>,
    pub(crate) log_tx: broadcast::Sender<String>,
}

/// GET /api/v1/health – liveness check.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/status – app identity and the closed key sets callers can use.
async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "app_name": state.config.app_name,
        "description": state.config.description,
        "port": state.config.port,
        "skills": state.orchestrator.skill_names(),
        "topics": Topic::ALL.iter().map(|t| t.label()).collect::<Vec<_>>(),
        "focus_areas": FocusArea::ALL.iter().map(|f| f.label()).collect::<Vec<_>>(),
        "trend_domains": TrendDomain::ALL.iter().map(|d| d.label()).collect::<Vec<_>>(),
    }))
}

/// GET /api/v1/logs – Server-Sent Events stream of gateway logs (tracing output).
async fn logs_stream(
    State(state): State<AppState>,
) -> Sse<impl futures_util::Stream<Item = Result<Event, std::convert::Infallible>> + Send + 'static> {
    use async_stream::stream;
    let mut rx = state.log_tx.subscribe();
    let stream = stream! {
        loop {
            tokio::select! {
                r = rx.recv() => match r {
                    Ok(line) => yield Ok(Event::default().data(line)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        yield Ok(Event::default().data(format!("... {} log lines dropped", n)));
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = tokio::time::sleep(Duration::from_secs(15)) => {
                    yield Ok(Event::default().comment("keepalive"));
                }
            }
        }
    };
    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}

#[derive(serde::Deserialize)]
struct ExecuteRequest {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    goal: Goal,
}

/// POST /v1/execute – dispatches any [`Goal`] and wraps the result in an envelope.
async fn execute(
    State(state): State<AppState>,
    Json(req): Json<ExecuteRequest>,
) -> Json<handlers::ResponseEnvelope> {
    let started = Instant::now();
    let ctx = SessionContext::new(req.user_id.as_deref(), req.session_id.as_deref());
    let label = req.goal.label();
    tracing::info!(target: "research::gateway", goal = label, invocation_id = %ctx.invocation_id, "Goal execution started");
    let outcome = state.orchestrator.dispatch(&ctx, req.goal).await;
    let envelope = handlers::ResponseEnvelope::from_dispatch(&ctx, label, outcome);
    handlers::record_request(state.sink.as_ref(), "/v1/execute", &ctx, &envelope.status, started);
    Json(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use research_core::{SinkError, TelemetryEvent, NoopEventSink};
    use tower::ServiceExt;

    struct FailingSink;

    impl EventSink for FailingSink {
        fn record(&self, _event: &TelemetryEvent) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("logging backend unreachable".into()))
        }
    }

    fn test_config() -> CoreConfig {
        CoreConfig {
            app_name: "Test Researcher".to_string(),
            description: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            telemetry_debug: false,
            allowed_origins: Vec::new(),
        }
    }

    fn test_app_with_sink(sink: Arc<dyn EventSink>) -> Router {
        let (log_tx, _) = broadcast::channel(1);
        build_app(build_state(Arc::new(test_config()), sink, log_tx))
    }

    fn test_app() -> Router {
        test_app_with_sink(Arc::new(NoopEventSink))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health_ok() {
        let req = Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap();
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_status_lists_closed_key_sets() {
        let req = Request::builder().uri("/v1/status").body(Body::empty()).unwrap();
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["app_name"], "Test Researcher");
        assert_eq!(
            json["topics"],
            serde_json::json!(["artificial intelligence", "climate change", "blockchain"])
        );
        assert_eq!(
            json["focus_areas"],
            serde_json::json!(["general", "technical", "business", "social"])
        );
        assert_eq!(
            json["trend_domains"],
            serde_json::json!(["technology", "business", "science"])
        );
        assert_eq!(json["skills"], serde_json::json!(["ResearchTopic", "AnalyzeTrends"]));
    }

    #[tokio::test]
    async fn test_research_known_pair_returns_envelope() {
        let req = json_request(
            "POST",
            "/api/v1/research",
            serde_json::json!({
                "topic": "artificial intelligence",
                "focus_area": "technical",
                "session_id": "session_abc",
                "user_id": "user_1"
            }),
        );
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(
            json["text"],
            Topic::ArtificialIntelligence.insight(FocusArea::Technical)
        );
        assert_eq!(json["session_id"], "session_abc");
        assert_eq!(json["user_id"], "user_1");
        assert_eq!(json["goal"], "ResearchTopic");
        assert!(!json["invocation_id"].as_str().unwrap().is_empty());
        assert!(json["timestamp_ms"].as_i64().unwrap() > 0);
        assert_eq!(json["result"]["research"]["methodology"], research_core::METHODOLOGY);
    }

    #[tokio::test]
    async fn test_research_unknown_topic_returns_fallback_not_error_code() {
        let req = json_request(
            "POST",
            "/api/v1/research",
            serde_json::json!({ "topic": "quantum computing", "focus_area": "general" }),
        );
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "error");
        assert_eq!(
            json["text"],
            "Sorry, I don't have comprehensive research data for 'quantum computing'. Available topics include: artificial intelligence, climate change, blockchain."
        );
    }

    #[tokio::test]
    async fn test_research_missing_and_mistyped_fields_are_unknown_keys() {
        let req = json_request("POST", "/api/v1/research", serde_json::json!({ "topic": 7 }));
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["text"].as_str().unwrap().starts_with("Sorry, I don't have comprehensive research data for ''."));
        assert_eq!(json["session_id"], research_core::DEFAULT_SESSION_ID);

        let req = json_request(
            "POST",
            "/api/v1/research",
            serde_json::json!({ "topic": "Blockchain", "focus_area": 3 }),
        );
        let (_, json) = send(test_app(), req).await;
        assert_eq!(json["text"], Topic::Blockchain.insight(FocusArea::General));
    }

    #[tokio::test]
    async fn test_trends_known_and_unknown_domains() {
        let req = json_request("POST", "/api/v1/trends", serde_json::json!({ "domain": "science" }));
        let (_, json) = send(test_app(), req).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["text"], TrendDomain::Science.analysis().render());
        assert_eq!(json["goal"], "AnalyzeTrends");

        let req = json_request("POST", "/api/v1/trends", serde_json::json!({ "domain": "sports" }));
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["text"],
            "Sorry, trend analysis not available for 'sports'. Available domains: technology, business, science."
        );
    }

    #[tokio::test]
    async fn test_put_session_echoes_state_without_storing() {
        let req = json_request(
            "PUT",
            "/apps/research_agent/users/user_1/sessions/session_1",
            serde_json::json!({ "state": { "preferred_language": "English", "visit_count": 1 } }),
        );
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "session_1");
        assert_eq!(json["user_id"], "user_1");
        assert_eq!(json["app_name"], "research_agent");
        assert_eq!(json["state"]["visit_count"], 1);
    }

    #[tokio::test]
    async fn test_conversation_routes_message_and_returns_conversation_id() {
        let req = json_request(
            "POST",
            "/apps/research_agent/users/user_1/conversations",
            serde_json::json!({
                "message": "Can you research climate change from a business perspective?",
                "session_id": "session_1"
            }),
        );
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], Topic::ClimateChange.insight(FocusArea::Business));
        assert_eq!(json["session_id"], "session_1");
        assert_eq!(json["routed_goal"], "ResearchTopic");
        assert!(!json["conversation_id"].as_str().unwrap().is_empty());

        let req = json_request(
            "POST",
            "/apps/research_agent/users/user_1/conversations",
            serde_json::json!({ "message": "Analyze trends in space exploration", "session_id": "session_1" }),
        );
        let (_, json) = send(test_app(), req).await;
        assert_eq!(json["routed_goal"], "AnalyzeTrends");
        assert!(json["response"]
            .as_str()
            .unwrap()
            .starts_with("Sorry, trend analysis not available for 'space exploration'."));
    }

    #[tokio::test]
    async fn test_feedback_acknowledged_even_when_sink_fails() {
        let body = serde_json::json!({
            "score": 4,
            "text": "Load test feedback",
            "invocation_id": "conv-123",
            "user_id": "user_1"
        });
        let (status, json) = send(test_app(), json_request("POST", "/feedback", body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "status": "success" }));

        let failing = test_app_with_sink(Arc::new(FailingSink));
        let (status, json) = send(failing, json_request("POST", "/feedback", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
    }

    #[tokio::test]
    async fn test_feedback_requires_invocation_id() {
        let req = json_request("POST", "/feedback", serde_json::json!({ "score": 5 }));
        let (status, _) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_feedback_accepts_any_rating_and_comment() {
        for body in [
            serde_json::json!({ "invocation_id": "conv-1", "score": "great" }),
            serde_json::json!({ "invocation_id": "conv-1", "text": "no rating" }),
            serde_json::json!({ "invocation_id": "conv-1", "score": 4, "text": 5 }),
            serde_json::json!({ "invocation_id": "conv-1", "score": 1e9, "user_id": 12 }),
        ] {
            let (status, json) = send(test_app(), json_request("POST", "/feedback", body.clone())).await;
            assert_eq!(status, StatusCode::OK, "{}", body);
            assert_eq!(json, serde_json::json!({ "status": "success" }));
        }
    }

    #[tokio::test]
    async fn test_empty_or_unparseable_bodies_get_fallback_envelopes() {
        let unknown_topic =
            "Sorry, I don't have comprehensive research data for ''. Available topics include: artificial intelligence, climate change, blockchain.";

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/research")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "error");
        assert_eq!(json["text"], unknown_topic);
        assert_eq!(json["session_id"], research_core::DEFAULT_SESSION_ID);

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/research")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], unknown_topic);
        assert_eq!(json["goal"], "ResearchTopic");

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/trends")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["text"],
            "Sorry, trend analysis not available for ''. Available domains: technology, business, science."
        );

        let req = Request::builder()
            .method("POST")
            .uri("/apps/research_agent/users/user_1/conversations")
            .header("content-type", "application/json")
            .body(Body::from("{\"message\": "))
            .unwrap();
        let (status, json) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], unknown_topic);
        assert_eq!(json["user_id"], "user_1");
        assert_eq!(json["session_id"], research_core::DEFAULT_SESSION_ID);
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_change_research_text() {
        let body = serde_json::json!({ "topic": "blockchain", "focus_area": "social" });
        let (_, healthy) = send(test_app(), json_request("POST", "/api/v1/research", body.clone())).await;
        let failing = test_app_with_sink(Arc::new(FailingSink));
        let (status, degraded) = send(failing, json_request("POST", "/api/v1/research", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(healthy["text"], degraded["text"]);
    }

    #[tokio::test]
    async fn test_execute_goal_and_unknown_skill() {
        let body = serde_json::json!({
            "session_id": "s-9",
            "goal": { "AnalyzeTrends": { "domain": "Business" } }
        });
        let (status, json) = send(test_app(), json_request("POST", "/v1/execute", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], TrendDomain::Business.analysis().render());
        assert_eq!(json["session_id"], "s-9");

        let body = serde_json::json!({
            "goal": { "ExecuteSkill": { "name": "WeatherLookup", "payload": null } }
        });
        let (status, json) = send(test_app(), json_request("POST", "/v1/execute", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "error");
        assert_eq!(json["text"], "unknown skill: WeatherLookup");
    }
}
