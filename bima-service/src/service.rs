use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use bima_core::{
    Assistant, ClaimCase, FitAssessment, FitInput, Language, PlanCard, ProfileForm,
    RejectionAssessment, Reply, Resolver, assess, assess_fit, language::voice_for_tag,
};
use serde_json::{Value, json};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::adapters;
use crate::config::ServiceConfig;
use crate::models::{
    AssistantRequest, ChatRequest, ChatResponse, RecommendResponse, TtsRequest, TtsResponse,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub assistant: Assistant,
    pub resolver: Arc<Resolver>,
}

pub async fn create_app(config: &ServiceConfig) -> Router {
    let app_state = create_app_state(config).await;
    build_router(app_state)
}

async fn create_app_state(config: &ServiceConfig) -> AppState {
    let http = reqwest::Client::new();

    let store = adapters::create_policy_store(config, &http).await;
    let model = adapters::create_language_model(config);
    let speech = adapters::create_speech(config, &http);

    AppState {
        assistant: Assistant::new(model, speech, config.adapter_timeout),
        resolver: Arc::new(Resolver::new(store, config.retry_policy())),
    }
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> axum::response::Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

/// A panicking handler becomes a generic 500 instead of a dropped connection.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = message, "Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

fn with_layers(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub fn build_router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .route("/tts", post(text_to_speech))
        .route("/assistant", post(assistant))
        .route("/predict", post(predict))
        .route("/recommend", post(recommend))
        .route("/risk-profile", post(risk_profile));
    with_layers(routes).with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Bima Health Insurance Guide",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Plan recommendations, claim-rejection scoring and a multilingual insurance assistant",
        "endpoints": {
            "POST /assistant": "Ask the insurance assistant (text and optional audio reply)",
            "POST /tts": "Convert text to speech",
            "POST /chat": "Canned chat reply (legacy)",
            "POST /predict": "Estimate claim-rejection probability",
            "POST /recommend": "Recommend plans for a profile",
            "POST /risk-profile": "Score how well a policy fits a risk profile",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn chat(Json(request): Json<ChatRequest>) -> Json<ChatResponse> {
    let language = Language::from_tag_or_default(request.language.as_deref());
    info!(language = %language, chars = request.message.chars().count(), "Legacy chat request");

    Json(ChatResponse {
        text: language.canned_reply().to_string(),
        audio_url: None,
    })
}

async fn text_to_speech(
    State(state): State<AppState>,
    Json(request): Json<TtsRequest>,
) -> ApiResult<TtsResponse> {
    if request.text.trim().is_empty() {
        return Err(bad_request_error("Text is required"));
    }

    let voice_id = voice_for_tag(request.language.as_deref());
    match state.assistant.synthesize(&request.text, voice_id).await {
        Ok(audio) => {
            if audio.is_none() {
                warn!("Speech synthesis is not configured");
            }
            Ok(Json(TtsResponse {
                audio_data: audio.map(|a| a.to_data_uri()),
            }))
        }
        Err(e) => {
            error!(error = %e, voice_id, "Text-to-speech failed");
            Err(internal_error(
                "Failed to convert text to speech",
                &e.to_string(),
            ))
        }
    }
}

async fn assistant(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> ApiResult<Reply> {
    if request.message.trim().is_empty() {
        return Err(bad_request_error("Message is required"));
    }

    let language = Language::from_tag_or_default(request.language.as_deref());
    info!(
        language = %language,
        history_len = request.conversation_history.len(),
        "Assistant request"
    );

    state
        .assistant
        .reply(&request.message, language, &request.conversation_history)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, "Language model call failed");
            internal_error("Failed to process request", &e.to_string())
        })
}

async fn predict(Json(case): Json<ClaimCase>) -> Json<RejectionAssessment> {
    let assessment = assess(&case);
    info!(
        probability = assessment.rejection_probability,
        factors = assessment.factors.len(),
        "Claim assessed"
    );
    Json(assessment)
}

async fn recommend(
    State(state): State<AppState>,
    Json(form): Json<ProfileForm>,
) -> ApiResult<RecommendResponse> {
    let profile = form.validate().map_err(|e| {
        warn!(error = %e, "Invalid recommendation form");
        bad_request_error(&e.to_string())
    })?;

    let policies = state.resolver.resolve(&profile).await;
    let plans = policies
        .iter()
        .map(|ranked| PlanCard::from_ranked(ranked, profile.coverage_lakhs))
        .collect();

    Ok(Json(RecommendResponse {
        plan_type: profile.plan_type(),
        plans,
        policies,
    }))
}

async fn risk_profile(Json(input): Json<FitInput>) -> Json<FitAssessment> {
    Json(assess_fit(&input))
}
