use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use mealplan_core::{DayPlan, Planner, list_ingredients};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State and request types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct AppState {
    planner: Planner<'static>,
    /// Seed used when a request does not carry its own.
    default_seed: Option<u64>,
}

impl AppState {
    pub fn new(planner: Planner<'static>, default_seed: Option<u64>) -> Self {
        Self {
            planner,
            default_seed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(rename = "targetCalories", alias = "target_calories")]
    pub target_calories: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/api/ingredients", get(ingredients))
        .route("/api/generate-plan", post(generate_plan))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("mealplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("mealplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {err}");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn ping() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "pong" }))
}

async fn ingredients(State(state): State<AppState>) -> impl IntoResponse {
    let listing = list_ingredients(state.planner.composer().catalog());
    tracing::info!(meals = listing.len(), "sending ingredient listing");
    Json(listing)
}

async fn generate_plan(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePlanRequest>, JsonRejection>,
) -> Result<Json<DayPlan>, AppError> {
    let Json(request) = payload?;

    if !request.target_calories.is_finite() {
        return Err(AppError::bad_request("targetCalories must be a finite number"));
    }

    tracing::info!(
        ingredients = request.ingredients.len(),
        target_calories = request.target_calories,
        "generating plan"
    );

    let plan = match request.seed.or(state.default_seed) {
        Some(seed) => {
            state
                .planner
                .plan_day_seeded(&request.ingredients, request.target_calories, seed)
        }
        None => state
            .planner
            .plan_day(&request.ingredients, request.target_calories),
    };

    if !plan.is_complete() {
        tracing::debug!("plan has meals with missing categories");
    }

    Ok(Json(plan))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
