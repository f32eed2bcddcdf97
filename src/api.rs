use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::analyze::AnalysisOutcome;
use crate::handlers::AnalysisHandler;
use crate::models::{LedgerEntry, MealClassification, ReferenceKind, UserProfile};
use crate::services::ledger;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "imageBase64")]
    pub image_base64: String,
    #[serde(rename = "userParams")]
    pub user_params: UserProfile,
    #[serde(default)]
    pub reference: ReferenceKind,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub dish: String,
    pub weight_g: f64,
    pub calories: i64,
    pub nutrients: NutrientsBody,
    pub ingredients: Vec<String>,
    #[serde(rename = "dailyCalorieBudget")]
    pub daily_calorie_budget: i64,
    pub classification: MealClassification,
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct NutrientsBody {
    pub protein: i64,
    pub fat: i64,
    pub carbs: i64,
}

impl From<AnalysisOutcome> for AnalyzeResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            dish: outcome.estimate.dish_name,
            weight_g: outcome.estimate.portion_weight_g,
            calories: outcome.estimate.calories,
            nutrients: NutrientsBody {
                protein: outcome.estimate.macros.protein_g,
                fat: outcome.estimate.macros.fat_g,
                carbs: outcome.estimate.macros.carb_g,
            },
            ingredients: outcome.estimate.ingredients,
            daily_calorie_budget: outcome.verdict.daily_calorie_budget,
            classification: outcome.verdict.classification,
            source: outcome.source.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    date: NaiveDate,
    entries: Vec<LedgerEntry>,
    #[serde(rename = "totalCalories")]
    total_calories: i64,
}

#[derive(Debug, Deserialize)]
struct ClearDayRequest {
    date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct ClearDayResponse {
    date: NaiveDate,
    removed: usize,
}

struct AppState {
    handler: Arc<AnalysisHandler>,
}

/// Router for the analysis API. CORS is wide open: the frontend is
/// served separately from this process.
pub fn create_api_router(handler: Arc<AnalysisHandler>) -> Router {
    let state = Arc::new(AppState { handler });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/history", get(history_handler))
        .route("/api/clear-day", post(clear_day_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorBody>)> {
    match state
        .handler
        .analyze(&request.image_base64, &request.user_params, request.reference)
        .await
    {
        Ok(outcome) => Ok(Json(AnalyzeResponse::from(outcome))),
        Err(e) => {
            log::warn!("❌ Analysis failed: {}", e);
            let status =
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err((
                status,
                Json(ErrorBody {
                    error: e.to_string(),
                    debug: e.debug_detail(),
                }),
            ))
        }
    }
}

async fn history_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let date = query.date.unwrap_or_else(ledger::today);
    let entries = state.handler.ledger().entries_for_day(date);
    let total_calories = state.handler.ledger().sum_for_day(date);

    Json(HistoryResponse {
        date,
        entries,
        total_calories,
    })
}

async fn clear_day_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClearDayRequest>,
) -> Result<Json<ClearDayResponse>, (StatusCode, Json<ErrorBody>)> {
    let date = request.date.unwrap_or_else(ledger::today);
    match state.handler.ledger().clear_day(date) {
        Ok(removed) => {
            log::info!("🧹 Cleared {} entries for {}", removed, date);
            Ok(Json(ClearDayResponse { date, removed }))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: e.to_string(),
                debug: None,
            }),
        )),
    }
}

async fn health_check() -> &'static str {
    "OK"
}
