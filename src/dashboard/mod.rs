use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::engine::{
    analyze_live, simulate_matchup, EngineConfig, ParlayLeg, ParlayQuote, ParlaySlip, PickBoard,
};
use crate::error::FeedError;
use crate::feeds::Slate;
use crate::models::{Prediction, Team};

/// Number of picks per pick-board list.
const PICK_LIMIT: usize = 3;

/// Latest analysis served by the API.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub source: Option<String>,
    pub predictions: Vec<Prediction>,
    pub teams: Vec<Team>,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Human-readable reason the most recent refresh failed, if it did
    pub last_error: Option<String>,
}

pub struct AppState {
    pub engine: EngineConfig,
    pub default_wager: f64,
    pub snapshot: RwLock<Snapshot>,
    /// Wakes the refresh loop ahead of its schedule.
    pub refresh_requested: Notify,
}

impl AppState {
    pub fn new(engine: EngineConfig, default_wager: f64) -> Self {
        AppState {
            engine,
            default_wager,
            snapshot: RwLock::new(Snapshot::default()),
            refresh_requested: Notify::new(),
        }
    }

    /// Fold a refresh outcome into the snapshot. A failed refresh keeps the
    /// previous predictions and only records the error.
    pub async fn apply_refresh(&self, result: Result<Slate, FeedError>) {
        let mut snapshot = self.snapshot.write().await;
        match result {
            Ok(slate) => {
                let predictions = analyze_live(&slate.games, &self.engine);
                info!(
                    "Analyzed {} of {} game(s) from {}",
                    predictions.len(),
                    slate.games.len(),
                    slate.source
                );
                snapshot.teams = slate.known_teams();
                snapshot.predictions = predictions;
                snapshot.source = Some(slate.source);
                snapshot.refreshed_at = Some(slate.fetched_at);
                snapshot.last_error = None;
            }
            Err(e) => {
                error!("Slate refresh failed: {}", e);
                snapshot.last_error = Some(e.to_string());
            }
        }
    }
}

/// Build the Axum router for the dashboard API.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/predictions", get(predictions_handler))
        .route("/api/picks", get(picks_handler))
        .route("/api/simulate", get(simulate_handler))
        .route("/api/parlay", post(parlay_handler))
        .route("/api/status", get(status_handler))
        .route("/api/refresh", post(refresh_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /api/predictions
async fn predictions_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Prediction>> {
    Json(state.snapshot.read().await.predictions.clone())
}

#[derive(Debug, Deserialize)]
struct PicksQuery {
    wager: Option<f64>,
}

/// GET /api/picks?wager=25
async fn picks_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PicksQuery>,
) -> Json<PickBoard> {
    let wager = query.wager.unwrap_or(state.default_wager);
    let snapshot = state.snapshot.read().await;
    Json(PickBoard::build(&snapshot.predictions, &state.engine, PICK_LIMIT, wager))
}

#[derive(Debug, Deserialize)]
struct SimulateQuery {
    home: String,
    away: String,
}

/// GET /api/simulate?home=BOS&away=LAL
async fn simulate_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SimulateQuery>,
) -> Result<Json<Prediction>, (StatusCode, String)> {
    let snapshot = state.snapshot.read().await;
    let find = |id: &str| {
        snapshot
            .teams
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown team '{}'", id)))
    };
    let home = find(&query.home)?;
    let away = find(&query.away)?;

    simulate_matchup(home, away, &state.engine).map(Json).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "Pick two different teams to simulate".to_string(),
        )
    })
}

#[derive(Debug, Deserialize)]
struct ParlayLegInput {
    description: String,
    /// Raw odds text as typed, e.g. "+150" or "-110"
    odds: String,
}

#[derive(Debug, Deserialize)]
struct ParlayRequest {
    legs: Vec<ParlayLegInput>,
    wager: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParlayResponse {
    legs: Vec<ParlayLeg>,
    /// Inputs that were dropped as blank or invalid
    rejected: usize,
    wager: f64,
    quote: Option<ParlayQuote>,
    american_display: Option<String>,
}

/// POST /api/parlay
async fn parlay_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ParlayRequest>,
) -> Json<ParlayResponse> {
    let mut slip = ParlaySlip::new();
    let rejected = request
        .legs
        .iter()
        .filter(|leg| slip.add_leg(&leg.description, &leg.odds).is_none())
        .count();
    let wager = request.wager.unwrap_or(state.default_wager);
    let quote = slip.quote(wager);

    Json(ParlayResponse {
        legs: slip.legs().to_vec(),
        rejected,
        wager,
        american_display: quote.as_ref().map(ParlayQuote::format_american),
        quote,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    source: Option<String>,
    games: usize,
    teams: usize,
    refreshed_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.snapshot.read().await;
    Json(StatusResponse {
        source: snapshot.source.clone(),
        games: snapshot.predictions.len(),
        teams: snapshot.teams.len(),
        refreshed_at: snapshot.refreshed_at,
        last_error: snapshot.last_error.clone(),
    })
}

/// POST /api/refresh
async fn refresh_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.refresh_requested.notify_one();
    StatusCode::ACCEPTED
}
