// region:    --- Imports
use crate::bidding::commands::{
    self, AcceptBidCommand, BidOutcome, CancelBidCommand, PlaceBidCommand, RejectBidCommand,
    ReviseBidCommand,
};
use crate::bidding::model::Bidder;
use crate::error::MarketError;
use crate::preference::model::{self as preference_model, PreferenceDraft};
use crate::query::handlers as query;
use crate::query::queries::{MarketplaceQuery, MyBidsQuery, ReceivedQuery};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Error Response
impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ListingNotFound(_) | Self::BidNotFound(_) | Self::PreferenceNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::NotBidOwner(_) => StatusCode::FORBIDDEN,
            Self::InvalidTransition { .. }
            | Self::ListingLocked(_)
            | Self::AuctionClosed(_)
            | Self::VersionConflict(_) => StatusCode::CONFLICT,
            Self::LowBid { .. } | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MaxRetriesExceeded => StatusCode::SERVICE_UNAVAILABLE,
        };
        warn!("{:<12} --> 요청 실패 ({}): {}", "Handler", status, self);
        (status, Json(self.to_json())).into_response()
    }
}
// endregion: --- Error Response

// region:    --- Request Bodies
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    pub bidder: Bidder,
    pub bid_amount: i64,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBidRequest {
    pub bidder_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviseBidRequest {
    pub bidder_id: String,
    pub bid_amount: i64,
    pub note: Option<String>,
}
// endregion: --- Request Bodies

// region:    --- Router
/// 전체 라우터
pub fn router(state: Arc<AppState>) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/listings", get(handle_search_listings))
        .route("/listings/:id", get(handle_get_listing))
        .route(
            "/listings/:id/bids",
            get(handle_get_listing_bids).post(handle_place_bid),
        )
        .route("/listings/:id/minimum-bid", get(handle_get_minimum_bid))
        .route("/bids/received", get(handle_get_bids_received))
        .route("/bids/:id", put(handle_revise_bid))
        .route("/bids/:id/accept", post(handle_accept_bid))
        .route("/bids/:id/reject", post(handle_reject_bid))
        .route("/bids/:id/cancel", post(handle_cancel_bid))
        .route("/bidders/:id/bids", get(handle_get_my_bids))
        .route("/stats", get(handle_get_stats))
        .route("/activity", get(handle_get_activity))
        .route(
            "/preferences",
            get(handle_list_preferences).post(handle_create_preference),
        )
        .route("/preferences/options", get(handle_preference_options))
        .route(
            "/preferences/:id",
            put(handle_update_preference).delete(handle_delete_preference),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
// endregion: --- Router

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<String>,
    Json(req): Json<PlaceBidRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let cmd = PlaceBidCommand {
        listing_id,
        bidder: req.bidder,
        bid_amount: req.bid_amount,
        note: req.note,
    };
    let outcome = commands::handle_place_bid(cmd, &state).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// 입찰 수정 요청 처리
pub async fn handle_revise_bid(
    State(state): State<Arc<AppState>>,
    Path(bid_id): Path<String>,
    Json(req): Json<ReviseBidRequest>,
) -> Result<Json<BidOutcome>, MarketError> {
    let cmd = ReviseBidCommand {
        bid_id,
        bidder_id: req.bidder_id,
        bid_amount: req.bid_amount,
        note: req.note,
    };
    Ok(Json(commands::handle_revise_bid(cmd, &state).await?))
}

/// 수락 요청 처리
pub async fn handle_accept_bid(
    State(state): State<Arc<AppState>>,
    Path(bid_id): Path<String>,
) -> Result<Json<BidOutcome>, MarketError> {
    let outcome = commands::handle_accept_bid(AcceptBidCommand { bid_id }, &state).await?;
    Ok(Json(outcome))
}

/// 거절 요청 처리
pub async fn handle_reject_bid(
    State(state): State<Arc<AppState>>,
    Path(bid_id): Path<String>,
) -> Result<Json<BidOutcome>, MarketError> {
    let outcome = commands::handle_reject_bid(RejectBidCommand { bid_id }, &state).await?;
    Ok(Json(outcome))
}

/// 취소 요청 처리
pub async fn handle_cancel_bid(
    State(state): State<Arc<AppState>>,
    Path(bid_id): Path<String>,
    Json(req): Json<CancelBidRequest>,
) -> Result<Json<BidOutcome>, MarketError> {
    let cmd = CancelBidCommand {
        bid_id,
        bidder_id: req.bidder_id,
    };
    Ok(Json(commands::handle_cancel_bid(cmd, &state).await?))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

pub async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// 마켓플레이스 검색
pub async fn handle_search_listings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MarketplaceQuery>,
) -> impl IntoResponse {
    Json(query::search_marketplace(state.store.as_ref(), &params).await)
}

/// 상품 조회
pub async fn handle_get_listing(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", listing_id);
    match query::get_listing_summary(state.store.as_ref(), &listing_id).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 상품 입찰 목록 조회
pub async fn handle_get_listing_bids(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<String>,
) -> impl IntoResponse {
    match query::get_listing_bids(state.store.as_ref(), &listing_id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 최소 입찰가 조회
pub async fn handle_get_minimum_bid(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<String>,
) -> impl IntoResponse {
    match query::get_minimum_bid(state.store.as_ref(), &listing_id).await {
        Ok(min) => Json(min).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 받은 입찰 조회
pub async fn handle_get_bids_received(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReceivedQuery>,
) -> impl IntoResponse {
    Json(query::get_bids_received(state.store.as_ref(), &params).await)
}

/// 내 입찰 조회
pub async fn handle_get_my_bids(
    State(state): State<Arc<AppState>>,
    Path(bidder_id): Path<String>,
    Query(params): Query<MyBidsQuery>,
) -> impl IntoResponse {
    Json(query::get_my_bids(state.store.as_ref(), &bidder_id, &params).await)
}

pub async fn handle_get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(query::get_stats(state.store.as_ref()).await)
}

/// 최근 활동 (최신순)
pub async fn handle_get_activity(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.feed.recent().await)
}

// endregion: --- Query Handlers

// region:    --- Preference Handlers

pub async fn handle_list_preferences(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.preferences.list().await)
}

pub async fn handle_preference_options() -> impl IntoResponse {
    Json(preference_model::options())
}

pub async fn handle_create_preference(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<PreferenceDraft>,
) -> Result<impl IntoResponse, MarketError> {
    let saved = state.preferences.create(draft).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn handle_update_preference(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<PreferenceDraft>,
) -> Result<impl IntoResponse, MarketError> {
    Ok(Json(state.preferences.update(&id, draft).await?))
}

pub async fn handle_delete_preference(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, MarketError> {
    state.preferences.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Preference Handlers
