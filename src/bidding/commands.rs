/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 입찰 수정
/// 3. 수락 (나머지 대기 입찰 자동 거절 + 상품 잠금)
/// 4. 거절
/// 5. 취소
// region:    --- Imports
use crate::auction::events::MarketEvent;
use crate::bidding::machine::{self, Transition};
use crate::bidding::model::{Bid, BidStatus, Bidder};
use crate::database::MarketStore;
use crate::error::MarketError;
use crate::event_store;
use crate::listing::model::{Listing, ListingSummary};
use crate::scheduler::Operation;
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidCommand {
    pub listing_id: String,
    pub bidder: Bidder,
    pub bid_amount: i64,
    pub note: Option<String>,
}

/// 입찰 수정 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReviseBidCommand {
    pub bid_id: String,
    pub bidder_id: String,
    pub bid_amount: i64,
    pub note: Option<String>,
}

/// 판매자 수락 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AcceptBidCommand {
    pub bid_id: String,
}

/// 판매자 거절 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RejectBidCommand {
    pub bid_id: String,
}

/// 구매자 취소 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CancelBidCommand {
    pub bid_id: String,
    pub bidder_id: String,
}

/// 커맨드 처리 결과
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidOutcome {
    pub bid: Bid,
    pub listing: ListingSummary,
    pub auto_rejected: Vec<String>,
}

// 최대 재시도 횟수
const MAX_RETRIES: i32 = 100;

/// 1. 입찰
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    state: &AppState,
) -> Result<BidOutcome, MarketError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    state.latency.simulate(Operation::PlaceBid).await;

    let note = machine::normalize_note(cmd.note)?;
    let bid_id = state.store.next_bid_id();
    let now = state.clock.now();
    let new_bid = Bid {
        id: bid_id.clone(),
        listing_id: cmd.listing_id.clone(),
        bid_amount: cmd.bid_amount,
        status: BidStatus::Pending,
        placed_at: now,
        note,
        bidder: cmd.bidder,
    };

    let committed = commit_with_retry(state.store.as_ref(), &cmd.listing_id, |listing, bids| {
        machine::apply_place(listing, bids, new_bid.clone())
    })
    .await?;

    let event = MarketEvent::BidPlaced {
        listing_id: cmd.listing_id.clone(),
        bid_id: bid_id.clone(),
        bidder_id: new_bid.bidder.id.clone(),
        bid_amount: new_bid.bid_amount,
        timestamp: now,
    };
    event_store::record(state.event_store.as_ref(), committed.version, event).await;

    info!("{:<12} --> 입찰 성공: {} ({})", "Command", bid_id, cmd.bid_amount);
    committed.outcome(&bid_id)
}

/// 2. 입찰 수정 (본인 대기 입찰만)
pub async fn handle_revise_bid(
    cmd: ReviseBidCommand,
    state: &AppState,
) -> Result<BidOutcome, MarketError> {
    info!("{:<12} --> 입찰 수정 요청 처리 시작: {:?}", "Command", cmd);
    state.latency.simulate(Operation::Revise).await;

    let listing_id = state.store.find_bid_listing(&cmd.bid_id).await?;
    let committed = commit_with_retry(state.store.as_ref(), &listing_id, |listing, bids| {
        machine::apply_revise(
            listing,
            bids,
            &cmd.bid_id,
            &cmd.bidder_id,
            cmd.bid_amount,
            cmd.note.clone(),
        )
    })
    .await?;

    let event = MarketEvent::BidRevised {
        listing_id,
        bid_id: cmd.bid_id.clone(),
        bidder_id: cmd.bidder_id.clone(),
        bid_amount: cmd.bid_amount,
        timestamp: state.clock.now(),
    };
    event_store::record(state.event_store.as_ref(), committed.version, event).await;

    committed.outcome(&cmd.bid_id)
}

/// 3. 수락
/// 수락된 입찰 외의 대기 입찰은 같은 커밋에서 auto-rejected 로 바뀐다.
pub async fn handle_accept_bid(
    cmd: AcceptBidCommand,
    state: &AppState,
) -> Result<BidOutcome, MarketError> {
    info!("{:<12} --> 입찰 수락 요청 처리 시작: {:?}", "Command", cmd);
    state.latency.simulate(Operation::Accept).await;

    let listing_id = state.store.find_bid_listing(&cmd.bid_id).await?;
    let committed = commit_with_retry(state.store.as_ref(), &listing_id, |listing, bids| {
        machine::apply_accept(listing, bids, &cmd.bid_id)
    })
    .await?;

    let version = committed.version;
    let outcome = committed.outcome(&cmd.bid_id)?;
    info!(
        "{:<12} --> 입찰 수락 완료: {} (자동 거절 {}건, 상품 {} 잠금)",
        "Command",
        cmd.bid_id,
        outcome.auto_rejected.len(),
        listing_id
    );

    let event = MarketEvent::BidAccepted {
        listing_id,
        bid_id: cmd.bid_id.clone(),
        bid_amount: outcome.bid.bid_amount,
        auto_rejected: outcome.auto_rejected.clone(),
        timestamp: state.clock.now(),
    };
    event_store::record(state.event_store.as_ref(), version, event).await;

    Ok(outcome)
}

/// 4. 거절
pub async fn handle_reject_bid(
    cmd: RejectBidCommand,
    state: &AppState,
) -> Result<BidOutcome, MarketError> {
    info!("{:<12} --> 입찰 거절 요청 처리 시작: {:?}", "Command", cmd);
    state.latency.simulate(Operation::Reject).await;

    let listing_id = state.store.find_bid_listing(&cmd.bid_id).await?;
    let committed = commit_with_retry(state.store.as_ref(), &listing_id, |listing, bids| {
        machine::apply_reject(listing, bids, &cmd.bid_id)
    })
    .await?;

    let event = MarketEvent::BidRejected {
        listing_id,
        bid_id: cmd.bid_id.clone(),
        timestamp: state.clock.now(),
    };
    event_store::record(state.event_store.as_ref(), committed.version, event).await;

    committed.outcome(&cmd.bid_id)
}

/// 5. 취소
pub async fn handle_cancel_bid(
    cmd: CancelBidCommand,
    state: &AppState,
) -> Result<BidOutcome, MarketError> {
    info!("{:<12} --> 입찰 취소 요청 처리 시작: {:?}", "Command", cmd);
    state.latency.simulate(Operation::Cancel).await;

    let listing_id = state.store.find_bid_listing(&cmd.bid_id).await?;
    let committed = commit_with_retry(state.store.as_ref(), &listing_id, |listing, bids| {
        machine::apply_cancel(listing, bids, &cmd.bid_id, &cmd.bidder_id)
    })
    .await?;

    let event = MarketEvent::BidCancelled {
        listing_id,
        bid_id: cmd.bid_id.clone(),
        bidder_id: cmd.bidder_id.clone(),
        timestamp: state.clock.now(),
    };
    event_store::record(state.event_store.as_ref(), committed.version, event).await;

    committed.outcome(&cmd.bid_id)
}

// endregion: --- Commands

// region:    --- Commit
/// 커밋된 상태 전이
struct Committed {
    listing: Listing,
    transition: Transition,
    version: i64,
}

impl Committed {
    fn outcome(self, bid_id: &str) -> Result<BidOutcome, MarketError> {
        let mut listing = self.listing;
        listing.auction_status = self.transition.auction_status;
        let summary = machine::summarize(&listing, &self.transition.bids);

        let bid = self
            .transition
            .bids
            .into_iter()
            .find(|b| b.id == bid_id)
            .ok_or_else(|| MarketError::BidNotFound(bid_id.to_string()))?;

        Ok(BidOutcome {
            bid,
            listing: summary,
            auto_rejected: self.transition.auto_rejected,
        })
    }
}

/// 스냅샷에 상태 전이를 적용하고 버전 비교 후 커밋한다.
/// 다른 커밋이 먼저 들어왔으면 새 스냅샷으로 다시 시도한다.
async fn commit_with_retry<F>(
    store: &dyn MarketStore,
    listing_id: &str,
    apply: F,
) -> Result<Committed, MarketError>
where
    F: Fn(&Listing, &[Bid]) -> Result<Transition, MarketError>,
{
    let mut retries = 0;

    while retries < MAX_RETRIES {
        let record = store.get_listing(listing_id).await?;
        let transition = apply(&record.listing, &record.bids)?;

        match store.commit(listing_id, record.version, &transition).await {
            Ok(version) => {
                return Ok(Committed {
                    listing: record.listing,
                    transition,
                    version,
                })
            }
            Err(MarketError::VersionConflict(_)) => {
                warn!(
                    "{:<12} --> 낙관적 업데이트로 인한 버전 충돌: 재시도",
                    "Command"
                );
                retries += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Err(MarketError::MaxRetriesExceeded)
}
// endregion: --- Commit
