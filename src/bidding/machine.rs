//! 입찰 상태 전이
//!
//! 모든 함수는 순수 함수이다. 현재 상품과 입찰 목록의 스냅샷을 받아 새 입찰 목록과
//! 상품 상태를 돌려주며, 조건이 맞지 않으면 아무것도 바꾸지 않고 오류를 반환한다.
//! 저장은 커맨드 계층에서 스냅샷 버전과 함께 한 번에 커밋한다.
// region:    --- Imports
use crate::bidding::model::{Bid, BidStatus};
use crate::error::{FieldError, MarketError};
use crate::listing::model::{AuctionStatus, Listing, ListingSummary};

// endregion: --- Imports

/// 최고 입찰가 기준 최소 증가 금액
pub const MIN_INCREMENT: i64 = 100;

/// 입찰 메모 최대 길이
pub const MAX_NOTE_LEN: usize = 500;

/// 입찰 금액 상한
pub const MAX_BID_AMOUNT: i64 = 1_000_000_000;

// region:    --- Transition
/// 상태 전이 결과
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub bids: Vec<Bid>,
    pub auction_status: AuctionStatus,
    /// 수락으로 인해 자동 거절된 입찰 id
    pub auto_rejected: Vec<String>,
}

impl Transition {
    fn unchanged_status(listing: &Listing, bids: Vec<Bid>) -> Self {
        Self {
            bids,
            auction_status: listing.auction_status,
            auto_rejected: Vec::new(),
        }
    }
}
// endregion: --- Transition

// region:    --- Aggregates
/// 최고 입찰가 (상태와 무관하게 전체 입찰 기준)
pub fn highest_bid(bids: &[Bid]) -> Option<i64> {
    bids.iter().map(|b| b.bid_amount).max()
}

pub fn pending_count(bids: &[Bid]) -> usize {
    bids.iter().filter(|b| b.status == BidStatus::Pending).count()
}

pub fn has_accepted(bids: &[Bid]) -> bool {
    bids.iter().any(|b| b.status == BidStatus::Accepted)
}

/// 최소 입찰가
/// 최고 입찰가가 있으면 +100, 없으면 희망가의 90% (내림)
pub fn minimum_bid(asking_price: i64, highest_bid: Option<i64>) -> i64 {
    match highest_bid {
        Some(highest) => highest.saturating_add(MIN_INCREMENT),
        None => asking_price.saturating_mul(9) / 10,
    }
}

/// 잠금 여부. 상태가 locked 이거나 이미 수락된 입찰이 있으면 잠긴 것으로 본다.
pub fn is_locked(listing: &Listing, bids: &[Bid]) -> bool {
    listing.auction_status == AuctionStatus::Locked || has_accepted(bids)
}

/// 판매자가 수락/거절할 수 있는 입찰인지
pub fn can_respond(listing: &Listing, bids: &[Bid], bid: &Bid) -> bool {
    bid.status == BidStatus::Pending && !is_locked(listing, bids)
}

pub fn summarize(listing: &Listing, bids: &[Bid]) -> ListingSummary {
    let highest = highest_bid(bids);
    ListingSummary {
        listing: listing.clone(),
        total_bids: bids.len(),
        pending_bids: pending_count(bids),
        highest_bid: highest,
        has_accepted_bid: has_accepted(bids),
        minimum_bid: minimum_bid(listing.asking_price, highest),
    }
}
// endregion: --- Aggregates

// region:    --- Transitions
/// 판매자 수락
/// 대상 입찰은 accepted, 나머지 pending 입찰은 모두 auto-rejected, 상품은 locked
pub fn apply_accept(listing: &Listing, bids: &[Bid], bid_id: &str) -> Result<Transition, MarketError> {
    let target = find_bid(bids, bid_id)?;
    if is_locked(listing, bids) {
        return Err(MarketError::ListingLocked(listing.id.clone()));
    }
    ensure_pending(target)?;

    let mut auto_rejected = Vec::new();
    let bids = bids
        .iter()
        .map(|bid| {
            let mut bid = bid.clone();
            if bid.id == bid_id {
                bid.status = BidStatus::Accepted;
            } else if bid.status == BidStatus::Pending {
                bid.status = BidStatus::AutoRejected;
                auto_rejected.push(bid.id.clone());
            }
            bid
        })
        .collect();

    Ok(Transition {
        bids,
        auction_status: AuctionStatus::Locked,
        auto_rejected,
    })
}

/// 판매자 거절. 대상 입찰만 rejected 로 바뀐다.
pub fn apply_reject(listing: &Listing, bids: &[Bid], bid_id: &str) -> Result<Transition, MarketError> {
    let target = find_bid(bids, bid_id)?;
    if is_locked(listing, bids) {
        return Err(MarketError::ListingLocked(listing.id.clone()));
    }
    ensure_pending(target)?;

    let bids = with_bid(bids, bid_id, |bid| bid.status = BidStatus::Rejected);
    Ok(Transition::unchanged_status(listing, bids))
}

/// 구매자 본인 입찰 취소
pub fn apply_cancel(
    listing: &Listing,
    bids: &[Bid],
    bid_id: &str,
    bidder_id: &str,
) -> Result<Transition, MarketError> {
    let target = find_bid(bids, bid_id)?;
    ensure_owner(target, bidder_id)?;
    ensure_pending(target)?;

    let bids = with_bid(bids, bid_id, |bid| bid.status = BidStatus::Cancelled);
    Ok(Transition::unchanged_status(listing, bids))
}

/// 구매자 본인 입찰 수정
/// 최소 입찰가는 수정 대상 입찰을 제외한 나머지 입찰로 계산한다.
pub fn apply_revise(
    listing: &Listing,
    bids: &[Bid],
    bid_id: &str,
    bidder_id: &str,
    bid_amount: i64,
    note: Option<String>,
) -> Result<Transition, MarketError> {
    let target = find_bid(bids, bid_id)?;
    ensure_owner(target, bidder_id)?;
    ensure_pending(target)?;
    ensure_open(listing, bids)?;
    ensure_amount_in_range(bid_amount)?;

    let others = highest_bid_excluding(bids, bid_id);
    let minimum = minimum_bid(listing.asking_price, others);
    if bid_amount < minimum {
        return Err(MarketError::LowBid { minimum });
    }
    let note = normalize_note(note)?;

    let bids = with_bid(bids, bid_id, |bid| {
        bid.bid_amount = bid_amount;
        bid.note = note;
    });
    Ok(Transition::unchanged_status(listing, bids))
}

/// 신규 입찰 추가
pub fn apply_place(listing: &Listing, bids: &[Bid], new_bid: Bid) -> Result<Transition, MarketError> {
    ensure_open(listing, bids)?;
    ensure_amount_in_range(new_bid.bid_amount)?;

    let minimum = minimum_bid(listing.asking_price, highest_bid(bids));
    if new_bid.bid_amount < minimum {
        return Err(MarketError::LowBid { minimum });
    }

    let mut next = bids.to_vec();
    next.push(new_bid);
    Ok(Transition::unchanged_status(listing, next))
}

/// 메모 정리: 공백뿐이면 None, 500자 초과면 검증 오류
pub fn normalize_note(note: Option<String>) -> Result<Option<String>, MarketError> {
    let Some(note) = note else {
        return Ok(None);
    };
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_NOTE_LEN {
        return Err(MarketError::Validation(vec![FieldError::new(
            "note",
            "Max 500 characters",
        )]));
    }
    Ok(Some(trimmed.to_string()))
}
// endregion: --- Transitions

// region:    --- Helpers
fn find_bid<'a>(bids: &'a [Bid], bid_id: &str) -> Result<&'a Bid, MarketError> {
    bids.iter()
        .find(|b| b.id == bid_id)
        .ok_or_else(|| MarketError::BidNotFound(bid_id.to_string()))
}

fn ensure_pending(bid: &Bid) -> Result<(), MarketError> {
    if bid.status.is_terminal() {
        return Err(MarketError::InvalidTransition {
            bid_id: bid.id.clone(),
            status: bid.status.to_string(),
        });
    }
    Ok(())
}

fn ensure_owner(bid: &Bid, bidder_id: &str) -> Result<(), MarketError> {
    if bid.bidder.id != bidder_id {
        return Err(MarketError::NotBidOwner(bid.id.clone()));
    }
    Ok(())
}

fn ensure_open(listing: &Listing, bids: &[Bid]) -> Result<(), MarketError> {
    if is_locked(listing, bids) {
        return Err(MarketError::ListingLocked(listing.id.clone()));
    }
    if !listing.auction_status.is_open() {
        return Err(MarketError::AuctionClosed(listing.id.clone()));
    }
    Ok(())
}

/// 금액은 1 이상 `MAX_BID_AMOUNT` 이하
fn ensure_amount_in_range(bid_amount: i64) -> Result<(), MarketError> {
    if !(1..=MAX_BID_AMOUNT).contains(&bid_amount) {
        return Err(MarketError::Validation(vec![FieldError::new(
            "bidAmount",
            format!(
                "Bid amount must be between $1 and ${}",
                crate::error::format_amount(MAX_BID_AMOUNT)
            ),
        )]));
    }
    Ok(())
}

fn highest_bid_excluding(bids: &[Bid], bid_id: &str) -> Option<i64> {
    bids.iter()
        .filter(|b| b.id != bid_id)
        .map(|b| b.bid_amount)
        .max()
}

fn with_bid(bids: &[Bid], bid_id: &str, update: impl FnOnce(&mut Bid)) -> Vec<Bid> {
    let mut next = bids.to_vec();
    if let Some(bid) = next.iter_mut().find(|b| b.id == bid_id) {
        update(bid);
    }
    next
}
// endregion: --- Helpers

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidding::model::Bidder;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn listing(status: AuctionStatus) -> Listing {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        Listing {
            id: "LST-001".to_string(),
            name: "Round Brilliant 2.5ct".to_string(),
            specs: "D/VVS1/EX".to_string(),
            diamond: crate::listing::model::DiamondSpecs {
                shape: "Round".to_string(),
                carat: 2.5,
                color: "D".to_string(),
                clarity: "VVS1".to_string(),
                cut: "Excellent".to_string(),
                certification: None,
            },
            asking_price: 10000,
            seller: "Diamond Elite Co.".to_string(),
            auction_status: status,
            created_at: created,
            ends_at: created + chrono::Duration::days(7),
        }
    }

    fn bid(id: &str, bidder: &str, amount: i64, status: BidStatus) -> Bid {
        Bid {
            id: id.to_string(),
            listing_id: "LST-001".to_string(),
            bid_amount: amount,
            status,
            placed_at: Utc.with_ymd_and_hms(2024, 1, 20, 14, 30, 0).unwrap(),
            note: None,
            bidder: Bidder {
                id: bidder.to_string(),
                name: bidder.to_string(),
                verified: true,
                rating: 4.8,
            },
        }
    }

    fn three_pending() -> Vec<Bid> {
        vec![
            bid("BID-1", "u1", 9500, BidStatus::Pending),
            bid("BID-2", "u2", 9200, BidStatus::Pending),
            bid("BID-3", "u3", 9100, BidStatus::Pending),
        ]
    }

    fn status_of(bids: &[Bid], id: &str) -> BidStatus {
        bids.iter().find(|b| b.id == id).unwrap().status
    }

    #[test]
    fn minimum_bid_uses_asking_price_without_bids() {
        assert_eq!(minimum_bid(10000, None), 9000);
        assert_eq!(minimum_bid(24500, None), 22050);
        assert_eq!(minimum_bid(12345, None), 11110);
    }

    #[test]
    fn minimum_bid_steps_over_highest_bid() {
        assert_eq!(minimum_bid(10000, Some(9500)), 9600);
    }

    #[test]
    fn accept_auto_rejects_pending_siblings_and_locks() {
        let mut bids = three_pending();
        bids.push(bid("BID-4", "u4", 8000, BidStatus::Cancelled));
        let out = apply_accept(&listing(AuctionStatus::Active), &bids, "BID-2").unwrap();

        assert_eq!(out.auction_status, AuctionStatus::Locked);
        assert_eq!(status_of(&out.bids, "BID-2"), BidStatus::Accepted);
        assert_eq!(status_of(&out.bids, "BID-1"), BidStatus::AutoRejected);
        assert_eq!(status_of(&out.bids, "BID-3"), BidStatus::AutoRejected);
        assert_eq!(status_of(&out.bids, "BID-4"), BidStatus::Cancelled);
        assert_eq!(out.auto_rejected, vec!["BID-1".to_string(), "BID-3".to_string()]);
        assert_eq!(
            out.bids.iter().filter(|b| b.status == BidStatus::Accepted).count(),
            1
        );
    }

    #[test]
    fn accept_keeps_earlier_rejections() {
        let mut bids = three_pending();
        bids[2].status = BidStatus::Rejected;
        let out = apply_accept(&listing(AuctionStatus::Active), &bids, "BID-1").unwrap();
        assert_eq!(status_of(&out.bids, "BID-3"), BidStatus::Rejected);
        assert_eq!(status_of(&out.bids, "BID-2"), BidStatus::AutoRejected);
    }

    #[test]
    fn second_accept_is_refused() {
        let first = apply_accept(&listing(AuctionStatus::Active), &three_pending(), "BID-1").unwrap();
        let locked = listing(first.auction_status);
        let err = apply_accept(&locked, &first.bids, "BID-2").unwrap_err();
        assert_matches!(err, MarketError::ListingLocked(id) if id == "LST-001");

        // 상품 상태가 갱신되지 않았더라도 accepted 입찰이 있으면 잠긴 것으로 본다
        let err = apply_accept(&listing(AuctionStatus::Active), &first.bids, "BID-2").unwrap_err();
        assert_matches!(err, MarketError::ListingLocked(_));
    }

    #[test]
    fn accept_allowed_after_auction_closed() {
        let out = apply_accept(&listing(AuctionStatus::Closed), &three_pending(), "BID-3").unwrap();
        assert_eq!(out.auction_status, AuctionStatus::Locked);
    }

    #[test]
    fn accept_requires_pending_target() {
        let mut bids = three_pending();
        bids[0].status = BidStatus::Cancelled;
        let err = apply_accept(&listing(AuctionStatus::Active), &bids, "BID-1").unwrap_err();
        assert_matches!(err, MarketError::InvalidTransition { status, .. } if status == "cancelled");

        let err = apply_accept(&listing(AuctionStatus::Active), &bids, "BID-9").unwrap_err();
        assert_matches!(err, MarketError::BidNotFound(_));
    }

    #[test]
    fn reject_touches_only_the_target() {
        let l = listing(AuctionStatus::EndingSoon);
        let out = apply_reject(&l, &three_pending(), "BID-2").unwrap();
        assert_eq!(out.auction_status, AuctionStatus::EndingSoon);
        assert_eq!(status_of(&out.bids, "BID-2"), BidStatus::Rejected);
        assert_eq!(status_of(&out.bids, "BID-1"), BidStatus::Pending);
        assert_eq!(status_of(&out.bids, "BID-3"), BidStatus::Pending);
        assert!(out.auto_rejected.is_empty());
    }

    #[test]
    fn reject_refused_on_locked_listing() {
        let err = apply_reject(&listing(AuctionStatus::Locked), &three_pending(), "BID-2").unwrap_err();
        assert_matches!(err, MarketError::ListingLocked(_));
    }

    #[test]
    fn cancel_is_owner_only_and_terminal() {
        let l = listing(AuctionStatus::Active);
        let err = apply_cancel(&l, &three_pending(), "BID-1", "u2").unwrap_err();
        assert_matches!(err, MarketError::NotBidOwner(_));

        let out = apply_cancel(&l, &three_pending(), "BID-1", "u1").unwrap();
        assert_eq!(status_of(&out.bids, "BID-1"), BidStatus::Cancelled);

        let err = apply_cancel(&l, &out.bids, "BID-1", "u1").unwrap_err();
        assert_matches!(err, MarketError::InvalidTransition { .. });
        let err = apply_accept(&l, &out.bids, "BID-1").unwrap_err();
        assert_matches!(err, MarketError::InvalidTransition { .. });
    }

    #[test]
    fn place_enforces_minimum_and_open_listing() {
        let l = listing(AuctionStatus::Active);
        let err = apply_place(&l, &three_pending(), bid("BID-5", "u5", 9599, BidStatus::Pending)).unwrap_err();
        assert_matches!(err, MarketError::LowBid { minimum: 9600 });

        let out = apply_place(&l, &three_pending(), bid("BID-5", "u5", 9600, BidStatus::Pending)).unwrap();
        assert_eq!(out.bids.len(), 4);

        let err = apply_place(&l, &[], bid("BID-5", "u5", 8999, BidStatus::Pending)).unwrap_err();
        assert_matches!(err, MarketError::LowBid { minimum: 9000 });

        let closed = listing(AuctionStatus::Closed);
        let err = apply_place(&closed, &[], bid("BID-5", "u5", 9999, BidStatus::Pending)).unwrap_err();
        assert_matches!(err, MarketError::AuctionClosed(_));
    }

    #[test]
    fn place_refuses_out_of_range_amounts() {
        let l = listing(AuctionStatus::Active);
        for amount in [0, -500, MAX_BID_AMOUNT + 1, i64::MAX] {
            let err = apply_place(&l, &[], bid("BID-5", "u5", amount, BidStatus::Pending)).unwrap_err();
            assert_matches!(err, MarketError::Validation(fields) if fields[0].field == "bidAmount");
        }

        let out = apply_place(&l, &[], bid("BID-5", "u5", MAX_BID_AMOUNT, BidStatus::Pending)).unwrap();
        assert_eq!(highest_bid(&out.bids), Some(MAX_BID_AMOUNT));
        assert_eq!(summarize(&l, &out.bids).minimum_bid, MAX_BID_AMOUNT + MIN_INCREMENT);
    }

    #[test]
    fn revise_refuses_out_of_range_amounts() {
        let l = listing(AuctionStatus::Active);
        for amount in [0, -1, i64::MAX] {
            let err = apply_revise(&l, &three_pending(), "BID-1", "u1", amount, None).unwrap_err();
            assert_matches!(err, MarketError::Validation(fields) if fields[0].field == "bidAmount");
        }
    }

    #[test]
    fn minimum_bid_saturates_instead_of_overflowing() {
        assert_eq!(minimum_bid(10000, Some(i64::MAX)), i64::MAX);
        assert_eq!(minimum_bid(i64::MAX, None), i64::MAX / 10);
    }

    #[test]
    fn revise_ignores_own_amount_for_minimum() {
        let l = listing(AuctionStatus::Active);
        // BID-1 이 최고가(9500)이지만 자기 자신은 제외하므로 최소는 9200 + 100
        let out = apply_revise(&l, &three_pending(), "BID-1", "u1", 9300, Some("  ".into())).unwrap();
        let revised = out.bids.iter().find(|b| b.id == "BID-1").unwrap();
        assert_eq!(revised.bid_amount, 9300);
        assert_eq!(revised.note, None);
        assert_eq!(revised.status, BidStatus::Pending);

        let err = apply_revise(&l, &three_pending(), "BID-1", "u1", 9250, None).unwrap_err();
        assert_matches!(err, MarketError::LowBid { minimum: 9300 });
    }

    #[test]
    fn long_notes_are_refused() {
        let err = normalize_note(Some("x".repeat(501))).unwrap_err();
        assert_matches!(err, MarketError::Validation(fields) if fields[0].field == "note");
        assert_eq!(normalize_note(Some(" ok ".into())).unwrap(), Some("ok".to_string()));
    }

    #[test]
    fn summary_is_derived_from_all_bids() {
        let mut bids = three_pending();
        bids[0].status = BidStatus::Rejected;
        let summary = summarize(&listing(AuctionStatus::Active), &bids);
        assert_eq!(summary.total_bids, 3);
        assert_eq!(summary.pending_bids, 2);
        assert_eq!(summary.highest_bid, Some(9500));
        assert_eq!(summary.minimum_bid, 9600);
        assert!(!summary.has_accepted_bid);
    }
}
