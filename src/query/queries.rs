//! 조회 조건과 조회 결과 모델
//! 필터는 모두 조건의 논리곱이며, 비어 있는 조건은 제약이 없는 것으로 본다.
// region:    --- Imports
use crate::bidding::model::{Bid, BidStatus};
use crate::listing::model::{AuctionStatus, Listing, ListingSummary};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

// endregion: --- Imports

// region:    --- Marketplace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketplaceSort {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    CaratHigh,
    MostBids,
}

/// 마켓플레이스 검색 조건
/// shapes / colors / clarities 는 쉼표로 구분한다. (예: `shapes=Round,Oval`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceQuery {
    pub q: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_carat: Option<f64>,
    pub max_carat: Option<f64>,
    pub shapes: Option<String>,
    pub colors: Option<String>,
    pub clarities: Option<String>,
    #[serde(default)]
    pub sort: MarketplaceSort,
}

impl MarketplaceQuery {
    pub fn matches(&self, listing: &Listing) -> bool {
        let d = &listing.diamond;
        let text_ok = match search_term(&self.q) {
            Some(term) => [&listing.name, &d.shape, &d.color, &d.clarity]
                .iter()
                .any(|field| field.to_lowercase().contains(&term)),
            None => true,
        };

        text_ok
            && self.min_price.map_or(true, |min| listing.asking_price >= min)
            && self.max_price.map_or(true, |max| listing.asking_price <= max)
            && self.min_carat.map_or(true, |min| d.carat >= min)
            && self.max_carat.map_or(true, |max| d.carat <= max)
            && in_set(&self.shapes, &d.shape)
            && in_set(&self.colors, &d.color)
            && in_set(&self.clarities, &d.clarity)
    }
}

pub fn sort_marketplace(items: &mut [ListingSummary], sort: MarketplaceSort) {
    match sort {
        MarketplaceSort::Newest => items.sort_by_key(|s| Reverse(s.listing.created_at)),
        MarketplaceSort::PriceLow => items.sort_by_key(|s| s.listing.asking_price),
        MarketplaceSort::PriceHigh => items.sort_by_key(|s| Reverse(s.listing.asking_price)),
        MarketplaceSort::CaratHigh => items.sort_by(|a, b| {
            b.listing
                .diamond
                .carat
                .total_cmp(&a.listing.diamond.carat)
        }),
        MarketplaceSort::MostBids => items.sort_by_key(|s| Reverse(s.total_bids)),
    }
}
// endregion: --- Marketplace

// region:    --- Bids Received
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReceivedTab {
    #[default]
    All,
    Active,
    Locked,
    Closed,
}

impl ReceivedTab {
    pub fn includes(self, status: AuctionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status.is_open(),
            Self::Locked => status == AuctionStatus::Locked,
            Self::Closed => status == AuctionStatus::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReceivedSort {
    MostBids,
    HighestBid,
    EndingSoon,
    #[default]
    Newest,
}

/// 받은 입찰 조회 조건
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedQuery {
    pub q: Option<String>,
    /// 판매자 이름 (없으면 전체)
    pub seller: Option<String>,
    #[serde(default)]
    pub tab: ReceivedTab,
    #[serde(default)]
    pub sort: ReceivedSort,
}

impl ReceivedQuery {
    pub fn matches(&self, listing: &Listing) -> bool {
        let seller_ok = self
            .seller
            .as_deref()
            .map_or(true, |seller| listing.seller.eq_ignore_ascii_case(seller));
        seller_ok
            && self.tab.includes(listing.auction_status)
            && matches_name_or_specs(&self.q, &listing.name, &listing.specs)
    }
}

pub fn sort_received(items: &mut [ListingSummary], sort: ReceivedSort) {
    match sort {
        ReceivedSort::MostBids => items.sort_by_key(|s| Reverse(s.total_bids)),
        ReceivedSort::HighestBid => items.sort_by_key(|s| Reverse(s.highest_bid)),
        ReceivedSort::EndingSoon => items.sort_by_key(|s| s.listing.ends_at),
        ReceivedSort::Newest => items.sort_by_key(|s| Reverse(s.listing.created_at)),
    }
}
// endregion: --- Bids Received

// region:    --- My Bids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MyBidsTab {
    #[default]
    All,
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    AutoRejected,
}

impl MyBidsTab {
    pub fn includes(self, status: BidStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == BidStatus::Pending,
            Self::Accepted => status == BidStatus::Accepted,
            Self::Rejected => status == BidStatus::Rejected,
            Self::Cancelled => status == BidStatus::Cancelled,
            Self::AutoRejected => status == BidStatus::AutoRejected,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MyBidsSort {
    #[default]
    Newest,
    Oldest,
    AmountHigh,
    AmountLow,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyBidsQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub tab: MyBidsTab,
    #[serde(default)]
    pub sort: MyBidsSort,
}

/// 구매자 화면용 입찰 (상품 정보 포함)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyBidView {
    #[serde(flatten)]
    pub bid: Bid,
    pub listing_name: String,
    pub specs: String,
    pub asking_price: i64,
    pub seller: String,
    pub auction_status: AuctionStatus,
}

impl MyBidView {
    pub fn new(bid: Bid, listing: &Listing) -> Self {
        Self {
            bid,
            listing_name: listing.name.clone(),
            specs: listing.specs.clone(),
            asking_price: listing.asking_price,
            seller: listing.seller.clone(),
            auction_status: listing.auction_status,
        }
    }
}

impl MyBidsQuery {
    pub fn matches(&self, view: &MyBidView) -> bool {
        self.tab.includes(view.bid.status)
            && matches_name_or_specs(&self.q, &view.listing_name, &view.specs)
    }
}

pub fn sort_my_bids(items: &mut [MyBidView], sort: MyBidsSort) {
    match sort {
        MyBidsSort::Newest => items.sort_by_key(|v| Reverse(v.bid.placed_at)),
        MyBidsSort::Oldest => items.sort_by_key(|v| v.bid.placed_at),
        MyBidsSort::AmountHigh => items.sort_by_key(|v| Reverse(v.bid.bid_amount)),
        MyBidsSort::AmountLow => items.sort_by_key(|v| v.bid.bid_amount),
    }
}
// endregion: --- My Bids

// region:    --- Views
/// 판매자 화면용 입찰
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidView {
    #[serde(flatten)]
    pub bid: Bid,
    /// 수락/거절 버튼 노출 여부
    pub can_respond: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingBidsView {
    pub listing: ListingSummary,
    pub bids: Vec<BidView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimumBid {
    pub listing_id: String,
    pub asking_price: i64,
    pub highest_bid: Option<i64>,
    pub minimum_bid: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub open_listings: usize,
    pub locked_listings: usize,
    pub closed_listings: usize,
    pub total_bids: usize,
    pub pending_bids: usize,
    pub accepted_bids: usize,
    pub rejected_bids: usize,
    pub cancelled_bids: usize,
    pub auto_rejected_bids: usize,
}

impl DashboardStats {
    pub fn add_listing(&mut self, status: AuctionStatus, bids: &[Bid]) {
        match status {
            AuctionStatus::Active | AuctionStatus::EndingSoon => self.open_listings += 1,
            AuctionStatus::Locked => self.locked_listings += 1,
            AuctionStatus::Closed => self.closed_listings += 1,
        }
        for bid in bids {
            self.total_bids += 1;
            match bid.status {
                BidStatus::Pending => self.pending_bids += 1,
                BidStatus::Accepted => self.accepted_bids += 1,
                BidStatus::Rejected => self.rejected_bids += 1,
                BidStatus::Cancelled => self.cancelled_bids += 1,
                BidStatus::AutoRejected => self.auto_rejected_bids += 1,
            }
        }
    }
}

/// 판매자 화면의 입찰 정렬 (최신순)
pub fn newest_first(bids: &mut [Bid]) {
    bids.sort_by_key(|b| Reverse(b.placed_at));
}
// endregion: --- Views

// region:    --- Helpers
fn search_term(q: &Option<String>) -> Option<String> {
    q.as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn matches_name_or_specs(q: &Option<String>, name: &str, specs: &str) -> bool {
    match search_term(q) {
        Some(term) => name.to_lowercase().contains(&term) || specs.to_lowercase().contains(&term),
        None => true,
    }
}

/// 쉼표 목록에 값이 있는지. 목록이 비어 있으면 항상 참.
fn in_set(set: &Option<String>, value: &str) -> bool {
    let Some(set) = set.as_deref() else {
        return true;
    };
    let mut items = set.split(',').map(str::trim).filter(|s| !s.is_empty()).peekable();
    if items.peek().is_none() {
        return true;
    }
    items.any(|item| item.eq_ignore_ascii_case(value))
}
// endregion: --- Helpers

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidding::machine;
    use crate::seed;
    use chrono::Utc;

    fn summaries() -> Vec<ListingSummary> {
        seed::listings(Utc::now())
            .iter()
            .map(|(l, b)| machine::summarize(l, b))
            .collect()
    }

    fn ids(items: &[ListingSummary]) -> Vec<&str> {
        items.iter().map(|s| s.listing.id.as_str()).collect()
    }

    #[test]
    fn marketplace_filters_are_conjunctive() {
        let query = MarketplaceQuery {
            colors: Some("D, E".into()),
            min_carat: Some(2.0),
            max_price: Some(35000),
            ..Default::default()
        };
        let hits: Vec<ListingSummary> = summaries()
            .into_iter()
            .filter(|s| query.matches(&s.listing))
            .collect();
        assert_eq!(ids(&hits), vec!["LST-001", "LST-004"]);
    }

    #[test]
    fn marketplace_search_is_case_insensitive() {
        let query = MarketplaceQuery {
            q: Some("  emerald ".into()),
            ..Default::default()
        };
        let hits: Vec<ListingSummary> = summaries()
            .into_iter()
            .filter(|s| query.matches(&s.listing))
            .collect();
        assert_eq!(ids(&hits), vec!["LST-003"]);
    }

    #[test]
    fn empty_set_means_no_constraint() {
        assert!(in_set(&None, "Round"));
        assert!(in_set(&Some(" , ".into()), "Round"));
        assert!(in_set(&Some("round,oval".into()), "Round"));
        assert!(!in_set(&Some("Oval".into()), "Round"));
    }

    #[test]
    fn marketplace_sorts() {
        let mut items = summaries();
        sort_marketplace(&mut items, MarketplaceSort::PriceLow);
        assert_eq!(items[0].listing.id, "LST-005");
        sort_marketplace(&mut items, MarketplaceSort::CaratHigh);
        assert_eq!(items[0].listing.id, "LST-003");
        sort_marketplace(&mut items, MarketplaceSort::MostBids);
        assert_eq!(items[0].listing.id, "LST-001");
        sort_marketplace(&mut items, MarketplaceSort::Newest);
        assert_eq!(items[0].listing.id, "LST-007");
    }

    #[test]
    fn received_tabs_group_open_statuses() {
        assert!(ReceivedTab::Active.includes(AuctionStatus::Active));
        assert!(ReceivedTab::Active.includes(AuctionStatus::EndingSoon));
        assert!(!ReceivedTab::Active.includes(AuctionStatus::Locked));
        assert!(ReceivedTab::Locked.includes(AuctionStatus::Locked));
        assert!(ReceivedTab::All.includes(AuctionStatus::Closed));
    }

    #[test]
    fn received_search_covers_specs() {
        let (listing, _) = seed::listings(Utc::now()).remove(0);
        let query = ReceivedQuery {
            q: Some("vvs1".into()),
            ..Default::default()
        };
        assert!(query.matches(&listing));
        let query = ReceivedQuery {
            seller: Some("Gem Masters".into()),
            ..Default::default()
        };
        assert!(!query.matches(&listing));
    }

    #[test]
    fn query_params_deserialize_from_kebab_case() {
        let sort: MyBidsSort = serde_json::from_str("\"amount-high\"").unwrap();
        assert_eq!(sort, MyBidsSort::AmountHigh);
        let tab: MyBidsTab = serde_json::from_str("\"auto-rejected\"").unwrap();
        assert!(tab.includes(BidStatus::AutoRejected));
        let sort: ReceivedSort = serde_json::from_str("\"ending-soon\"").unwrap();
        assert_eq!(sort, ReceivedSort::EndingSoon);
    }
}
