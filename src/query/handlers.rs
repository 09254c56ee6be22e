// region:    --- Imports
use super::queries::{
    self, BidView, DashboardStats, ListingBidsView, MarketplaceQuery, MinimumBid, MyBidView,
    MyBidsQuery, ReceivedQuery,
};
use crate::bidding::machine;
use crate::database::MarketStore;
use crate::error::MarketError;
use crate::listing::model::ListingSummary;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 상품 요약 조회
pub async fn get_listing_summary(
    store: &dyn MarketStore,
    listing_id: &str,
) -> Result<ListingSummary, MarketError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    let record = store.get_listing(listing_id).await?;
    Ok(machine::summarize(&record.listing, &record.bids))
}

/// 상품별 입찰 목록 조회 (판매자 화면)
pub async fn get_listing_bids(
    store: &dyn MarketStore,
    listing_id: &str,
) -> Result<ListingBidsView, MarketError> {
    info!("{:<12} --> 상품 입찰 조회 id: {}", "Query", listing_id);
    let record = store.get_listing(listing_id).await?;
    let summary = machine::summarize(&record.listing, &record.bids);

    let mut bids = record.bids.clone();
    queries::newest_first(&mut bids);
    let bids = bids
        .into_iter()
        .map(|bid| BidView {
            can_respond: machine::can_respond(&record.listing, &record.bids, &bid),
            bid,
        })
        .collect();

    Ok(ListingBidsView {
        listing: summary,
        bids,
    })
}

/// 최소 입찰가 조회
pub async fn get_minimum_bid(
    store: &dyn MarketStore,
    listing_id: &str,
) -> Result<MinimumBid, MarketError> {
    info!("{:<12} --> 최소 입찰가 조회 id: {}", "Query", listing_id);
    let record = store.get_listing(listing_id).await?;
    let highest = machine::highest_bid(&record.bids);
    Ok(MinimumBid {
        listing_id: record.listing.id,
        asking_price: record.listing.asking_price,
        highest_bid: highest,
        minimum_bid: machine::minimum_bid(record.listing.asking_price, highest),
    })
}

/// 마켓플레이스 검색
pub async fn search_marketplace(
    store: &dyn MarketStore,
    query: &MarketplaceQuery,
) -> Vec<ListingSummary> {
    info!("{:<12} --> 마켓플레이스 검색: {:?}", "Query", query);
    let mut items: Vec<ListingSummary> = store
        .list_listings()
        .await
        .iter()
        .filter(|r| query.matches(&r.listing))
        .map(|r| machine::summarize(&r.listing, &r.bids))
        .collect();
    queries::sort_marketplace(&mut items, query.sort);
    items
}

/// 받은 입찰 조회 (입찰이 하나 이상 있는 상품만)
pub async fn get_bids_received(
    store: &dyn MarketStore,
    query: &ReceivedQuery,
) -> Vec<ListingSummary> {
    info!("{:<12} --> 받은 입찰 조회: {:?}", "Query", query);
    let mut items: Vec<ListingSummary> = store
        .list_listings()
        .await
        .iter()
        .filter(|r| !r.bids.is_empty() && query.matches(&r.listing))
        .map(|r| machine::summarize(&r.listing, &r.bids))
        .collect();
    queries::sort_received(&mut items, query.sort);
    items
}

/// 내 입찰 조회 (구매자 화면)
pub async fn get_my_bids(
    store: &dyn MarketStore,
    bidder_id: &str,
    query: &MyBidsQuery,
) -> Vec<MyBidView> {
    info!("{:<12} --> 내 입찰 조회 bidder: {}", "Query", bidder_id);
    let mut items: Vec<MyBidView> = store
        .list_listings()
        .await
        .iter()
        .flat_map(|r| {
            r.bids
                .iter()
                .filter(|b| b.bidder.id == bidder_id)
                .map(|b| MyBidView::new(b.clone(), &r.listing))
                .collect::<Vec<_>>()
        })
        .filter(|view| query.matches(view))
        .collect();
    queries::sort_my_bids(&mut items, query.sort);
    items
}

/// 대시보드 통계
pub async fn get_stats(store: &dyn MarketStore) -> DashboardStats {
    info!("{:<12} --> 대시보드 통계 조회", "Query");
    let mut stats = DashboardStats::default();
    for record in store.list_listings().await {
        stats.add_listing(record.listing.auction_status, &record.bids);
    }
    stats
}

// endregion: --- Query Handlers
