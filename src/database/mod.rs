//! 인메모리 저장소
//! 상품마다 입찰 목록과 버전을 함께 보관하고, 커밋은 버전 비교 후 한 번에 교체한다.
// region:    --- Imports
use crate::bidding::machine::Transition;
use crate::bidding::model::Bid;
use crate::error::MarketError;
use crate::listing::model::{AuctionStatus, Listing};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

// endregion: --- Imports

// region:    --- Record
/// 상품 + 입찰 스냅샷
#[derive(Debug, Clone)]
pub struct ListingRecord {
    pub listing: Listing,
    pub bids: Vec<Bid>,
    pub version: i64,
}
// endregion: --- Record

// region:    --- Store Trait
/// 마켓 저장소 트레이트
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// 모든 상품 스냅샷 (등록 순)
    async fn list_listings(&self) -> Vec<ListingRecord>;

    async fn get_listing(&self, listing_id: &str) -> Result<ListingRecord, MarketError>;

    /// 상품의 입찰 목록
    async fn list_by_listing(&self, listing_id: &str) -> Result<Vec<Bid>, MarketError> {
        Ok(self.get_listing(listing_id).await?.bids)
    }

    /// 입찰이 속한 상품 id
    async fn find_bid_listing(&self, bid_id: &str) -> Result<String, MarketError>;

    /// 상태 전이 커밋. 저장된 버전이 `expected_version` 과 다르면 `VersionConflict`.
    async fn commit(
        &self,
        listing_id: &str,
        expected_version: i64,
        transition: &Transition,
    ) -> Result<i64, MarketError>;

    /// 경매 상태만 변경 (스케줄러)
    async fn update_status(
        &self,
        listing_id: &str,
        expected_version: i64,
        status: AuctionStatus,
    ) -> Result<i64, MarketError>;

    /// 신규 입찰 id 발급
    fn next_bid_id(&self) -> String;
}
// endregion: --- Store Trait

// region:    --- In-Memory Store
#[derive(Default)]
struct Tables {
    order: Vec<String>,
    listings: HashMap<String, ListingRecord>,
    bid_index: HashMap<String, String>,
}

pub struct InMemoryStore {
    tables: RwLock<Tables>,
    bid_seq: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            bid_seq: AtomicU64::new(200),
        }
    }

    /// 시드 데이터로 저장소 생성
    pub fn with_listings(seed: Vec<(Listing, Vec<Bid>)>) -> Self {
        let mut tables = Tables::default();
        for (listing, bids) in seed {
            for bid in &bids {
                tables.bid_index.insert(bid.id.clone(), listing.id.clone());
            }
            tables.order.push(listing.id.clone());
            tables.listings.insert(
                listing.id.clone(),
                ListingRecord {
                    listing,
                    bids,
                    version: 0,
                },
            );
        }
        Self {
            tables: RwLock::new(tables),
            bid_seq: AtomicU64::new(200),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketStore for InMemoryStore {
    async fn list_listings(&self) -> Vec<ListingRecord> {
        let tables = self.tables.read().await;
        tables
            .order
            .iter()
            .filter_map(|id| tables.listings.get(id).cloned())
            .collect()
    }

    async fn get_listing(&self, listing_id: &str) -> Result<ListingRecord, MarketError> {
        self.tables
            .read()
            .await
            .listings
            .get(listing_id)
            .cloned()
            .ok_or_else(|| MarketError::ListingNotFound(listing_id.to_string()))
    }

    async fn find_bid_listing(&self, bid_id: &str) -> Result<String, MarketError> {
        self.tables
            .read()
            .await
            .bid_index
            .get(bid_id)
            .cloned()
            .ok_or_else(|| MarketError::BidNotFound(bid_id.to_string()))
    }

    async fn commit(
        &self,
        listing_id: &str,
        expected_version: i64,
        transition: &Transition,
    ) -> Result<i64, MarketError> {
        let mut tables = self.tables.write().await;
        let Tables {
            listings,
            bid_index,
            ..
        } = &mut *tables;

        let record = listings
            .get_mut(listing_id)
            .ok_or_else(|| MarketError::ListingNotFound(listing_id.to_string()))?;
        if record.version != expected_version {
            return Err(MarketError::VersionConflict(listing_id.to_string()));
        }

        for bid in &transition.bids {
            bid_index
                .entry(bid.id.clone())
                .or_insert_with(|| listing_id.to_string());
        }
        record.bids = transition.bids.clone();
        record.listing.auction_status = transition.auction_status;
        record.version += 1;

        debug!(
            "{:<12} --> 커밋 완료: listing={}, version={}",
            "Store", listing_id, record.version
        );
        Ok(record.version)
    }

    async fn update_status(
        &self,
        listing_id: &str,
        expected_version: i64,
        status: AuctionStatus,
    ) -> Result<i64, MarketError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .listings
            .get_mut(listing_id)
            .ok_or_else(|| MarketError::ListingNotFound(listing_id.to_string()))?;
        if record.version != expected_version {
            return Err(MarketError::VersionConflict(listing_id.to_string()));
        }
        record.listing.auction_status = status;
        record.version += 1;
        Ok(record.version)
    }

    fn next_bid_id(&self) -> String {
        format!("BID-{}", self.bid_seq.fetch_add(1, Ordering::Relaxed))
    }
}
// endregion: --- In-Memory Store
