use crate::listing::model::AuctionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum MarketEvent {
    // 입찰 이벤트
    BidPlaced {
        listing_id: String,
        bid_id: String,
        bidder_id: String,
        bid_amount: i64,
        timestamp: DateTime<Utc>,
    },
    // 입찰 금액 수정
    BidRevised {
        listing_id: String,
        bid_id: String,
        bidder_id: String,
        bid_amount: i64,
        timestamp: DateTime<Utc>,
    },
    // 입찰 수락 (상품 잠금)
    BidAccepted {
        listing_id: String,
        bid_id: String,
        bid_amount: i64,
        auto_rejected: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    // 입찰 거절
    BidRejected {
        listing_id: String,
        bid_id: String,
        timestamp: DateTime<Utc>,
    },
    // 입찰 취소
    BidCancelled {
        listing_id: String,
        bid_id: String,
        bidder_id: String,
        timestamp: DateTime<Utc>,
    },
    // 경매 상태 변경 (스케줄러)
    AuctionStatusChanged {
        listing_id: String,
        from: AuctionStatus,
        to: AuctionStatus,
        timestamp: DateTime<Utc>,
    },
}

impl MarketEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BidPlaced { .. } => "BidPlaced",
            Self::BidRevised { .. } => "BidRevised",
            Self::BidAccepted { .. } => "BidAccepted",
            Self::BidRejected { .. } => "BidRejected",
            Self::BidCancelled { .. } => "BidCancelled",
            Self::AuctionStatusChanged { .. } => "AuctionStatusChanged",
        }
    }

    pub fn listing_id(&self) -> &str {
        match self {
            Self::BidPlaced { listing_id, .. }
            | Self::BidRevised { listing_id, .. }
            | Self::BidAccepted { listing_id, .. }
            | Self::BidRejected { listing_id, .. }
            | Self::BidCancelled { listing_id, .. }
            | Self::AuctionStatusChanged { listing_id, .. } => listing_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::BidPlaced { timestamp, .. }
            | Self::BidRevised { timestamp, .. }
            | Self::BidAccepted { timestamp, .. }
            | Self::BidRejected { timestamp, .. }
            | Self::BidCancelled { timestamp, .. }
            | Self::AuctionStatusChanged { timestamp, .. } => *timestamp,
        }
    }

    /// 활동 피드에 표시할 문구
    pub fn describe(&self) -> String {
        match self {
            Self::BidPlaced {
                listing_id,
                bid_id,
                bid_amount,
                ..
            } => format!(
                "Bid {bid_id} of ${} placed on {listing_id}",
                crate::error::format_amount(*bid_amount)
            ),
            Self::BidRevised {
                listing_id,
                bid_id,
                bid_amount,
                ..
            } => format!(
                "Bid {bid_id} on {listing_id} revised to ${}",
                crate::error::format_amount(*bid_amount)
            ),
            Self::BidAccepted {
                listing_id,
                bid_id,
                auto_rejected,
                ..
            } => format!(
                "Bid {bid_id} accepted on {listing_id}; {} other bid(s) auto-rejected",
                auto_rejected.len()
            ),
            Self::BidRejected {
                listing_id, bid_id, ..
            } => format!("Bid {bid_id} rejected on {listing_id}"),
            Self::BidCancelled {
                listing_id, bid_id, ..
            } => format!("Bid {bid_id} on {listing_id} cancelled by bidder"),
            Self::AuctionStatusChanged {
                listing_id, from, to, ..
            } => format!(
                "Listing {listing_id} moved from {} to {}",
                from.as_str(),
                to.as_str()
            ),
        }
    }
}
