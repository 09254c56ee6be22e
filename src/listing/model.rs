use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuctionStatus {
    Active,
    EndingSoon,
    Closed,
    Locked,
}

impl AuctionStatus {
    /// 신규 입찰 가능 여부
    pub fn is_open(self) -> bool {
        matches!(self, Self::Active | Self::EndingSoon)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::EndingSoon => "ending-soon",
            Self::Closed => "closed",
            Self::Locked => "locked",
        }
    }
}

// 다이아몬드 스펙
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiamondSpecs {
    pub shape: String,
    pub carat: f64,
    pub color: String,
    pub clarity: String,
    pub cut: String,
    pub certification: Option<String>,
}

// 상품(리스팅) 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "listingId")]
    pub id: String,
    #[serde(rename = "listingName")]
    pub name: String,
    /// "D/VVS1/EX" 형태의 표시용 스펙
    pub specs: String,
    pub diamond: DiamondSpecs,
    pub asking_price: i64,
    pub seller: String,
    pub auction_status: AuctionStatus,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

// 입찰 집계가 포함된 상품 요약. 저장하지 않고 조회할 때마다 다시 계산한다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    #[serde(flatten)]
    pub listing: Listing,
    pub total_bids: usize,
    pub pending_bids: usize,
    pub highest_bid: Option<i64>,
    pub has_accepted_bid: bool,
    pub minimum_bid: i64,
}
