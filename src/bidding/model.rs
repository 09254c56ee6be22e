use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 입찰 상태
// pending 이외의 상태는 모두 종료 상태이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    AutoRejected,
}

impl BidStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::AutoRejected => "auto-rejected",
        }
    }
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// 입찰자 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bidder {
    pub id: String,
    pub name: String,
    pub verified: bool,
    pub rating: f32,
}

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    pub listing_id: String,
    pub bid_amount: i64,
    pub status: BidStatus,
    pub placed_at: DateTime<Utc>,
    pub note: Option<String>,
    pub bidder: Bidder,
}
