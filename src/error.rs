//! 마켓 도메인 오류
//! 모든 오류는 `{"error": ..., "code": ...}` 형태로 응답된다.
// region:    --- Imports
use serde::Serialize;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Field Error
/// 필드 단위 검증 오류
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
// endregion: --- Field Error

// region:    --- Market Error
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Listing not found: {0}")]
    ListingNotFound(String),

    #[error("Bid not found: {0}")]
    BidNotFound(String),

    #[error("Preference not found: {0}")]
    PreferenceNotFound(String),

    #[error("Bid {bid_id} is {status} and can no longer change")]
    InvalidTransition { bid_id: String, status: String },

    #[error("Listing {0} is locked by an accepted bid")]
    ListingLocked(String),

    #[error("Listing {0} is not open for bidding")]
    AuctionClosed(String),

    #[error("Bid must be at least ${}", dollars(.minimum))]
    LowBid { minimum: i64 },

    #[error("Bid {0} does not belong to this bidder")]
    NotBidOwner(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Version conflict on listing {0}")]
    VersionConflict(String),

    #[error("Max retries exceeded")]
    MaxRetriesExceeded,
}

impl MarketError {
    /// 클라이언트가 분기할 수 있는 고정 코드
    pub fn code(&self) -> &'static str {
        match self {
            Self::ListingNotFound(_) => "LISTING_NOT_FOUND",
            Self::BidNotFound(_) => "BID_NOT_FOUND",
            Self::PreferenceNotFound(_) => "PREFERENCE_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ListingLocked(_) => "LISTING_LOCKED",
            Self::AuctionClosed(_) => "AUCTION_CLOSED",
            Self::LowBid { .. } => "LOW_BID",
            Self::NotBidOwner(_) => "NOT_BID_OWNER",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::VersionConflict(_) => "VERSION_CONFLICT",
            Self::MaxRetriesExceeded => "MAX_RETRIES_EXCEEDED",
        }
    }

    /// 응답 본문
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Validation(fields) => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "fields": fields,
            }),
            Self::LowBid { minimum } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "minimumBid": minimum,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        }
    }
}
// endregion: --- Market Error

// region:    --- Formatting
fn dollars(amount: &i64) -> String {
    format_amount(*amount)
}

/// 금액을 천 단위 구분 기호와 함께 표시한다. (예: 24500 -> "24,500")
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
// endregion: --- Formatting
