use crate::auction::events::MarketEvent;
use crate::event_store::Event;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::RwLock;

// 활동 피드 항목
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub event_id: i64,
    pub event_type: String,
    pub listing_id: String,
    pub version: i64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// 최근 이벤트 N건을 보관하는 프로젝션
pub struct ActivityFeed {
    entries: RwLock<VecDeque<Activity>>,
    capacity: usize,
}

impl ActivityFeed {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub async fn push(&self, event: &Event, market_event: &MarketEvent) {
        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_back();
        }
        entries.push_front(Activity {
            event_id: event.id,
            event_type: event.event_type.clone(),
            listing_id: event.aggregate_id.clone(),
            version: event.version,
            message: market_event.describe(),
            timestamp: event.timestamp,
        });
    }

    /// 최신순
    pub async fn recent(&self) -> Vec<Activity> {
        self.entries.read().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancelled(n: i64) -> (Event, MarketEvent) {
        let market = MarketEvent::BidCancelled {
            listing_id: "LST-005".into(),
            bid_id: format!("BID-{n}"),
            bidder_id: "USR-100".into(),
            timestamp: Utc::now(),
        };
        let mut event = Event::from_market(&market, n).unwrap();
        event.id = n;
        (event, market)
    }

    #[tokio::test]
    async fn keeps_only_newest_entries() {
        let feed = ActivityFeed::new(2);
        for n in 1..=3 {
            let (event, market) = cancelled(n);
            feed.push(&event, &market).await;
        }
        let ids: Vec<i64> = feed.recent().await.iter().map(|a| a.event_id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(
            feed.recent().await[0].message,
            "Bid BID-3 on LST-005 cancelled by bidder"
        );
    }
}
