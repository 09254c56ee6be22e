//! 시간 관련 협력 객체
//! 1. Clock: 현재 시각 (테스트에서는 ManualClock 으로 고정)
//! 2. Latency: 원격 호출을 흉내내는 고정 지연
//! 3. AuctionScheduler: 마감 시각에 따른 경매 상태 갱신
//! locked 상태는 입찰 수락으로만 바뀌며 스케줄러는 건드리지 않는다.
// region:    --- Imports
use crate::auction::events::MarketEvent;
use crate::database::MarketStore;
use crate::error::MarketError;
use crate::event_store::{self, EventStore};
use crate::listing::model::{AuctionStatus, Listing};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

// endregion: --- Imports

// region:    --- Clock
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 시스템 시계
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 수동 시계 (테스트용)
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(at) }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
// endregion: --- Clock

// region:    --- Latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    PlaceBid,
    Revise,
    Accept,
    Reject,
    Cancel,
}

/// 작업별 모의 지연. 지연은 항상 끝까지 기다리며 취소되지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub place_bid: Duration,
    pub accept: Duration,
    pub reject: Duration,
    pub cancel: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            place_bid: Duration::from_millis(1500),
            accept: Duration::from_millis(1000),
            reject: Duration::from_millis(500),
            cancel: Duration::from_millis(500),
        }
    }
}

impl Latency {
    /// 지연 없음
    pub fn none() -> Self {
        Self {
            place_bid: Duration::ZERO,
            accept: Duration::ZERO,
            reject: Duration::ZERO,
            cancel: Duration::ZERO,
        }
    }

    pub fn for_operation(&self, op: Operation) -> Duration {
        match op {
            Operation::PlaceBid | Operation::Revise => self.place_bid,
            Operation::Accept => self.accept,
            Operation::Reject => self.reject,
            Operation::Cancel => self.cancel,
        }
    }

    pub async fn simulate(&self, op: Operation) {
        let delay = self.for_operation(op);
        if !delay.is_zero() {
            debug!("{:<12} --> 모의 지연 {:?}: {:?}", "Latency", op, delay);
            tokio::time::sleep(delay).await;
        }
    }
}
// endregion: --- Latency

// region:    --- Auction Scheduler
/// 마감 시각 기준 다음 상태
/// active -> ending-soon -> closed, locked/closed 는 그대로
pub fn next_status(
    listing: &Listing,
    now: DateTime<Utc>,
    ending_soon_window: chrono::Duration,
) -> Option<AuctionStatus> {
    let next = match listing.auction_status {
        AuctionStatus::Locked | AuctionStatus::Closed => return None,
        _ if listing.ends_at <= now => AuctionStatus::Closed,
        AuctionStatus::Active if listing.ends_at - now <= ending_soon_window => {
            AuctionStatus::EndingSoon
        }
        current => current,
    };
    (next != listing.auction_status).then_some(next)
}

/// 경매 상태 업데이트 스케줄러
pub struct AuctionScheduler {
    store: Arc<dyn MarketStore>,
    event_store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
    period: Duration,
    ending_soon_window: chrono::Duration,
}

impl AuctionScheduler {
    pub fn new(
        store: Arc<dyn MarketStore>,
        event_store: Arc<dyn EventStore>,
        clock: Arc<dyn Clock>,
        period: Duration,
        ending_soon_window: chrono::Duration,
    ) -> Self {
        Self {
            store,
            event_store,
            clock,
            period,
            ending_soon_window,
        }
    }

    /// 스케줄러 시작
    pub fn start(self) -> JoinHandle<()> {
        info!(
            "{:<12} --> 경매 상태 스케줄러 시작 (주기 {:?})",
            "Scheduler", self.period
        );
        tokio::spawn(async move {
            let mut ticker = interval(self.period);
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep().await {
                    error!(
                        "{:<12} --> 경매 상태 업데이트 중 오류 발생: {:?}",
                        "Scheduler", e
                    );
                }
            }
        })
    }

    /// 경매 상태 업데이트. 변경된 상품 수를 반환한다.
    pub async fn sweep(&self) -> Result<usize, MarketError> {
        let now = self.clock.now();
        let mut changed = 0;

        for record in self.store.list_listings().await {
            let Some(next) = next_status(&record.listing, now, self.ending_soon_window) else {
                continue;
            };

            match self
                .store
                .update_status(&record.listing.id, record.version, next)
                .await
            {
                Ok(version) => {
                    changed += 1;
                    info!(
                        "{:<12} --> {} 상태 변경: {} -> {}",
                        "Scheduler",
                        record.listing.id,
                        record.listing.auction_status.as_str(),
                        next.as_str()
                    );
                    let event = MarketEvent::AuctionStatusChanged {
                        listing_id: record.listing.id.clone(),
                        from: record.listing.auction_status,
                        to: next,
                        timestamp: now,
                    };
                    event_store::record(self.event_store.as_ref(), version, event).await;
                }
                // 동시에 입찰이 커밋된 경우. 다음 주기에 다시 판단한다.
                Err(MarketError::VersionConflict(id)) => {
                    warn!("{:<12} --> 버전 충돌로 건너뜀: {}", "Scheduler", id);
                }
                Err(e) => return Err(e),
            }
        }

        debug!("{:<12} --> 경매 상태 점검 완료 ({}건 변경)", "Scheduler", changed);
        Ok(changed)
    }
}
// endregion: --- Auction Scheduler

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use crate::event_store::InMemoryEventStore;
    use crate::message_broker::MessageBroker;
    use crate::seed;
    use chrono::TimeZone;

    fn listing_ending_in(status: AuctionStatus, remaining: chrono::Duration, now: DateTime<Utc>) -> Listing {
        let (mut listing, _) = seed::listings(now).remove(0);
        listing.auction_status = status;
        listing.ends_at = now + remaining;
        listing
    }

    #[test]
    fn active_listing_moves_to_ending_soon_inside_window() {
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
        let window = chrono::Duration::hours(24);
        let l = listing_ending_in(AuctionStatus::Active, chrono::Duration::hours(5), now);
        assert_eq!(next_status(&l, now, window), Some(AuctionStatus::EndingSoon));

        let l = listing_ending_in(AuctionStatus::Active, chrono::Duration::days(3), now);
        assert_eq!(next_status(&l, now, window), None);
    }

    #[test]
    fn expired_listing_closes_unless_locked() {
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
        let window = chrono::Duration::hours(24);
        let past = -chrono::Duration::minutes(1);

        let l = listing_ending_in(AuctionStatus::EndingSoon, past, now);
        assert_eq!(next_status(&l, now, window), Some(AuctionStatus::Closed));
        let l = listing_ending_in(AuctionStatus::Active, past, now);
        assert_eq!(next_status(&l, now, window), Some(AuctionStatus::Closed));
        let l = listing_ending_in(AuctionStatus::Locked, past, now);
        assert_eq!(next_status(&l, now, window), None);
        let l = listing_ending_in(AuctionStatus::Closed, past, now);
        assert_eq!(next_status(&l, now, window), None);
    }

    #[test]
    fn manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(chrono::Duration::hours(2));
        assert_eq!(clock.now(), start + chrono::Duration::hours(2));
    }

    #[tokio::test]
    async fn sweep_follows_the_clock() {
        let start = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
        let store = Arc::new(InMemoryStore::with_listings(seed::listings(start)));
        let events = Arc::new(InMemoryEventStore::new(MessageBroker::default().get_producer()));
        let clock = Arc::new(ManualClock::new(start));
        let scheduler = AuctionScheduler::new(
            store.clone(),
            events.clone(),
            clock.clone(),
            Duration::from_secs(1),
            chrono::Duration::hours(24),
        );

        assert_eq!(scheduler.sweep().await.unwrap(), 0);

        // LST-001 은 14시간 남음, LST-002 는 마감
        clock.set(start + chrono::Duration::days(2));
        assert_eq!(scheduler.sweep().await.unwrap(), 2);

        let status = |record: crate::database::ListingRecord| record.listing.auction_status;
        assert_eq!(
            status(store.get_listing("LST-001").await.unwrap()),
            AuctionStatus::EndingSoon
        );
        assert_eq!(
            status(store.get_listing("LST-002").await.unwrap()),
            AuctionStatus::Closed
        );
        assert_eq!(
            status(store.get_listing("LST-003").await.unwrap()),
            AuctionStatus::Locked
        );

        let changed = events.events_for("LST-002").await;
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].event_type, "AuctionStatusChanged");
    }

    #[tokio::test(start_paused = true)]
    async fn latency_waits_for_configured_delay() {
        let latency = Latency::default();
        let started = tokio::time::Instant::now();
        latency.simulate(Operation::PlaceBid).await;
        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(latency.for_operation(Operation::Revise), latency.place_bid);
    }
}
