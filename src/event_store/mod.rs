// region:    --- Imports
use crate::auction::events::MarketEvent;
use crate::error::MarketError;
use crate::message_broker::{BrokerConsumer, BrokerProducer, EVENTS_TOPIC};
use crate::query::activity::ActivityFeed;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Event Model
/// 이벤트 저장소에 저장되는 이벤트 모델
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub aggregate_id: String,
    pub event_type: String,
    pub data: serde_json::Value,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: i64,
}

impl Event {
    /// 도메인 이벤트로부터 생성. id 는 저장 시 부여된다.
    pub fn from_market(event: &MarketEvent, version: i64) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: 0,
            aggregate_id: event.listing_id().to_string(),
            event_type: event.event_type().to_string(),
            data: serde_json::to_value(event)?,
            timestamp: event.timestamp(),
            version,
        })
    }

    pub fn to_market(&self) -> Result<MarketEvent, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}
// endregion: --- Event Model

// region:    --- Event Store Trait
/// 이벤트 저장소 트레이트
#[async_trait]
pub trait EventStore: Send + Sync {
    /// 저장 후 발행. (aggregate_id, version) 이 이미 있으면 `VersionConflict`.
    async fn append_and_publish_event(&self, event: Event) -> Result<Event, MarketError>;

    /// 상품별 이벤트 이력 (버전 순)
    async fn events_for(&self, aggregate_id: &str) -> Vec<Event>;
}

/// 도메인 이벤트 기록
/// 상태 커밋은 이미 끝난 뒤이므로 실패는 로그로만 남긴다.
pub async fn record(event_store: &dyn EventStore, version: i64, event: MarketEvent) {
    let event = match Event::from_market(&event, version) {
        Ok(event) => event,
        Err(e) => {
            error!("{:<12} --> 이벤트 직렬화 실패: {:?}", "EventStore", e);
            return;
        }
    };
    if let Err(e) = event_store.append_and_publish_event(event).await {
        error!("{:<12} --> 이벤트 저장 실패: {}", "EventStore", e);
    }
}

/// 이벤트 저장소 구현체
pub struct InMemoryEventStore {
    log: RwLock<Vec<Event>>,
    producer: Arc<BrokerProducer>,
}

impl InMemoryEventStore {
    pub fn new(producer: Arc<BrokerProducer>) -> Self {
        Self {
            log: RwLock::new(Vec::new()),
            producer,
        }
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append_and_publish_event(&self, mut event: Event) -> Result<Event, MarketError> {
        {
            let mut log = self.log.write().await;
            let duplicate = log
                .iter()
                .any(|e| e.aggregate_id == event.aggregate_id && e.version == event.version);
            if duplicate {
                return Err(MarketError::VersionConflict(event.aggregate_id));
            }
            event.id = log.len() as i64 + 1;
            log.push(event.clone());
        }

        // 이벤트를 브로커에 발행
        match serde_json::to_string(&event) {
            Ok(payload) => {
                if let Err(e) = self
                    .producer
                    .send_message(EVENTS_TOPIC, &event.id.to_string(), &payload)
                    .await
                {
                    warn!("{:<12} --> 이벤트 발행 실패: {}", "EventStore", e);
                }
            }
            Err(e) => error!("{:<12} --> 이벤트 직렬화 실패: {:?}", "EventStore", e),
        }

        Ok(event)
    }

    async fn events_for(&self, aggregate_id: &str) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .log
            .read()
            .await
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.version);
        events
    }
}
// endregion: --- Event Store

// region:    --- Event Consumer
/// 이벤트를 받아 활동 피드를 갱신하는 소비자
pub struct EventConsumer {
    consumer: Arc<BrokerConsumer>,
    feed: Arc<ActivityFeed>,
}

impl EventConsumer {
    pub fn new(consumer: Arc<BrokerConsumer>, feed: Arc<ActivityFeed>) -> Self {
        Self { consumer, feed }
    }

    /// 이벤트 소비 시작
    /// 구독은 반환 전에 끝나므로 이후 발행된 이벤트는 빠짐없이 받는다.
    pub fn start(self) -> JoinHandle<()> {
        let receiver = self.consumer.subscribe(EVENTS_TOPIC);
        info!("{:<12} --> 이벤트 소비 시작: topic={}", "EventConsume", EVENTS_TOPIC);
        tokio::spawn(async move {
            let feed = Arc::clone(&self.feed);
            self.consumer
                .consume_events(receiver, move |event| {
                    let feed = Arc::clone(&feed);
                    async move { Self::process_event(&feed, event).await }
                })
                .await;
        })
    }

    /// 이벤트 처리
    async fn process_event(feed: &ActivityFeed, event: Event) -> Result<(), String> {
        let market_event = event.to_market().map_err(|e| e.to_string())?;
        info!(
            "{:<12} --> {}({}) v{}",
            "EventConsume", event.event_type, event.aggregate_id, event.version
        );
        feed.push(&event, &market_event).await;
        Ok(())
    }
}
// endregion: --- Event Consumer
