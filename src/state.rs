// region:    --- Imports
use crate::database::{InMemoryStore, MarketStore};
use crate::event_store::{EventConsumer, EventStore, InMemoryEventStore};
use crate::message_broker::MessageBroker;
use crate::preference::store::PreferenceStore;
use crate::query::activity::ActivityFeed;
use crate::scheduler::{Clock, Latency};
use crate::seed;
use std::sync::Arc;

// endregion: --- Imports

/// 커맨드/조회 핸들러가 공유하는 상태
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
    pub event_store: Arc<dyn EventStore>,
    pub preferences: Arc<PreferenceStore>,
    pub feed: Arc<ActivityFeed>,
    pub clock: Arc<dyn Clock>,
    pub latency: Latency,
}

impl AppState {
    /// 시드 데이터로 상태를 만들고 이벤트 소비자를 띄운다.
    /// tokio 런타임 안에서 호출해야 한다.
    pub fn bootstrap(clock: Arc<dyn Clock>, latency: Latency, activity_capacity: usize) -> Arc<Self> {
        let broker = MessageBroker::default();
        let feed = Arc::new(ActivityFeed::new(activity_capacity));
        EventConsumer::new(broker.get_consumer(), Arc::clone(&feed)).start();

        let store = InMemoryStore::with_listings(seed::listings(clock.now()));
        Arc::new(Self {
            store: Arc::new(store),
            event_store: Arc::new(InMemoryEventStore::new(broker.get_producer())),
            preferences: Arc::new(PreferenceStore::with_drafts(seed::preferences())),
            feed,
            clock,
            latency,
        })
    }
}
