// region:    --- Imports
use crate::event_store::Event;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

// endregion: --- Imports

/// 도메인 이벤트 토픽
pub const EVENTS_TOPIC: &str = "events";

/// 브로커 메시지
#[derive(Debug, Clone)]
pub struct Message {
    pub topic: String,
    pub key: String,
    pub payload: String,
    pub offset: u64,
}

// region:    --- Topics
/// 프로세스 내부 토픽 목록
struct Topics {
    senders: Mutex<HashMap<String, broadcast::Sender<Message>>>,
    capacity: usize,
    offset: AtomicU64,
}

impl Topics {
    fn sender(&self, topic: &str) -> broadcast::Sender<Message> {
        let mut senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        senders
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}
// endregion: --- Topics

// region:    --- Producer
#[derive(Clone)]
pub struct BrokerProducer {
    topics: Arc<Topics>,
}

impl BrokerProducer {
    /// 메시지 전송
    /// 구독자가 없으면 메시지는 버려진다.
    pub async fn send_message(&self, topic: &str, key: &str, value: &str) -> Result<(), String> {
        info!(
            "{:<12} --> 메시지 전송: topic={}, key={}",
            "Producer", topic, key
        );
        let message = Message {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: value.to_string(),
            offset: self.topics.offset.fetch_add(1, Ordering::Relaxed),
        };

        if self.topics.sender(topic).send(message).is_err() {
            debug!("{:<12} --> 구독자 없음: topic={}", "Producer", topic);
        }
        Ok(())
    }
}
// endregion: --- Producer

// region:    --- Consumer
pub struct BrokerConsumer {
    topics: Arc<Topics>,
}

impl BrokerConsumer {
    /// 토픽 구독. 구독 이후에 전송된 메시지부터 받는다.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<Message> {
        self.topics.sender(topic).subscribe()
    }

    /// 이벤트 소비. 채널이 닫힐 때까지 반복한다.
    pub async fn consume_events<F, Fut>(
        &self,
        mut receiver: broadcast::Receiver<Message>,
        handler: F,
    ) where
        F: Fn(Event) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        loop {
            match receiver.recv().await {
                Ok(message) => {
                    debug!(
                        "{:<12} --> 메시지 수신: topic={}, offset={}",
                        "Consumer", message.topic, message.offset
                    );
                    match serde_json::from_str::<Event>(&message.payload) {
                        Ok(event) => {
                            if let Err(e) = handler(event).await {
                                error!("{:<12} --> 이벤트 처리 오류: {}", "Consumer", e);
                            }
                        }
                        Err(e) => error!("{:<12} --> deserialize 오류: {:?}", "Consumer", e),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("{:<12} --> 처리 지연으로 {}건 유실", "Consumer", skipped);
                }
                Err(RecvError::Closed) => {
                    info!("{:<12} --> 채널 종료", "Consumer");
                    break;
                }
            }
        }
    }
}
// endregion: --- Consumer

// region:    --- Broker
pub struct MessageBroker {
    producer: Arc<BrokerProducer>,
    consumer: Arc<BrokerConsumer>,
}

impl MessageBroker {
    pub fn new(capacity: usize) -> Self {
        let topics = Arc::new(Topics {
            senders: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            offset: AtomicU64::new(0),
        });
        Self {
            producer: Arc::new(BrokerProducer {
                topics: Arc::clone(&topics),
            }),
            consumer: Arc::new(BrokerConsumer { topics }),
        }
    }

    /// 프로듀서 반환
    pub fn get_producer(&self) -> Arc<BrokerProducer> {
        Arc::clone(&self.producer)
    }

    /// 컨슈머 반환
    pub fn get_consumer(&self) -> Arc<BrokerConsumer> {
        Arc::clone(&self.consumer)
    }
}

impl Default for MessageBroker {
    fn default() -> Self {
        Self::new(256)
    }
}
// endregion: --- Broker
