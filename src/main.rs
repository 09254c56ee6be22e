// region:    --- Imports
use diamond_exchange::config::Config;
use diamond_exchange::handlers;
use diamond_exchange::scheduler::{AuctionScheduler, Clock, SystemClock};
use diamond_exchange::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 읽기 실패: {}", "Main", e);
            return Err(e.into());
        }
    };
    info!("{:<12} --> 설정: {:?}", "Main", config);

    // 시드 데이터 + 이벤트 소비자
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState::bootstrap(Arc::clone(&clock), config.latency, config.activity_capacity);
    info!("{:<12} --> 시드 데이터 로드 완료", "Main");

    // 경매 상태 스케줄러
    AuctionScheduler::new(
        Arc::clone(&state.store),
        Arc::clone(&state.event_store),
        clock,
        config.sweep_interval,
        config.ending_soon_window,
    )
    .start();

    let routes_all = handlers::router(state);

    let listener = TcpListener::bind(config.addr()).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
