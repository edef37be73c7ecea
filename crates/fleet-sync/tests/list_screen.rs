mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{fetcher_for, ids, vehicles, RecordingReporter, ScriptedProvider};
use fleet_core::AppConfig;
use fleet_domain::Vehicle;
use fleet_sync::{InMemoryProvider, ListScreen, Paging, SchedulerState};

const PERIOD: Duration = Duration::from_secs(30);

fn config(page_size: usize, end_reached_threshold: usize) -> AppConfig {
    AppConfig {
        page_size,
        auto_refresh_period_ms: PERIOD.as_millis() as u64,
        end_reached_threshold,
    }
}

fn screen(count: usize, config: &AppConfig) -> (ListScreen<Vehicle>, Arc<ScriptedProvider>) {
    let provider = ScriptedProvider::new(InMemoryProvider::new(vehicles(count)));
    let reporter = Arc::new(RecordingReporter::default());
    let screen = ListScreen::new(fetcher_for(provider.clone(), reporter), config);
    (screen, provider)
}

#[tokio::test(start_paused = true)]
async fn test_auto_refresh_follows_visibility() {
    let (screen, provider) = screen(5, &config(2, 1));

    screen.mount().await;
    screen.mount().await;
    assert_eq!(provider.request_count(), 1);
    assert_eq!(screen.scheduler_state(), SchedulerState::Armed);

    tokio::time::sleep(PERIOD + Duration::from_millis(1)).await;
    assert_eq!(provider.request_count(), 2);
    assert_eq!(provider.requests()[1], ("".to_string(), Paging { skip: 0, limit: 2 }));

    screen.on_blur();
    tokio::time::sleep(PERIOD * 3).await;
    assert_eq!(provider.request_count(), 2);

    screen.on_focus();
    tokio::time::sleep(PERIOD).await;
    assert_eq!(provider.request_count(), 3);

    screen.unmount();
    assert_eq!(screen.scheduler_state(), SchedulerState::Stopped);
    tokio::time::sleep(PERIOD * 3).await;
    assert_eq!(provider.request_count(), 3);
    assert!(!screen.on_end_reached().await);
}

#[tokio::test]
async fn test_search_reloads_once_per_distinct_text() {
    let (screen, provider) = screen(6, &config(2, 1));
    screen.mount().await;

    assert!(screen.search("  tesla ").await);
    assert!(!screen.search("tesla").await);

    let snapshot = screen.snapshot();
    assert_eq!(snapshot.filter_text, "tesla");
    assert_eq!(ids(&snapshot.items), vec!["v1", "v3"]);
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_end_reached_appends_until_exhausted() {
    let (screen, provider) = screen(5, &config(2, 1));
    screen.mount().await;

    assert!(screen.on_end_reached().await);
    assert!(screen.on_end_reached().await);
    assert!(!screen.on_end_reached().await);

    assert_eq!(screen.snapshot().items.len(), 5);
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_viewport_near_end_loads_next_page() {
    let (screen, provider) = screen(10, &config(4, 1));
    screen.mount().await;

    assert!(!screen.on_viewport_changed(0, 2).await);
    assert_eq!(provider.request_count(), 1);

    assert!(screen.on_viewport_changed(1, 2).await);
    assert_eq!(screen.snapshot().items.len(), 8);
}

#[tokio::test]
async fn test_manual_refresh_resyncs_loaded_window() {
    let (screen, provider) = screen(10, &config(2, 1));
    screen.mount().await;
    screen.on_end_reached().await;

    screen.manual_refresh().await;

    assert_eq!(
        provider.requests().last().unwrap(),
        &("".to_string(), Paging { skip: 0, limit: 4 })
    );
    let snapshot = screen.snapshot();
    assert_eq!(snapshot.items.len(), 4);
    assert!(!snapshot.is_refreshing);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_screen_stops_refresh() {
    let (screen, provider) = screen(5, &config(2, 1));
    screen.mount().await;

    drop(screen);
    tokio::time::sleep(PERIOD * 2).await;

    assert_eq!(provider.request_count(), 1);
}
