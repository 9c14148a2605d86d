use super::{drain, identity, settle, start_hub};
use crate::{EventType, Metrics, StatusPoller};

use av_core::{CoreError, Result, StatusProvider, StatusSnapshot};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

const INTERVAL: Duration = Duration::from_secs(5);

/// Fails on every third call, otherwise reports the call number
#[derive(Default)]
struct FlakyProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl StatusProvider for FlakyProvider {
    async fn snapshot(&self) -> Result<StatusSnapshot> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call % 3 == 0 {
            return Err(CoreError::device("device unreachable"));
        }
        Ok(json!({ "call": call }))
    }
}

#[tokio::test(start_paused = true)]
async fn given_flaky_provider_when_polling_then_failed_ticks_are_skipped() {
    let hub = start_hub(256);
    let mut viewer = hub.register(identity("viewer")).await.unwrap();
    settle().await;
    drain(&mut viewer.mailbox);
    let provider = Arc::new(FlakyProvider::default());

    let poller = StatusPoller::start(provider.clone(), hub.clone(), INTERVAL, Metrics::default());
    tokio::time::sleep(INTERVAL * 6 + Duration::from_millis(1)).await;
    poller.stop().await;
    settle().await;

    let calls: Vec<_> = drain(&mut viewer.mailbox)
        .into_iter()
        .filter(|m| m.event_type == EventType::StatusUpdate)
        .map(|m| m.data["status"]["call"].as_u64().unwrap())
        .collect();
    assert_eq!(provider.calls.load(Ordering::SeqCst), 6);
    assert_eq!(calls, vec![1, 2, 4, 5]);
}

#[tokio::test(start_paused = true)]
async fn given_started_poller_when_less_than_one_interval_elapsed_then_nothing_polled() {
    let hub = start_hub(256);
    let provider = Arc::new(FlakyProvider::default());

    let poller = StatusPoller::start(provider.clone(), hub, INTERVAL, Metrics::default());
    tokio::time::sleep(INTERVAL - Duration::from_millis(100)).await;

    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    poller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn given_stopped_poller_when_time_passes_then_no_further_ticks() {
    let hub = start_hub(256);
    let provider = Arc::new(FlakyProvider::default());

    let poller = StatusPoller::start(provider.clone(), hub, INTERVAL, Metrics::default());
    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    poller.stop().await;
    tokio::time::sleep(INTERVAL * 4).await;

    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

/// Never answers
struct HungProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl StatusProvider for HungProvider {
    async fn snapshot(&self) -> Result<StatusSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn given_hung_device_call_when_stopped_then_stop_returns() {
    let hub = start_hub(256);
    let provider = Arc::new(HungProvider {
        calls: AtomicUsize::new(0),
    });

    let poller = StatusPoller::start(provider.clone(), hub, INTERVAL, Metrics::default());
    tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let stopped = tokio::time::timeout(Duration::from_secs(1), poller.stop()).await;

    assert!(stopped.is_ok(), "stop() did not return while a device call hung");
}
