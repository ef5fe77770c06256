use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::error::WatchError;
use crate::events::StockEvent;
use crate::inventory::InventorySource;
use crate::notify::{Notifier, message::Message};
use crate::scheduling::types::Job;
use crate::stock::stock_tracker::StockTracker;
use crate::types::snapshot::Snapshot;

#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub events: Vec<StockEvent>,
    pub delivery_failures: usize,
}

/// Runs the routine check and heartbeat jobs against one retained snapshot.
/// Jobs take `&mut self` or `&self` on a single owner, so they never overlap.
pub struct StockWatcher<S, N> {
    source: S,
    notifier: N,
    tracker: StockTracker,
}

impl<S, N> StockWatcher<S, N>
where
    S: InventorySource,
    N: Notifier + Send + Sync,
{
    pub fn new(source: S, notifier: N) -> Self {
        Self {
            source,
            notifier,
            tracker: StockTracker::new(),
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> &Snapshot {
        self.tracker.snapshot()
    }

    pub async fn announce_startup(
        &self,
        check_every: Duration,
        heartbeat_every: Duration,
    ) -> Result<(), WatchError> {
        self.dispatch(&Message::startup(check_every, heartbeat_every))
            .await
    }

    /// Job boundary: any failure is reported to the admin and the cycle is
    /// abandoned.
    pub async fn run_job(&mut self, job: Job) {
        let result = match job {
            Job::RoutineCheck => self.routine_check().await.map(|outcome| {
                if outcome.delivery_failures > 0 {
                    warn!(
                        events = outcome.events.len(),
                        delivery_failures = outcome.delivery_failures,
                        "some stock notifications were not delivered"
                    );
                }
            }),
            Job::Heartbeat => self.heartbeat(Local::now()).await,
        };

        if let Err(failure) = result {
            self.report_failure(&failure).await;
        }
    }

    /// A failed fetch leaves the retained snapshot untouched. Failed
    /// deliveries are counted but the snapshot still moves forward.
    pub async fn routine_check(&mut self) -> Result<CheckOutcome, WatchError> {
        let current = self
            .source
            .fetch_favourites()
            .await
            .map_err(WatchError::Fetch)?;

        let events = self.tracker.apply(current);
        let mut delivery_failures = 0;

        for event in &events {
            info!(id = %event.listing_id(), store = event.store_name(), ?event, "stock transition");

            if self.dispatch(&Message::from_event(event)).await.is_err() {
                delivery_failures += 1;
            }
        }

        let snapshot = self.tracker.snapshot();
        for record in snapshot.iter() {
            debug!(store = %record.store_name, available = record.available_count, "current stock");
        }
        info!(
            listings = snapshot.len(),
            available = snapshot.total_available(),
            events = events.len(),
            delivery_failures,
            "routine check complete"
        );

        Ok(CheckOutcome {
            events,
            delivery_failures,
        })
    }

    pub async fn heartbeat(&self, now: DateTime<Local>) -> Result<(), WatchError> {
        self.dispatch(&Message::heartbeat(now, self.tracker.snapshot()))
            .await
    }

    /// Tells the admin a job was abandoned. Never fails; a notice that cannot
    /// be delivered is only logged.
    pub async fn report_failure(&self, failure: &WatchError) {
        error!(error = %failure, "scheduled job failed");

        let detail = failure.to_string();
        let _ = self.dispatch(&Message::failure(Some(&detail))).await;
    }

    async fn dispatch(&self, message: &Message) -> Result<(), WatchError> {
        self.notifier.deliver(message).await.map_err(|e| {
            error!(audience = ?message.audience, error = %e, "message delivery failed");
            WatchError::Delivery(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    use super::*;
    use crate::notify::message::Audience;
    use crate::types::listing::{ListingId, ListingRecord};

    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Snapshot>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Snapshot>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl InventorySource for ScriptedSource {
        async fn fetch_favourites(&self) -> Result<Snapshot> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("no scripted response")))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Message>>,
        failures_left: Mutex<usize>,
    }

    impl RecordingNotifier {
        fn failing_times(times: usize) -> Self {
            Self {
                sent: Mutex::default(),
                failures_left: Mutex::new(times),
            }
        }

        fn failing() -> Self {
            Self::failing_times(usize::MAX)
        }

        fn sent(&self) -> Vec<Message> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn deliver(&self, message: &Message) -> Result<()> {
            self.sent.lock().unwrap().push(message.clone());

            let mut failures_left = self.failures_left.lock().unwrap();
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(anyhow!("channel unreachable"));
            }
            Ok(())
        }
    }

    fn bakery(count: u32) -> Snapshot {
        Snapshot::from_records(vec![
            ListingRecord::new("1", "Bakery X", count).with_image("https://img/1.jpg"),
        ])
    }

    #[tokio::test]
    async fn restock_is_sent_as_image_message() {
        let source = ScriptedSource::new(vec![Ok(bakery(0)), Ok(bakery(2))]);
        let mut watcher = StockWatcher::new(source, RecordingNotifier::default());

        assert!(watcher.routine_check().await.unwrap().events.is_empty());
        let outcome = watcher.routine_check().await.unwrap();

        assert_eq!(outcome.events.len(), 1);
        let sent = watcher.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "There are 2 new goodie bags at Bakery X");
        assert_eq!(sent[0].image.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(sent[0].audience, Audience::All);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_snapshot() {
        let source = ScriptedSource::new(vec![
            Ok(bakery(3)),
            Err(anyhow!("connection reset")),
            Ok(bakery(3)),
        ]);
        let mut watcher = StockWatcher::new(source, RecordingNotifier::default());

        watcher.routine_check().await.unwrap();
        let error = watcher.routine_check().await.unwrap_err();
        assert!(matches!(error, WatchError::Fetch(_)));
        assert_eq!(watcher.snapshot().count(&ListingId::from("1")), Some(3));

        watcher.report_failure(&error).await;
        let sent = watcher.notifier.sent();
        let notice = sent.last().unwrap();
        assert_eq!(notice.audience, Audience::AdminOnly);
        assert!(notice.text.starts_with("Something went wrong somewhere"));
        assert!(notice.text.contains("connection reset"));

        let outcome = watcher.routine_check().await.unwrap();
        assert!(outcome.events.is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_does_not_roll_back_snapshot() {
        let source = ScriptedSource::new(vec![Ok(bakery(2)), Ok(bakery(2))]);
        let mut watcher = StockWatcher::new(source, RecordingNotifier::failing());

        let outcome = watcher.routine_check().await.unwrap();
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.delivery_failures, 1);
        assert_eq!(watcher.snapshot().count(&ListingId::from("1")), Some(2));

        let outcome = watcher.routine_check().await.unwrap();
        assert!(outcome.events.is_empty());
    }

    #[tokio::test]
    async fn undelivered_event_is_not_a_job_failure() {
        let source = ScriptedSource::new(vec![Ok(bakery(2))]);
        let mut watcher = StockWatcher::new(source, RecordingNotifier::failing_times(1));

        watcher.run_job(Job::RoutineCheck).await;

        let sent = watcher.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].image.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(watcher.snapshot().count(&ListingId::from("1")), Some(2));
    }

    #[tokio::test]
    async fn failed_job_sends_failure_notice() {
        let source = ScriptedSource::new(vec![Err(anyhow!("token expired"))]);
        let mut watcher = StockWatcher::new(source, RecordingNotifier::default());

        watcher.run_job(Job::RoutineCheck).await;

        let sent = watcher.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].audience, Audience::AdminOnly);
        assert!(sent[0].text.contains("token expired"));
        assert!(watcher.snapshot().is_empty());
    }

    #[tokio::test]
    async fn failed_heartbeat_sends_failure_notice() {
        let mut watcher =
            StockWatcher::new(ScriptedSource::default(), RecordingNotifier::failing_times(1));

        watcher.run_job(Job::Heartbeat).await;

        let sent = watcher.notifier.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].text.contains("The bot is still running."));
        assert_eq!(sent[1].audience, Audience::AdminOnly);
        assert!(sent[1].text.starts_with("Something went wrong somewhere"));
        assert!(sent[1].text.contains("channel unreachable"));
    }

    #[tokio::test]
    async fn heartbeat_goes_to_admin_with_current_stock() {
        let source = ScriptedSource::new(vec![Ok(bakery(4))]);
        let mut watcher = StockWatcher::new(source, RecordingNotifier::default());
        watcher.routine_check().await.unwrap();

        watcher.heartbeat(Local::now()).await.unwrap();

        let sent = watcher.notifier.sent();
        let heartbeat = sent.last().unwrap();
        assert_eq!(heartbeat.audience, Audience::AdminOnly);
        assert!(heartbeat.text.contains("The bot is still running."));
        assert!(heartbeat.text.ends_with("Bakery X: 4 items available. "));
    }

    #[tokio::test]
    async fn startup_notice_failure_is_reported() {
        let watcher = StockWatcher::new(ScriptedSource::default(), RecordingNotifier::failing());

        let result = watcher
            .announce_startup(Duration::from_secs(180), Duration::from_secs(86_400))
            .await;

        assert!(matches!(result, Err(WatchError::Delivery(_))));
    }
}
