//! In-process driver location hub.
//!
//! Each driver has a last known fix and a broadcast channel. Nothing is
//! persisted; a restart forgets every position.

use dashmap::DashMap;
use std::sync::Arc;
use tealeaf_core::location::LocationUpdate;
use tokio::sync::broadcast;

/// Per-driver broadcast capacity. Slow subscribers skip what they miss.
pub const CHANNEL_CAPACITY: usize = 64;

struct DriverFeed {
    latest: Option<LocationUpdate>,
    tx: broadcast::Sender<LocationUpdate>,
}

impl DriverFeed {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { latest: None, tx }
    }
}

/// Fan-out of driver positions to any number of watchers.
#[derive(Clone, Default)]
pub struct LocationHub {
    drivers: Arc<DashMap<String, DriverFeed>>,
}

impl LocationHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `update` as the driver's latest fix and sends it to every
    /// subscriber. Returns how many subscribers received it.
    pub fn publish(&self, update: LocationUpdate) -> usize {
        let mut feed = self
            .drivers
            .entry(update.driver_id.clone())
            .or_insert_with(DriverFeed::new);
        feed.latest = Some(update.clone());
        // No subscribers is not an error.
        feed.tx.send(update).unwrap_or(0)
    }

    /// Last fix published by the driver, if any.
    #[must_use]
    pub fn latest(&self, driver_id: &str) -> Option<LocationUpdate> {
        self.drivers
            .get(driver_id)
            .and_then(|feed| feed.latest.clone())
    }

    /// Subscribes to every fix the driver publishes from now on.
    #[must_use]
    pub fn subscribe(&self, driver_id: &str) -> broadcast::Receiver<LocationUpdate> {
        self.drivers
            .entry(driver_id.to_string())
            .or_insert_with(DriverFeed::new)
            .tx
            .subscribe()
    }

    /// Forgets a driver's feed once nobody watches it and it never
    /// carried a fix. Call after dropping a receiver.
    pub fn release(&self, driver_id: &str) {
        self.drivers.remove_if(driver_id, |_, feed| {
            feed.latest.is_none() && feed.tx.receiver_count() == 0
        });
    }
}

impl std::fmt::Debug for LocationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationHub")
            .field("drivers", &self.drivers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tealeaf_core::location::LocationFix;
    use tokio::sync::broadcast::error::RecvError;

    fn update(driver_id: &str, latitude: f64) -> LocationUpdate {
        LocationUpdate::new(
            driver_id,
            LocationFix {
                latitude,
                longitude: 80.6,
                heading: None,
                speed_kmh: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_latest_is_none_before_first_publish() {
        let hub = LocationHub::new();
        assert!(hub.latest("DRV-01").is_none());
    }

    #[test]
    fn test_publish_replaces_latest() {
        let hub = LocationHub::new();
        hub.publish(update("DRV-01", 6.9));
        let second = update("DRV-01", 7.1);
        hub.publish(second.clone());

        assert_eq!(hub.latest("DRV-01"), Some(second));
        assert!(hub.latest("DRV-02").is_none());
    }

    #[tokio::test]
    async fn test_subscribers_receive_later_fixes() {
        let hub = LocationHub::new();
        let mut rx = hub.subscribe("DRV-01");
        let fix = update("DRV-01", 6.9);

        assert_eq!(hub.publish(fix.clone()), 1);
        assert_eq!(rx.recv().await.unwrap(), fix);
    }

    #[test]
    fn test_released_watch_of_silent_driver_is_forgotten() {
        let hub = LocationHub::new();
        let rx = hub.subscribe("DRV-404");
        assert_eq!(hub.drivers.len(), 1);

        drop(rx);
        hub.release("DRV-404");

        assert_eq!(hub.drivers.len(), 0);
    }

    #[test]
    fn test_release_keeps_watched_or_reported_feeds() {
        let hub = LocationHub::new();
        let first = hub.subscribe("DRV-01");
        let _second = hub.subscribe("DRV-01");
        drop(first);
        hub.release("DRV-01");
        assert_eq!(hub.drivers.len(), 1);

        let rx = hub.subscribe("DRV-02");
        hub.publish(update("DRV-02", 6.9));
        drop(rx);
        hub.release("DRV-02");

        assert!(hub.latest("DRV-02").is_some());
        assert_eq!(hub.drivers.len(), 2);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_missed_fixes() {
        let hub = LocationHub::new();
        let mut rx = hub.subscribe("DRV-01");
        for _ in 0..=CHANNEL_CAPACITY {
            hub.publish(update("DRV-01", 6.9));
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(1))));
        assert!(rx.recv().await.is_ok());
    }
}
