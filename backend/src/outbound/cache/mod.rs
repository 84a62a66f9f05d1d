//! Time-bounded snapshot cache for the measurement collection.
//!
//! History reads may be stale by at most [`HISTORY_SNAPSHOT_TTL`]. The first
//! read after the window expires refreshes the snapshot from the wrapped
//! repository; concurrent readers wait on the same lock, so refreshes are
//! serialised and the store sees one load per window. A failed refresh is
//! returned to the caller and the expired snapshot is not served.
//!
//! The forecast store is never cached: the idempotency guard needs a live
//! answer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::MeasurementRecord;
use crate::domain::ports::{MeasurementRepository, MeasurementRepositoryError};

/// Staleness window for history snapshots.
pub const HISTORY_SNAPSHOT_TTL: Duration = Duration::from_secs(5 * 60);

struct Snapshot {
    loaded_at: DateTime<Utc>,
    records: Arc<Vec<MeasurementRecord>>,
}

/// [`MeasurementRepository`] decorator serving a shared snapshot.
pub struct SnapshotMeasurementCache<M> {
    inner: M,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    snapshot: Mutex<Option<Snapshot>>,
}

impl<M> SnapshotMeasurementCache<M> {
    /// Wrap `inner` with the default five minute window.
    #[must_use]
    pub fn new(inner: M, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(inner, clock, HISTORY_SNAPSHOT_TTL)
    }

    /// Wrap `inner` with a custom window. Windows too large for chrono are
    /// clamped to its maximum.
    #[must_use]
    pub fn with_ttl(inner: M, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            inner,
            clock,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            snapshot: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<M> MeasurementRepository for SnapshotMeasurementCache<M>
where
    M: MeasurementRepository,
{
    async fn load_all(&self) -> Result<Arc<Vec<MeasurementRecord>>, MeasurementRepositoryError> {
        let mut guard = self.snapshot.lock().await;
        let now = self.clock.utc();
        if let Some(snapshot) = guard.as_ref() {
            if now.signed_duration_since(snapshot.loaded_at) < self.ttl {
                return Ok(Arc::clone(&snapshot.records));
            }
        }

        let records = self.inner.load_all().await?;
        debug!(records = records.len(), "measurement snapshot refreshed");
        *guard = Some(Snapshot {
            loaded_at: now,
            records: Arc::clone(&records),
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::MockMeasurementRepository;
    use crate::test_support::MutableClock;

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 20, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        Arc::new(MutableClock::new(start))
    }

    fn records(n: usize) -> Arc<Vec<MeasurementRecord>> {
        Arc::new(
            (0..n)
                .map(|i| MeasurementRecord::new(format!("u{i}"), None, Some(1.0)))
                .collect(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn reads_within_window_hit_the_snapshot(clock: Arc<MutableClock>) {
        let mut inner = MockMeasurementRepository::new();
        inner
            .expect_load_all()
            .times(1)
            .returning(|| Ok(records(3)));
        let cache = SnapshotMeasurementCache::new(inner, clock.clone());

        let first = cache.load_all().await.expect("first load");
        clock.advance(TimeDelta::minutes(4));
        let second = cache.load_all().await.expect("cached load");

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[rstest]
    #[tokio::test]
    async fn expired_snapshot_is_refreshed(clock: Arc<MutableClock>) {
        let mut inner = MockMeasurementRepository::new();
        let mut seq = mockall::Sequence::new();
        inner
            .expect_load_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(records(1)));
        inner
            .expect_load_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(records(2)));
        let cache = SnapshotMeasurementCache::new(inner, clock.clone());

        assert_eq!(cache.load_all().await.expect("first load").len(), 1);
        clock.advance(TimeDelta::minutes(5));
        assert_eq!(cache.load_all().await.expect("refresh").len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_refresh_is_not_masked_by_stale_data(clock: Arc<MutableClock>) {
        let mut inner = MockMeasurementRepository::new();
        let mut seq = mockall::Sequence::new();
        inner
            .expect_load_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(records(1)));
        inner
            .expect_load_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(MeasurementRepositoryError::connection("down")));
        let cache = SnapshotMeasurementCache::with_ttl(inner, clock.clone(), Duration::from_secs(1));

        cache.load_all().await.expect("first load");
        clock.advance(TimeDelta::seconds(2));
        let err = cache.load_all().await.expect_err("refresh failure surfaces");

        assert_eq!(err, MeasurementRepositoryError::connection("down"));
    }
}
