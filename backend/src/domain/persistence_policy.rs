//! Persistence policy for projected series.
//!
//! Only points strictly after the current instant are stored. "Now" is read
//! from the clock at write time, not derived from the series, so the fitted
//! span and any horizon step that has already elapsed are discarded.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{ForecastRepository, ForecastRepositoryError};
use crate::domain::{ForecastRecord, ProjectedSeries, UserId};

/// Stamp the points of `projection` that lie after `now`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use range_forecast::domain::{ProjectedPoint, ProjectedSeries, UserId, future_records};
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).and_then(|x| x.and_hms_opt(0, 0, 0)).expect("valid");
/// let projection = ProjectedSeries::new(vec![
///     ProjectedPoint { ds: day(1), yhat: 1.0 },
///     ProjectedPoint { ds: day(3), yhat: 3.0 },
/// ]);
/// let user = UserId::new("u1").expect("valid id");
/// let generated = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid");
///
/// let records = future_records(&projection, &user, generated, day(2));
/// assert_eq!(records.len(), 1);
/// ```
#[must_use]
pub fn future_records(
    projection: &ProjectedSeries,
    user_id: &UserId,
    generation_date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<ForecastRecord> {
    projection
        .points()
        .iter()
        .filter(|point| point.ds > now)
        .map(|point| ForecastRecord::from_point(user_id, generation_date, *point))
        .collect()
}

/// Writes the future part of a projection as one batch.
pub struct PersistencePolicy<F> {
    forecasts: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<F> Clone for PersistencePolicy<F> {
    fn clone(&self) -> Self {
        Self {
            forecasts: Arc::clone(&self.forecasts),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<F> PersistencePolicy<F>
where
    F: ForecastRepository,
{
    /// Create a policy writing to `forecasts`.
    #[must_use]
    pub const fn new(forecasts: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self { forecasts, clock }
    }

    /// Persist the future points of `projection` and return how many were
    /// written. An empty selection issues no insert and returns zero.
    ///
    /// # Errors
    /// Propagates [`ForecastRepositoryError`] from the batch insert.
    pub async fn persist(
        &self,
        user_id: &UserId,
        generation_date: NaiveDate,
        projection: &ProjectedSeries,
    ) -> Result<usize, ForecastRepositoryError> {
        let now = self.clock.utc().naive_utc();
        let records = future_records(projection, user_id, generation_date, now);
        if records.is_empty() {
            debug!(user_id = %user_id, %now, "no projected point after now; skipping insert");
            return Ok(0);
        }
        self.forecasts.insert_batch(&records).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ProjectedPoint;
    use crate::domain::ports::MockForecastRepository;
    use crate::test_support::MutableClock;

    #[fixture]
    fn user() -> UserId {
        UserId::new("driver-3").expect("valid id")
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    fn projection_around_now(before: i64, after: i64) -> ProjectedSeries {
        let anchor = now().naive_utc();
        let points = (-before..=after)
            .map(|offset| ProjectedPoint {
                ds: anchor + Duration::days(offset),
                yhat: 100.0,
            })
            .collect();
        ProjectedSeries::new(points)
    }

    #[rstest]
    fn keeps_points_strictly_after_now(user: UserId) {
        let generation_date = now().date_naive();
        let records =
            future_records(&projection_around_now(3, 4), &user, generation_date, now().naive_utc());

        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.ds > now().naive_utc()));
        assert!(records.iter().all(|r| r.user_id == user));
        assert!(records.iter().all(|r| r.generation_date == generation_date));
    }

    #[rstest]
    #[tokio::test]
    async fn writes_future_points_in_one_batch(user: UserId) {
        let mut repo = MockForecastRepository::new();
        repo.expect_insert_batch()
            .withf(|records| records.len() == 30)
            .times(1)
            .returning(|records| Ok(records.len()));
        let policy = PersistencePolicy::new(Arc::new(repo), Arc::new(MutableClock::new(now())));

        let written = policy
            .persist(&user, now().date_naive(), &projection_around_now(10, 30))
            .await
            .expect("persist succeeds");

        assert_eq!(written, 30);
    }

    #[rstest]
    #[tokio::test]
    async fn nothing_in_the_future_means_no_insert(user: UserId) {
        let mut repo = MockForecastRepository::new();
        repo.expect_insert_batch().never();
        let policy = PersistencePolicy::new(Arc::new(repo), Arc::new(MutableClock::new(now())));

        let written = policy
            .persist(&user, now().date_naive(), &projection_around_now(10, 0))
            .await
            .expect("empty selection still succeeds");

        assert_eq!(written, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn now_is_read_at_write_time(user: UserId) {
        let clock = Arc::new(MutableClock::new(now()));
        let projection = projection_around_now(0, 5);
        let mut repo = MockForecastRepository::new();
        repo.expect_insert_batch()
            .withf(|records| records.len() == 2)
            .times(1)
            .returning(|records| Ok(records.len()));
        let policy = PersistencePolicy::new(Arc::new(repo), clock.clone());

        clock.advance(Duration::days(3));
        let written = policy
            .persist(&user, now().date_naive(), &projection)
            .await
            .expect("persist succeeds");

        assert_eq!(written, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn insert_failures_propagate(user: UserId) {
        let mut repo = MockForecastRepository::new();
        repo.expect_insert_batch()
            .times(1)
            .returning(|_| Err(ForecastRepositoryError::query("disk full")));
        let policy = PersistencePolicy::new(Arc::new(repo), Arc::new(MutableClock::new(now())));

        let err = policy
            .persist(&user, now().date_naive(), &projection_around_now(0, 2))
            .await
            .expect_err("insert failure surfaces");

        assert_eq!(err, ForecastRepositoryError::query("disk full"));
    }
}
