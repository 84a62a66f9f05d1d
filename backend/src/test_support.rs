//! Test utilities for the forecast crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

pub mod clock {
    //! Controllable clock for time-dependent tests.

    use std::sync::{Mutex, PoisonError};

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// A [`Clock`] that stays at a fixed instant until moved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{TimeDelta, TimeZone, Utc};
    /// use mockable::Clock;
    /// use range_forecast::test_support::MutableClock;
    ///
    /// let start = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).single().expect("valid");
    /// let clock = MutableClock::new(start);
    /// clock.advance(TimeDelta::hours(13));
    /// assert_eq!(clock.utc().date_naive().to_string(), "2026-03-21");
    /// ```
    #[derive(Debug)]
    pub struct MutableClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl MutableClock {
        /// Start the clock at `now`.
        #[must_use]
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        /// Move the clock to `now`.
        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
        }

        /// Move the clock forward by `delta`.
        pub fn advance(&self, delta: TimeDelta) {
            let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
            *guard += delta;
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

pub mod stores {
    //! In-memory store doubles with call counters.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::domain::ports::{
        ForecastRepository, ForecastRepositoryError, MeasurementRepository,
        MeasurementRepositoryError, PriorGeneration,
    };
    use crate::domain::{ForecastRecord, MeasurementRecord, UserId};

    /// Measurement collection held in memory.
    #[derive(Debug, Default)]
    pub struct InMemoryMeasurementStore {
        records: Arc<Vec<MeasurementRecord>>,
        failure: Option<MeasurementRepositoryError>,
        reads: AtomicUsize,
    }

    impl InMemoryMeasurementStore {
        /// Serve `records` on every read.
        #[must_use]
        pub fn new(records: Vec<MeasurementRecord>) -> Self {
            Self {
                records: Arc::new(records),
                ..Self::default()
            }
        }

        /// Fail every read with `error`.
        #[must_use]
        pub fn failing(error: MeasurementRepositoryError) -> Self {
            Self {
                failure: Some(error),
                ..Self::default()
            }
        }

        /// Number of `load_all` calls so far.
        #[must_use]
        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MeasurementRepository for InMemoryMeasurementStore {
        async fn load_all(
            &self,
        ) -> Result<Arc<Vec<MeasurementRecord>>, MeasurementRepositoryError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.failure
                .as_ref()
                .map_or_else(|| Ok(Arc::clone(&self.records)), |error| Err(error.clone()))
        }
    }

    #[derive(Debug, Default)]
    struct ForecastCollection {
        exists: bool,
        records: Vec<ForecastRecord>,
        ownerless: usize,
    }

    /// Forecast collection held in memory.
    ///
    /// Mirrors the store semantics the guard depends on: ownerless documents
    /// poison the lookup, and a collection that was never created reads as
    /// missing until the first insert creates it.
    #[derive(Debug)]
    pub struct InMemoryForecastStore {
        collection: Mutex<ForecastCollection>,
        insert_failure: Option<ForecastRepositoryError>,
        lookups: AtomicUsize,
        inserts: AtomicUsize,
    }

    impl Default for InMemoryForecastStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl InMemoryForecastStore {
        /// An existing, empty collection.
        #[must_use]
        pub fn new() -> Self {
            Self {
                collection: Mutex::new(ForecastCollection {
                    exists: true,
                    ..ForecastCollection::default()
                }),
                insert_failure: None,
                lookups: AtomicUsize::new(0),
                inserts: AtomicUsize::new(0),
            }
        }

        /// A collection that has not been created yet.
        #[must_use]
        pub fn uncreated() -> Self {
            let store = Self::new();
            store.with_collection(|c| c.exists = false);
            store
        }

        /// Seed existing forecast documents.
        #[must_use]
        pub fn with_records(self, records: Vec<ForecastRecord>) -> Self {
            self.with_collection(|c| c.records.extend(records));
            self
        }

        /// Seed one document that carries no `userId`.
        #[must_use]
        pub fn with_ownerless_record(self) -> Self {
            self.with_collection(|c| c.ownerless += 1);
            self
        }

        /// Fail every insert with `error`.
        #[must_use]
        pub fn failing_inserts(mut self, error: ForecastRepositoryError) -> Self {
            self.insert_failure = Some(error);
            self
        }

        /// Documents written so far, seeds included, ownerless excluded.
        #[must_use]
        pub fn records(&self) -> Vec<ForecastRecord> {
            self.with_collection(|c| c.records.clone())
        }

        /// Number of `generation_for` calls so far.
        #[must_use]
        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        /// Number of `insert_batch` calls so far.
        #[must_use]
        pub fn inserts(&self) -> usize {
            self.inserts.load(Ordering::SeqCst)
        }

        fn with_collection<T>(&self, f: impl FnOnce(&mut ForecastCollection) -> T) -> T {
            let mut guard = self
                .collection
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        }
    }

    #[async_trait]
    impl ForecastRepository for InMemoryForecastStore {
        async fn generation_for(
            &self,
            user_id: &UserId,
            generation_date: NaiveDate,
        ) -> Result<PriorGeneration, ForecastRepositoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.with_collection(|c| {
                if !c.exists {
                    return Err(ForecastRepositoryError::missing_collection(
                        "range_forecasts",
                    ));
                }
                if c.ownerless > 0 {
                    return Err(ForecastRepositoryError::missing_field("userId"));
                }
                let found = c
                    .records
                    .iter()
                    .any(|r| &r.user_id == user_id && r.generation_date == generation_date);
                Ok(if found {
                    PriorGeneration::Present
                } else {
                    PriorGeneration::Absent
                })
            })
        }

        async fn insert_batch(
            &self,
            records: &[ForecastRecord],
        ) -> Result<usize, ForecastRepositoryError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = &self.insert_failure {
                return Err(error.clone());
            }
            self.with_collection(|c| {
                c.exists = true;
                c.records.extend_from_slice(records);
            });
            Ok(records.len())
        }
    }
}

pub use crate::domain::ports::FixtureForecastEngine;
pub use clock::MutableClock;
pub use stores::{InMemoryForecastStore, InMemoryMeasurementStore};
