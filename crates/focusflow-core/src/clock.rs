//! Time sources.
//!
//! The timer engine never reads the clock itself; the owner samples a
//! [`Clock`] and passes the instant in. Countdown arithmetic uses the
//! monotonic [`Instant`], session dates use the local calendar day.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};

pub trait Clock: Send + Sync {
    /// Monotonic now.
    fn now(&self) -> Instant;
    /// Current local calendar day.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Hand-driven clock for tests and simulations. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualTime>>,
}

#[derive(Debug)]
struct ManualTime {
    base: Instant,
    offset: Duration,
    today: NaiveDate,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualTime {
                base: Instant::now(),
                offset: Duration::ZERO,
                today,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut t = self.lock();
        t.offset += by;
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.lock().today = today;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualTime> {
        // A poisoned lock only means another test thread panicked mid-advance.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let t = self.lock();
        t.base + t.offset
    }

    fn today(&self) -> NaiveDate {
        self.lock().today
    }
}
