//! Clock sources used to timestamp events.
//!
//! # Available clocks
//!
//! Name (for [`Clock::by_name()`]) | Clock          | Resolution
//! ------------------------------- | -------------- | ----------
//! `realtime`                      | [`Realtime`]   | nanoseconds
//! `monotonic`                     | [`Monotonic`]  | nanoseconds
//!
//! Custom clocks are created with [`Clock::custom()`]. A buffer keeps its
//! clock for its whole life: the resolution is written into every resync
//! block and deltas are only meaningful against that resolution.
//!
//! Trace files of different processes or hosts are only comparable when
//! their clocks share an origin, which is why `realtime` is the default.

use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub const NANOSECONDS: u64 = 1_000_000_000;
pub const MICROSECONDS: u64 = 1_000_000;

pub enum Clock {
    Realtime(Realtime),
    Monotonic(Monotonic),
    Custom(Custom),
}

impl Clock {
    pub fn by_name(name: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(match name {
            Realtime::NAME => Clock::Realtime(Realtime::new()),
            Monotonic::NAME => Clock::Monotonic(Monotonic::new()),
            _ => return Err(format!("{:?} is not a valid clock name", name).into()),
        })
    }

    /// A clock reading `timestamp` in ticks of `1 / resolution` seconds.
    pub fn custom<F>(timestamp: F, resolution: u64) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        Clock::Custom(Custom {
            timestamp: Box::new(timestamp),
            resolution: resolution.max(1),
        })
    }

    #[inline]
    pub fn timestamp(&self) -> u64 {
        match self {
            Clock::Realtime(clock) => clock.timestamp(),
            Clock::Monotonic(clock) => clock.timestamp(),
            Clock::Custom(clock) => (clock.timestamp)(),
        }
    }

    /// Ticks per second of [`Clock::timestamp()`].
    #[inline]
    pub fn resolution(&self) -> u64 {
        match self {
            Clock::Realtime(clock) => clock.resolution,
            Clock::Monotonic(_) => NANOSECONDS,
            Clock::Custom(clock) => clock.resolution,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::Realtime(Realtime::new())
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Clock::Realtime(_) => Realtime::NAME,
            Clock::Monotonic(_) => Monotonic::NAME,
            Clock::Custom(_) => "custom",
        };
        f.debug_struct("Clock")
            .field("name", &name)
            .field("resolution", &self.resolution())
            .finish()
    }
}

/// Wall clock time since the UNIX epoch with nanosecond resolution.
///
/// If the system clock reads before the epoch, a coarser microsecond count
/// of a monotonic clock started at zero is used instead.
pub struct Realtime {
    resolution: u64,
    fallback: Option<Instant>,
}

impl Realtime {
    const NAME: &'static str = "realtime";

    pub fn new() -> Self {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(_) => Realtime {
                resolution: NANOSECONDS,
                fallback: None,
            },
            Err(_) => {
                warn!("system clock is set before the UNIX epoch, using a monotonic clock");
                Realtime {
                    resolution: MICROSECONDS,
                    fallback: Some(Instant::now()),
                }
            }
        }
    }

    #[inline]
    fn timestamp(&self) -> u64 {
        match self.fallback {
            Some(start) => start.elapsed().as_micros() as u64,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0),
        }
    }
}

impl Default for Realtime {
    fn default() -> Self {
        Realtime::new()
    }
}

/// Steady clock with nanosecond resolution, anchored at the wall clock time
/// of its creation so that it stays comparable with [`Realtime`] at start.
pub struct Monotonic {
    start: Instant,
    origin: Duration,
}

impl Monotonic {
    const NAME: &'static str = "monotonic";

    pub fn new() -> Self {
        Monotonic {
            start: Instant::now(),
            origin: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
        }
    }

    #[inline]
    fn timestamp(&self) -> u64 {
        (self.origin + self.start.elapsed()).as_nanos() as u64
    }
}

impl Default for Monotonic {
    fn default() -> Self {
        Monotonic::new()
    }
}

pub struct Custom {
    timestamp: Box<dyn Fn() -> u64 + Send + Sync>,
    resolution: u64,
}
