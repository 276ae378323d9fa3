//! Time-injected tick scheduler.
//!
//! The [`Ticker`] turns timestamps supplied by the caller into tick deltas.
//! It never reads a clock itself, so the same code drives a real-time loop
//! (timestamps from `Instant`) and a simulated one (timestamps computed from a
//! tick counter), and stays fully testable.
//!
//! A tick fires when at least `1 / tps` seconds have passed since the previous
//! one. The delta handed out is the real elapsed time, which may be longer
//! than the nominal interval when the caller polls late.
//!
//! # Example
//!
//! ```
//! use rampart_core::ticker::Ticker;
//!
//! let mut ticker = Ticker::new(10);
//! ticker.start(0.0);
//!
//! assert_eq!(ticker.poll(0.05), None);
//! assert_eq!(ticker.poll(0.125), Some(0.125));
//! assert_eq!(ticker.tick(), 1);
//!
//! ticker.set_paused(true);
//! assert_eq!(ticker.poll(5.0), None);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TPS;

/// Timestamps this close to a full interval still count as one, so that
/// simulated clocks computed as `tick / tps` never skip a tick to rounding.
const INTERVAL_SLACK: f64 = 1e-9;

/// Receiver of tick deltas.
pub trait TickListener {
    /// Called once per tick with the elapsed time in seconds.
    fn on_tick(&mut self, dt: f32);
}

/// Turns caller-supplied timestamps (in seconds) into ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    tps: u32,
    running: bool,
    paused: bool,
    tick: u64,
    last_time: f64,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_TPS)
    }
}

impl Ticker {
    /// Creates a stopped ticker running at `tps` ticks per second (at least 1).
    #[must_use]
    pub fn new(tps: u32) -> Self {
        Self {
            tps: tps.max(1),
            running: false,
            paused: false,
            tick: 0,
            last_time: 0.0,
        }
    }

    /// Starts ticking, measuring the first interval from `now`. No-op while
    /// already running.
    pub fn start(&mut self, now: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_time = now;
    }

    /// Stops ticking. The tick counter is kept.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Resets the tick counter and measures the next interval from `now`.
    pub fn reset(&mut self, now: f64) {
        self.tick = 0;
        self.last_time = now;
    }

    /// Changes the rate (at least 1 tick per second).
    pub fn set_tps(&mut self, tps: u32) {
        self.tps = tps.max(1);
    }

    /// Pauses or resumes ticking.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Ticks per second.
    #[must_use]
    pub const fn tps(&self) -> u32 {
        self.tps
    }

    /// Ticks fired since the last reset.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether the ticker is started.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the ticker is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Nominal seconds between ticks.
    #[must_use]
    pub fn interval(&self) -> f64 {
        1.0 / f64::from(self.tps)
    }

    /// Fires a tick if one is due at `now`, returning the elapsed seconds
    /// since the previous tick.
    ///
    /// Returns `None` while stopped or paused, and when less than one
    /// interval has passed.
    pub fn poll(&mut self, now: f64) -> Option<f32> {
        if !self.running || self.paused {
            return None;
        }
        let elapsed = now - self.last_time;
        if elapsed + INTERVAL_SLACK < self.interval() {
            return None;
        }
        self.last_time = now;
        self.tick += 1;
        #[allow(clippy::cast_possible_truncation)]
        Some(elapsed as f32)
    }

    /// Polls at `now` and forwards a due tick to `listener`.
    ///
    /// Returns `true` if a tick fired.
    pub fn drive(&mut self, now: f64, listener: &mut impl TickListener) -> bool {
        match self.poll(now) {
            Some(dt) => {
                listener.on_tick(dt);
                true
            }
            None => false,
        }
    }
}
