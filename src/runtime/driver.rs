use std::time::{Duration, Instant};

use crate::{
    foundation::{core::TimeMs, error::LogoResult},
    logo::component::{AnimatedLogo, LogoEvent},
};

/// Time source for the driving loop.
pub trait Clock {
    fn now(&self) -> TimeMs;
    /// Block (or pretend to) until `deadline`.
    fn sleep_until(&mut self, deadline: TimeMs);
}

/// Wall clock; `TimeMs(0)` is the instant the clock was created.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> TimeMs {
        TimeMs(u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX))
    }

    fn sleep_until(&mut self, deadline: TimeMs) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(Duration::from_millis(deadline.0 - now.0));
        }
    }
}

/// Virtual clock that jumps straight to each deadline.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: TimeMs,
}

impl ManualClock {
    pub fn new(now: TimeMs) -> Self {
        Self { now }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimeMs {
        self.now
    }

    fn sleep_until(&mut self, deadline: TimeMs) {
        self.now = self.now.max(deadline);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub steps: u64,
    pub cursor_ticks: u64,
}

/// The single loop that drives a mounted [`AnimatedLogo`]: sleep until the next deadline,
/// advance, report.
#[derive(Debug)]
pub struct Driver<C> {
    clock: C,
}

impl<C: Clock> Driver<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Drive `logo` until `stop_at`, calling `on_event` for every change in order.
    pub fn run<F>(
        &mut self,
        logo: &mut AnimatedLogo,
        stop_at: TimeMs,
        mut on_event: F,
    ) -> LogoResult<RunStats>
    where
        F: FnMut(&LogoEvent) -> LogoResult<()>,
    {
        let mut stats = RunStats::default();
        while let Some(deadline) = logo.next_deadline() {
            if deadline > stop_at {
                break;
            }
            self.clock.sleep_until(deadline);
            let now = self.clock.now().min(stop_at);
            for event in logo.advance_to(now)? {
                match event {
                    LogoEvent::Step { .. } => stats.steps += 1,
                    LogoEvent::Cursor { .. } => stats.cursor_ticks += 1,
                }
                on_event(&event)?;
            }
        }
        self.clock.sleep_until(stop_at);
        logo.advance_to(stop_at)?;
        Ok(stats)
    }
}
