//! Closed-form view of the logo cycle.
//!
//! [`Timeline::sample`] answers "what is the component doing at time t" without running
//! timers. It agrees with [`AnimatedLogo`](crate::AnimatedLogo) driven to the same instant.

use crate::{
    config::LogoTiming,
    foundation::{core::TimeMs, error::LogoResult},
    logo::{component::LogoState, phase::CycleStep, shapes::SHAPE_COUNT},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineSample {
    pub state: LogoState,
    pub step: CycleStep,
    /// Completed cycles before this one.
    pub cycle: u64,
    pub cycle_start: TimeMs,
    pub step_start: TimeMs,
    /// When the cursor last changed value (or the cycle reset it).
    pub cursor_since: TimeMs,
    /// Cursor value before that change; `None` before anything has changed.
    pub previous_cursor: Option<usize>,
}

impl TimelineSample {
    /// Time spent in the current step.
    pub fn step_elapsed(&self, t: TimeMs) -> u64 {
        t.saturating_sub(self.step_start)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Timeline {
    timing: LogoTiming,
}

impl Timeline {
    pub fn new(timing: LogoTiming) -> LogoResult<Self> {
        timing.validate()?;
        Ok(Self { timing })
    }

    pub fn timing(&self) -> &LogoTiming {
        &self.timing
    }

    pub fn cycle_ms(&self) -> u64 {
        self.timing.cycle_ms()
    }

    /// Number of cursor ticks that land strictly inside the showcase hold.
    pub fn ticks_per_cycle(&self) -> u64 {
        (self.timing.showcase_ms - 1) / self.timing.shape_interval_ms
    }

    pub fn sample(&self, t: TimeMs) -> TimelineSample {
        let cycle_ms = self.cycle_ms();
        let cycle = t.0 / cycle_ms;
        let offset = t.0 % cycle_ms;
        let cycle_start = TimeMs(cycle * cycle_ms);

        let step = CycleStep::at_offset(&self.timing, offset);
        let step_start = cycle_start.saturating_add(step.offset_ms(&self.timing));

        let interval = self.timing.shape_interval_ms;
        let ticks = match step {
            CycleStep::Showcase => offset / interval,
            _ => self.ticks_per_cycle(),
        };
        let cursor = (ticks % SHAPE_COUNT as u64) as usize;
        let cursor_since = cycle_start.saturating_add(ticks * interval);
        let previous_cursor = if ticks > 0 {
            Some(((ticks - 1) % SHAPE_COUNT as u64) as usize)
        } else if cycle > 0 {
            Some((self.ticks_per_cycle() % SHAPE_COUNT as u64) as usize)
        } else {
            None
        };

        TimelineSample {
            state: LogoState {
                cursor,
                phase: step.phase(),
                star: step.star(),
            },
            step,
            cycle,
            cycle_start,
            step_start,
            cursor_since,
            previous_cursor,
        }
    }
}
