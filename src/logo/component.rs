//! The event-driven logo component.
//!
//! [`AnimatedLogo`] owns its timers. Mounting arms the phase loop and the shape loop; every
//! phase step re-syncs the shape loop (cleared on leaving INITIAL, re-armed on returning);
//! unmounting or dropping the component cancels whatever is still pending.

use crate::{
    config::LogoTiming,
    foundation::{
        core::TimeMs,
        error::{LogoError, LogoResult},
    },
    logo::{
        phase::{AnimationPhase, CycleStep, ShapeClass, StarState},
        shapes::SHAPE_COUNT,
    },
    runtime::timers::{TimerId, TimerQueue},
};

/// Observable state of the component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct LogoState {
    pub cursor: usize,
    pub phase: AnimationPhase,
    pub star: StarState,
}

impl LogoState {
    pub const INITIAL: Self = Self {
        cursor: 0,
        phase: AnimationPhase::Initial,
        star: StarState::White,
    };

    pub fn white_visible(&self) -> bool {
        self.star.white_visible()
    }

    pub fn black_visible(&self) -> bool {
        self.star.black_visible()
    }

    pub fn shape_class(&self) -> ShapeClass {
        self.phase.shape_class()
    }
}

impl Default for LogoState {
    fn default() -> Self {
        Self::INITIAL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogoTimer {
    PhaseStep,
    ShapeTick,
}

/// Something that changed while advancing the component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoEvent {
    /// The phase loop moved to `step`. `state` is the state right after.
    Step {
        at: TimeMs,
        step: CycleStep,
        state: LogoState,
    },
    /// The shape loop advanced the cursor.
    Cursor { at: TimeMs, cursor: usize },
}

impl LogoEvent {
    pub fn at(&self) -> TimeMs {
        match self {
            Self::Step { at, .. } | Self::Cursor { at, .. } => *at,
        }
    }
}

#[derive(Debug)]
pub struct AnimatedLogo {
    timing: LogoTiming,
    state: LogoState,
    step: CycleStep,
    timers: TimerQueue<LogoTimer>,
    phase_timer: Option<TimerId>,
    shape_timer: Option<TimerId>,
    mounted: bool,
    cycles_completed: u64,
}

impl AnimatedLogo {
    pub fn new(timing: LogoTiming) -> LogoResult<Self> {
        timing.validate()?;
        Ok(Self {
            timing,
            state: LogoState::INITIAL,
            step: CycleStep::Showcase,
            timers: TimerQueue::default(),
            phase_timer: None,
            shape_timer: None,
            mounted: false,
            cycles_completed: 0,
        })
    }

    /// Reset to the initial state and arm both loops, with `at` as the mount instant.
    pub fn mount(&mut self, at: TimeMs) -> LogoResult<()> {
        if self.mounted {
            return Err(LogoError::evaluation("logo is already mounted"));
        }
        self.timers = TimerQueue::new(at);
        self.mounted = true;
        self.cycles_completed = 0;
        tracing::debug!(at = at.0, "logo mounted");
        self.start_cycle(at)
    }

    /// Cancel all pending timers. State is left as it was.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        let cancelled = self.timers.pending();
        self.timers.clear_all();
        self.phase_timer = None;
        self.shape_timer = None;
        self.mounted = false;
        tracing::debug!(at = self.timers.now().0, cancelled, "logo unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn state(&self) -> LogoState {
        self.state
    }

    pub fn step(&self) -> CycleStep {
        self.step
    }

    pub fn timing(&self) -> &LogoTiming {
        &self.timing
    }

    pub fn now(&self) -> TimeMs {
        self.timers.now()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Earliest instant at which something will change.
    pub fn next_deadline(&self) -> Option<TimeMs> {
        self.timers.next_due()
    }

    /// Fire every timer due up to and including `until`, in order.
    pub fn advance_to(&mut self, until: TimeMs) -> LogoResult<Vec<LogoEvent>> {
        if !self.mounted {
            return Err(LogoError::evaluation("logo is not mounted"));
        }
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(until) {
            match fired.event {
                LogoTimer::PhaseStep => {
                    self.phase_timer = None;
                    self.on_phase_step(fired.at)?;
                    events.push(LogoEvent::Step {
                        at: fired.at,
                        step: self.step,
                        state: self.state,
                    });
                }
                LogoTimer::ShapeTick => {
                    if self.state.phase != AnimationPhase::Initial {
                        return Err(LogoError::evaluation(format!(
                            "shape tick fired during {:?}",
                            self.state.phase
                        )));
                    }
                    self.state.cursor = (self.state.cursor + 1) % SHAPE_COUNT;
                    tracing::debug!(at = fired.at.0, cursor = self.state.cursor, "shape advanced");
                    events.push(LogoEvent::Cursor {
                        at: fired.at,
                        cursor: self.state.cursor,
                    });
                }
            }
        }
        Ok(events)
    }

    fn start_cycle(&mut self, at: TimeMs) -> LogoResult<()> {
        self.step = CycleStep::Showcase;
        self.state = LogoState::INITIAL;
        // The phase timer goes first so it wins ties against shape ticks.
        self.schedule_phase_step();
        self.sync_shape_loop(at)
    }

    fn on_phase_step(&mut self, at: TimeMs) -> LogoResult<()> {
        let next = self.step.next();
        tracing::debug!(
            at = at.0,
            from = ?self.step,
            to = ?next,
            "phase step"
        );
        if next == CycleStep::Showcase {
            self.cycles_completed += 1;
            return self.start_cycle(at);
        }
        self.step = next;
        self.state.phase = next.phase();
        self.state.star = next.star();
        self.schedule_phase_step();
        self.sync_shape_loop(at)
    }

    fn schedule_phase_step(&mut self) {
        if let Some(old) = self.phase_timer.take() {
            self.timers.clear(old);
        }
        let hold = self.step.hold_ms(&self.timing);
        self.phase_timer = Some(self.timers.set_timeout(hold, LogoTimer::PhaseStep));
    }

    fn sync_shape_loop(&mut self, at: TimeMs) -> LogoResult<()> {
        if let Some(old) = self.shape_timer.take() {
            self.timers.clear(old);
        }
        if self.state.phase == AnimationPhase::Initial {
            let id = self
                .timers
                .set_interval(self.timing.shape_interval_ms, LogoTimer::ShapeTick)?;
            self.shape_timer = Some(id);
            tracing::trace!(at = at.0, "shape loop armed");
        }
        Ok(())
    }
}

impl Drop for AnimatedLogo {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> AnimatedLogo {
        let mut logo = AnimatedLogo::new(LogoTiming::default()).unwrap();
        logo.mount(TimeMs(0)).unwrap();
        logo
    }

    #[test]
    fn mount_arms_phase_and_shape_timers() {
        let logo = mounted();
        assert_eq!(logo.state(), LogoState::INITIAL);
        assert_eq!(logo.pending_timers(), 2);
        assert_eq!(logo.next_deadline(), Some(TimeMs(2_200)));
    }

    #[test]
    fn double_mount_is_an_error() {
        let mut logo = mounted();
        assert!(logo.mount(TimeMs(5)).is_err());
    }

    #[test]
    fn advance_requires_mount() {
        let mut logo = AnimatedLogo::new(LogoTiming::default()).unwrap();
        assert!(logo.advance_to(TimeMs(10)).is_err());
    }

    #[test]
    fn phase_wins_tie_with_seventh_tick() {
        let mut logo = mounted();
        let events = logo.advance_to(TimeMs(15_400)).unwrap();
        let cursors: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                LogoEvent::Cursor { cursor, .. } => Some(*cursor),
                LogoEvent::Step { .. } => None,
            })
            .collect();
        assert_eq!(cursors, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(logo.state().phase, AnimationPhase::Collapsing);
        assert_eq!(logo.state().cursor, 6);
        // only the phase timer remains
        assert_eq!(logo.pending_timers(), 1);
    }

    #[test]
    fn unmount_cancels_everything() {
        let mut logo = mounted();
        logo.advance_to(TimeMs(3_000)).unwrap();
        logo.unmount();
        assert_eq!(logo.pending_timers(), 0);
        assert!(!logo.is_mounted());
        assert_eq!(logo.state().cursor, 1);
    }

    #[test]
    fn remount_starts_fresh() {
        let mut logo = mounted();
        logo.advance_to(TimeMs(18_000)).unwrap();
        logo.unmount();
        logo.mount(TimeMs(50_000)).unwrap();
        assert_eq!(logo.state(), LogoState::INITIAL);
        assert_eq!(logo.next_deadline(), Some(TimeMs(52_200)));
    }

    #[test]
    fn full_cycle_returns_to_initial() {
        let mut logo = mounted();
        logo.advance_to(TimeMs(20_800)).unwrap();
        assert_eq!(logo.state(), LogoState::INITIAL);
        assert_eq!(logo.cycles_completed(), 1);
        assert_eq!(logo.step(), CycleStep::Showcase);
    }
}
