use std::collections::{BTreeMap, HashMap};

use crate::foundation::{
    core::TimeMs,
    error::{LogoError, LogoResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Repeat {
    Once,
    Every(u64),
}

#[derive(Clone, Debug)]
struct Entry<E> {
    id: TimerId,
    repeat: Repeat,
    event: E,
}

/// A timer that came due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<E> {
    pub id: TimerId,
    pub at: TimeMs,
    pub event: E,
}

/// Single-threaded virtual-time timer queue.
///
/// Timers due at the same instant fire in the order they were (re)armed. An interval re-arms
/// itself after each firing, so it queues behind anything scheduled before that firing.
#[derive(Debug)]
pub struct TimerQueue<E> {
    now: TimeMs,
    next_id: u64,
    next_seq: u64,
    queue: BTreeMap<(TimeMs, u64), Entry<E>>,
    index: HashMap<TimerId, (TimeMs, u64)>,
}

impl<E: Clone> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new(TimeMs::ZERO)
    }
}

impl<E: Clone> TimerQueue<E> {
    pub fn new(now: TimeMs) -> Self {
        Self {
            now,
            next_id: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn now(&self) -> TimeMs {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Fire `event` once, `delay_ms` from now.
    pub fn set_timeout(&mut self, delay_ms: u64, event: E) -> TimerId {
        let id = self.alloc_id();
        self.arm(self.now.saturating_add(delay_ms), id, Repeat::Once, event);
        id
    }

    /// Fire `event` every `period_ms`, first at `now + period_ms`.
    pub fn set_interval(&mut self, period_ms: u64, event: E) -> LogoResult<TimerId> {
        if period_ms == 0 {
            return Err(LogoError::validation("interval period must be > 0"));
        }
        let id = self.alloc_id();
        self.arm(
            self.now.saturating_add(period_ms),
            id,
            Repeat::Every(period_ms),
            event,
        );
        Ok(id)
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was cleared.
    pub fn clear(&mut self, id: TimerId) -> bool {
        match self.index.remove(&id) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }

    pub fn clear_all(&mut self) {
        self.queue.clear();
        self.index.clear();
    }

    pub fn next_due(&self) -> Option<TimeMs> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its due time.
    ///
    /// When nothing is due the clock moves to `until` (never backwards) and `None` is returned.
    pub fn pop_due(&mut self, until: TimeMs) -> Option<Fired<E>> {
        let key = match self.queue.keys().next() {
            Some(&key) if key.0 <= until => key,
            _ => {
                self.now = self.now.max(until);
                return None;
            }
        };
        let entry = self.queue.remove(&key)?;
        self.index.remove(&entry.id);

        let at = key.0;
        self.now = self.now.max(at);
        tracing::trace!(timer = entry.id.0, at = at.0, "timer fired");

        if let Repeat::Every(period) = entry.repeat {
            self.arm(at.saturating_add(period), entry.id, entry.repeat, entry.event.clone());
        }
        Some(Fired {
            id: entry.id,
            at,
            event: entry.event,
        })
    }

    fn alloc_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn arm(&mut self, due: TimeMs, id: TimerId, repeat: Repeat, event: E) {
        let key = (due, self.next_seq);
        self.next_seq += 1;
        self.queue.insert(key, Entry { id, repeat, event });
        self.index.insert(id, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut TimerQueue<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut out = Vec::new();
        while let Some(f) = q.pop_due(TimeMs(until)) {
            out.push((f.at.0, f.event));
        }
        out
    }

    #[test]
    fn timeouts_fire_in_due_order() {
        let mut q = TimerQueue::new(TimeMs(0));
        q.set_timeout(30, "c");
        q.set_timeout(10, "a");
        q.set_timeout(20, "b");
        assert_eq!(drain(&mut q, 100), vec![(10, "a"), (20, "b"), (30, "c")]);
        assert_eq!(q.now(), TimeMs(100));
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn same_instant_fires_in_scheduling_order() {
        let mut q = TimerQueue::new(TimeMs(0));
        q.set_timeout(10, "first");
        q.set_timeout(10, "second");
        assert_eq!(drain(&mut q, 10), vec![(10, "first"), (10, "second")]);
    }

    #[test]
    fn interval_rearms_and_clear_stops_it() {
        let mut q = TimerQueue::new(TimeMs(0));
        let id = q.set_interval(5, "tick").unwrap();
        assert_eq!(
            drain(&mut q, 12),
            vec![(5, "tick"), (10, "tick")]
        );
        assert!(q.is_pending(id));
        assert_eq!(q.next_due(), Some(TimeMs(15)));
        assert!(q.clear(id));
        assert!(!q.clear(id));
        assert_eq!(drain(&mut q, 100), vec![]);
    }

    #[test]
    fn interval_tick_queues_behind_earlier_timeout() {
        let mut q = TimerQueue::new(TimeMs(0));
        q.set_timeout(10, "phase");
        q.set_interval(5, "tick").unwrap();
        // tick re-arms at t=5 for t=10, after the timeout was scheduled.
        assert_eq!(
            drain(&mut q, 10),
            vec![(5, "tick"), (10, "phase"), (10, "tick")]
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut q = TimerQueue::<()>::new(TimeMs(0));
        assert!(q.set_interval(0, ()).is_err());
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut q = TimerQueue::<()>::new(TimeMs(50));
        assert!(q.pop_due(TimeMs(10)).is_none());
        assert_eq!(q.now(), TimeMs(50));
        q.set_timeout(5, ());
        assert_eq!(q.next_due(), Some(TimeMs(55)));
    }

    #[test]
    fn clear_all_empties_queue() {
        let mut q = TimerQueue::new(TimeMs(0));
        let a = q.set_timeout(1, "a");
        q.set_interval(2, "b").unwrap();
        q.clear_all();
        assert_eq!(q.pending(), 0);
        assert!(!q.is_pending(a));
        assert_eq!(q.next_due(), None);
    }
}
