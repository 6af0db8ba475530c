//! Scheduled tasks advanced by the frame loop
//!
//! Replaces host timers: a component owns a `Timers<T>`, schedules typed
//! tasks with a delay, advances it from `on_tick` and drains whatever is
//! due. Entries fire in fire-time order, ties in scheduling order.

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    fire_at: f64,
    seq: u64,
    task: T,
}

/// A due task together with the time it was scheduled for
#[derive(Debug, Clone, PartialEq)]
pub struct Due<T> {
    pub fire_at: f64,
    pub task: T,
}

#[derive(Debug, Clone)]
pub struct Timers<T> {
    now: f64,
    next_seq: u64,
    /// Sorted by (fire_at, seq)
    entries: Vec<Entry<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in seconds since creation
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `task` to fire `delay` seconds from now.
    /// A zero delay fires on the next `advance`.
    pub fn schedule(&mut self, delay: f32, task: T) -> TimerToken {
        let fire_at = self.now + f64::from(delay.max(0.0));
        self.schedule_at(fire_at, task)
    }

    /// Schedule at an absolute time (used to repeat without drift)
    pub fn schedule_at(&mut self, fire_at: f64, task: T) -> TimerToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        let index = self
            .entries
            .partition_point(|e| (e.fire_at, e.seq) <= (fire_at, seq));
        self.entries.insert(index, Entry { fire_at, seq, task });
        TimerToken(seq)
    }

    /// Returns false if the task already fired or was cancelled
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.seq != token.0);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn advance(&mut self, dt: f32) {
        self.now += f64::from(dt.max(0.0));
    }

    /// Pop the earliest task whose fire time has passed
    pub fn pop_due(&mut self) -> Option<Due<T>> {
        if self.entries.first().is_some_and(|e| e.fire_at <= self.now) {
            let entry = self.entries.remove(0);
            Some(Due {
                fire_at: entry.fire_at,
                task: entry.task,
            })
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
