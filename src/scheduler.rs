//! Cancellable timers on a virtual clock.
//!
//! Timers carry a payload instead of a callback; whoever owns the queue
//! advances it and interprets what fires. Nothing here reads the wall clock,
//! so tests fast-forward by calling [`TimerQueue::advance`].

use std::time::Duration;

/// Handle returned by [`Scheduler::after`], used to cancel the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

pub trait Scheduler<T> {
    /// Arm a timer that fires `delay` from now.
    fn after(&mut self, delay: Duration, payload: T) -> TimerToken;

    /// Disarm a timer. Returns `false` if it already fired or was cancelled.
    fn cancel(&mut self, token: TimerToken) -> bool;
}

#[derive(Debug)]
struct Pending<T> {
    token: TimerToken,
    deadline: Duration,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_token: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_token: 0,
            pending: Vec::new(),
        }
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|p| p.token == token)
    }

    /// Time left until the earliest timer fires.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| p.deadline.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and return every timer that came due, in
    /// deadline order. Timers sharing a deadline fire in arming order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<(TimerToken, T)> {
        self.now = self.now.saturating_add(elapsed);
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.deadline <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.deadline, p.token));
        due.into_iter().map(|p| (p.token, p.payload)).collect()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            tracing::trace!(count = self.pending.len(), "clearing pending timers");
        }
        self.pending.clear();
    }
}

impl<T> Scheduler<T> for TimerQueue<T> {
    fn after(&mut self, delay: Duration, payload: T) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending.push(Pending {
            token,
            deadline: self.now.saturating_add(delay),
            payload,
        });
        token
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() != before
    }
}
