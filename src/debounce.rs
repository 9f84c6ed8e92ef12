//! Trailing-edge debouncing with a single cancellable slot.
//!
//! Every [`Debouncer::schedule`] replaces whatever was pending and pushes the
//! deadline out again. Only a value that survives a full quiet period is ever
//! released by [`Debouncer::poll`]. Time is passed in by the caller so the
//! event loop clock drives it and tests stay deterministic.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due: Instant,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending value and start a fresh quiet period for `value`
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            due: now + self.delay,
        });
    }

    /// Drop the pending value without firing it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value fires, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Release the pending value once its quiet period has fully elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.due => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }
}
