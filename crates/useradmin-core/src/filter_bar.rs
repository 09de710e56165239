//! Search box and status selector above the user table.

use std::time::{Duration, Instant};

use crate::models::StatusFilter;

/// Quiet period before typed search text is propagated
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Holds the latest value until no new value arrived for `delay`.
///
/// Time is passed in by the caller, so the event loop decides how it waits.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the quiet period
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// When the pending value matures, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    /// Take the pending value once its quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct FilterBar {
    search_input: String,
    status: StatusFilter,
    debouncer: Debouncer<String>,
}

impl Default for FilterBar {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBar {
    pub fn new() -> Self {
        Self {
            search_input: String::new(),
            status: StatusFilter::All,
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
        }
    }

    /// Text currently in the search box (not yet necessarily propagated)
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search_input = text.into();
        self.debouncer.push(self.search_input.clone(), now);
    }

    pub fn clear_search(&mut self, now: Instant) {
        self.type_search(String::new(), now);
    }

    /// Search text that survived the quiet period, if any
    pub fn poll_search(&mut self, now: Instant) -> Option<String> {
        self.debouncer.poll(now)
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Status changes apply immediately; returns the value to propagate
    pub fn set_status(&mut self, status: StatusFilter) -> StatusFilter {
        self.status = status;
        status
    }
}
