//! Page-change detection: debounced rediscovery, bounded retries and the
//! back/forward history of visited pages.

use std::time::{Duration, Instant, SystemTime};

use crate::page::Location;

const HISTORY_LIMIT: usize = 100;

/// What the navigator should do on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorAction {
    Rediscover,
    Idle,
}

/// Turns content-changed events into rediscovery passes.
///
/// A change schedules rediscovery after `debounce`; further changes restart
/// the delay. A pass that finds no rows is retried after `retry_delay` until
/// `max_retries` is exhausted.
#[derive(Debug, Clone)]
pub struct PageMonitor {
    debounce: Duration,
    retry_delay: Duration,
    max_retries: u32,
    deadline: Option<Instant>,
    retries: u32,
    initialized: bool,
    last_modified: Option<SystemTime>,
}

impl PageMonitor {
    pub fn new(debounce: Duration, retry_delay: Duration, max_retries: u32) -> Self {
        Self {
            debounce,
            retry_delay,
            max_retries,
            deadline: None,
            retries: 0,
            initialized: false,
            last_modified: None,
        }
    }

    /// Something about the page changed; rows must be rediscovered.
    pub fn content_changed(&mut self, now: Instant) {
        self.initialized = false;
        self.retries = 0;
        self.deadline = Some(now + self.debounce);
    }

    /// Compare a local page's modification time with the last one seen.
    /// The first observation only records the time. Returns true when the
    /// page changed.
    pub fn observe_modified(&mut self, modified: Option<SystemTime>, now: Instant) -> bool {
        let changed = match (self.last_modified, modified) {
            (Some(previous), Some(current)) => current != previous,
            _ => false,
        };
        if modified.is_some() {
            self.last_modified = modified;
        }
        if changed {
            log::debug!("page file modified, scheduling rediscovery");
            self.content_changed(now);
        }
        changed
    }

    pub fn forget_modified(&mut self) {
        self.last_modified = None;
    }

    pub fn poll(&mut self, now: Instant) -> MonitorAction {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                MonitorAction::Rediscover
            }
            _ => MonitorAction::Idle,
        }
    }

    /// Record the result of a rediscovery pass.
    pub fn discovered(&mut self, row_count: usize, now: Instant) {
        if row_count > 0 {
            self.initialized = true;
            self.retries = 0;
            return;
        }
        if self.initialized {
            return;
        }
        if self.retries < self.max_retries {
            self.retries += 1;
            log::debug!(
                "no rows found, retry {}/{} in {:?}",
                self.retries,
                self.max_retries,
                self.retry_delay
            );
            self.deadline = Some(now + self.retry_delay);
        } else {
            log::warn!("no story rows found after {} retries", self.max_retries);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}

/// Visited locations with browser-style back/forward.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Location>,
    index: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh navigation, dropping any forward entries.
    pub fn visit(&mut self, location: Location) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        if self.entries.last() != Some(&location) {
            self.entries.push(location);
            if self.entries.len() > HISTORY_LIMIT {
                self.entries.remove(0);
            }
        }
        self.index = self.entries.len().saturating_sub(1);
    }

    pub fn back(&mut self) -> Option<&Location> {
        if self.index == 0 || self.entries.is_empty() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn current(&self) -> Option<&Location> {
        self.entries.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
