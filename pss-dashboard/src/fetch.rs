//! Request tickets for async fetches.
//!
//! Fetches can overlap with selection changes. Each fetch is issued a
//! ticket carrying a monotonically increasing id and the parameters that
//! were active at issue time. A response is applied only if its ticket is
//! the newest one issued and its parameters still match; anything else is
//! stale and dropped.

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    id: u64,
    key: K,
}

impl<K> FetchTicket<K> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Parameters the request was issued with.
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Issues tickets for one data set and decides which response wins.
#[derive(Debug)]
pub struct FetchTracker {
    name: &'static str,
    latest: u64,
    settled: u64,
}

impl FetchTracker {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            latest: 0,
            settled: 0,
        }
    }

    pub fn issue<K>(&mut self, key: K) -> FetchTicket<K> {
        self.latest += 1;
        debug!("[PSS] fetch: {} request #{} issued", self.name, self.latest);
        FetchTicket {
            id: self.latest,
            key,
        }
    }

    /// True while the newest ticket has not been accepted.
    pub fn in_flight(&self) -> bool {
        self.settled < self.latest
    }

    /// Accept `ticket` if it is the newest, unsettled, and was issued for
    /// `current`. Accepting settles it.
    pub fn accept<K: PartialEq>(&mut self, ticket: &FetchTicket<K>, current: &K) -> bool {
        if ticket.id != self.latest || ticket.id <= self.settled {
            debug!(
                "[PSS] fetch: {} request #{} superseded by #{}",
                self.name, ticket.id, self.latest
            );
            return false;
        }
        if ticket.key != *current {
            debug!(
                "[PSS] fetch: {} request #{} parameters no longer current",
                self.name, ticket.id
            );
            return false;
        }
        self.settled = ticket.id;
        true
    }
}
