//! Transient quarantine of nodes whose discovery request failed.
//!
//! Owned by the refresh loop alone. Entries are advisory: the whole set is
//! wiped once the reset window has elapsed, whether or not the nodes recovered.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::nodes::endpoint::Node;

#[derive(Debug)]
pub struct BadSet {
    hosts: HashSet<String>,
    last_reset: Instant,
    window: Duration,
}

impl BadSet {
    pub fn new(window: Duration, now: Instant) -> Self {
        Self {
            hosts: HashSet::new(),
            last_reset: now,
            window,
        }
    }

    /// Clear the set if the window has elapsed since the last reset.
    /// Returns true when a reset happened.
    pub fn expire(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_reset) < self.window {
            return false;
        }
        self.hosts.clear();
        self.last_reset = now;
        true
    }

    /// Mark a host bad. Returns false if it already was.
    pub fn insert(&mut self, host: &str) -> bool {
        self.hosts.insert(host.to_string())
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// Drop every quarantined node from `candidates`, keeping order.
    pub fn filter(&self, candidates: Vec<Node>) -> Vec<Node> {
        candidates
            .into_iter()
            .filter(|n| !self.contains(n.host()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Sorted copy of the quarantined hosts, for logging.
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self.hosts.iter().cloned().collect();
        hosts.sort();
        hosts
    }
}
