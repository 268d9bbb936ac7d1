//! The set of addresses a crawl has claimed
//!
//! Claiming is a single check-and-insert under one lock: a task either wins
//! the address and goes on to fetch it, or learns someone else already has.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Addresses already claimed by some branch of the crawl
///
/// One `VisitedSet` belongs to one top-level crawl and is shared by every
/// task it spawns. Addresses are compared exactly; no normalization happens
/// here.
#[derive(Debug, Default)]
pub struct VisitedSet {
    addresses: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `address` for the caller
    ///
    /// Returns `true` if the address was not yet present; it is now marked and
    /// the caller should fetch it. Returns `false` if another caller got there
    /// first. For concurrent calls with the same address exactly one sees
    /// `true`.
    pub fn try_mark(&self, address: &str) -> bool {
        let mut addresses = self.lock();
        if addresses.contains(address) {
            return false;
        }
        addresses.insert(address.to_owned())
    }

    /// Returns whether `address` has been claimed
    pub fn contains(&self, address: &str) -> bool {
        self.lock().contains(address)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns every claimed address, sorted
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self.lock().iter().cloned().collect();
        addresses.sort();
        addresses
    }

    // A panic while holding the lock cannot leave the set half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.addresses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
