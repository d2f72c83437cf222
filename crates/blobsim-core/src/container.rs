//! Food container: a bounded, depletable pool shared by every blob.
//!
//! `put` adds stock (clipped to capacity) and then serves queued requests
//! strictly in arrival order. `get` either succeeds at once or queues the
//! requester. A request at the head of the queue that cannot be served
//! blocks everyone behind it, so waiters are never reordered.

use crate::error::{InvariantError, Result};
use crate::types::ProcessId;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::trace;

/// Outcome of a `get` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetOutcome {
    /// Stock was withdrawn immediately.
    Granted,
    /// The requester is now in the wait list and must suspend.
    Queued,
}

#[derive(Debug, Clone, Serialize)]
struct PendingGet {
    process: ProcessId,
    amount: u64,
}

/// Shared numeric pool with bounded capacity.
#[derive(Debug, Clone, Serialize)]
pub struct FoodContainer {
    level: u64,
    capacity: u64,
    waiters: VecDeque<PendingGet>,
}

impl FoodContainer {
    /// Create a container holding `initial` units.
    pub fn new(capacity: u64, initial: u64) -> Result<Self> {
        let container = Self {
            level: initial,
            capacity,
            waiters: VecDeque::new(),
        };
        container.check()?;
        Ok(container)
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    /// Number of processes queued on `get`.
    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }

    /// Processes queued on `get`, in arrival order.
    pub fn waiters(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.waiters.iter().map(|w| w.process)
    }

    /// Add `amount` units, clipped to capacity, then serve waiters FIFO.
    ///
    /// Returns the processes whose requests were fulfilled, in the order
    /// they were served.
    pub fn put(&mut self, amount: u64) -> Result<Vec<ProcessId>> {
        self.level = self.level.saturating_add(amount).min(self.capacity);
        let mut fulfilled = Vec::new();
        while let Some(head) = self.waiters.front() {
            if head.amount > self.level {
                break;
            }
            self.level -= head.amount;
            fulfilled.push(head.process);
            self.waiters.pop_front();
        }
        trace!(amount, level = self.level, served = fulfilled.len(), "container put");
        self.check()?;
        Ok(fulfilled)
    }

    /// Withdraw `amount` units on behalf of `requester`.
    pub fn get(&mut self, amount: u64, requester: ProcessId) -> Result<GetOutcome> {
        if amount > self.capacity {
            return Err(InvariantError::RequestExceedsCapacity {
                requested: amount,
                capacity: self.capacity,
            }
            .into());
        }
        let outcome = if self.waiters.is_empty() && self.level >= amount {
            self.level -= amount;
            GetOutcome::Granted
        } else {
            self.waiters.push_back(PendingGet {
                process: requester,
                amount,
            });
            GetOutcome::Queued
        };
        trace!(amount, level = self.level, ?outcome, "container get");
        self.check()?;
        Ok(outcome)
    }

    fn check(&self) -> Result<()> {
        if self.level > self.capacity {
            return Err(InvariantError::LevelOutOfBounds {
                level: self.level,
                capacity: self.capacity,
            }
            .into());
        }
        Ok(())
    }
}
