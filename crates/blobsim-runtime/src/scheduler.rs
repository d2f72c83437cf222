//! Scheduler: the logical clock and the pending-event queue.
//!
//! Events are keyed by `(due, sequence)`. The sequence number grows with
//! every insertion, so events due at the same instant come out in the order
//! they were scheduled and two identical runs pop identical sequences.
//! Cancellation removes the key; cancelling something already popped or
//! already cancelled does nothing.

use blobsim_core::error::{InvariantError, Result};
use blobsim_core::types::{EventHandle, SimTime};
use std::collections::BTreeMap;

/// An event taken off the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent<T> {
    pub handle: EventHandle,
    pub payload: T,
}

/// Logical clock plus ordered event queue.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: SimTime,
    next_sequence: u64,
    queue: BTreeMap<EventHandle, T>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_sequence: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Current logical time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the earliest pending event.
    pub fn peek_due(&self) -> Option<SimTime> {
        self.queue.keys().next().map(|h| h.due)
    }

    pub fn is_pending(&self, handle: &EventHandle) -> bool {
        self.queue.contains_key(handle)
    }

    /// Insert an event due `delay` units from now.
    pub fn schedule_after(&mut self, delay: SimTime, payload: T) -> Result<EventHandle> {
        let due = self
            .now
            .checked_add(delay)
            .ok_or(InvariantError::ClockOverflow {
                now: self.now,
                delay,
            })?;
        let handle = EventHandle {
            due,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.queue.insert(handle, payload);
        Ok(handle)
    }

    /// Remove a pending event. Returns its payload if it was still pending.
    pub fn cancel(&mut self, handle: &EventHandle) -> Option<T> {
        self.queue.remove(handle)
    }

    /// Pop the earliest event if it is due at or before `horizon`, advancing
    /// the clock to its due time.
    pub fn pop_until(&mut self, horizon: SimTime) -> Option<ScheduledEvent<T>> {
        if self.peek_due()? > horizon {
            return None;
        }
        let (handle, payload) = self.queue.pop_first()?;
        self.now = handle.due;
        Some(ScheduledEvent { handle, payload })
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
