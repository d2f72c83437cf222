//! Process: a resumable unit of simulated work.
//!
//! Processes are explicit state machines. The kernel calls `resume` with
//! the reason for waking; the process mutates the shared world, records
//! side effects on its `ProcessContext`, and returns a `Step` saying how it
//! wants to suspend next. Nothing blocks: suspending means "schedule a
//! future activation and return".

use crate::error::Result;
use crate::types::{InterruptReason, ProcessId, SimEvent, SimTime, Wake};

/// How a process yields control back to the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Sleep on a timer for this many time units.
    Hold(SimTime),
    /// Wait until a queued container request is fulfilled.
    AwaitResource,
    /// Never run again.
    Terminate,
}

/// A suspendable computation driven by the kernel.
///
/// `W` is the world the process operates on. A process may only touch the
/// world during `resume`, and only one process runs at any instant.
pub trait Process<W> {
    /// Short label for logs and the process table.
    fn name(&self) -> &str;

    /// Run until the next suspension point.
    fn resume(&mut self, wake: Wake, world: &mut W, ctx: &mut ProcessContext) -> Result<Step>;
}

/// Side effects collected from one resumption.
#[derive(Debug, Default)]
pub struct Effects {
    pub interrupts: Vec<(ProcessId, InterruptReason)>,
    pub grants: Vec<ProcessId>,
    pub events: Vec<SimEvent>,
}

/// Kernel services available to a running process.
///
/// Interrupts and grants are applied by the kernel right after the current
/// resumption returns, before the next queued event is dispatched.
#[derive(Debug)]
pub struct ProcessContext {
    now: SimTime,
    process: ProcessId,
    effects: Effects,
}

impl ProcessContext {
    pub fn new(now: SimTime, process: ProcessId) -> Self {
        Self {
            now,
            process,
            effects: Effects::default(),
        }
    }

    /// Current logical time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// The running process.
    pub fn process_id(&self) -> ProcessId {
        self.process
    }

    /// Preempt `target`'s pending timer.
    pub fn interrupt(&mut self, target: ProcessId, reason: InterruptReason) {
        self.effects.interrupts.push((target, reason));
    }

    /// Wake processes whose container requests were just fulfilled.
    pub fn grant(&mut self, waiters: impl IntoIterator<Item = ProcessId>) {
        self.effects.grants.extend(waiters);
    }

    /// Record a reporting event at the current time.
    pub fn emit(&mut self, event: SimEvent) {
        self.effects.events.push(event);
    }

    pub fn into_effects(self) -> Effects {
        self.effects
    }
}
