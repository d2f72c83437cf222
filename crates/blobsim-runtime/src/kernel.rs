//! Kernel: process table, dispatch loop and the interrupt protocol.
//!
//! The kernel owns the world `W`, the scheduler and every process. Each
//! dispatched event resumes one process. Whatever that process asked for
//! on its context is applied before the next queued event is popped:
//!
//! 1. its new suspension is recorded (timer, resource wait, or terminated)
//! 2. reporting events are appended to the history
//! 3. processes whose container requests were fulfilled are scheduled
//! 4. interrupts are delivered; an accepted interrupt cancels the target's
//!    timer and resumes the target immediately, which can cascade
//!
//! An interrupt against a process that is not parked on a timer is a
//! missed interrupt: counted, logged, and otherwise ignored.

use blobsim_core::error::{InvariantError, Result};
use blobsim_core::process::{Process, ProcessContext, Step};
use blobsim_core::types::{
    EventHandle, InterruptReason, ProcessId, ProcessState, SimEvent, SimTime, Suspension, Wake,
};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::scheduler::Scheduler;

/// Payload of a queued event: which process to resume, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub process: ProcessId,
    pub wake: Wake,
}

/// One resumption, as recorded in the dispatch trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRecord {
    pub at: SimTime,
    pub process: ProcessId,
    pub wake: Wake,
}

/// Counters about kernel activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KernelStats {
    pub spawned: usize,
    pub dispatched: u64,
    pub interrupts_delivered: u64,
    pub interrupts_missed: u64,
    pub resource_grants: u64,
    pub terminated: usize,
}

struct ProcessSlot<W> {
    name: String,
    process: Option<Box<dyn Process<W>>>,
    state: ProcessState,
}

/// The discrete-event kernel.
pub struct Kernel<W> {
    scheduler: Scheduler<Activation>,
    processes: Vec<ProcessSlot<W>>,
    world: W,
    history: Vec<(SimTime, SimEvent)>,
    trace: Vec<DispatchRecord>,
    stats: KernelStats,
}

impl<W> Kernel<W> {
    pub fn new(world: W) -> Self {
        Self {
            scheduler: Scheduler::new(),
            processes: Vec::new(),
            world,
            history: Vec::new(),
            trace: Vec::new(),
            stats: KernelStats::default(),
        }
    }

    /// Current logical time.
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Register a process and schedule its first activation at `now`.
    pub fn spawn(&mut self, process: Box<dyn Process<W>>) -> Result<ProcessId> {
        let id = ProcessId(self.processes.len());
        let name = process.name().to_string();
        self.scheduler.schedule_after(
            0,
            Activation {
                process: id,
                wake: Wake::Start,
            },
        )?;
        trace!(process = id.0, %name, "spawned");
        self.processes.push(ProcessSlot {
            name,
            process: Some(process),
            state: ProcessState::Runnable,
        });
        self.stats.spawned += 1;
        Ok(id)
    }

    pub fn process_state(&self, id: ProcessId) -> Option<ProcessState> {
        self.processes.get(id.0).map(|slot| slot.state)
    }

    pub fn process_name(&self, id: ProcessId) -> Option<&str> {
        self.processes.get(id.0).map(|slot| slot.name.as_str())
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Number of events still queued.
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// Due time of the next queued event.
    pub fn next_event_at(&self) -> Option<SimTime> {
        self.scheduler.peek_due()
    }

    /// Reporting events, in the order they were emitted.
    pub fn history(&self) -> &[(SimTime, SimEvent)] {
        &self.history
    }

    /// Every resumption so far, in dispatch order.
    pub fn trace(&self) -> &[DispatchRecord] {
        &self.trace
    }

    pub fn stats(&self) -> &KernelStats {
        &self.stats
    }

    /// Dispatch every event due at or before `horizon`.
    ///
    /// Processes still suspended at the horizon are left as they are.
    pub fn run_until(&mut self, horizon: SimTime) -> Result<()> {
        while let Some(event) = self.scheduler.pop_until(horizon) {
            self.dispatch(event.payload)?;
        }
        Ok(())
    }

    /// Dispatch the next event regardless of its time. Returns false when
    /// the queue is empty.
    pub fn step(&mut self) -> Result<bool> {
        match self.scheduler.pop_until(SimTime::MAX) {
            Some(event) => {
                self.dispatch(event.payload)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Interrupt `target` from outside any process.
    ///
    /// Returns whether the interrupt was accepted.
    pub fn interrupt(&mut self, target: ProcessId, reason: InterruptReason) -> Result<bool> {
        match self.accept_interrupt(target, reason)? {
            Some(activation) => {
                self.dispatch(activation)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resume one process, then everything its interrupts make ready.
    fn dispatch(&mut self, first: Activation) -> Result<()> {
        let mut ready = VecDeque::from([first]);
        while let Some(activation) = ready.pop_front() {
            self.resume(activation, &mut ready)?;
        }
        Ok(())
    }

    fn resume(&mut self, activation: Activation, ready: &mut VecDeque<Activation>) -> Result<()> {
        let now = self.scheduler.now();
        let id = activation.process;
        let slot = self
            .processes
            .get_mut(id.0)
            .ok_or(InvariantError::UnknownProcess(id))?;
        if slot.state == ProcessState::Terminated {
            debug!(process = id.0, "activation for terminated process dropped");
            return Ok(());
        }
        let mut process = slot
            .process
            .take()
            .ok_or(InvariantError::ReentrantResume(id))?;
        slot.state = ProcessState::Runnable;

        self.trace.push(DispatchRecord {
            at: now,
            process: id,
            wake: activation.wake.clone(),
        });
        self.stats.dispatched += 1;

        let mut ctx = ProcessContext::new(now, id);
        let outcome = process.resume(activation.wake, &mut self.world, &mut ctx);
        let step = match outcome {
            Ok(step) => step,
            Err(e) => {
                self.processes[id.0].process = Some(process);
                return Err(e);
            }
        };

        let state = match step {
            Step::Hold(delay) => {
                let handle = self.scheduler.schedule_after(
                    delay,
                    Activation {
                        process: id,
                        wake: Wake::Timer,
                    },
                )?;
                ProcessState::Suspended(Suspension::Timer(handle))
            }
            Step::AwaitResource => ProcessState::Suspended(Suspension::ResourceWait),
            Step::Terminate => ProcessState::Terminated,
        };
        let slot = &mut self.processes[id.0];
        slot.state = state;
        if state == ProcessState::Terminated {
            debug!(process = id.0, name = %slot.name, at = now, "process terminated");
            self.stats.terminated += 1;
            self.history.push((now, SimEvent::ProcessTerminated { process: id }));
        } else {
            slot.process = Some(process);
        }

        let effects = ctx.into_effects();
        self.history
            .extend(effects.events.into_iter().map(|event| (now, event)));
        for waiter in effects.grants {
            self.grant(waiter)?;
        }
        for (target, reason) in effects.interrupts {
            if let Some(activation) = self.accept_interrupt(target, reason)? {
                ready.push_back(activation);
            }
        }
        Ok(())
    }

    /// Schedule a fulfilled resource waiter to resume at `now`.
    fn grant(&mut self, waiter: ProcessId) -> Result<()> {
        let slot = self
            .processes
            .get_mut(waiter.0)
            .ok_or(InvariantError::UnknownProcess(waiter))?;
        if slot.state != ProcessState::Suspended(Suspension::ResourceWait) {
            debug!(process = waiter.0, state = ?slot.state, "grant for a process not waiting on food");
            return Ok(());
        }
        self.scheduler.schedule_after(
            0,
            Activation {
                process: waiter,
                wake: Wake::ResourceGranted,
            },
        )?;
        slot.state = ProcessState::Runnable;
        self.stats.resource_grants += 1;
        Ok(())
    }

    /// Cancel `target`'s timer if it is parked on one.
    fn accept_interrupt(
        &mut self,
        target: ProcessId,
        reason: InterruptReason,
    ) -> Result<Option<Activation>> {
        let now = self.scheduler.now();
        let slot = self
            .processes
            .get_mut(target.0)
            .ok_or(InvariantError::UnknownProcess(target))?;
        match slot.state {
            ProcessState::Suspended(Suspension::Timer(handle)) => {
                self.scheduler.cancel(&handle);
                slot.state = ProcessState::Runnable;
                self.stats.interrupts_delivered += 1;
                trace!(process = target.0, due = handle.due, at = now, "timer interrupted");
                Ok(Some(Activation {
                    process: target,
                    wake: Wake::Interrupted(reason),
                }))
            }
            state => {
                self.stats.interrupts_missed += 1;
                debug!(process = target.0, ?state, ?reason, at = now, "missed interrupt");
                self.history
                    .push((now, SimEvent::InterruptMissed { target, reason }));
                Ok(None)
            }
        }
    }

    /// The timer a process is parked on, if any.
    pub fn pending_timer(&self, id: ProcessId) -> Option<EventHandle> {
        match self.process_state(id)? {
            ProcessState::Suspended(Suspension::Timer(handle)) => Some(handle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blobsim_core::types::InterruptReason;

    /// A world that just records what happened.
    #[derive(Default)]
    struct Log(Vec<String>);

    /// Holds for a fixed delay a number of times, then terminates.
    struct Ticker {
        name: String,
        delay: SimTime,
        remaining: u32,
    }

    impl Process<Log> for Ticker {
        fn name(&self) -> &str {
            &self.name
        }

        fn resume(&mut self, wake: Wake, log: &mut Log, ctx: &mut ProcessContext) -> Result<Step> {
            log.0.push(format!("{}@{}:{:?}", self.name, ctx.now(), wake));
            if self.remaining == 0 {
                return Ok(Step::Terminate);
            }
            self.remaining -= 1;
            Ok(Step::Hold(self.delay))
        }
    }

    /// Interrupts a target once, at its first timer expiry.
    struct Alarm {
        target: ProcessId,
        after: SimTime,
        fired: bool,
    }

    impl Process<Log> for Alarm {
        fn name(&self) -> &str {
            "alarm"
        }

        fn resume(&mut self, _wake: Wake, log: &mut Log, ctx: &mut ProcessContext) -> Result<Step> {
            if self.fired {
                return Ok(Step::Terminate);
            }
            if ctx.now() < self.after {
                return Ok(Step::Hold(self.after - ctx.now()));
            }
            log.0.push(format!("alarm@{}", ctx.now()));
            ctx.interrupt(self.target, InterruptReason::Nightfall);
            ctx.interrupt(self.target, InterruptReason::Nightfall);
            self.fired = true;
            Ok(Step::Terminate)
        }
    }

    fn ticker(name: &str, delay: SimTime, remaining: u32) -> Box<dyn Process<Log>> {
        Box::new(Ticker {
            name: name.to_string(),
            delay,
            remaining,
        })
    }

    #[test]
    fn spawn_schedules_start_at_now() {
        let mut kernel = Kernel::new(Log::default());
        let id = kernel.spawn(ticker("a", 10, 1)).unwrap();
        assert_eq!(id, ProcessId(0));
        assert_eq!(kernel.pending_events(), 1);
        assert_eq!(kernel.process_state(id), Some(ProcessState::Runnable));
        assert_eq!(kernel.process_name(id), Some("a"));
    }

    #[test]
    fn run_until_dispatches_in_order_and_terminates() {
        let mut kernel = Kernel::new(Log::default());
        let a = kernel.spawn(ticker("a", 10, 2)).unwrap();
        kernel.spawn(ticker("b", 15, 1)).unwrap();
        kernel.run_until(100).unwrap();

        assert_eq!(
            kernel.world().0,
            vec!["a@0:Start", "b@0:Start", "a@10:Timer", "b@15:Timer", "a@20:Timer"]
        );
        assert_eq!(kernel.process_state(a), Some(ProcessState::Terminated));
        assert_eq!(kernel.stats().terminated, 2);
        assert_eq!(kernel.pending_events(), 0);
    }

    #[test]
    fn horizon_freezes_in_flight_processes() {
        let mut kernel = Kernel::new(Log::default());
        let a = kernel.spawn(ticker("a", 50, 5)).unwrap();
        kernel.run_until(60).unwrap();
        assert_eq!(kernel.now(), 50);
        let handle = kernel.pending_timer(a).expect("a is parked on a timer");
        assert_eq!(handle.due, 100);
    }

    #[test]
    fn interrupt_cancels_timer_and_resumes_immediately() {
        let mut kernel = Kernel::new(Log::default());
        let sleeper = kernel.spawn(ticker("sleeper", 100, 3)).unwrap();
        kernel
            .spawn(Box::new(Alarm {
                target: sleeper,
                after: 30,
                fired: false,
            }))
            .unwrap();
        kernel.run_until(30).unwrap();

        let log = &kernel.world().0;
        assert_eq!(log[log.len() - 2], "alarm@30");
        assert_eq!(log[log.len() - 1], "sleeper@30:Interrupted(Nightfall)");
        assert_eq!(kernel.stats().interrupts_delivered, 1);
        assert_eq!(kernel.stats().interrupts_missed, 1, "interrupts must not queue");

        let handle = kernel.pending_timer(sleeper).unwrap();
        assert_eq!(handle.due, 130);
        kernel.run_until(129).unwrap();
        assert!(
            !kernel.world().0.iter().any(|l| l == "sleeper@100:Timer"),
            "the cancelled timer must never fire"
        );
    }

    #[test]
    fn interrupting_a_runnable_or_dead_process_is_missed() {
        let mut kernel = Kernel::new(Log::default());
        let a = kernel.spawn(ticker("a", 10, 0)).unwrap();
        assert!(!kernel.interrupt(a, InterruptReason::Nightfall).unwrap());

        kernel.run_until(10).unwrap();
        assert_eq!(kernel.process_state(a), Some(ProcessState::Terminated));
        assert!(!kernel.interrupt(a, InterruptReason::Nightfall).unwrap());
        assert_eq!(kernel.stats().interrupts_missed, 2);
        assert!(kernel
            .history()
            .iter()
            .any(|(_, e)| matches!(e, SimEvent::InterruptMissed { .. })));
    }

    #[test]
    fn external_interrupt_is_accepted_on_timer() {
        let mut kernel = Kernel::new(Log::default());
        let a = kernel.spawn(ticker("a", 10, 3)).unwrap();
        kernel.run_until(0).unwrap();
        assert!(kernel.interrupt(a, InterruptReason::Custom("test".into())).unwrap());
        assert_eq!(kernel.pending_timer(a).unwrap().due, 10);
        assert_eq!(kernel.trace().len(), 2);
    }

    #[test]
    fn unknown_process_is_an_invariant_error() {
        let mut kernel = Kernel::new(Log::default());
        assert!(kernel.interrupt(ProcessId(9), InterruptReason::Nightfall).is_err());
    }

    #[test]
    fn step_dispatches_one_event() {
        let mut kernel = Kernel::new(Log::default());
        kernel.spawn(ticker("a", 1000, 1)).unwrap();
        assert!(kernel.step().unwrap());
        assert!(kernel.step().unwrap());
        assert_eq!(kernel.now(), 1000);
        assert!(!kernel.step().unwrap());
    }
}
