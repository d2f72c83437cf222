//! Shared types used across the kernel, the agents and the runtime.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logical simulation time, in minutes. Only the scheduler advances it.
pub type SimTime = u64;

/// Unique identifier for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot of a process in the kernel's process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub usize);

/// Position of a blob in the habitat roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlobId(pub usize);

/// Handle to a pending event.
///
/// Ordering is by due time, then by insertion sequence, which is exactly
/// the dispatch order of the event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventHandle {
    pub due: SimTime,
    pub sequence: u64,
}

/// The fixed day/night rhythm every agent is synchronized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRhythm {
    pub daylight: SimTime,
    pub nighttime: SimTime,
}

impl DayRhythm {
    pub fn new(daylight: SimTime, nighttime: SimTime) -> Self {
        Self { daylight, nighttime }
    }

    /// Length of one full day.
    pub fn day_length(&self) -> SimTime {
        self.daylight.saturating_add(self.nighttime)
    }

    /// Zero-based index of the day containing `time`.
    pub fn day_of(&self, time: SimTime) -> u64 {
        match self.day_length() {
            0 => 0,
            len => time / len,
        }
    }
}

/// Phase of the environment's day cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Day,
    Night,
}

/// Why a process was preempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterruptReason {
    /// The sun set while the blob was out hunting.
    Nightfall,
    /// Domain-specific reason.
    Custom(String),
}

/// Why the kernel is resuming a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wake {
    /// First activation after spawn.
    Start,
    /// The timer the process suspended on expired.
    Timer,
    /// Another process cut the pending timer short.
    Interrupted(InterruptReason),
    /// A queued `get` on the food container was fulfilled.
    ResourceGranted,
}

/// What a suspended process is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suspension {
    Timer(EventHandle),
    ResourceWait,
}

/// Lifecycle state of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Executing, or scheduled to resume without a cancellable timer.
    Runnable,
    Suspended(Suspension),
    Terminated,
}

impl ProcessState {
    /// Whether an interrupt delivered now would be accepted.
    pub fn is_interruptible(&self) -> bool {
        matches!(self, ProcessState::Suspended(Suspension::Timer(_)))
    }
}

/// A reporting event. Recorded in the kernel history, never fed back into
/// the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The sun rose.
    DayStarted { day: u64, food_level: u64 },
    /// The sun set; `alive` counts blobs before the night's evaluation.
    NightFell { day: u64, alive: usize, food_level: u64 },
    /// The forest grew food. `added` is after capacity clipping.
    FoodGrown { added: u64, level: u64 },
    /// A blob left to look for food.
    HuntStarted { blob: BlobId },
    /// A blob ate one unit.
    Ate { blob: BlobId, food_level: u64 },
    /// A blob finished searching but the forest was empty.
    ForageFailed { blob: BlobId },
    /// Night caught a blob while hunting or resting.
    HuntInterrupted { blob: BlobId },
    /// A blob ate enough today.
    Survived { blob: BlobId, eaten: u64 },
    /// A blob starved.
    Died { blob: BlobId, eaten: u64, required: u64 },
    /// An interrupt arrived while its target was not on a timer.
    InterruptMissed { target: ProcessId, reason: InterruptReason },
    /// A process returned for the last time.
    ProcessTerminated { process: ProcessId },
}
