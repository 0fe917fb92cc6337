// src/dag/task.rs

//! Task records and read-only snapshots of them.

use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};

use crate::types::TaskStatus;

/// A runnable external command with an optional recurrence interval.
///
/// `id`, `command` and `frequency` never change after creation. The run
/// state (`status` and `scheduled_time`) is written only by the worker that
/// currently owns the task's index, so plain atomics are enough: there is
/// never more than one writer, and readers only take snapshots.
#[derive(Debug)]
pub struct Task {
    id: String,
    command: String,
    frequency: u64,
    scheduled_time: AtomicI64,
    status: AtomicU8,
}

impl Task {
    /// Create a new `Pending` task.
    ///
    /// A `frequency` of 0 means the task runs once per scheduler start.
    pub fn new(
        id: impl Into<String>,
        command: impl Into<String>,
        scheduled_time: i64,
        frequency: u64,
    ) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
            frequency,
            scheduled_time: AtomicI64::new(scheduled_time),
            status: AtomicU8::new(TaskStatus::Pending.as_u8()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn is_recurring(&self) -> bool {
        self.frequency > 0
    }

    pub fn scheduled_time(&self) -> i64 {
        self.scheduled_time.load(Ordering::Acquire)
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub(crate) fn set_status(&self, status: TaskStatus) {
        self.status.store(status.as_u8(), Ordering::Release);
    }

    /// Move `scheduled_time` forward by one `frequency` and return the new value.
    pub(crate) fn advance_schedule(&self) -> i64 {
        let step = i64::try_from(self.frequency).unwrap_or(i64::MAX);
        let prev = self
            .scheduled_time
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| {
                Some(t.saturating_add(step))
            })
            .unwrap_or_else(|t| t);
        prev.saturating_add(step)
    }
}

/// Point-in-time copy of a task, used for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub index: usize,
    pub id: String,
    pub scheduled_time: i64,
    pub frequency: u64,
    pub status: TaskStatus,
}

impl TaskSnapshot {
    pub fn of(index: usize, task: &Task) -> Self {
        Self {
            index,
            id: task.id().to_string(),
            scheduled_time: task.scheduled_time(),
            frequency: task.frequency(),
            status: task.status(),
        }
    }
}
