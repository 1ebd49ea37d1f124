//! Deferred one-shot tasks keyed by due time

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Identifier of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// A task that has come due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask<T> {
    /// Task identifier
    pub id: TaskId,
    /// When the task was due
    pub due: DateTime<Utc>,
    /// What to do
    pub payload: T,
}

/// Queue of one-shot tasks
///
/// Tasks fire in due order; tasks due at the same instant fire in the order
/// they were scheduled. A popped task is gone for good, and dropping the
/// queue discards anything still pending.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    tasks: BTreeMap<(DateTime<Utc>, TaskId), T>,
    next_id: u64,
}

impl<T> DeferredQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Schedule `payload` to fire `delay` after `now`
    pub fn schedule(&mut self, now: DateTime<Utc>, delay: Duration, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let delta = chrono::Duration::from_std(delay).unwrap_or(chrono::Duration::MAX);
        let due = now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.tasks.insert((due, id), payload);
        id
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.tasks.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return every task due at or before `now`
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Vec<ScheduledTask<T>> {
        let mut fired = Vec::new();
        while let Some(entry) = self.tasks.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let ((due, id), payload) = entry.remove_entry();
            fired.push(ScheduledTask { id, due, payload });
        }
        fired
    }

    /// Iterate pending tasks in due order
    pub fn pending(&self) -> impl Iterator<Item = (TaskId, DateTime<Utc>, &T)> {
        self.tasks.iter().map(|((due, id), payload)| (*id, *due, payload))
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
