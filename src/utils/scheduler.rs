//! Deferred task source for the session event loop
//!
//! One-shot and repeating tasks keyed by millisecond deadlines on the
//! session clock. Cancelled tasks never fire, even if their deadline has
//! already passed when they are cancelled.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Handle used to cancel a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Entry<T> {
    action: T,
    due_ms: u64,
    period_ms: Option<u64>,
    /// Matches the live heap slot; older slots are stale
    seq: u64,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<(u64, u64, TaskId)>>,
    tasks: HashMap<TaskId, Entry<T>>,
    next_id: u64,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            tasks: HashMap::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Run `action` once, `delay_ms` after `now_ms`
    pub fn schedule_once(&mut self, now_ms: u64, delay_ms: u64, action: T) -> TaskId {
        self.insert(now_ms.saturating_add(delay_ms), None, action)
    }

    /// Run `action` every `period_ms`, first at `now_ms + period_ms`
    pub fn schedule_repeating(&mut self, now_ms: u64, period_ms: u64, action: T) -> TaskId {
        let period_ms = period_ms.max(1);
        self.insert(now_ms.saturating_add(period_ms), Some(period_ms), action)
    }

    fn insert(&mut self, due_ms: u64, period_ms: Option<u64>, action: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.queue.push(Reverse((due_ms, seq, id)));
        self.tasks.insert(
            id,
            Entry {
                action,
                due_ms,
                period_ms,
                seq,
            },
        );
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Returns false if the task already fired (one-shot) or was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest deadline among live tasks
    pub fn next_deadline(&mut self) -> Option<u64> {
        self.drop_stale();
        self.queue.peek().map(|Reverse((due, _, _))| *due)
    }

    fn drop_stale(&mut self) {
        while let Some(Reverse((_, seq, id))) = self.queue.peek() {
            match self.tasks.get(id) {
                Some(entry) if entry.seq == *seq => break,
                _ => {
                    self.queue.pop();
                }
            }
        }
    }
}

impl<T: Clone> Scheduler<T> {
    /// Pop the next task due at or before `now_ms`. Repeating tasks are
    /// re-armed one period after their previous deadline.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TaskId, T)> {
        self.drop_stale();
        let Reverse((due_ms, _, id)) = *self.queue.peek()?;
        if due_ms > now_ms {
            return None;
        }
        self.queue.pop();

        let period = self.tasks.get(&id)?.period_ms;
        match period {
            Some(period_ms) => {
                let seq = self.bump_seq();
                let entry = self.tasks.get_mut(&id)?;
                entry.due_ms = entry.due_ms.saturating_add(period_ms);
                entry.seq = seq;
                self.queue.push(Reverse((entry.due_ms, seq, id)));
                Some((id, entry.action.clone()))
            }
            None => self.tasks.remove(&id).map(|entry| (id, entry.action)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_once(0, 500, "resume");

        assert!(scheduler.pop_due(499).is_none());
        assert_eq!(scheduler.pop_due(500), Some((id, "resume")));
        assert!(scheduler.pop_due(10_000).is_none());
        assert!(!scheduler.is_scheduled(id));
    }

    #[test]
    fn test_ordering_by_deadline_then_insertion() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(0, 400, "b");
        scheduler.schedule_once(0, 0, "a");
        scheduler.schedule_once(0, 400, "c");

        let fired: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(1_000))
            .map(|(_, action)| action)
            .collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_repeating_rearms() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_repeating(0, 1_000, "tick");

        assert_eq!(scheduler.next_deadline(), Some(1_000));
        assert!(scheduler.pop_due(1_000).is_some());
        assert_eq!(scheduler.next_deadline(), Some(2_000));
        assert!(scheduler.pop_due(2_500).is_some());
        assert!(scheduler.pop_due(2_500).is_none());
        assert!(scheduler.is_scheduled(id));
    }

    #[test]
    fn test_huge_delays_saturate() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(u64::MAX - 10, u64::MAX, "later");
        let id = scheduler.schedule_repeating(u64::MAX - 1_500, 1_000, "tick");

        assert_eq!(scheduler.next_deadline(), Some(u64::MAX - 500));
        assert_eq!(scheduler.pop_due(u64::MAX - 500), Some((id, "tick")));
        assert_eq!(scheduler.next_deadline(), Some(u64::MAX));
        assert!(scheduler.pop_due(u64::MAX - 1).is_none());
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_repeating(0, 1_000, "tick");

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.pop_due(5_000).is_none());
        assert_eq!(scheduler.next_deadline(), None);
        assert!(scheduler.is_empty());
    }
}
