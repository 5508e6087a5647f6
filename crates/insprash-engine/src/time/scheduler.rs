use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Deadline-ordered task queue.
///
/// The scheduler never sleeps or reads a clock itself: callers pass `now`
/// in, pop what is due, and hand [`Scheduler::next_deadline`] to the event
/// loop as its wake-up time.
///
/// Tasks with equal deadlines run in insertion order.
#[derive(Debug)]
pub struct Scheduler<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    seq: u64,
}

#[derive(Debug)]
struct Entry<T> {
    deadline: Instant,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline.cmp(&other.deadline).then(self.seq.cmp(&other.seq))
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new(), seq: 0 }
    }

    /// Queues `task` to run once `deadline` has passed.
    pub fn schedule_at(&mut self, deadline: Instant, task: T) {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        self.heap.push(Reverse(Entry { deadline, seq, task }));
    }

    /// Queues `task` to run `delay` after `now`. A zero delay means "next turn".
    pub fn schedule_after(&mut self, now: Instant, delay: Duration, task: T) {
        self.schedule_at(now + delay, task);
    }

    /// Removes and returns the earliest task whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        if self.heap.peek()?.0.deadline > now {
            return None;
        }
        self.heap.pop().map(|Reverse(e)| e.task)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(e)| e.deadline)
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, now: Instant) -> Vec<&'static str> {
        std::iter::from_fn(|| s.pop_due(now)).collect()
    }

    #[test]
    fn nothing_due_before_deadline() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule_after(t0, Duration::from_secs(1), "later");

        assert_eq!(s.pop_due(t0), None);
        assert_eq!(s.next_deadline(), Some(t0 + Duration::from_secs(1)));
        assert_eq!(s.pop_due(t0 + Duration::from_secs(1)), Some("later"));
        assert!(s.is_empty());
    }

    #[test]
    fn due_tasks_pop_in_deadline_order() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule_after(t0, Duration::from_millis(30), "c");
        s.schedule_after(t0, Duration::from_millis(10), "a");
        s.schedule_after(t0, Duration::from_millis(20), "b");
        s.schedule_after(t0, Duration::from_millis(99), "not yet");

        assert_eq!(drain(&mut s, t0 + Duration::from_millis(50)), ["a", "b", "c"]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn equal_deadlines_keep_insertion_order() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        for task in ["first", "second", "third"] {
            s.schedule_at(t0, task);
        }
        assert_eq!(drain(&mut s, t0), ["first", "second", "third"]);
    }

    #[test]
    fn clear_drops_everything() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule_at(t0, "x");
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.next_deadline(), None);
        assert_eq!(s.pop_due(t0), None);
    }
}
