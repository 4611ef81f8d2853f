use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One-shot timers measured in fixed ticks.
///
/// Entries fire from [`TimerQueue::advance`], which the owner calls once per
/// tick, so every payload is handled synchronously inside the tick that made
/// it due. Entries due on the same tick come out in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: u64,
    next_seq: u64,
    entries: BinaryHeap<TimerEntry<T>>,
}

#[derive(Debug)]
struct TimerEntry<T> {
    due_tick: u64,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for TimerEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_tick == other.due_tick && self.seq == other.seq
    }
}

impl<T> Eq for TimerEntry<T> {}

impl<T> PartialOrd for TimerEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TimerEntry<T> {
    // Reversed so the max-heap pops the earliest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_tick
            .cmp(&self.due_tick)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            entries: BinaryHeap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedules `payload` to fire `delay_ticks` advances from now. A zero
    /// delay fires on the next advance.
    pub fn schedule(&mut self, delay_ticks: u64, payload: T) {
        let entry = TimerEntry {
            due_tick: self.now.saturating_add(delay_ticks),
            seq: self.next_seq,
            payload,
        };
        self.next_seq = self.next_seq.saturating_add(1);
        self.entries.push(entry);
    }

    pub fn advance(&mut self) -> Vec<T> {
        self.now = self.now.saturating_add(1);
        let mut due = Vec::new();
        while self
            .entries
            .peek()
            .is_some_and(|entry| entry.due_tick <= self.now)
        {
            if let Some(entry) = self.entries.pop() {
                due.push(entry.payload);
            }
        }
        due
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }
}
