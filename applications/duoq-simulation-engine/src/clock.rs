//! Time-ordered event schedule driving the simulation loop

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::Event;

/// An event with its scheduled firing time
#[derive(Debug, Clone)]
pub struct Scheduled {
    pub time: f64,
    pub event: Event,
}

impl Scheduled {
    // Ordering key class: arrivals sort before departures at equal times
    fn class(&self) -> u8 {
        match self.event {
            Event::Arrival { .. } => 0,
            Event::Departure { .. } => 1,
        }
    }
}

// Reverse comparison for min-heap behavior (BinaryHeap is a max-heap).
// The key is (time, class), so coincident events pop arrival-first.
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .partial_cmp(&self.time)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.class().cmp(&self.class()))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Scheduled {}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.class() == other.class()
    }
}

/// Min-ordered collection of pending events
///
/// Every scheduled event is popped exactly once unless the run terminates
/// first; nothing is silently dropped.
#[derive(Debug, Default)]
pub struct EventClock {
    pending: BinaryHeap<Scheduled>,
}

impl EventClock {
    pub fn new() -> Self {
        EventClock {
            pending: BinaryHeap::new(),
        }
    }

    /// Insert an event at its ordering position
    pub fn schedule(&mut self, time: f64, event: Event) {
        self.pending.push(Scheduled { time, event });
    }

    /// Remove and return the earliest pending event
    pub fn pop_earliest(&mut self) -> Option<Scheduled> {
        self.pending.pop()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
