//! Core types for the two-queue simulation

use serde::{Deserialize, Serialize};

/// Identifies one of the two queue/server units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueId {
    First,
    Second,
}

impl QueueId {
    /// The remaining queue when this one was picked first
    pub fn other(self) -> QueueId {
        match self {
            QueueId::First => QueueId::Second,
            QueueId::Second => QueueId::First,
        }
    }
}

/// A packet traveling through the system
///
/// Timestamps are stamped as the packet progresses: a packet has no assigned
/// queue until admitted, no service start until dispatched, and no departure
/// until service completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Packet {
    pub id: u64,
    pub arrival_time: f64,
    pub queue: Option<QueueId>,
    pub service_start: Option<f64>,
    pub departure: Option<f64>,
}

impl Packet {
    pub fn new(id: u64, arrival_time: f64) -> Self {
        Packet {
            id,
            arrival_time,
            queue: None,
            service_start: None,
            departure: None,
        }
    }

    pub fn has_departed(&self) -> bool {
        self.departure.is_some()
    }
}

/// Simulation event
///
/// A departure names only its owning queue; the departing packet sits in
/// that queue's service slot until `finish_service` releases it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Arrival { packet: Packet },
    Departure { queue: QueueId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_packet_has_no_lifecycle_stamps() {
        let packet = Packet::new(3, 1.25);
        assert_eq!(packet.id, 3);
        assert_eq!(packet.arrival_time, 1.25);
        assert_eq!(packet.queue, None);
        assert_eq!(packet.service_start, None);
        assert!(!packet.has_departed());
    }

    #[test]
    fn queue_ids_are_each_others_fallback() {
        assert_eq!(QueueId::First.other(), QueueId::Second);
        assert_eq!(QueueId::Second.other(), QueueId::First);
    }
}
