//! Single finite-capacity queue with one server

use std::collections::VecDeque;

use crate::types::{Packet, QueueId};

/// A FIFO waiting line plus one server
///
/// Capacity counts the packet in service, so a queue of capacity 10 holds at
/// most 9 waiting packets while the server is busy. The service slot doubles
/// as the server-busy flag.
#[derive(Debug, Clone)]
pub struct ServerQueue {
    id: QueueId,
    capacity: usize,
    waiting: VecDeque<Packet>,
    in_service: Option<Packet>,
}

impl ServerQueue {
    pub fn new(id: QueueId, capacity: usize) -> Self {
        ServerQueue {
            id,
            capacity,
            waiting: VecDeque::new(),
            in_service: None,
        }
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Waiting count plus the packet in service, if any
    pub fn length(&self) -> usize {
        self.waiting.len() + usize::from(self.in_service.is_some())
    }

    pub fn is_full(&self) -> bool {
        self.length() >= self.capacity
    }

    pub fn is_busy(&self) -> bool {
        self.in_service.is_some()
    }

    /// Append a packet to the waiting line
    ///
    /// A full queue refuses the packet and hands it back to the caller.
    pub fn try_enqueue(&mut self, packet: Packet) -> Result<(), Packet> {
        if self.is_full() {
            return Err(packet);
        }
        self.waiting.push_back(packet);
        Ok(())
    }

    /// Move the head of the waiting line into service
    ///
    /// Returns the packet now in service with its service start stamped, or
    /// `None` if the server is already busy or nothing is waiting. Drawing
    /// the service duration and scheduling the departure is the caller's job.
    pub fn start_service(&mut self, now: f64) -> Option<&Packet> {
        if self.in_service.is_some() {
            return None;
        }
        let mut packet = self.waiting.pop_front()?;
        packet.service_start = Some(now);
        self.in_service = Some(packet);
        self.in_service.as_ref()
    }

    /// Complete service of the current packet
    ///
    /// Stamps the departure time, frees the server and returns the packet,
    /// or `None` if the server was idle.
    pub fn finish_service(&mut self, now: f64) -> Option<Packet> {
        let mut packet = self.in_service.take()?;
        packet.departure = Some(now);
        Some(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(capacity: usize) -> ServerQueue {
        ServerQueue::new(QueueId::First, capacity)
    }

    #[test]
    fn new_queue_is_empty_and_idle() {
        let q = queue(10);
        assert_eq!(q.length(), 0);
        assert!(!q.is_full());
        assert!(!q.is_busy());
    }

    #[test]
    fn length_counts_the_packet_in_service() {
        let mut q = queue(10);
        q.try_enqueue(Packet::new(0, 0.0)).unwrap();
        q.try_enqueue(Packet::new(1, 0.1)).unwrap();
        assert_eq!(q.length(), 2);

        q.start_service(0.2);
        assert_eq!(q.length(), 2);
        assert!(q.is_busy());
    }

    #[test]
    fn full_queue_hands_the_packet_back() {
        let mut q = queue(2);
        q.try_enqueue(Packet::new(0, 0.0)).unwrap();
        q.try_enqueue(Packet::new(1, 0.0)).unwrap();
        assert!(q.is_full());

        let rejected = q.try_enqueue(Packet::new(2, 0.0)).unwrap_err();
        assert_eq!(rejected.id, 2);
        assert_eq!(q.length(), 2);
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut q = queue(3);
        for id in 0..10 {
            let _ = q.try_enqueue(Packet::new(id, id as f64));
            assert!(q.length() <= q.capacity());
        }
        q.start_service(10.0);
        assert!(q.length() <= q.capacity());
    }

    #[test]
    fn service_is_fifo() {
        let mut q = queue(5);
        q.try_enqueue(Packet::new(0, 0.0)).unwrap();
        q.try_enqueue(Packet::new(1, 0.5)).unwrap();

        let first = q.start_service(1.0).unwrap();
        assert_eq!(first.id, 0);
        assert_eq!(first.service_start, Some(1.0));

        // Server busy, second packet has to wait
        assert!(q.start_service(1.5).is_none());

        let done = q.finish_service(2.0).unwrap();
        assert_eq!(done.id, 0);
        assert_eq!(done.departure, Some(2.0));
        assert!(!q.is_busy());

        let second = q.start_service(2.0).unwrap();
        assert_eq!(second.id, 1);
    }

    #[test]
    fn finish_on_idle_server_returns_none() {
        let mut q = queue(5);
        assert!(q.finish_service(1.0).is_none());
    }
}
