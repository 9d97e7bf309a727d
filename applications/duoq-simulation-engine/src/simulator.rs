//! Discrete-event simulation of the two-queue system
//!
//! One `SimulationRun` drives a single finite-horizon replication: it draws
//! arrivals, applies the assignment policy, manages service completions and
//! accumulates raw statistics, then reduces them to a `RunMetrics`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::EventClock;
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::policies::Policy;
use crate::queue::ServerQueue;
use crate::random::RandomStreams;
use crate::types::{Event, Packet, QueueId};

/// Metrics from one completed replication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Fraction of offered packets rejected with both queues at capacity
    pub blocking_probability: f64,
    /// Mean of `(len(Q1)+len(Q2))/2` sampled at arrival epochs
    pub mean_queue_length: f64,
    /// Mean time from arrival to departure over departed packets
    pub mean_sojourn_time: f64,
    pub offered: u64,
    pub dropped: u64,
    pub admitted: u64,
    pub departed: u64,
}

/// Raw counters accumulated while a run is in flight
#[derive(Debug, Default)]
struct RunCounters {
    offered: u64,
    dropped: u64,
    admitted: u64,
    departed: u64,
    queue_length_sum: f64,
    queue_length_samples: u64,
    sojourn_sum: f64,
    sojourn_samples: u64,
}

impl RunCounters {
    // Ratios guard against zero samples: a run with nothing to average
    // reports zeros rather than NaN.
    fn into_metrics(self) -> RunMetrics {
        let blocking_probability = if self.offered > 0 {
            self.dropped as f64 / self.offered as f64
        } else {
            0.0
        };
        let mean_queue_length = if self.queue_length_samples > 0 {
            self.queue_length_sum / self.queue_length_samples as f64
        } else {
            0.0
        };
        let mean_sojourn_time = if self.sojourn_samples > 0 {
            self.sojourn_sum / self.sojourn_samples as f64
        } else {
            0.0
        };

        RunMetrics {
            blocking_probability,
            mean_queue_length,
            mean_sojourn_time,
            offered: self.offered,
            dropped: self.dropped,
            admitted: self.admitted,
            departed: self.departed,
        }
    }
}

/// One finite-horizon simulation run
///
/// `run` consumes the value: a run processes events until its termination
/// condition and cannot be restarted. Determinism: two runs constructed
/// with identical parameters and seed produce bit-identical metrics.
#[derive(Debug)]
pub struct SimulationRun {
    policy: Policy,
    packet_budget: u64,
    streams: RandomStreams,
    queue1: ServerQueue,
    queue2: ServerQueue,
    clock: EventClock,
    now: f64,
    next_packet_id: u64,
    counters: RunCounters,
    seed: u64,
}

impl SimulationRun {
    /// Build a run from a validated configuration and a replication seed
    pub fn new(config: &SimulationConfig, seed: u64) -> Result<Self, SimulationError> {
        config.validate()?;
        let streams = RandomStreams::new(config.arrival_rate, config.service_rate, seed)?;

        Ok(SimulationRun {
            policy: config.policy,
            packet_budget: config.packet_budget,
            streams,
            queue1: ServerQueue::new(QueueId::First, config.queue_capacity),
            queue2: ServerQueue::new(QueueId::Second, config.queue_capacity),
            clock: EventClock::new(),
            now: 0.0,
            next_packet_id: 0,
            counters: RunCounters::default(),
            seed,
        })
    }

    /// Process events until the packet budget has been offered and every
    /// admitted packet has departed
    ///
    /// The run stops at that point without draining remaining events, so
    /// each admitted packet has a recorded sojourn time at termination and
    /// no packet is left mid-service.
    pub fn run(mut self) -> Result<RunMetrics, SimulationError> {
        self.schedule_arrival();

        loop {
            let Some(scheduled) = self.clock.pop_earliest() else {
                return Err(SimulationError::EmptySchedule {
                    offered: self.counters.offered,
                    admitted: self.counters.admitted,
                    departed: self.counters.departed,
                });
            };

            debug_assert!(scheduled.time >= self.now);
            self.now = scheduled.time;

            match scheduled.event {
                Event::Arrival { packet } => self.handle_arrival(packet),
                Event::Departure { queue } => self.handle_departure(queue),
            }

            if self.counters.offered >= self.packet_budget
                && self.counters.departed >= self.counters.admitted
            {
                break;
            }
        }

        debug!(
            seed = self.seed,
            offered = self.counters.offered,
            dropped = self.counters.dropped,
            departed = self.counters.departed,
            "run terminated"
        );
        Ok(self.counters.into_metrics())
    }

    /// Draw the next interarrival gap and schedule the arrival
    fn schedule_arrival(&mut self) {
        let time = self.now + self.streams.next_interarrival();
        let packet = Packet::new(self.next_packet_id, time);
        self.next_packet_id += 1;
        self.clock.schedule(time, Event::Arrival { packet });
    }

    fn handle_arrival(&mut self, mut packet: Packet) {
        self.counters.offered += 1;

        // Queue length is sampled at arrival epochs, not time-weighted
        let mean_length = (self.queue1.length() + self.queue2.length()) as f64 / 2.0;
        self.counters.queue_length_sum += mean_length;
        self.counters.queue_length_samples += 1;

        match self
            .policy
            .select(&self.queue1, &self.queue2, self.streams.selection_rng())
        {
            None => self.counters.dropped += 1,
            Some(id) => {
                self.counters.admitted += 1;
                packet.queue = Some(id);
                let accepted = self.queue_mut(id).try_enqueue(packet).is_ok();
                debug_assert!(accepted, "policy selected a full queue");
                self.try_start_service(id);
            }
        }

        if self.counters.offered < self.packet_budget {
            self.schedule_arrival();
        }
    }

    fn handle_departure(&mut self, id: QueueId) {
        let now = self.now;
        if let Some(packet) = self.queue_mut(id).finish_service(now) {
            self.counters.departed += 1;
            self.counters.sojourn_sum += now - packet.arrival_time;
            self.counters.sojourn_samples += 1;
            self.try_start_service(id);
        }
    }

    /// Dispatch the queue's head into service and schedule its departure
    ///
    /// No-op when the server is busy or nothing is waiting.
    fn try_start_service(&mut self, id: QueueId) {
        let now = self.now;
        let queue = self.queue_mut(id);
        let started = queue.start_service(now).is_some();
        let owner = queue.id();
        if started {
            let departure_time = now + self.streams.next_service();
            self.clock
                .schedule(departure_time, Event::Departure { queue: owner });
        }
    }

    fn queue_mut(&mut self, id: QueueId) -> &mut ServerQueue {
        match id {
            QueueId::First => &mut self.queue1,
            QueueId::Second => &mut self.queue2,
        }
    }
}
