use std::thread;
use std::time::{Duration, Instant};

use log::warn;

use crate::core::Clock;

/// Real-time fixed-period clock. Deadlines are absolute, so per-tick
/// jitter does not accumulate into drift.
pub struct FixedCadence {
    period: Duration,
    next_deadline: Instant,
    ticks: u64,
}

impl FixedCadence {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: Instant::now() + period,
            ticks: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Clock for FixedCadence {
    fn wait_tick(&mut self) {
        let now = Instant::now();

        if now < self.next_deadline {
            thread::sleep(self.next_deadline - now);
            self.next_deadline += self.period;
        } else {
            let late = now - self.next_deadline;
            if late > self.period {
                warn!("control loop overran by {:?}, re-anchoring cadence", late);
                self.next_deadline = now + self.period;
            } else {
                self.next_deadline += self.period;
            }
        }

        self.ticks += 1;
    }
}
