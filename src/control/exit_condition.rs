use std::fmt;
use std::time::Duration;

/// Default band for the velocity timer, in native units per tick.
pub const DEFAULT_VELOCITY_TOLERANCE: f64 = 0.05;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum ExitState {
    StillRunning,
    SmallExit,
    BigExit,
    VelocityExit,
    MaxTimeExit,
}

impl ExitState {
    /// True when the segment ended without settling inside its error bands.
    pub fn interfered(&self) -> bool {
        matches!(self, ExitState::VelocityExit | ExitState::MaxTimeExit)
    }

    pub fn is_running(&self) -> bool {
        *self == ExitState::StillRunning
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum ExitConditionErr {
    SmallErrorAboveBig,
    SmallTimeAboveMax,
    BigTimeAboveMax,
}

impl fmt::Display for ExitConditionErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitConditionErr::SmallErrorAboveBig => write!(f, "small_error exceeds big_error"),
            ExitConditionErr::SmallTimeAboveMax => write!(f, "small_time exceeds max_time"),
            ExitConditionErr::BigTimeAboveMax => write!(f, "big_time exceeds max_time"),
        }
    }
}

impl std::error::Error for ExitConditionErr {}

/// Settle thresholds. Errors are in the controller's native unit
/// (inches, degrees or raw ticks).
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct ExitConditions {
    pub small_time: Duration,
    pub small_error: f64,
    pub big_time: Duration,
    pub big_error: f64,
    pub max_time: Duration,
    pub velocity_settle_time: Duration,
    pub velocity_tolerance: f64,
}

impl Default for ExitConditions {
    fn default() -> Self {
        ExitConditions::new(
            Duration::from_millis(100),
            1.0,
            Duration::from_millis(300),
            3.0,
            Duration::from_millis(5000),
            Duration::from_millis(500),
        )
    }
}

impl ExitConditions {
    pub fn new(
        small_time: Duration,
        small_error: f64,
        big_time: Duration,
        big_error: f64,
        max_time: Duration,
        velocity_settle_time: Duration,
    ) -> Self {
        Self {
            small_time,
            small_error,
            big_time,
            big_error,
            max_time,
            velocity_settle_time,
            velocity_tolerance: DEFAULT_VELOCITY_TOLERANCE,
        }
    }

    /// Shorthand for configurations written in whole milliseconds.
    pub fn from_millis(
        small_time: u64,
        small_error: f64,
        big_time: u64,
        big_error: f64,
        max_time: u64,
        velocity_settle_time: u64,
    ) -> Self {
        ExitConditions::new(
            Duration::from_millis(small_time),
            small_error,
            Duration::from_millis(big_time),
            big_error,
            Duration::from_millis(max_time),
            Duration::from_millis(velocity_settle_time),
        )
    }

    pub fn with_velocity_tolerance(mut self, tolerance: f64) -> Self {
        self.velocity_tolerance = tolerance;
        self
    }

    /// Startup-time check for inverted thresholds. Never called from the
    /// control loop; a bad configuration still terminates through `max_time`.
    pub fn check_sanity(&self) -> Result<(), ExitConditionErr> {
        if self.small_error > self.big_error {
            return Err(ExitConditionErr::SmallErrorAboveBig);
        }
        if self.small_time > self.max_time {
            return Err(ExitConditionErr::SmallTimeAboveMax);
        }
        if self.big_time > self.max_time {
            return Err(ExitConditionErr::BigTimeAboveMax);
        }
        Ok(())
    }
}

/// How long the error has stayed inside each band, and total segment time.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct ExitTimers {
    pub small: Duration,
    pub big: Duration,
    pub velocity: Duration,
    pub elapsed: Duration,
}

impl ExitTimers {
    pub fn reset(&mut self) {
        *self = ExitTimers::default();
    }

    pub fn is_zero(&self) -> bool {
        *self == ExitTimers::default()
    }

    pub(crate) fn advance(
        &mut self,
        error: f64,
        derivative: f64,
        conditions: &ExitConditions,
        tick: Duration,
    ) {
        let error = error.abs();

        self.small = if error <= conditions.small_error {
            self.small + tick
        } else {
            Duration::ZERO
        };

        self.big = if error <= conditions.big_error {
            self.big + tick
        } else {
            Duration::ZERO
        };

        self.velocity = if derivative.abs() <= conditions.velocity_tolerance {
            self.velocity + tick
        } else {
            Duration::ZERO
        };

        self.elapsed += tick;
    }

    pub fn check(&self, conditions: &ExitConditions) -> ExitState {
        if self.small >= conditions.small_time {
            ExitState::SmallExit
        } else if self.big >= conditions.big_time {
            ExitState::BigExit
        } else if self.elapsed >= conditions.max_time {
            ExitState::MaxTimeExit
        } else if self.velocity >= conditions.velocity_settle_time {
            ExitState::VelocityExit
        } else {
            ExitState::StillRunning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(10);

    fn drive_conditions() -> ExitConditions {
        ExitConditions::from_millis(10, 1.0, 30, 3.0, 100, 100)
    }

    #[test]
    fn big_band_exits_before_small_band() {
        let conditions = drive_conditions();
        let mut timers = ExitTimers::default();

        timers.advance(2.0, 1.0, &conditions, TICK);
        timers.advance(2.0, 1.0, &conditions, TICK);
        assert_eq!(timers.check(&conditions), ExitState::StillRunning);
        assert_eq!(timers.small, Duration::ZERO, "2in never enters the 1in band");

        timers.advance(2.0, 1.0, &conditions, TICK);
        assert_eq!(timers.big, Duration::from_millis(30));
        assert_eq!(timers.check(&conditions), ExitState::BigExit);
    }

    #[test]
    fn leaving_a_band_zeroes_its_timer() {
        let conditions = drive_conditions();
        let mut timers = ExitTimers::default();

        timers.advance(0.5, 1.0, &conditions, TICK);
        timers.advance(0.5, 1.0, &conditions, TICK);
        assert_eq!(timers.small, Duration::from_millis(20));

        timers.advance(2.5, 1.0, &conditions, TICK);
        assert_eq!(timers.small, Duration::ZERO, "small timer resets");
        assert_eq!(timers.big, Duration::from_millis(30), "still inside big band");

        timers.advance(10.0, 1.0, &conditions, TICK);
        assert_eq!(timers.big, Duration::ZERO, "big timer resets");
        assert_eq!(timers.elapsed, Duration::from_millis(40));
    }

    #[test]
    fn max_time_wins_over_velocity() {
        let conditions = drive_conditions();
        let mut timers = ExitTimers::default();

        for _ in 0..10 {
            timers.advance(50.0, 0.0, &conditions, TICK);
        }
        assert_eq!(timers.velocity, Duration::from_millis(100));
        assert_eq!(timers.check(&conditions), ExitState::MaxTimeExit);
    }

    #[test]
    fn stalled_axis_exits_on_velocity() {
        let conditions = ExitConditions::from_millis(10, 1.0, 30, 3.0, 1000, 50);
        let mut timers = ExitTimers::default();

        for _ in 0..4 {
            timers.advance(12.0, 0.0, &conditions, TICK);
            assert_eq!(timers.check(&conditions), ExitState::StillRunning);
        }
        timers.advance(12.0, 0.0, &conditions, TICK);

        let state = timers.check(&conditions);
        assert_eq!(state, ExitState::VelocityExit);
        assert!(state.interfered());
    }

    #[test]
    fn sanity_check_flags_inverted_thresholds() {
        assert_eq!(drive_conditions().check_sanity(), Ok(()));
        assert_eq!(
            ExitConditions::from_millis(10, 5.0, 30, 3.0, 100, 100).check_sanity(),
            Err(ExitConditionErr::SmallErrorAboveBig)
        );
        assert_eq!(
            ExitConditions::from_millis(200, 1.0, 30, 3.0, 100, 100).check_sanity(),
            Err(ExitConditionErr::SmallTimeAboveMax)
        );
        assert_eq!(
            ExitConditions::from_millis(10, 1.0, 300, 3.0, 100, 100).check_sanity(),
            Err(ExitConditionErr::BigTimeAboveMax)
        );
    }

    #[test]
    fn only_timeouts_count_as_interference() {
        assert!(!ExitState::SmallExit.interfered());
        assert!(!ExitState::BigExit.interfered());
        assert!(!ExitState::StillRunning.interfered());
        assert!(ExitState::MaxTimeExit.interfered());
    }
}
