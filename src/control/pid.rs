use std::time::Duration;

use log::{debug, trace};

use crate::control::exit_condition::{ExitConditions, ExitState, ExitTimers};

/// Fixed control-loop period used across the robot.
pub const DELAY_TIME: Duration = Duration::from_millis(10);

#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct PidConstants {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Integral only accumulates while `|error|` is below this.
    pub start_i: f64,
}

impl PidConstants {
    pub fn new(kp: f64, ki: f64, kd: f64, start_i: f64) -> Self {
        Self { kp, ki, kd, start_i }
    }
}

/// When `target_set` clears integral, previous error and exit timers.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum TargetResetPolicy {
    #[default]
    Always,
    /// For loops that re-assert the same target every tick.
    OnChange,
}

/// Discrete PID with integral-zone gating and two-tier settle detection.
///
/// Advanced once per fixed tick by a single owner. The derivative term is
/// per tick, not per second, so gains are only valid for the tick they
/// were tuned at.
#[derive(Clone, Debug)]
pub struct PIDController {
    name: String,
    constants: PidConstants,
    target: f64,
    integral: f64,
    previous_error: Option<f64>,
    exit: ExitConditions,
    timers: ExitTimers,
    tick: Duration,
    reset_policy: TargetResetPolicy,
}

impl PIDController {
    pub fn new(constants: PidConstants, tick: Duration) -> Self {
        Self {
            name: String::from("pid"),
            constants,
            target: 0.0,
            integral: 0.0,
            previous_error: None,
            exit: ExitConditions::default(),
            timers: ExitTimers::default(),
            tick,
            reset_policy: TargetResetPolicy::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_reset_policy(mut self, policy: TargetResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn constants_set(&mut self, kp: f64, ki: f64, kd: f64, start_i: f64) {
        self.constants = PidConstants::new(kp, ki, kd, start_i);
    }

    pub fn target_set(&mut self, target: f64) {
        let changed = target != self.target;
        self.target = target;

        if changed || self.reset_policy == TargetResetPolicy::Always {
            self.reset();
        }
        if changed {
            debug!("[{}] target set to {}", self.name, target);
        }
    }

    pub fn exit_condition_set(
        &mut self,
        small_time: Duration,
        small_error: f64,
        big_time: Duration,
        big_error: f64,
        max_time: Duration,
        velocity_settle_time: Duration,
    ) {
        let tolerance = self.exit.velocity_tolerance;
        self.exit = ExitConditions::new(
            small_time,
            small_error,
            big_time,
            big_error,
            max_time,
            velocity_settle_time,
        )
        .with_velocity_tolerance(tolerance);
    }

    pub fn exit_conditions_set(&mut self, conditions: ExitConditions) {
        self.exit = conditions;
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = None;
        self.timers.reset();
    }

    pub fn compute(&mut self, current: f64) -> f64 {
        let error = self.target - current;
        // no history yet: treat as steady so a fresh target gives no derivative kick
        let previous = self.previous_error.unwrap_or(error);

        if previous != 0.0 && sign(error) != sign(previous) {
            self.integral = 0.0;
        }

        if error.abs() < self.constants.start_i {
            self.integral += error;
        }

        let derivative = error - previous;
        let output = self.constants.kp * error
            + self.constants.ki * self.integral
            + self.constants.kd * derivative;

        self.previous_error = Some(error);
        self.timers.advance(error, derivative, &self.exit, self.tick);

        trace!(
            "[{}] error={:.3} integral={:.3} derivative={:.3} output={:.3}",
            self.name, error, self.integral, derivative, output
        );

        output
    }

    pub fn exit_condition_check(&self) -> ExitState {
        self.timers.check(&self.exit)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn constants(&self) -> PidConstants {
        self.constants
    }

    pub fn exit_conditions(&self) -> ExitConditions {
        self.exit
    }

    pub fn get_integral(&self) -> f64 {
        self.integral
    }

    pub fn previous_error(&self) -> Option<f64> {
        self.previous_error
    }

    pub fn timers(&self) -> ExitTimers {
        self.timers
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
