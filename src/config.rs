use std::path::PathBuf;
use std::time::Duration;

use log::{LevelFilter, warn};

use crate::control::exit_condition::ExitConditions;
use crate::control::pid::{DELAY_TIME, PIDController, PidConstants};
use crate::control::slew::SlewConstants;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Axis {
    Heading,
    Drive,
    Turn,
    Swing,
    Climb,
}

impl Axis {
    pub const ALL: [Axis; 5] = [Axis::Heading, Axis::Drive, Axis::Turn, Axis::Swing, Axis::Climb];

    pub fn name(&self) -> &'static str {
        match self {
            Axis::Heading => "HeadingPID",
            Axis::Drive => "DrivePID",
            Axis::Turn => "TurnPID",
            Axis::Swing => "SwingPID",
            Axis::Climb => "ClimbPID",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Debug,
            file: PathBuf::from("auton-pid.log"),
        }
    }
}

/// Gains, settle thresholds and speeds for every controlled axis.
#[derive(Clone, Debug)]
pub struct TuningConfig {
    pub tick: Duration,

    pub heading: PidConstants,
    pub drive: PidConstants,
    pub turn: PidConstants,
    pub swing: PidConstants,
    pub climb: PidConstants,

    pub drive_exit: ExitConditions,
    pub turn_exit: ExitConditions,
    pub swing_exit: ExitConditions,
    pub climb_exit: ExitConditions,

    pub drive_slew: SlewConstants,

    // out of 127
    pub drive_speed: f64,
    pub turn_speed: f64,
    pub swing_speed: f64,

    pub logging: LoggingConfig,
}

impl Default for TuningConfig {
    fn default() -> Self {
        let turn = PidConstants::new(6.0, 0.0, 60.0, 0.0);

        Self {
            tick: DELAY_TIME,

            heading: PidConstants::new(15.0, 0.0, 40.0, 0.0),
            drive: PidConstants::new(14.0, 0.0, 30.0, 0.0),
            turn,
            swing: PidConstants::new(14.5, 0.0, 130.0, 0.0),
            // climb borrows the turn gains
            climb: turn,

            drive_exit: ExitConditions::from_millis(10, 1.0, 30, 3.0, 2000, 100),
            turn_exit: ExitConditions::from_millis(10, 3.0, 30, 7.0, 2000, 100),
            swing_exit: ExitConditions::from_millis(10, 3.0, 30, 7.0, 2000, 100),
            climb_exit: ExitConditions::from_millis(80, 50.0, 300, 150.0, 500, 500),

            drive_slew: SlewConstants::new(7.0, 80.0),

            drive_speed: 110.0,
            turn_speed: 90.0,
            swing_speed: 90.0,

            logging: LoggingConfig::default(),
        }
    }
}

impl TuningConfig {
    pub fn constants(&self, axis: Axis) -> PidConstants {
        match axis {
            Axis::Heading => self.heading,
            Axis::Drive => self.drive,
            Axis::Turn => self.turn,
            Axis::Swing => self.swing,
            Axis::Climb => self.climb,
        }
    }

    /// Heading correction shares the drive's settle thresholds.
    pub fn exit_conditions(&self, axis: Axis) -> ExitConditions {
        match axis {
            Axis::Heading | Axis::Drive => self.drive_exit,
            Axis::Turn => self.turn_exit,
            Axis::Swing => self.swing_exit,
            Axis::Climb => self.climb_exit,
        }
    }

    pub fn speed(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Heading | Axis::Drive => self.drive_speed,
            Axis::Turn | Axis::Climb => self.turn_speed,
            Axis::Swing => self.swing_speed,
        }
    }

    pub fn pid(&self, axis: Axis) -> PIDController {
        let mut pid = PIDController::new(self.constants(axis), self.tick).with_name(axis.name());
        pid.exit_conditions_set(self.exit_conditions(axis));
        pid
    }

    /// Logs every axis whose thresholds are inverted. Returns how many were flagged.
    pub fn warn_inconsistent(&self) -> usize {
        Axis::ALL
            .iter()
            .filter_map(|axis| {
                self.exit_conditions(*axis)
                    .check_sanity()
                    .err()
                    .map(|err| (axis, err))
            })
            .inspect(|(axis, err)| warn!("{} exit conditions: {}", axis.name(), err))
            .count()
    }
}
