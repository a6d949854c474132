use log::info;

use crate::control::pid::{PIDController, TargetResetPolicy};

/// Holds the robot square to the climb bar while the driver keeps tank control.
///
/// Owns its controller outright; nothing else ticks it. The target is
/// re-asserted every loop, so it only resets when it actually flips.
pub struct ClimbAngleLock {
    pid: PIDController,
    engaged: bool,
    button_was_pressed: bool,
}

impl ClimbAngleLock {
    pub fn new(pid: PIDController) -> Self {
        Self {
            pid: pid.with_reset_policy(TargetResetPolicy::OnChange),
            engaged: false,
            button_was_pressed: false,
        }
    }

    /// Feed the raw button state every loop; flips the lock on a new press only.
    pub fn toggle(&mut self, pressed: bool) {
        if pressed && !self.button_was_pressed {
            self.engaged = !self.engaged;
            info!(
                "climb angle lock {}",
                if self.engaged { "engaged" } else { "released" }
            );
        }
        self.button_was_pressed = pressed;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Returns the `(left, right)` tank commands with the correction mixed in.
    pub fn update(&mut self, heading: f64, left: f64, right: f64) -> (f64, f64) {
        let target = if heading > 180.0 { 180.0 } else { 0.0 };
        self.pid.target_set(target);

        let mut output = self.pid.compute(heading);
        if !self.engaged {
            output = 0.0;
        }

        (left + output, right - output)
    }

    pub fn pid(&self) -> &PIDController {
        &self.pid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::pid::{DELAY_TIME, PidConstants};

    fn lock() -> ClimbAngleLock {
        ClimbAngleLock::new(
            PIDController::new(PidConstants::new(2.0, 0.0, 0.0, 0.0), DELAY_TIME)
                .with_name("ClimbPID"),
        )
    }

    #[test]
    fn passes_driver_input_through_when_released() {
        let mut lock = lock();
        assert_eq!(lock.update(30.0, 50.0, 40.0), (50.0, 40.0));
        assert_eq!(lock.pid().target(), 0.0);
    }

    #[test]
    fn corrects_toward_nearest_flat() {
        let mut lock = lock();
        lock.toggle(true);
        assert!(lock.is_engaged());

        // 10 degrees past zero: target 0, error -10, output -20
        assert_eq!(lock.update(10.0, 0.0, 0.0), (-20.0, 20.0));

        // past 180: target switches to 180
        assert_eq!(lock.update(190.0, 0.0, 0.0), (-20.0, 20.0));
        assert_eq!(lock.pid().target(), 180.0);
    }

    #[test]
    fn toggle_only_on_rising_edge() {
        let mut lock = lock();
        lock.toggle(true);
        lock.toggle(true);
        lock.toggle(true);
        assert!(lock.is_engaged(), "held button toggles once");

        lock.toggle(false);
        lock.toggle(true);
        assert!(!lock.is_engaged());
    }

    #[test]
    fn target_flip_clears_settle_state() {
        let mut lock = lock();
        lock.update(10.0, 0.0, 0.0);
        lock.update(10.0, 0.0, 0.0);
        assert_eq!(
            lock.pid().timers().elapsed,
            DELAY_TIME * 2,
            "re-asserting the same target keeps timing"
        );

        lock.update(200.0, 0.0, 0.0);
        assert_eq!(lock.pid().timers().elapsed, DELAY_TIME, "one tick since the flip");
    }
}
