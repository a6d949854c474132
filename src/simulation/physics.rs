use crate::control::axis_control::MAX_SPEED;

/// Single-axis plant: velocity lags the motor command with a first-order
/// response. An optional hard stop pins the axis (pushing into a wall or
/// another robot).
pub struct AxisPhysics {
    // Physical parameters
    top_speed: f64, // units/s at full command
    tau: f64,       // s, velocity time constant
    hard_stop: Option<HardStop>,

    // State variables
    position: f64,
    velocity: f64,

    // Input
    command: f64, // -127..=127
}

impl AxisPhysics {
    pub fn new(top_speed: f64, tau: f64, position: f64) -> Self {
        Self {
            top_speed,
            tau,
            hard_stop: None,
            position,
            velocity: 0.0,
            command: 0.0,
        }
    }

    /// Places a wall on the far side of `position` as seen from the axis now.
    /// It blocks travel into it only; the axis can always back away.
    pub fn set_hard_stop(&mut self, position: Option<f64>) {
        self.hard_stop = position.map(|position| HardStop {
            position,
            from_below: self.position <= position,
        });
    }

    pub fn update(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }

        let command = self.command.clamp(-MAX_SPEED, MAX_SPEED);
        let target_velocity = command / MAX_SPEED * self.top_speed;
        let alpha = (dt / self.tau).min(1.0);

        self.velocity += (target_velocity - self.velocity) * alpha;
        let next = self.position + self.velocity * dt;

        match self.hard_stop {
            Some(stop) if stop.blocks(next) => {
                self.position = stop.position;
                self.velocity = 0.0;
            }
            _ => self.position = next,
        }
    }

    /// Re-zeroes the frame without disturbing velocity. The hard stop moves
    /// with the frame.
    pub fn set_position(&mut self, position: f64) {
        if let Some(stop) = self.hard_stop.as_mut() {
            stop.position += position - self.position;
        }
        self.position = position;
    }

    pub fn set_command(&mut self, command: f64) {
        self.command = command;
    }

    pub fn get_position(&self) -> f64 {
        self.position
    }

    pub fn get_velocity(&self) -> f64 {
        self.velocity
    }
}

#[derive(Clone, Copy, Debug)]
struct HardStop {
    position: f64,
    from_below: bool,
}

impl HardStop {
    fn blocks(&self, next: f64) -> bool {
        if self.from_below {
            next >= self.position
        } else {
            next <= self.position
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approaches_commanded_velocity() {
        let mut physics = AxisPhysics::new(60.0, 0.05, 0.0);
        physics.set_command(MAX_SPEED);

        for _ in 0..100 {
            physics.update(0.01);
        }

        assert!((physics.get_velocity() - 60.0).abs() < 0.01);
        assert!(physics.get_position() > 50.0);
    }

    #[test]
    fn hard_stop_pins_axis() {
        let mut physics = AxisPhysics::new(60.0, 0.05, 0.0);
        physics.set_hard_stop(Some(5.0));
        physics.set_command(MAX_SPEED);

        for _ in 0..100 {
            physics.update(0.01);
            assert!(physics.get_position() <= 5.0);
        }

        assert_eq!(physics.get_position(), 5.0);
        assert_eq!(physics.get_velocity(), 0.0);
    }

    #[test]
    fn backs_away_from_hard_stop() {
        let mut physics = AxisPhysics::new(60.0, 0.05, 0.0);
        physics.set_hard_stop(Some(5.0));

        physics.set_command(MAX_SPEED);
        for _ in 0..100 {
            physics.update(0.01);
        }
        assert_eq!(physics.get_position(), 5.0);

        physics.set_command(-MAX_SPEED);
        for _ in 0..100 {
            physics.update(0.01);
        }
        assert!(
            physics.get_position() < -40.0,
            "reversed off the wall, at {}",
            physics.get_position()
        );

        physics.set_command(MAX_SPEED);
        for _ in 0..200 {
            physics.update(0.01);
            assert!(physics.get_position() <= 5.0, "wall still there");
        }
    }

    #[test]
    fn hard_stop_below_blocks_downward_travel() {
        let mut physics = AxisPhysics::new(60.0, 0.05, 0.0);
        physics.set_hard_stop(Some(-3.0));
        physics.set_command(-MAX_SPEED);

        for _ in 0..100 {
            physics.update(0.01);
        }
        assert_eq!(physics.get_position(), -3.0);

        physics.set_command(MAX_SPEED);
        physics.update(0.01);
        physics.update(0.01);
        assert!(physics.get_position() > -3.0);
    }

    #[test]
    fn rezeroing_moves_the_stop() {
        let mut physics = AxisPhysics::new(60.0, 0.05, 10.0);
        physics.set_hard_stop(Some(14.0));
        physics.set_position(0.0);
        physics.set_command(MAX_SPEED);

        for _ in 0..100 {
            physics.update(0.01);
        }
        assert_eq!(physics.get_position(), 4.0);
    }

    #[test]
    fn ignores_non_positive_dt() {
        let mut physics = AxisPhysics::new(60.0, 0.05, 3.0);
        physics.set_command(MAX_SPEED);
        physics.update(0.0);
        physics.update(-1.0);
        assert_eq!(physics.get_position(), 3.0);
    }
}
