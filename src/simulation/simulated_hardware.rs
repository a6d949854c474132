use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::core::{Clock, Motor, Sensor};
use crate::simulation::physics::AxisPhysics;

pub struct SimulatedSensor {
    value: f64,
}

impl SimulatedSensor {
    pub fn new(initial_value: f64) -> Self {
        Self {
            value: initial_value,
        }
    }
}

impl Sensor for SimulatedSensor {
    fn get_value(&self) -> f64 {
        self.value
    }

    fn set_value(&mut self, value: f64) {
        self.value = value;
    }
}

pub struct SimulatedMotor {
    output: f64,
}

impl Default for SimulatedMotor {
    fn default() -> Self {
        SimulatedMotor::new()
    }
}

impl SimulatedMotor {
    pub fn new() -> Self {
        Self { output: 0.0 }
    }

    pub fn get_output(&self) -> f64 {
        self.output
    }
}

impl Motor for SimulatedMotor {
    fn set_output(&mut self, output: f64) {
        self.output = output;
    }
}

/// Advances simulated time by one tick: motor command into physics,
/// physics position back into the sensor.
pub struct SimulatedClock {
    tick: Duration,
    physics: Rc<RefCell<AxisPhysics>>,
    sensor: Rc<RefCell<SimulatedSensor>>,
    motor: Rc<RefCell<SimulatedMotor>>,
    elapsed: Duration,
}

impl SimulatedClock {
    pub fn new(
        tick: Duration,
        physics: Rc<RefCell<AxisPhysics>>,
        sensor: Rc<RefCell<SimulatedSensor>>,
        motor: Rc<RefCell<SimulatedMotor>>,
    ) -> Self {
        Self {
            tick,
            physics,
            sensor,
            motor,
            elapsed: Duration::ZERO,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Clock for SimulatedClock {
    fn wait_tick(&mut self) {
        let mut physics = self.physics.borrow_mut();
        physics.set_command(self.motor.borrow().get_output());
        physics.update(self.tick.as_secs_f64());
        self.sensor.borrow_mut().set_value(physics.get_position());
        self.elapsed += self.tick;
    }
}
