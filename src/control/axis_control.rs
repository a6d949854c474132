use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::control::exit_condition::ExitState;
use crate::control::pid::PIDController;
use crate::control::slew::{Slew, SlewConstants};
use crate::core::{Motor, Sensor};

/// Full-scale motor command.
pub const MAX_SPEED: f64 = 127.0;

pub trait AxisController {
    fn set_target(&mut self, target: f64, speed_max: f64, slew: bool);
    fn speed_max_set(&mut self, speed: f64);
    fn tick(&mut self) -> f64;
    fn current_value(&self) -> f64;
    fn target(&self) -> f64;
    fn exit_state(&self) -> ExitState;
    fn stop(&mut self);
}

/// One PID bound to one sensor and one motor group.
pub struct AxisPIDController<'a> {
    sensor: Rc<RefCell<dyn Sensor + 'a>>,
    motor: Rc<RefCell<dyn Motor + 'a>>,
    pid: PIDController,
    slew: Slew,
    speed_max: f64,
    last_state: ExitState,
}

impl<'a> AxisPIDController<'a> {
    pub fn new(
        sensor: Rc<RefCell<impl Sensor + 'a>>,
        motor: Rc<RefCell<impl Motor + 'a>>,
        pid: PIDController,
        slew: SlewConstants,
    ) -> Self {
        AxisPIDController {
            sensor,
            motor,
            pid,
            slew: Slew::new(slew),
            speed_max: MAX_SPEED,
            last_state: ExitState::StillRunning,
        }
    }

    pub fn pid(&self) -> &PIDController {
        &self.pid
    }

    pub fn speed_max(&self) -> f64 {
        self.speed_max
    }
}

impl AxisController for AxisPIDController<'_> {
    fn set_target(&mut self, target: f64, speed_max: f64, slew: bool) {
        let current = self.current_value();
        self.speed_max = speed_max.abs().min(MAX_SPEED);
        self.slew.initialize(slew, self.speed_max, target, current);
        self.pid.target_set(target);
        // a new segment always starts from clean settle state
        self.pid.reset();
        self.last_state = ExitState::StillRunning;

        debug!(
            "[{}] segment {:.2} -> {:.2} at speed {:.0}{}",
            self.pid.name(),
            current,
            target,
            self.speed_max,
            if self.slew.enabled() { " (slew)" } else { "" }
        );
    }

    fn speed_max_set(&mut self, speed: f64) {
        self.speed_max = speed.abs().min(MAX_SPEED);
    }

    fn tick(&mut self) -> f64 {
        let current = self.current_value();
        let output = self.pid.compute(current);

        let cap = if self.slew.enabled() {
            self.slew.iterate(current).min(self.speed_max)
        } else {
            self.speed_max
        };
        let command = output.clamp(-cap, cap);
        self.motor.borrow_mut().set_output(command);

        let state = self.pid.exit_condition_check();
        if state != self.last_state && !state.is_running() {
            debug!(
                "[{}] {:?} at {:.2} (target {:.2}) after {:?}",
                self.pid.name(),
                state,
                current,
                self.pid.target(),
                self.pid.timers().elapsed
            );
        }
        self.last_state = state;

        command
    }

    fn current_value(&self) -> f64 {
        self.sensor.borrow().get_value()
    }

    fn target(&self) -> f64 {
        self.pid.target()
    }

    fn exit_state(&self) -> ExitState {
        self.pid.exit_condition_check()
    }

    fn stop(&mut self) {
        self.motor.borrow_mut().set_output(0.0);
    }
}
