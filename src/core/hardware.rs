/// A periodic scalar reading: encoder distance, inertial heading or rotation angle.
pub trait Sensor {
    fn get_value(&self) -> f64;
    fn set_value(&mut self, value: f64);
}

pub trait Motor {
    fn set_output(&mut self, output: f64);
}

/// Paces a control loop. One call is one control-loop tick.
pub trait Clock {
    fn wait_tick(&mut self);
}
