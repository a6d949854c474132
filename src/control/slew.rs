#[derive(PartialEq, Clone, Copy, Debug)]
pub struct SlewConstants {
    /// Travel over which the speed cap ramps up.
    pub distance: f64,
    /// Speed cap at the start of the ramp.
    pub min_speed: f64,
}

impl SlewConstants {
    pub fn new(distance: f64, min_speed: f64) -> Self {
        Self {
            distance,
            min_speed,
        }
    }
}

/// Start-of-motion speed ramp for a single segment.
#[derive(Clone, Debug)]
pub struct Slew {
    constants: SlewConstants,
    enabled: bool,
    start: f64,
    max_speed: f64,
}

impl Slew {
    pub fn new(constants: SlewConstants) -> Self {
        Self {
            constants,
            enabled: false,
            start: 0.0,
            max_speed: 0.0,
        }
    }

    /// Arms the ramp for a segment from `current` to `target`. Segments
    /// shorter than the ramp distance run without it.
    pub fn initialize(&mut self, enabled: bool, max_speed: f64, target: f64, current: f64) {
        self.start = current;
        self.max_speed = max_speed.abs();
        self.enabled = enabled && (target - current).abs() > self.constants.distance;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Speed cap for this tick.
    pub fn iterate(&mut self, current: f64) -> f64 {
        if !self.enabled {
            return self.max_speed;
        }

        let traveled = (current - self.start).abs();
        if traveled >= self.constants.distance {
            self.enabled = false;
            return self.max_speed;
        }

        let min_speed = self.constants.min_speed.abs().min(self.max_speed);
        min_speed + (self.max_speed - min_speed) * traveled / self.constants.distance
    }
}
