use std::{cell::RefCell, rc::Rc, time::Duration};

use auton_pid::{
    Axis, AxisController, AxisPIDController, AxisPhysics, ClimbAngleLock, Clock, ExitState,
    FixedCadence, LoggingConfig, MAX_SPEED, Sensor, SimulatedClock, SimulatedMotor,
    SimulatedSensor, TuningConfig, pid_wait, pid_wait_until,
};
use chrono::Local;
use fern::Dispatch;
use log::{info, warn};

/// Simulated plant stepped in lockstep with a real-time cadence.
struct PacedClock {
    simulation: SimulatedClock,
    cadence: FixedCadence,
}

impl Clock for PacedClock {
    fn wait_tick(&mut self) {
        self.simulation.wait_tick();
        self.cadence.wait_tick();
    }
}

struct SimulatedAxis {
    physics: Rc<RefCell<AxisPhysics>>,
    sensor: Rc<RefCell<SimulatedSensor>>,
    motor: Rc<RefCell<SimulatedMotor>>,
}

impl SimulatedAxis {
    fn new(top_speed: f64) -> Self {
        Self {
            physics: Rc::new(RefCell::new(AxisPhysics::new(top_speed, 0.05, 0.0))),
            sensor: Rc::new(RefCell::new(SimulatedSensor::new(0.0))),
            motor: Rc::new(RefCell::new(SimulatedMotor::new())),
        }
    }

    fn controller(&self, config: &TuningConfig, axis: Axis) -> AxisPIDController<'static> {
        AxisPIDController::new(
            Rc::clone(&self.sensor),
            Rc::clone(&self.motor),
            config.pid(axis),
            config.drive_slew,
        )
    }

    fn clock(&self, tick: Duration) -> PacedClock {
        PacedClock {
            simulation: SimulatedClock::new(
                tick,
                Rc::clone(&self.physics),
                Rc::clone(&self.sensor),
                Rc::clone(&self.motor),
            ),
            cadence: FixedCadence::new(tick),
        }
    }

    fn reset_sensor(&self) {
        self.physics.borrow_mut().set_position(0.0);
        self.sensor.borrow_mut().set_value(0.0);
        info!("drive sensor reset");
    }
}

fn setup_logger(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(logging.level)
        .chain(std::fs::File::create(&logging.file)?)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}

fn drive_segment(
    axis: &mut impl AxisController,
    clock: &mut impl Clock,
    target: f64,
    speed: f64,
    slew: bool,
) -> ExitState {
    axis.set_target(target, speed, slew);
    let state = pid_wait(axis, clock);
    info!(
        "segment to {:.1} ended {:?} at {:.2}",
        target,
        state,
        axis.current_value()
    );
    state
}

fn drive_example(config: &TuningConfig) {
    info!("-- drive example --");
    let rig = SimulatedAxis::new(60.0);
    let mut drive = rig.controller(config, Axis::Drive);
    let mut clock = rig.clock(config.tick);

    let speed = config.speed(Axis::Drive);
    drive_segment(&mut drive, &mut clock, 24.0, speed, true);
    drive_segment(&mut drive, &mut clock, 12.0, speed, false);
    drive_segment(&mut drive, &mut clock, 0.0, speed, false);
}

fn wait_until_change_speed(config: &TuningConfig) {
    info!("-- wait until, then slow down --");
    let rig = SimulatedAxis::new(60.0);
    let mut drive = rig.controller(config, Axis::Drive);
    let mut clock = rig.clock(config.tick);

    drive.set_target(24.0, config.speed(Axis::Drive), true);
    pid_wait_until(&mut drive, &mut clock, 6.0);
    // after 6 inches at full speed, finish the rest at 30
    drive.speed_max_set(30.0);
    let state = pid_wait(&mut drive, &mut clock);
    info!("finished at {:.2} with {:?}", drive.current_value(), state);
}

/// Backs away from whatever is holding the robot, nudging free between tries.
fn tug(
    rig: &SimulatedAxis,
    drive: &mut AxisPIDController<'_>,
    clock: &mut PacedClock,
    attempts: u32,
) {
    for attempt in 0..attempts.saturating_sub(1) {
        info!("tug attempt {}", attempt);
        let target = drive.current_value() - 12.0;
        let state = drive_segment(drive, clock, target, MAX_SPEED, false);

        if !state.interfered() {
            return;
        }

        rig.reset_sensor();
        drive.set_target(-2.0, 20.0, false);
        for _ in 0..100 {
            drive.tick();
            clock.wait_tick();
        }
    }
    warn!("still stuck after {} attempts", attempts);
}

fn interfered_example(config: &TuningConfig) {
    info!("-- interference --");
    let rig = SimulatedAxis::new(60.0);
    rig.physics.borrow_mut().set_hard_stop(Some(14.0));
    let mut drive = rig.controller(config, Axis::Drive);
    let mut clock = rig.clock(config.tick);

    let speed = config.speed(Axis::Drive);
    let state = drive_segment(&mut drive, &mut clock, 24.0, speed, true);
    if state.interfered() {
        tug(&rig, &mut drive, &mut clock, 3);
        return;
    }

    drive_segment(&mut drive, &mut clock, 0.0, speed, false);
}

fn turn_example(config: &TuningConfig) {
    info!("-- turn example --");
    let rig = SimulatedAxis::new(400.0);
    let mut turn = rig.controller(config, Axis::Turn);
    let mut clock = rig.clock(config.tick);

    for heading in [90.0, 45.0, 0.0] {
        drive_segment(&mut turn, &mut clock, heading, config.speed(Axis::Turn), false);
    }
}

fn climb_example(config: &TuningConfig) {
    info!("-- climb angle lock --");
    let mut lock = ClimbAngleLock::new(config.pid(Axis::Climb));
    let mut cadence = FixedCadence::new(config.tick);
    let mut heading = 12.0;

    lock.toggle(true);
    for _ in 0..50 {
        let (left, right) = lock.update(heading, 0.0, 0.0);
        // tank correction turns the robot back toward flat
        heading += (left - right) / MAX_SPEED * 0.5;
        cadence.wait_tick();
    }
    lock.toggle(false);

    info!(
        "heading {:.2} after {} ticks of {:?}, settle {:?}",
        heading,
        cadence.ticks(),
        cadence.period(),
        lock.pid().exit_condition_check()
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TuningConfig::default();
    setup_logger(&config.logging)?;

    info!("auton-pid demo, tick {:?}", config.tick);
    if config.warn_inconsistent() > 0 {
        warn!("continuing with inconsistent exit conditions; segments will time out");
    }

    drive_example(&config);
    wait_until_change_speed(&config);
    interfered_example(&config);
    turn_example(&config);
    climb_example(&config);

    info!("done");
    Ok(())
}
