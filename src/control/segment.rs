use crate::control::axis_control::AxisController;
use crate::control::exit_condition::ExitState;
use crate::core::Clock;

/// Ticks `axis` once per clock tick until it settles or times out.
pub fn pid_wait<A, C>(axis: &mut A, clock: &mut C) -> ExitState
where
    A: AxisController + ?Sized,
    C: Clock + ?Sized,
{
    loop {
        axis.tick();

        let state = axis.exit_state();
        if !state.is_running() {
            return state;
        }

        clock.wait_tick();
    }
}

/// Ticks `axis` until its process value passes `value` in the direction of
/// travel. Returns `StillRunning` when the value was reached first, or the
/// exit state if the segment ended before getting there.
pub fn pid_wait_until<A, C>(axis: &mut A, clock: &mut C, value: f64) -> ExitState
where
    A: AxisController + ?Sized,
    C: Clock + ?Sized,
{
    let forward = axis.target() >= axis.current_value();

    loop {
        axis.tick();

        let current = axis.current_value();
        let passed = if forward {
            current >= value
        } else {
            current <= value
        };
        if passed {
            return ExitState::StillRunning;
        }

        let state = axis.exit_state();
        if !state.is_running() {
            return state;
        }

        clock.wait_tick();
    }
}
