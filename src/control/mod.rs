pub mod axis_control;
pub mod exit_condition;
pub mod pid;
pub mod segment;
pub mod slew;

pub use axis_control::*;
pub use exit_condition::*;
pub use pid::*;
pub use segment::*;
pub use slew::*;
