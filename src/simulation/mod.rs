pub mod physics;
pub mod simulated_hardware;

pub use physics::*;
pub use simulated_hardware::*;
