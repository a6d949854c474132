pub mod angle_lock;
pub mod cadence;
pub mod hardware;

pub use angle_lock::*;
pub use cadence::*;
pub use hardware::*;
