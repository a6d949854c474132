pub mod config;
pub mod control;
pub mod core;
pub mod simulation;

// Re-export key items
pub use crate::core::*;
pub use config::*;
pub use control::*;
pub use simulation::*;
