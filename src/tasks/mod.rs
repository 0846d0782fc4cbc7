//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Window Sweep: Removes closed rate-limit windows at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
