//! Dashboard routes

pub mod metrics;
pub mod sound;
pub mod state;
