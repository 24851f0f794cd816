//! Foundation layer - math, timing, and logging utilities

pub mod logging;
pub mod math;
pub mod time;
