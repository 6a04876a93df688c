//! Feature family implementations.

pub mod cross_timeframe;
pub mod proprietary;
pub mod statistical;
pub mod technical;
pub mod temporal;
