#![forbid(unsafe_code)]

pub mod chart;
pub mod error;
pub mod generator;
pub mod model;
pub mod observable;
pub mod stats;
pub mod time;

pub use error::Error;
pub use time::Clock;
