#![forbid(unsafe_code)]

pub mod bank;
pub mod model;
pub mod random;
pub mod reconcile;
pub mod selection;
pub mod session;
pub mod time;

pub use time::Clock;
