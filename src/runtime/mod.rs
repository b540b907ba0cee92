//! Cooperative single-threaded timers and the loop that drives the component in real time.

pub mod driver;
pub mod timers;
