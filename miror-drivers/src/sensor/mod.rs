//! Home sensor implementations

pub mod hall;

pub use hall::HallSensor;
