//! Application layer: port traits, outbound events, and last-on memory.

pub mod events;
pub mod persistence;
pub mod ports;
