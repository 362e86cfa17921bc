//! Utilities shared by the Chalkboard relay server and its CLI client.

pub mod logger;
pub mod time;
