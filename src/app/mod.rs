//! Application core — session state and vendor policy, zero I/O.
//!
//! Everything that talks to a camera goes through the [`ports::CameraPort`]
//! trait, keeping this layer testable with an in-memory mock.

pub mod ports;
pub mod runtime;
pub mod vendor;
