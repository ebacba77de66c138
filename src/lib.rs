//! PTP camera text-command bridge.
//!
//! Turns single-line requests such as `ptp_get_storage_ids` or
//! `ptp_set_property;"iso",400` into calls on a camera session and writes
//! a bounded JSON response. The protocol library itself sits behind
//! [`app::ports::CameraPort`]; [`adapters::sim`] provides an in-process
//! camera for the command-line tool and for tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod ptp;
pub mod rpc;

pub use app::ports::CameraPort;
pub use app::runtime::RuntimeState;
pub use config::{BridgeConfig, ConfigError, ParseMode};
pub use error::{DispatchError, ParseError, PtpError, PtpResult};
pub use rpc::engine::{Bridge, SENTINEL};
