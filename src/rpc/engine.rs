//! Request engine — parses a request line and dispatches it to a route.
//!
//! Every request passes through a short pipeline:
//!
//! 1. **Output check** — no output slice means no response at all.
//! 2. **Parse** — the request grammar; a violation is a hard failure.
//! 3. **Route lookup** — exact name match against [`ROUTES`].
//! 4. **Gate** — device routes refuse to run on an uninitialized runtime.
//! 5. **Handler** — writes the response through a bounded [`JsonWriter`].
//!
//! Steps 1–3 are the only failures the caller sees as the `-1` sentinel.
//! Anything that goes wrong inside a handler is reported in the JSON
//! `error` field, except an output overflow, which yields a zero-length
//! response.
//!
//! A [`Bridge`] owns one runtime and one camera port and must be driven by
//! a single caller, one request at a time.

use log::{debug, warn};

use crate::app::ports::CameraPort;
use crate::app::runtime::RuntimeState;
use crate::config::{BridgeConfig, ConfigError};
use crate::error::{DispatchError, PtpError};

use super::handlers::{self, Context, Handler};
use super::request::Request;
use super::writer::JsonWriter;

/// Value [`Bridge::run`] returns when no response was produced.
pub const SENTINEL: i32 = -1;

/// Precondition checked before a route's handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Always runs.
    Open,
    /// Needs an initialized runtime; answers `{"error": -4}` otherwise.
    Initialized,
    /// Needs an initialized runtime; answers nothing otherwise.
    InitializedRaw,
}

/// Static route entry.
pub struct Route {
    pub name: &'static str,
    pub gate: Gate,
    pub handler: Handler,
}

const fn route(name: &'static str, gate: Gate, handler: Handler) -> Route {
    Route { name, gate, handler }
}

use Gate::{Initialized, InitializedRaw, Open};

/// The operation vocabulary. Names are unique.
pub static ROUTES: &[Route] = &[
    route("ptp_hello_world", Open, handlers::hello_world),
    route("ptp_status", Open, handlers::status),
    route("ptp_get_status", Open, handlers::get_status),
    route("ptp_reset", Initialized, handlers::reset),
    route("ptp_init", Open, handlers::init),
    route("ptp_connect", Open, handlers::connect),
    route("ptp_disconnect", Initialized, handlers::disconnect),
    route("ptp_open_session", Initialized, handlers::open_session),
    route("ptp_close_session", Initialized, handlers::close_session),
    route("ptp_bulb_start", Initialized, handlers::bulb_start),
    route("ptp_bulb_stop", Initialized, handlers::bulb_stop),
    route("ptp_mirror_up", Initialized, handlers::mirror_up),
    route("ptp_mirror_down", Initialized, handlers::mirror_down),
    route("ptp_get_device_info", Initialized, handlers::get_device_info),
    route("ptp_drive_lens", Initialized, handlers::drive_lens),
    route("ptp_get_liveview_frame", Initialized, handlers::get_liveview_frame),
    route("ptp_get_liveview_type", Open, handlers::get_liveview_type),
    route("ptp_get_liveview_frame.jpg", InitializedRaw, handlers::get_liveview_frame_jpg),
    route("ptp_liveview_init", Initialized, handlers::liveview_init),
    route("ptp_liveview_deinit", Initialized, handlers::liveview_deinit),
    route("ptp_get_device_type", Open, handlers::get_device_type),
    route("ptp_get_events", Initialized, handlers::get_events),
    route("ptp_set_property", Initialized, handlers::set_property),
    route("ptp_eos_set_remote_mode", Initialized, handlers::eos_set_remote_mode),
    route("ptp_eos_set_event_mode", Initialized, handlers::eos_set_event_mode),
    route("ptp_get_enums", Open, handlers::get_enums),
    route("ptp_shutter_half_press", Initialized, handlers::shutter_half_press),
    route("ptp_take_picture", Initialized, handlers::take_picture),
    route("ptp_get_return_code", Initialized, handlers::get_return_code),
    route("ptp_get_storage_ids", Initialized, handlers::get_storage_ids),
    route("ptp_get_storage_info", Initialized, handlers::get_storage_info),
    route("ptp_get_object_handles", Initialized, handlers::get_object_handles),
    route("ptp_get_object_info", Initialized, handlers::get_object_info),
    route("ptp_custom_cmd", Initialized, handlers::custom_cmd),
];

/// Linear scan by exact name.
pub fn find_route(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.name == name)
}

/// One camera session behind the text protocol.
pub struct Bridge<P: CameraPort> {
    runtime: RuntimeState,
    port: P,
    config: BridgeConfig,
}

impl<P: CameraPort> Bridge<P> {
    /// A bridge with an uninitialized runtime; send `ptp_init` first.
    pub fn new(port: P, config: BridgeConfig) -> Self {
        Self {
            runtime: RuntimeState::new(),
            port,
            config,
        }
    }

    /// Like [`new`](Self::new), but refuses a configuration that fails
    /// [`BridgeConfig::validate`].
    pub fn try_new(port: P, config: BridgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(port, config))
    }

    pub fn runtime(&self) -> &RuntimeState {
        &self.runtime
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Handle one request line, writing the response into `out`.
    ///
    /// Returns the number of bytes written. `Ok(0)` means the response did
    /// not fit (or a raw frame was unavailable) and `out` holds nothing
    /// usable.
    pub fn dispatch(&mut self, request: &str, out: Option<&mut [u8]>) -> Result<usize, DispatchError> {
        let Some(out) = out else {
            warn!("dispatch: no output buffer");
            return Err(DispatchError::NoBuffer);
        };

        let req = Request::parse(request, self.config.parse_mode).map_err(|e| {
            warn!("dispatch: malformed request: {}", e);
            DispatchError::from(e)
        })?;

        let Some(route) = find_route(req.operation()) else {
            warn!("dispatch: unknown operation {:?}", req.operation());
            return Err(DispatchError::UnknownOperation);
        };
        debug!("dispatch: {} params={:?}", route.name, req.params());

        let mut w = JsonWriter::new(out);
        let result = match route.gate {
            Initialized if !self.runtime.is_initialized() => w.error_only(PtpError::OutOfMemory.code()),
            InitializedRaw if !self.runtime.is_initialized() => Ok(()),
            _ => {
                let mut ctx = Context {
                    rt: &mut self.runtime,
                    port: &mut self.port,
                    config: &self.config,
                    req: &req,
                };
                (route.handler)(&mut ctx, &mut w)
            }
        };

        match result {
            Ok(()) => Ok(w.finish()),
            Err(e) => {
                warn!("{}: {} ({} byte output)", route.name, e, w.capacity());
                Ok(0)
            }
        }
    }

    /// [`dispatch`](Self::dispatch) with the numeric convention of the text
    /// protocol: byte count, or [`SENTINEL`].
    pub fn run(&mut self, request: &str, out: Option<&mut [u8]>) -> i32 {
        match self.dispatch(request, out) {
            Ok(n) => i32::try_from(n).unwrap_or(i32::MAX),
            Err(_) => SENTINEL,
        }
    }
}
