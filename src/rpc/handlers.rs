//! Route handlers.
//!
//! One function per operation. Every handler writes exactly one JSON
//! object (or, for `ptp_get_liveview_frame.jpg`, raw frame bytes) through
//! the [`JsonWriter`]. Device failures become the `error` field; the only
//! `Err` a handler returns is [`Overflow`].

use log::debug;

use crate::app::ports::CameraPort;
use crate::app::runtime::RuntimeState;
use crate::app::vendor;
use crate::config::BridgeConfig;
use crate::error::PtpResult;
use crate::ptp::codes::ENUMS;
use crate::ptp::{Command, MAX_COMMAND_PARAMS};

use super::request::Request;
use super::writer::{JsonWriter, Overflow};

/// Everything a handler may touch for one request.
pub struct Context<'a> {
    pub rt: &'a mut RuntimeState,
    pub port: &'a mut dyn CameraPort,
    pub config: &'a BridgeConfig,
    pub req: &'a Request<'a>,
}

pub type Handler = fn(&mut Context<'_>, &mut JsonWriter<'_>) -> Result<(), Overflow>;

fn code(result: PtpResult<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}

/// `{"error": N, "resp": <serialized value>}`, or `{"error": N}` on failure.
fn value_resp<T: serde::Serialize>(w: &mut JsonWriter<'_>, result: PtpResult<T>) -> Result<(), Overflow> {
    match result {
        Ok(value) => {
            w.begin_resp(0)?;
            w.json_value(&value)?;
            w.end()
        }
        Err(e) => w.error_only(e.code()),
    }
}

fn array_resp(w: &mut JsonWriter<'_>, result: PtpResult<Vec<u32>>) -> Result<(), Overflow> {
    match result {
        Ok(values) => {
            w.begin_resp(0)?;
            w.uint_array(&values)?;
            w.end()
        }
        Err(e) => w.error_only(e.code()),
    }
}

// ── Status ────────────────────────────────────────────────────

pub fn hello_world(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    write!(
        w,
        "{{\"error\": 0, \"resp\": \"hello {} ({})\"}}",
        ctx.req.param(0),
        ctx.req.params().len()
    )
}

pub fn status(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let status = ctx.rt.status();
    w.begin_object(0)?;
    w.field("initialized", i64::from(status.initialized))?;
    w.field("connected", i64::from(status.connected))?;
    w.end()
}

pub fn get_status(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    w.begin_object(0)?;
    w.field("connected", i64::from(ctx.rt.is_connected()))?;
    w.end()
}

pub fn get_return_code(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    w.begin_object(0)?;
    w.field("code", i64::from(ctx.rt.response_code()))?;
    w.end()
}

pub fn get_enums(_ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    w.begin_resp(0)?;
    w.json_value(ENUMS)?;
    w.end()
}

// ── Lifecycle ─────────────────────────────────────────────────

pub fn init(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    ctx.rt.initialize(ctx.port, ctx.config.scratch_capacity);
    w.error_only(0)
}

pub fn connect(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.rt.connect(ctx.port, ctx.config.scratch_capacity);
    w.error_only(code(result))
}

pub fn disconnect(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.rt.disconnect(ctx.port);
    w.error_only(code(result))
}

pub fn open_session(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.rt.open_session(ctx.port);
    w.error_only(code(result))
}

pub fn close_session(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.rt.close_session(ctx.port);
    w.error_only(code(result))
}

pub fn reset(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.port.device_reset(ctx.rt);
    w.error_only(code(result))
}

// ── Enumeration ───────────────────────────────────────────────

/// Fetch device info and cache it on the runtime for the vendor resolver.
pub fn get_device_info(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    match ctx.port.get_device_info(ctx.rt) {
        Ok(info) => {
            let written = value_resp(w, Ok(&info));
            ctx.rt.set_device_info(info);
            written
        }
        Err(e) => w.error_only(e.code()),
    }
}

pub fn get_device_type(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let family = vendor::device_family(ctx.rt);
    w.int_resp(0, i64::from(family.id()))
}

pub fn get_storage_ids(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.port.get_storage_ids(ctx.rt);
    array_resp(w, result)
}

pub fn get_storage_info(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.port.get_storage_info(ctx.rt, ctx.req.param_u32(0));
    value_resp(w, result)
}

/// `ptp_get_object_handles;storage,parent`, any format.
pub fn get_object_handles(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let (storage, parent) = (ctx.req.param_u32(0), ctx.req.param_u32(1));
    let result = ctx.port.get_object_handles(ctx.rt, storage, 0, parent);
    array_resp(w, result)
}

pub fn get_object_info(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.port.get_object_info(ctx.rt, ctx.req.param_u32(0));
    value_resp(w, result)
}

// ── Live view ─────────────────────────────────────────────────

pub fn liveview_init(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.port.liveview_init(ctx.rt);
    w.error_only(code(result))
}

pub fn liveview_deinit(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = ctx.port.liveview_deinit(ctx.rt);
    w.error_only(code(result))
}

pub fn get_liveview_type(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let kind = ctx.port.liveview_kind(ctx.rt);
    w.int_resp(0, i64::from(kind.id()))
}

/// Frame bytes as a decimal array. A failed fetch still answers with an
/// empty array; a frame that does not fit the output overflows.
pub fn get_liveview_frame(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let mut frame = vec![0u8; ctx.port.liveview_size(ctx.rt)];
    let (err, len) = match ctx.port.liveview_frame(ctx.rt, &mut frame) {
        Ok(len) => (0, len.min(frame.len())),
        Err(e) => (e.code(), 0),
    };
    w.begin_resp(err)?;
    w.byte_array(&frame[..len])?;
    w.end()
}

/// Raw frame bytes straight into the output. Nothing is written on error.
pub fn get_liveview_frame_jpg(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    match ctx.port.liveview_frame(ctx.rt, w.remaining_mut()) {
        Ok(len) => w.advance(len),
        Err(e) => {
            debug!("liveview frame failed: {}", e);
            Ok(())
        }
    }
}

// ── Control ───────────────────────────────────────────────────

/// `ptp_set_property;code,value` or `ptp_set_property;"name",value`.
pub fn set_property(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = match ctx.req.string() {
        Some(name) => vendor::set_named_property(ctx.rt, ctx.port, name, ctx.req.param(0)),
        None => vendor::set_property(ctx.rt, ctx.port, ctx.req.param(0) as u16, ctx.req.param_u32(1)),
    };
    w.error_only(code(result))
}

pub fn take_picture(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    w.error_only(code(vendor::capture(ctx.rt, ctx.port)))
}

pub fn shutter_half_press(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    w.error_only(code(vendor::half_press(ctx.rt, ctx.port)))
}

pub fn bulb_start(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    w.error_only(code(vendor::bulb_start(ctx.rt, ctx.port)))
}

pub fn bulb_stop(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    w.error_only(code(vendor::bulb_stop(ctx.rt, ctx.port)))
}

pub fn mirror_up(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    w.error_only(code(vendor::mirror(ctx.rt, ctx.port, true)))
}

pub fn mirror_down(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    w.error_only(code(vendor::mirror(ctx.rt, ctx.port, false)))
}

pub fn drive_lens(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let steps = ctx.req.param(0);
    w.error_only(code(vendor::drive_lens(ctx.rt, ctx.port, steps)))
}

pub fn eos_set_remote_mode(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let mode = ctx.req.param(0);
    w.error_only(code(vendor::set_remote_mode(ctx.rt, ctx.port, mode)))
}

pub fn eos_set_event_mode(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let mode = ctx.req.param(0);
    w.error_only(code(vendor::set_event_mode(ctx.rt, ctx.port, mode)))
}

pub fn get_events(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let result = vendor::poll_events(ctx.rt, ctx.port);
    value_resp(w, result)
}

/// `ptp_custom_cmd;opcode,p1,...,p5`. Parameters past the fifth are dropped.
pub fn custom_cmd(ctx: &mut Context<'_>, w: &mut JsonWriter<'_>) -> Result<(), Overflow> {
    let params = ctx.req.params();
    let cmd = Command {
        code: ctx.req.param(0) as u16,
        params: params
            .iter()
            .skip(1)
            .take(MAX_COMMAND_PARAMS)
            .map(|&p| p as u32)
            .collect(),
    };
    let result = ctx.port.send_command(ctx.rt, &cmd);
    w.int_resp(code(result), i64::from(ctx.rt.response_code()))
}
