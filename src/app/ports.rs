//! Port traits — the hexagonal boundary between the bridge and the camera.
//!
//! ```text
//!   Request ──▶ Engine ──▶ Handler ──▶ CameraPort ──▶ transport (USB / IP)
//! ```
//!
//! [`CameraPort`] stands for the whole external protocol library: packet
//! encoding, the transport, and the dataset parsers. The bridge never
//! touches a transport directly; adapters implement this trait and tests
//! substitute a recording mock.
//!
//! Every method receives the session's [`RuntimeState`] so implementations
//! can allocate transaction ids and stage packets in the scratch buffer.
//! Implementations must not keep references into the scratch buffer past
//! the call that produced them.

use crate::error::PtpResult;
use crate::ptp::{CameraEvent, Command, DeviceInfo, LiveviewKind, ObjectInfo, StorageInfo};

use super::runtime::RuntimeState;

// ───────────────────────────────────────────────────────────────
// Camera port (driven adapter: bridge → device)
// ───────────────────────────────────────────────────────────────

pub trait CameraPort {
    // ── Transport lifecycle ───────────────────────────────────

    /// Acquire the device on the transport.
    fn device_init(&mut self, rt: &mut RuntimeState) -> PtpResult<()>;

    /// Release the device.
    fn device_close(&mut self, rt: &mut RuntimeState) -> PtpResult<()>;

    /// Reset the device (`ResetDevice` or transport-level reset).
    fn device_reset(&mut self, rt: &mut RuntimeState) -> PtpResult<()>;

    // ── Session ───────────────────────────────────────────────

    /// Send `OpenSession` with `rt.session_id()`.
    fn open_session(&mut self, rt: &mut RuntimeState) -> PtpResult<()>;

    fn close_session(&mut self, rt: &mut RuntimeState) -> PtpResult<()>;

    // ── Enumeration ───────────────────────────────────────────

    fn get_device_info(&mut self, rt: &mut RuntimeState) -> PtpResult<DeviceInfo>;

    fn get_storage_ids(&mut self, rt: &mut RuntimeState) -> PtpResult<Vec<u32>>;

    fn get_storage_info(&mut self, rt: &mut RuntimeState, storage_id: u32) -> PtpResult<StorageInfo>;

    /// `format` of 0 means any format; `parent` of 0 means every object,
    /// `0xFFFF_FFFF` the storage root.
    fn get_object_handles(
        &mut self,
        rt: &mut RuntimeState,
        storage_id: u32,
        format: u32,
        parent: u32,
    ) -> PtpResult<Vec<u32>>;

    fn get_object_info(&mut self, rt: &mut RuntimeState, handle: u32) -> PtpResult<ObjectInfo>;

    // ── Generic control ───────────────────────────────────────

    fn set_prop_value(&mut self, rt: &mut RuntimeState, code: u16, value: u32) -> PtpResult<()>;

    fn init_capture(&mut self, rt: &mut RuntimeState, storage_id: u32, format: u32) -> PtpResult<()>;

    /// Send an arbitrary command with no data phase.
    fn send_command(&mut self, rt: &mut RuntimeState, cmd: &Command) -> PtpResult<()>;

    // ── Live view ─────────────────────────────────────────────

    fn liveview_init(&mut self, rt: &mut RuntimeState) -> PtpResult<()>;

    fn liveview_deinit(&mut self, rt: &mut RuntimeState) -> PtpResult<()>;

    fn liveview_kind(&self, rt: &RuntimeState) -> LiveviewKind;

    /// Upper bound of a frame in bytes, for allocation only.
    fn liveview_size(&self, rt: &RuntimeState) -> usize;

    /// Copy the next frame into `out`. Returns the frame length; `Ok(0)`
    /// means no frame was ready. A frame larger than `out` is an error.
    fn liveview_frame(&mut self, rt: &mut RuntimeState, out: &mut [u8]) -> PtpResult<usize>;

    // ── Canon EOS extension ───────────────────────────────────

    fn eos_set_prop_value(&mut self, rt: &mut RuntimeState, code: u16, value: u32) -> PtpResult<()>;

    fn eos_remote_release_on(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()>;

    fn eos_remote_release_off(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()>;

    /// `steps` between -3 (near) and 3 (far).
    fn eos_drive_lens(&mut self, rt: &mut RuntimeState, steps: i32) -> PtpResult<()>;

    fn eos_set_remote_mode(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()>;

    fn eos_set_event_mode(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()>;

    /// Drain pending property-change events.
    fn eos_get_events(&mut self, rt: &mut RuntimeState) -> PtpResult<Vec<CameraEvent>>;
}
