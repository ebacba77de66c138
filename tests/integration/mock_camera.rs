//! Mock camera adapter for integration tests.
//!
//! Records every port call so tests can assert on the full protocol
//! history, and lets a test fail one specific call.

use ptpbridge::app::ports::CameraPort;
use ptpbridge::app::runtime::RuntimeState;
use ptpbridge::ptp::codes::*;
use ptpbridge::ptp::{CameraEvent, Command, DeviceInfo, LiveviewKind, ObjectInfo, StorageInfo};
use ptpbridge::{Bridge, BridgeConfig, PtpError, PtpResult};

pub const SCRATCH: usize = 4096;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DeviceInit,
    DeviceClose,
    DeviceReset,
    OpenSession,
    CloseSession,
    GetDeviceInfo,
    GetStorageIds,
    GetStorageInfo(u32),
    GetObjectHandles { storage: u32, format: u32, parent: u32 },
    GetObjectInfo(u32),
    SetPropValue(u16, u32),
    InitCapture,
    SendCommand(u16, Vec<u32>),
    LiveviewInit,
    LiveviewDeinit,
    LiveviewFrame,
    EosSetPropValue(u16, u32),
    EosReleaseOn(i32),
    EosReleaseOff(i32),
    EosDriveLens(i32),
    EosSetRemoteMode(i32),
    EosSetEventMode(i32),
    EosGetEvents,
}

// ── MockCamera ────────────────────────────────────────────────

pub struct MockCamera {
    pub calls: Vec<Call>,
    pub info: DeviceInfo,
    pub storage_ids: Vec<u32>,
    pub handles: Vec<u32>,
    pub frame: Vec<u8>,
    pub frame_buffer_size: usize,
    pub liveview: LiveviewKind,
    pub events: Vec<CameraEvent>,
    /// Response code staged for successful calls.
    pub response_code: u16,
    /// Fail this one call (every time it is made) with the given error.
    pub fail_on: Option<(Call, PtpError)>,
}

#[allow(dead_code)]
impl MockCamera {
    fn with_info(info: DeviceInfo) -> Self {
        Self {
            calls: Vec::new(),
            info,
            storage_ids: vec![0x0001_0001],
            handles: vec![1, 2, 3],
            frame: vec![0xFF, 0xD8, 0x00, 0x10, 0xFF, 0xD9],
            frame_buffer_size: 1024,
            liveview: LiveviewKind::None,
            events: Vec::new(),
            response_code: RC_OK,
            fail_on: None,
        }
    }

    /// Standard PTP camera that supports `InitiateCapture` and F-number.
    pub fn generic() -> Self {
        Self::with_info(DeviceInfo {
            manufacturer: "Acme Optics".into(),
            model: "PTP-1000".into(),
            ops_supported: vec![OC_OPEN_SESSION, OC_CLOSE_SESSION, OC_INITIATE_CAPTURE],
            props_supported: vec![PC_F_NUMBER],
            ..DeviceInfo::default()
        })
    }

    /// Standard PTP camera without capture support.
    pub fn bare() -> Self {
        Self::with_info(DeviceInfo {
            manufacturer: "Acme Optics".into(),
            model: "PTP-10".into(),
            ops_supported: vec![OC_OPEN_SESSION, OC_CLOSE_SESSION],
            ..DeviceInfo::default()
        })
    }

    /// Canon EOS body: vendor extension, no `InitiateCapture`.
    pub fn eos() -> Self {
        let mut cam = Self::with_info(DeviceInfo {
            manufacturer: "Canon Inc.".into(),
            model: "Canon EOS 80D".into(),
            ops_supported: vec![
                OC_OPEN_SESSION,
                OC_CLOSE_SESSION,
                OC_EOS_GET_EVENT,
                OC_EOS_SET_REMOTE_MODE,
                OC_EOS_REMOTE_RELEASE_ON,
                OC_EOS_REMOTE_RELEASE_OFF,
            ],
            props_supported: vec![PC_BATTERY_LEVEL],
            ..DeviceInfo::default()
        });
        cam.liveview = LiveviewKind::EosJpeg;
        cam
    }

    fn record(&mut self, rt: &mut RuntimeState, call: Call) -> PtpResult<()> {
        rt.next_transaction();
        let failure = match &self.fail_on {
            Some((failing, e)) if *failing == call => Some(*e),
            _ => None,
        };
        self.calls.push(call);
        match failure {
            Some(e) => {
                rt.stage_response(RC_GENERAL_ERROR);
                Err(e)
            }
            None => {
                rt.stage_response(self.response_code);
                Ok(())
            }
        }
    }
}

impl CameraPort for MockCamera {
    fn device_init(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.record(rt, Call::DeviceInit)
    }

    fn device_close(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.record(rt, Call::DeviceClose)
    }

    fn device_reset(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.record(rt, Call::DeviceReset)
    }

    fn open_session(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.record(rt, Call::OpenSession)
    }

    fn close_session(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.record(rt, Call::CloseSession)
    }

    fn get_device_info(&mut self, rt: &mut RuntimeState) -> PtpResult<DeviceInfo> {
        self.record(rt, Call::GetDeviceInfo)?;
        Ok(self.info.clone())
    }

    fn get_storage_ids(&mut self, rt: &mut RuntimeState) -> PtpResult<Vec<u32>> {
        self.record(rt, Call::GetStorageIds)?;
        Ok(self.storage_ids.clone())
    }

    fn get_storage_info(&mut self, rt: &mut RuntimeState, storage_id: u32) -> PtpResult<StorageInfo> {
        self.record(rt, Call::GetStorageInfo(storage_id))?;
        Ok(StorageInfo {
            storage_type: 4,
            fs_type: 2,
            max_capacity: 1 << 34,
            free_space: 1 << 33,
        })
    }

    fn get_object_handles(
        &mut self,
        rt: &mut RuntimeState,
        storage: u32,
        format: u32,
        parent: u32,
    ) -> PtpResult<Vec<u32>> {
        self.record(rt, Call::GetObjectHandles { storage, format, parent })?;
        Ok(self.handles.clone())
    }

    fn get_object_info(&mut self, rt: &mut RuntimeState, handle: u32) -> PtpResult<ObjectInfo> {
        self.record(rt, Call::GetObjectInfo(handle))?;
        Ok(ObjectInfo {
            storage_id: 0x0001_0001,
            obj_format: 0x3801,
            filename: format!("IMG_{handle:04}.JPG"),
            ..ObjectInfo::default()
        })
    }

    fn set_prop_value(&mut self, rt: &mut RuntimeState, code: u16, value: u32) -> PtpResult<()> {
        self.record(rt, Call::SetPropValue(code, value))
    }

    fn init_capture(&mut self, rt: &mut RuntimeState, _storage_id: u32, _format: u32) -> PtpResult<()> {
        self.record(rt, Call::InitCapture)
    }

    fn send_command(&mut self, rt: &mut RuntimeState, cmd: &Command) -> PtpResult<()> {
        self.record(rt, Call::SendCommand(cmd.code, cmd.params.to_vec()))
    }

    fn liveview_init(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.record(rt, Call::LiveviewInit)
    }

    fn liveview_deinit(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.record(rt, Call::LiveviewDeinit)
    }

    fn liveview_kind(&self, _rt: &RuntimeState) -> LiveviewKind {
        self.liveview
    }

    fn liveview_size(&self, _rt: &RuntimeState) -> usize {
        self.frame_buffer_size
    }

    fn liveview_frame(&mut self, rt: &mut RuntimeState, out: &mut [u8]) -> PtpResult<usize> {
        self.record(rt, Call::LiveviewFrame)?;
        if out.len() < self.frame.len() {
            return Err(PtpError::OutOfMemory);
        }
        out[..self.frame.len()].copy_from_slice(&self.frame);
        Ok(self.frame.len())
    }

    fn eos_set_prop_value(&mut self, rt: &mut RuntimeState, code: u16, value: u32) -> PtpResult<()> {
        self.record(rt, Call::EosSetPropValue(code, value))
    }

    fn eos_remote_release_on(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()> {
        self.record(rt, Call::EosReleaseOn(mode))
    }

    fn eos_remote_release_off(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()> {
        self.record(rt, Call::EosReleaseOff(mode))
    }

    fn eos_drive_lens(&mut self, rt: &mut RuntimeState, steps: i32) -> PtpResult<()> {
        self.record(rt, Call::EosDriveLens(steps))
    }

    fn eos_set_remote_mode(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()> {
        self.record(rt, Call::EosSetRemoteMode(mode))
    }

    fn eos_set_event_mode(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()> {
        self.record(rt, Call::EosSetEventMode(mode))
    }

    fn eos_get_events(&mut self, rt: &mut RuntimeState) -> PtpResult<Vec<CameraEvent>> {
        self.record(rt, Call::EosGetEvents)?;
        Ok(std::mem::take(&mut self.events))
    }
}

// ── Bridge helpers ────────────────────────────────────────────

#[allow(dead_code)]
pub fn config() -> BridgeConfig {
    BridgeConfig {
        scratch_capacity: SCRATCH,
        ..BridgeConfig::default()
    }
}

/// An uninitialized bridge over `cam`.
#[allow(dead_code)]
pub fn bridge(cam: MockCamera) -> Bridge<MockCamera> {
    Bridge::new(cam, config())
}

/// A bridge that has run init, connect, open session and device info,
/// with the call log cleared.
#[allow(dead_code)]
pub fn ready(cam: MockCamera) -> Bridge<MockCamera> {
    let mut b = bridge(cam);
    for req in ["ptp_init", "ptp_connect", "ptp_open_session", "ptp_get_device_info"] {
        let resp = call(&mut b, req);
        assert!(resp.starts_with("{\"error\": 0"), "{req} failed: {resp}");
    }
    b.port_mut().calls.clear();
    b
}

/// Dispatch `req` with a 64 KiB output buffer and return the response text.
#[allow(dead_code)]
pub fn call(b: &mut Bridge<MockCamera>, req: &str) -> String {
    call_with(b, req, 64 * 1024)
}

#[allow(dead_code)]
pub fn call_with(b: &mut Bridge<MockCamera>, req: &str, capacity: usize) -> String {
    let mut out = vec![0u8; capacity];
    let n = b
        .dispatch(req, Some(&mut out))
        .unwrap_or_else(|e| panic!("{req}: {e}"));
    String::from_utf8(out[..n].to_vec()).expect("response is UTF-8")
}

/// Parse a response as JSON.
#[allow(dead_code)]
pub fn json(resp: &str) -> serde_json::Value {
    serde_json::from_str(resp).unwrap_or_else(|e| panic!("invalid JSON {resp:?}: {e}"))
}
