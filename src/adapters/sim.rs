//! In-process simulated camera.
//!
//! Implements [`CameraPort`] without a transport so the bridge can be
//! driven end-to-end from the command line or from tests. Each call that
//! would be a PTP transaction allocates a transaction id and stages its
//! response container in the runtime's scratch buffer, just like a real
//! port does, so `ptp_get_return_code` reads back meaningful values.
//!
//! Two models are available: a Canon EOS body (vendor extension, no
//! `InitiateCapture`, JPEG live view) and a generic PTP camera (standard
//! capture and properties, no live view).

use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::app::ports::CameraPort;
use crate::app::runtime::RuntimeState;
use crate::error::{PtpError, PtpResult};
use crate::ptp::codes::*;
use crate::ptp::{CameraEvent, Command, DeviceInfo, LiveviewKind, ObjectInfo, StorageInfo, eos};

/// Object format codes the simulator hands out.
const FORMAT_ASSOCIATION: u16 = 0x3001;
const FORMAT_EXIF_JPEG: u16 = 0x3801;
const FORMAT_EOS_CR2: u16 = 0xB103;

const STORAGE_SD: u32 = 0x0001_0001;
const ALL_STORAGES: u32 = 0xFFFF_FFFF;
const ROOT_PARENT: u32 = 0xFFFF_FFFF;

const FRAME_SIZE: usize = 64;
const FRAME_BUFFER_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimModel {
    CanonEos,
    Generic,
}

pub struct SimCamera {
    model: SimModel,
    device_open: bool,
    session_open: bool,
    liveview_on: bool,
    /// Bitmask of held release buttons (1 = half, 2 = full).
    release: u8,
    lens_position: i32,
    frame_counter: u8,
    remote_mode: i32,
    event_mode: i32,
    props: HashMap<u16, u32>,
    storages: Vec<(u32, StorageInfo)>,
    objects: Vec<(u32, ObjectInfo)>,
    next_handle: u32,
    events: VecDeque<CameraEvent>,
}

impl SimCamera {
    pub fn new(model: SimModel) -> Self {
        let mut props = HashMap::new();
        props.insert(PC_BATTERY_LEVEL, 100);
        match model {
            SimModel::CanonEos => {
                props.insert(PC_EOS_APERTURE, 0x30);
                props.insert(PC_EOS_SHUTTER_SPEED, 0x70);
                props.insert(PC_EOS_ISO_SPEED, 0x48);
                props.insert(PC_EOS_IMAGE_FORMAT, 0x0001_0003);
                props.insert(PC_EOS_VF_OUTPUT, eos::VF_OUTPUT_MIRROR_DOWN);
            }
            SimModel::Generic => {
                props.insert(PC_F_NUMBER, 560);
                props.insert(PC_EXPOSURE_TIME, 80);
                props.insert(PC_EXPOSURE_INDEX, 100);
            }
        }

        let storages = vec![(
            STORAGE_SD,
            StorageInfo {
                storage_type: 4,
                fs_type: 2,
                max_capacity: 32 * 1024 * 1024 * 1024,
                free_space: 16 * 1024 * 1024 * 1024,
            },
        )];

        let mut cam = Self {
            model,
            device_open: false,
            session_open: false,
            liveview_on: false,
            release: 0,
            lens_position: 0,
            frame_counter: 0,
            remote_mode: 0,
            event_mode: 0,
            props,
            storages,
            objects: Vec::new(),
            next_handle: 1,
            events: VecDeque::new(),
        };
        let dcim = cam.add_object(0, FORMAT_ASSOCIATION, "DCIM");
        let folder = cam.add_object(dcim, FORMAT_ASSOCIATION, "100CANON");
        cam.add_object(folder, FORMAT_EXIF_JPEG, "IMG_0001.JPG");
        cam.add_object(folder, FORMAT_EOS_CR2, "IMG_0002.CR2");
        cam
    }

    // ── Inspection (tests, CLI) ───────────────────────────────

    pub fn model(&self) -> SimModel {
        self.model
    }

    pub fn device_open(&self) -> bool {
        self.device_open
    }

    pub fn session_open(&self) -> bool {
        self.session_open
    }

    pub fn liveview_on(&self) -> bool {
        self.liveview_on
    }

    pub fn lens_position(&self) -> i32 {
        self.lens_position
    }

    /// Last `(remote mode, event mode)` set through the EOS extension.
    pub fn eos_modes(&self) -> (i32, i32) {
        (self.remote_mode, self.event_mode)
    }

    pub fn prop(&self, code: u16) -> Option<u32> {
        self.props.get(&code).copied()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The dataset `GetDeviceInfo` returns for this model.
    pub fn device_info(&self) -> DeviceInfo {
        let mut ops = vec![
            OC_GET_DEVICE_INFO,
            OC_OPEN_SESSION,
            OC_CLOSE_SESSION,
            OC_GET_STORAGE_IDS,
            OC_GET_STORAGE_INFO,
            OC_GET_NUM_OBJECTS,
            OC_GET_OBJECT_HANDLES,
            OC_GET_OBJECT_INFO,
            OC_GET_OBJECT,
            OC_DELETE_OBJECT,
            OC_RESET_DEVICE,
            OC_GET_DEVICE_PROP_VALUE,
            OC_SET_DEVICE_PROP_VALUE,
        ];
        match self.model {
            SimModel::CanonEos => {
                ops.extend_from_slice(&[
                    OC_EOS_SET_DEVICE_PROP_VALUE_EX,
                    OC_EOS_SET_REMOTE_MODE,
                    OC_EOS_SET_EVENT_MODE,
                    OC_EOS_GET_EVENT,
                    OC_EOS_REMOTE_RELEASE_ON,
                    OC_EOS_REMOTE_RELEASE_OFF,
                    OC_EOS_GET_VIEWFINDER_DATA,
                    OC_EOS_DRIVE_LENS,
                ]);
                DeviceInfo {
                    standard_version: 100,
                    vendor_ext_id: 11,
                    version: 100,
                    extensions: String::new(),
                    functional_mode: 0,
                    ops_supported: ops,
                    events_supported: vec![EC_OBJECT_ADDED, EC_EOS_PROP_VALUE_CHANGED, EC_EOS_OBJECT_ADDED_EX],
                    props_supported: vec![PC_BATTERY_LEVEL],
                    capture_formats: vec![FORMAT_EXIF_JPEG, FORMAT_EOS_CR2],
                    playback_formats: vec![FORMAT_ASSOCIATION, FORMAT_EXIF_JPEG, FORMAT_EOS_CR2],
                    manufacturer: "Canon Inc.".into(),
                    model: "Canon EOS Rebel T6".into(),
                    device_version: "3-1.1.0".into(),
                    serial_number: "SIM000000001".into(),
                }
            }
            SimModel::Generic => {
                ops.push(OC_INITIATE_CAPTURE);
                DeviceInfo {
                    standard_version: 100,
                    vendor_ext_id: 6,
                    version: 100,
                    extensions: "microsoft.com: 1.0".into(),
                    functional_mode: 0,
                    ops_supported: ops,
                    events_supported: vec![EC_OBJECT_ADDED, EC_DEVICE_PROP_CHANGED, EC_CAPTURE_COMPLETE],
                    props_supported: vec![
                        PC_BATTERY_LEVEL,
                        PC_IMAGE_SIZE,
                        PC_F_NUMBER,
                        PC_EXPOSURE_TIME,
                        PC_EXPOSURE_INDEX,
                    ],
                    capture_formats: vec![FORMAT_EXIF_JPEG],
                    playback_formats: vec![FORMAT_ASSOCIATION, FORMAT_EXIF_JPEG],
                    manufacturer: "Acme Optics".into(),
                    model: "PTP-1000".into(),
                    device_version: "1.0".into(),
                    serial_number: "SIM000000002".into(),
                }
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn supports(&self, op: u16) -> bool {
        self.device_info().supports_operation(op)
    }

    /// Run the command phase of `op` and stage its response code.
    fn transact(&mut self, rt: &mut RuntimeState, op: u16) -> PtpResult<()> {
        if !self.device_open {
            return Err(PtpError::NoDevice);
        }
        let transaction = rt.next_transaction();
        let code = if !self.supports(op) {
            RC_OPERATION_NOT_SUPPORTED
        } else if op == OC_OPEN_SESSION && self.session_open {
            RC_SESSION_ALREADY_OPEN
        } else if !self.session_open && op != OC_OPEN_SESSION && op != OC_GET_DEVICE_INFO {
            RC_SESSION_NOT_OPEN
        } else {
            RC_OK
        };
        debug!("sim: op 0x{:04X} tx {} -> 0x{:04X}", op, transaction, code);
        Self::respond(rt, code)
    }

    fn respond(rt: &mut RuntimeState, code: u16) -> PtpResult<()> {
        rt.stage_response(code);
        if code == RC_OK {
            Ok(())
        } else {
            Err(PtpError::CheckCode)
        }
    }

    fn add_object(&mut self, parent: u32, format: u16, name: &str) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        let (width, height) = if format == FORMAT_ASSOCIATION { (0, 0) } else { (6000, 4000) };
        self.objects.push((
            handle,
            ObjectInfo {
                storage_id: STORAGE_SD,
                obj_format: format,
                compressed_size: if format == FORMAT_ASSOCIATION { 0 } else { 4 * 1024 * 1024 },
                img_width: width,
                img_height: height,
                img_bit_depth: if format == FORMAT_ASSOCIATION { 0 } else { 24 },
                parent_obj: parent,
                assoc_type: if format == FORMAT_ASSOCIATION { 1 } else { 0 },
                seq_num: handle,
                filename: name.into(),
                date_created: "20240101T120000".into(),
                date_modified: "20240101T120000".into(),
                ..ObjectInfo::default()
            },
        ));
        handle
    }

    fn new_capture(&mut self) {
        let folder = self
            .objects
            .iter()
            .find(|(_, o)| o.filename == "100CANON")
            .map_or(0, |(h, _)| *h);
        let name = format!("IMG_{:04}.JPG", self.next_handle);
        let handle = self.add_object(folder, FORMAT_EXIF_JPEG, &name);
        let code = if self.model == SimModel::CanonEos {
            EC_EOS_OBJECT_ADDED_EX
        } else {
            EC_OBJECT_ADDED
        };
        self.events.push_back(CameraEvent { code, value: handle });
    }

    fn store_prop(&mut self, code: u16, value: u32) {
        self.props.insert(code, value);
        if self.model == SimModel::CanonEos {
            self.events.push_back(CameraEvent { code, value });
        }
    }
}

impl CameraPort for SimCamera {
    fn device_init(&mut self, _rt: &mut RuntimeState) -> PtpResult<()> {
        self.device_open = true;
        Ok(())
    }

    fn device_close(&mut self, _rt: &mut RuntimeState) -> PtpResult<()> {
        if !self.device_open {
            return Err(PtpError::NoDevice);
        }
        self.device_open = false;
        self.session_open = false;
        self.liveview_on = false;
        Ok(())
    }

    fn device_reset(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.transact(rt, OC_RESET_DEVICE)?;
        self.session_open = false;
        self.liveview_on = false;
        self.release = 0;
        Ok(())
    }

    fn open_session(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.transact(rt, OC_OPEN_SESSION)?;
        self.session_open = true;
        Ok(())
    }

    fn close_session(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        self.transact(rt, OC_CLOSE_SESSION)?;
        self.session_open = false;
        self.liveview_on = false;
        Ok(())
    }

    fn get_device_info(&mut self, rt: &mut RuntimeState) -> PtpResult<DeviceInfo> {
        self.transact(rt, OC_GET_DEVICE_INFO)?;
        Ok(self.device_info())
    }

    fn get_storage_ids(&mut self, rt: &mut RuntimeState) -> PtpResult<Vec<u32>> {
        self.transact(rt, OC_GET_STORAGE_IDS)?;
        Ok(self.storages.iter().map(|(id, _)| *id).collect())
    }

    fn get_storage_info(&mut self, rt: &mut RuntimeState, storage_id: u32) -> PtpResult<StorageInfo> {
        self.transact(rt, OC_GET_STORAGE_INFO)?;
        match self.storages.iter().find(|(id, _)| *id == storage_id) {
            Some((_, info)) => Ok(*info),
            None => Self::respond(rt, RC_INVALID_STORAGE_ID).map(|()| StorageInfo::default()),
        }
    }

    fn get_object_handles(
        &mut self,
        rt: &mut RuntimeState,
        storage_id: u32,
        format: u32,
        parent: u32,
    ) -> PtpResult<Vec<u32>> {
        self.transact(rt, OC_GET_OBJECT_HANDLES)?;
        if storage_id != ALL_STORAGES && !self.storages.iter().any(|(id, _)| *id == storage_id) {
            return Self::respond(rt, RC_INVALID_STORAGE_ID).map(|()| Vec::new());
        }
        Ok(self
            .objects
            .iter()
            .filter(|(_, o)| storage_id == ALL_STORAGES || o.storage_id == storage_id)
            .filter(|(_, o)| format == 0 || u32::from(o.obj_format) == format)
            .filter(|(_, o)| match parent {
                0 => true,
                ROOT_PARENT => o.parent_obj == 0,
                p => o.parent_obj == p,
            })
            .map(|(h, _)| *h)
            .collect())
    }

    fn get_object_info(&mut self, rt: &mut RuntimeState, handle: u32) -> PtpResult<ObjectInfo> {
        self.transact(rt, OC_GET_OBJECT_INFO)?;
        match self.objects.iter().find(|(h, _)| *h == handle) {
            Some((_, info)) => Ok(info.clone()),
            None => Self::respond(rt, RC_INVALID_OBJECT_HANDLE).map(|()| ObjectInfo::default()),
        }
    }

    fn set_prop_value(&mut self, rt: &mut RuntimeState, code: u16, value: u32) -> PtpResult<()> {
        self.transact(rt, OC_SET_DEVICE_PROP_VALUE)?;
        if !self.device_info().supports_property(code) {
            return Self::respond(rt, RC_DEVICE_PROP_NOT_SUPPORTED);
        }
        self.store_prop(code, value);
        Ok(())
    }

    fn init_capture(&mut self, rt: &mut RuntimeState, _storage_id: u32, _format: u32) -> PtpResult<()> {
        self.transact(rt, OC_INITIATE_CAPTURE)?;
        self.new_capture();
        Ok(())
    }

    fn send_command(&mut self, rt: &mut RuntimeState, cmd: &Command) -> PtpResult<()> {
        self.transact(rt, cmd.code)
    }

    fn liveview_init(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        if self.model != SimModel::CanonEos {
            return Err(PtpError::Unsupported);
        }
        self.transact(rt, OC_EOS_SET_DEVICE_PROP_VALUE_EX)?;
        self.props.insert(PC_EOS_EVF_MODE, 1);
        self.liveview_on = true;
        Ok(())
    }

    fn liveview_deinit(&mut self, rt: &mut RuntimeState) -> PtpResult<()> {
        if self.model != SimModel::CanonEos {
            return Err(PtpError::Unsupported);
        }
        self.transact(rt, OC_EOS_SET_DEVICE_PROP_VALUE_EX)?;
        self.props.insert(PC_EOS_EVF_MODE, 0);
        self.liveview_on = false;
        Ok(())
    }

    fn liveview_kind(&self, _rt: &RuntimeState) -> LiveviewKind {
        match self.model {
            SimModel::CanonEos => LiveviewKind::EosJpeg,
            SimModel::Generic => LiveviewKind::None,
        }
    }

    fn liveview_size(&self, _rt: &RuntimeState) -> usize {
        FRAME_BUFFER_SIZE
    }

    fn liveview_frame(&mut self, rt: &mut RuntimeState, out: &mut [u8]) -> PtpResult<usize> {
        if self.model != SimModel::CanonEos {
            return Err(PtpError::Unsupported);
        }
        self.transact(rt, OC_EOS_GET_VIEWFINDER_DATA)?;
        if !self.liveview_on {
            return Ok(0);
        }
        if out.len() < FRAME_SIZE {
            return Err(PtpError::OutOfMemory);
        }

        self.frame_counter = self.frame_counter.wrapping_add(1);
        let frame = &mut out[..FRAME_SIZE];
        frame[0] = 0xFF;
        frame[1] = 0xD8;
        for (i, b) in frame[2..FRAME_SIZE - 2].iter_mut().enumerate() {
            *b = self.frame_counter.wrapping_add(i as u8);
        }
        frame[FRAME_SIZE - 2] = 0xFF;
        frame[FRAME_SIZE - 1] = 0xD9;
        Ok(FRAME_SIZE)
    }

    fn eos_set_prop_value(&mut self, rt: &mut RuntimeState, code: u16, value: u32) -> PtpResult<()> {
        self.transact(rt, OC_EOS_SET_DEVICE_PROP_VALUE_EX)?;
        self.store_prop(code, value);
        Ok(())
    }

    fn eos_remote_release_on(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()> {
        self.transact(rt, OC_EOS_REMOTE_RELEASE_ON)?;
        self.release |= mode as u8;
        Ok(())
    }

    fn eos_remote_release_off(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()> {
        self.transact(rt, OC_EOS_REMOTE_RELEASE_OFF)?;
        let mask = mode as u8;
        let full = eos::RELEASE_FULL as u8;
        if (mask & full) != 0 && (self.release & full) != 0 {
            self.new_capture();
        }
        self.release &= !mask;
        Ok(())
    }

    fn eos_drive_lens(&mut self, rt: &mut RuntimeState, steps: i32) -> PtpResult<()> {
        self.transact(rt, OC_EOS_DRIVE_LENS)?;
        if !(-3..=3).contains(&steps) {
            return Self::respond(rt, RC_GENERAL_ERROR);
        }
        self.lens_position += steps;
        Ok(())
    }

    fn eos_set_remote_mode(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()> {
        self.transact(rt, OC_EOS_SET_REMOTE_MODE)?;
        self.remote_mode = mode;
        Ok(())
    }

    fn eos_set_event_mode(&mut self, rt: &mut RuntimeState, mode: i32) -> PtpResult<()> {
        self.transact(rt, OC_EOS_SET_EVENT_MODE)?;
        self.event_mode = mode;
        Ok(())
    }

    fn eos_get_events(&mut self, rt: &mut RuntimeState) -> PtpResult<Vec<CameraEvent>> {
        self.transact(rt, OC_EOS_GET_EVENT)?;
        Ok(self.events.drain(..).collect())
    }
}
