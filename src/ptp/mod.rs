//! PTP data types exchanged with the camera port.
//!
//! The binary packet encoder/decoder and the device-info/object-info
//! parsers live behind [`CameraPort`](crate::app::ports::CameraPort); this
//! module only holds their structured results. Each type derives
//! `Serialize`, which is the JSON fragment the handlers wrap in the
//! response envelope.

pub mod codes;
pub mod eos;

use serde::Serialize;

/// Maximum parameters in a single PTP command container.
pub const MAX_COMMAND_PARAMS: usize = 5;

/// Parsed `GetDeviceInfo` dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub standard_version: u16,
    pub vendor_ext_id: u32,
    pub version: u16,
    pub extensions: String,
    pub functional_mode: u16,
    pub ops_supported: Vec<u16>,
    pub events_supported: Vec<u16>,
    pub props_supported: Vec<u16>,
    pub capture_formats: Vec<u16>,
    pub playback_formats: Vec<u16>,
    pub manufacturer: String,
    pub model: String,
    pub device_version: String,
    pub serial_number: String,
}

impl DeviceInfo {
    pub fn supports_operation(&self, code: u16) -> bool {
        self.ops_supported.contains(&code)
    }

    pub fn supports_property(&self, code: u16) -> bool {
        self.props_supported.contains(&code)
    }
}

/// Parsed `GetStorageInfo` dataset. Only the fields the bridge reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub storage_type: u16,
    pub fs_type: u16,
    pub max_capacity: u64,
    pub free_space: u64,
}

/// Parsed `GetObjectInfo` dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    pub storage_id: u32,
    pub obj_format: u16,
    pub protection: u16,
    pub compressed_size: u32,
    pub thumb_format: u16,
    pub thumb_compressed_size: u32,
    pub thumb_width: u32,
    pub thumb_height: u32,
    pub img_width: u32,
    pub img_height: u32,
    pub img_bit_depth: u32,
    pub parent_obj: u32,
    pub assoc_type: u16,
    pub assoc_desc: u32,
    pub seq_num: u32,
    pub filename: String,
    pub date_created: String,
    pub date_modified: String,
    pub keywords: String,
}

/// A property change reported by vendor event polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CameraEvent {
    pub code: u16,
    pub value: u32,
}

/// Generic command container for `ptp_custom_cmd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub code: u16,
    pub params: heapless::Vec<u32, MAX_COMMAND_PARAMS>,
}

/// Live-view frame encoding reported by the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LiveviewKind {
    /// No live view available on this device.
    None = 0,
    /// Canon EOS viewfinder data (JPEG).
    EosJpeg = 1,
    /// Generic JPEG frames.
    Jpeg = 2,
}

impl LiveviewKind {
    pub const fn id(self) -> i32 {
        self as i32
    }
}
