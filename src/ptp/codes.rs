//! PTP operation, response, property and event codes used by the bridge,
//! plus the flat enum table served by `ptp_get_enums`.

use serde::Serialize;

// ── Standard operations ───────────────────────────────────────
pub const OC_GET_DEVICE_INFO: u16 = 0x1001;
pub const OC_OPEN_SESSION: u16 = 0x1002;
pub const OC_CLOSE_SESSION: u16 = 0x1003;
pub const OC_GET_STORAGE_IDS: u16 = 0x1004;
pub const OC_GET_STORAGE_INFO: u16 = 0x1005;
pub const OC_GET_NUM_OBJECTS: u16 = 0x1006;
pub const OC_GET_OBJECT_HANDLES: u16 = 0x1007;
pub const OC_GET_OBJECT_INFO: u16 = 0x1008;
pub const OC_GET_OBJECT: u16 = 0x1009;
pub const OC_DELETE_OBJECT: u16 = 0x100B;
pub const OC_INITIATE_CAPTURE: u16 = 0x100E;
pub const OC_RESET_DEVICE: u16 = 0x1010;
pub const OC_GET_DEVICE_PROP_VALUE: u16 = 0x1015;
pub const OC_SET_DEVICE_PROP_VALUE: u16 = 0x1016;

// ── Canon EOS operations ──────────────────────────────────────
pub const OC_EOS_SET_DEVICE_PROP_VALUE_EX: u16 = 0x9110;
pub const OC_EOS_SET_REMOTE_MODE: u16 = 0x9114;
pub const OC_EOS_SET_EVENT_MODE: u16 = 0x9115;
pub const OC_EOS_GET_EVENT: u16 = 0x9116;
pub const OC_EOS_REMOTE_RELEASE_ON: u16 = 0x9128;
pub const OC_EOS_REMOTE_RELEASE_OFF: u16 = 0x9129;
pub const OC_EOS_GET_VIEWFINDER_DATA: u16 = 0x9153;
pub const OC_EOS_DRIVE_LENS: u16 = 0x9155;

// ── Response codes ────────────────────────────────────────────
pub const RC_OK: u16 = 0x2001;
pub const RC_GENERAL_ERROR: u16 = 0x2002;
pub const RC_SESSION_NOT_OPEN: u16 = 0x2003;
pub const RC_OPERATION_NOT_SUPPORTED: u16 = 0x2005;
pub const RC_INVALID_OBJECT_HANDLE: u16 = 0x2009;
pub const RC_DEVICE_PROP_NOT_SUPPORTED: u16 = 0x200A;
pub const RC_INVALID_STORAGE_ID: u16 = 0x2008;
pub const RC_DEVICE_BUSY: u16 = 0x2019;
pub const RC_SESSION_ALREADY_OPEN: u16 = 0x201E;

// ── Standard device properties ────────────────────────────────
pub const PC_BATTERY_LEVEL: u16 = 0x5001;
pub const PC_IMAGE_SIZE: u16 = 0x5003;
pub const PC_F_NUMBER: u16 = 0x5007;
pub const PC_EXPOSURE_TIME: u16 = 0x500D;
pub const PC_EXPOSURE_INDEX: u16 = 0x500F;

// ── Canon EOS device properties ───────────────────────────────
pub const PC_EOS_APERTURE: u16 = 0xD101;
pub const PC_EOS_SHUTTER_SPEED: u16 = 0xD102;
pub const PC_EOS_ISO_SPEED: u16 = 0xD103;
pub const PC_EOS_IMAGE_FORMAT: u16 = 0xD120;
pub const PC_EOS_VF_OUTPUT: u16 = 0xD1B0;
pub const PC_EOS_EVF_MODE: u16 = 0xD1B3;

// ── Events ────────────────────────────────────────────────────
pub const EC_OBJECT_ADDED: u16 = 0x4002;
pub const EC_DEVICE_PROP_CHANGED: u16 = 0x4006;
pub const EC_CAPTURE_COMPLETE: u16 = 0x400D;
pub const EC_EOS_PROP_VALUE_CHANGED: u16 = 0xC189;
pub const EC_EOS_OBJECT_ADDED_EX: u16 = 0xC181;

// ── Enum table ────────────────────────────────────────────────

/// Category of a table entry (`type` in the JSON output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EnumKind {
    Operation = 0,
    Response = 1,
    Property = 2,
    Event = 3,
}

/// Vendor that owns a code (`vendor` in the JSON output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EnumVendor {
    Standard = 0,
    CanonEos = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumEntry {
    #[serde(rename = "type")]
    pub kind: u8,
    pub vendor: u8,
    pub name: &'static str,
    pub value: u16,
}

const fn entry(kind: EnumKind, vendor: EnumVendor, name: &'static str, value: u16) -> EnumEntry {
    EnumEntry {
        kind: kind as u8,
        vendor: vendor as u8,
        name,
        value,
    }
}

use EnumKind::{Event, Operation, Property, Response};
use EnumVendor::{CanonEos, Standard};

pub static ENUMS: &[EnumEntry] = &[
    entry(Operation, Standard, "GetDeviceInfo", OC_GET_DEVICE_INFO),
    entry(Operation, Standard, "OpenSession", OC_OPEN_SESSION),
    entry(Operation, Standard, "CloseSession", OC_CLOSE_SESSION),
    entry(Operation, Standard, "GetStorageIDs", OC_GET_STORAGE_IDS),
    entry(Operation, Standard, "GetStorageInfo", OC_GET_STORAGE_INFO),
    entry(Operation, Standard, "GetNumObjects", OC_GET_NUM_OBJECTS),
    entry(Operation, Standard, "GetObjectHandles", OC_GET_OBJECT_HANDLES),
    entry(Operation, Standard, "GetObjectInfo", OC_GET_OBJECT_INFO),
    entry(Operation, Standard, "GetObject", OC_GET_OBJECT),
    entry(Operation, Standard, "DeleteObject", OC_DELETE_OBJECT),
    entry(Operation, Standard, "InitiateCapture", OC_INITIATE_CAPTURE),
    entry(Operation, Standard, "ResetDevice", OC_RESET_DEVICE),
    entry(Operation, Standard, "GetDevicePropValue", OC_GET_DEVICE_PROP_VALUE),
    entry(Operation, Standard, "SetDevicePropValue", OC_SET_DEVICE_PROP_VALUE),
    entry(Operation, CanonEos, "SetDevicePropValueEx", OC_EOS_SET_DEVICE_PROP_VALUE_EX),
    entry(Operation, CanonEos, "SetRemoteMode", OC_EOS_SET_REMOTE_MODE),
    entry(Operation, CanonEos, "SetEventMode", OC_EOS_SET_EVENT_MODE),
    entry(Operation, CanonEos, "GetEvent", OC_EOS_GET_EVENT),
    entry(Operation, CanonEos, "RemoteReleaseOn", OC_EOS_REMOTE_RELEASE_ON),
    entry(Operation, CanonEos, "RemoteReleaseOff", OC_EOS_REMOTE_RELEASE_OFF),
    entry(Operation, CanonEos, "GetViewFinderData", OC_EOS_GET_VIEWFINDER_DATA),
    entry(Operation, CanonEos, "DriveLens", OC_EOS_DRIVE_LENS),
    entry(Response, Standard, "OK", RC_OK),
    entry(Response, Standard, "GeneralError", RC_GENERAL_ERROR),
    entry(Response, Standard, "SessionNotOpen", RC_SESSION_NOT_OPEN),
    entry(Response, Standard, "OperationNotSupported", RC_OPERATION_NOT_SUPPORTED),
    entry(Response, Standard, "InvalidStorageID", RC_INVALID_STORAGE_ID),
    entry(Response, Standard, "InvalidObjectHandle", RC_INVALID_OBJECT_HANDLE),
    entry(Response, Standard, "DevicePropNotSupported", RC_DEVICE_PROP_NOT_SUPPORTED),
    entry(Response, Standard, "DeviceBusy", RC_DEVICE_BUSY),
    entry(Response, Standard, "SessionAlreadyOpen", RC_SESSION_ALREADY_OPEN),
    entry(Property, Standard, "BatteryLevel", PC_BATTERY_LEVEL),
    entry(Property, Standard, "ImageSize", PC_IMAGE_SIZE),
    entry(Property, Standard, "FNumber", PC_F_NUMBER),
    entry(Property, Standard, "ExposureTime", PC_EXPOSURE_TIME),
    entry(Property, Standard, "ExposureIndex", PC_EXPOSURE_INDEX),
    entry(Property, CanonEos, "Aperture", PC_EOS_APERTURE),
    entry(Property, CanonEos, "ShutterSpeed", PC_EOS_SHUTTER_SPEED),
    entry(Property, CanonEos, "ISOSpeed", PC_EOS_ISO_SPEED),
    entry(Property, CanonEos, "ImageFormat", PC_EOS_IMAGE_FORMAT),
    entry(Property, CanonEos, "VF_Output", PC_EOS_VF_OUTPUT),
    entry(Property, CanonEos, "EVFMode", PC_EOS_EVF_MODE),
    entry(Event, Standard, "ObjectAdded", EC_OBJECT_ADDED),
    entry(Event, Standard, "DevicePropChanged", EC_DEVICE_PROP_CHANGED),
    entry(Event, Standard, "CaptureComplete", EC_CAPTURE_COMPLETE),
    entry(Event, CanonEos, "ObjectAddedEx", EC_EOS_OBJECT_ADDED_EX),
    entry(Event, CanonEos, "PropValueChanged", EC_EOS_PROP_VALUE_CHANGED),
];
