//! Vendor capability resolver.
//!
//! Decides, per operation, between the generic PTP code path and a
//! manufacturer extension:
//!
//! 1. generic operation if the cached device info lists it;
//! 2. otherwise the device family's [`VendorExtension`];
//! 3. an extension that lacks the operation answers [`PtpError::Unsupported`].
//!
//! The family is probed from the cached device info once and cached on the
//! runtime. Capability checks only read that cache and never talk to the
//! device.

use log::debug;

use crate::app::ports::CameraPort;
use crate::app::runtime::RuntimeState;
use crate::error::{PtpError, PtpResult, first_error};
use crate::ptp::codes::{OC_EOS_GET_EVENT, OC_EOS_SET_REMOTE_MODE, OC_INITIATE_CAPTURE, PC_EOS_VF_OUTPUT};
use crate::ptp::codes::{PC_EOS_APERTURE, PC_EOS_IMAGE_FORMAT, PC_EOS_ISO_SPEED, PC_EOS_SHUTTER_SPEED};
use crate::ptp::{CameraEvent, DeviceInfo, eos};

// ---------------------------------------------------------------------------
// Device family
// ---------------------------------------------------------------------------

/// Closed set of device families the bridge distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceFamily {
    Generic = 0,
    CanonEos = 1,
    Canon = 2,
    Nikon = 3,
    Sony = 4,
    Fuji = 5,
}

impl DeviceFamily {
    /// Numeric id reported by `ptp_get_device_type`.
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Classify a device from its device info.
    pub fn probe(info: &DeviceInfo) -> Self {
        let manufacturer = info.manufacturer.to_ascii_lowercase();
        if manufacturer.contains("canon") {
            if info.supports_operation(OC_EOS_GET_EVENT) || info.supports_operation(OC_EOS_SET_REMOTE_MODE) {
                Self::CanonEos
            } else {
                Self::Canon
            }
        } else if manufacturer.contains("nikon") {
            Self::Nikon
        } else if manufacturer.contains("sony") {
            Self::Sony
        } else if manufacturer.contains("fuji") {
            Self::Fuji
        } else {
            Self::Generic
        }
    }
}

/// Resolve the device family of `rt`, caching it once device info is known.
pub fn device_family(rt: &mut RuntimeState) -> DeviceFamily {
    if let Some(family) = rt.cached_family() {
        return family;
    }
    let Some(info) = rt.device_info() else {
        return DeviceFamily::Generic;
    };
    let family = DeviceFamily::probe(info);
    debug!("device family probed as {:?}", family);
    rt.cache_family(family);
    family
}

/// Whether the device advertises the generic operation `code`.
pub fn supports_operation(rt: &RuntimeState, code: u16) -> bool {
    rt.device_info().is_some_and(|di| di.supports_operation(code))
}

/// Whether the device advertises the generic property `code`.
pub fn supports_property(rt: &RuntimeState, code: u16) -> bool {
    rt.device_info().is_some_and(|di| di.supports_property(code))
}

// ---------------------------------------------------------------------------
// Named properties
// ---------------------------------------------------------------------------

/// Human-readable property names accepted by `ptp_set_property`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedProperty {
    /// f-number × 10.
    Aperture,
    /// ISO number, 0 = auto.
    Iso,
    /// Exposure time in microseconds, 0 = bulb.
    ShutterSpeed,
    /// 1 raw, 2 jpeg, 3 jpeg fine, 4 raw + jpeg.
    ImageFormat,
}

impl NamedProperty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "aperture" => Some(Self::Aperture),
            "iso" => Some(Self::Iso),
            "shutter speed" => Some(Self::ShutterSpeed),
            "image format" => Some(Self::ImageFormat),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Vendor extensions
// ---------------------------------------------------------------------------

/// Operation surface shared by every device family.
///
/// The defaults describe a family with no extension: every vendor-only
/// operation is unsupported and there are no vendor events.
pub trait VendorExtension: Sync {
    fn set_property(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort, _code: u16, _value: u32) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn set_named_property(
        &self,
        _rt: &mut RuntimeState,
        _port: &mut dyn CameraPort,
        _prop: NamedProperty,
        _value: i32,
    ) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn capture(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn half_press(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn bulb_start(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn bulb_stop(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn mirror(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort, _up: bool) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn drive_lens(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort, _steps: i32) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn set_remote_mode(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort, _mode: i32) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn set_event_mode(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort, _mode: i32) -> PtpResult<()> {
        Err(PtpError::Unsupported)
    }

    fn poll_events(&self, _rt: &mut RuntimeState, _port: &mut dyn CameraPort) -> PtpResult<Vec<CameraEvent>> {
        Ok(Vec::new())
    }
}

/// Families without a vendor extension.
pub struct Generic;

impl VendorExtension for Generic {}

/// Canon EOS remote-control extension.
pub struct Eos;

impl VendorExtension for Eos {
    fn set_property(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort, code: u16, value: u32) -> PtpResult<()> {
        port.eos_set_prop_value(rt, code, value)
    }

    fn set_named_property(
        &self,
        rt: &mut RuntimeState,
        port: &mut dyn CameraPort,
        prop: NamedProperty,
        value: i32,
    ) -> PtpResult<()> {
        let (code, translated) = match prop {
            NamedProperty::Aperture => (PC_EOS_APERTURE, eos::aperture_code(value)),
            NamedProperty::Iso => (PC_EOS_ISO_SPEED, eos::iso_code(value)),
            NamedProperty::ShutterSpeed => (PC_EOS_SHUTTER_SPEED, eos::shutter_code(value)),
            NamedProperty::ImageFormat => (PC_EOS_IMAGE_FORMAT, eos::image_format_code(value)),
        };
        let Some(translated) = translated else {
            debug!("no EOS step for {:?} = {}", prop, value);
            return Err(PtpError::CameraError);
        };
        port.eos_set_prop_value(rt, code, translated)
    }

    fn capture(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<()> {
        // Full release nested inside a half press, the same button order as
        // a physical shutter press. Starting at full release skips metering.
        first_error([
            port.eos_remote_release_on(rt, eos::RELEASE_HALF),
            port.eos_remote_release_on(rt, eos::RELEASE_FULL),
            port.eos_remote_release_off(rt, eos::RELEASE_FULL),
            port.eos_remote_release_off(rt, eos::RELEASE_HALF),
        ])
    }

    fn half_press(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<()> {
        port.eos_remote_release_on(rt, eos::RELEASE_HALF)
    }

    fn bulb_start(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<()> {
        first_error([
            port.eos_remote_release_on(rt, eos::RELEASE_HALF),
            port.eos_remote_release_on(rt, eos::RELEASE_FULL),
        ])
    }

    fn bulb_stop(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<()> {
        first_error([
            port.eos_remote_release_off(rt, eos::RELEASE_FULL),
            port.eos_remote_release_off(rt, eos::RELEASE_HALF),
        ])
    }

    fn mirror(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort, up: bool) -> PtpResult<()> {
        let value = if up {
            eos::VF_OUTPUT_MIRROR_UP
        } else {
            eos::VF_OUTPUT_MIRROR_DOWN
        };
        port.eos_set_prop_value(rt, PC_EOS_VF_OUTPUT, value)
    }

    fn drive_lens(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort, steps: i32) -> PtpResult<()> {
        port.eos_drive_lens(rt, steps)
    }

    fn set_remote_mode(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort, mode: i32) -> PtpResult<()> {
        port.eos_set_remote_mode(rt, mode)
    }

    fn set_event_mode(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort, mode: i32) -> PtpResult<()> {
        port.eos_set_event_mode(rt, mode)
    }

    fn poll_events(&self, rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<Vec<CameraEvent>> {
        port.eos_get_events(rt)
    }
}

/// The extension serving `family`.
pub fn extension(family: DeviceFamily) -> &'static dyn VendorExtension {
    match family {
        DeviceFamily::CanonEos => &Eos,
        DeviceFamily::Generic
        | DeviceFamily::Canon
        | DeviceFamily::Nikon
        | DeviceFamily::Sony
        | DeviceFamily::Fuji => &Generic,
    }
}

fn resolved(rt: &mut RuntimeState) -> &'static dyn VendorExtension {
    extension(device_family(rt))
}

// ---------------------------------------------------------------------------
// Selection policy
// ---------------------------------------------------------------------------

/// Set a property by code: generic if advertised, else the vendor setter.
pub fn set_property(rt: &mut RuntimeState, port: &mut dyn CameraPort, code: u16, value: u32) -> PtpResult<()> {
    if supports_property(rt, code) {
        return port.set_prop_value(rt, code, value);
    }
    resolved(rt).set_property(rt, port, code, value)
}

/// Set a property by human-readable name.
///
/// An unknown name is a [`PtpError::CameraError`] and nothing is written.
pub fn set_named_property(rt: &mut RuntimeState, port: &mut dyn CameraPort, name: &str, value: i32) -> PtpResult<()> {
    let Some(prop) = NamedProperty::from_name(name) else {
        debug!("unknown property name {:?}", name);
        return Err(PtpError::CameraError);
    };
    resolved(rt).set_named_property(rt, port, prop, value)
}

pub fn capture(rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<()> {
    if supports_operation(rt, OC_INITIATE_CAPTURE) {
        return port.init_capture(rt, 0, 0);
    }
    resolved(rt).capture(rt, port)
}

pub fn half_press(rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<()> {
    resolved(rt).half_press(rt, port)
}

pub fn bulb_start(rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<()> {
    resolved(rt).bulb_start(rt, port)
}

pub fn bulb_stop(rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<()> {
    resolved(rt).bulb_stop(rt, port)
}

pub fn mirror(rt: &mut RuntimeState, port: &mut dyn CameraPort, up: bool) -> PtpResult<()> {
    resolved(rt).mirror(rt, port, up)
}

pub fn drive_lens(rt: &mut RuntimeState, port: &mut dyn CameraPort, steps: i32) -> PtpResult<()> {
    resolved(rt).drive_lens(rt, port, steps)
}

pub fn set_remote_mode(rt: &mut RuntimeState, port: &mut dyn CameraPort, mode: i32) -> PtpResult<()> {
    resolved(rt).set_remote_mode(rt, port, mode)
}

pub fn set_event_mode(rt: &mut RuntimeState, port: &mut dyn CameraPort, mode: i32) -> PtpResult<()> {
    resolved(rt).set_event_mode(rt, port, mode)
}

pub fn poll_events(rt: &mut RuntimeState, port: &mut dyn CameraPort) -> PtpResult<Vec<CameraEvent>> {
    resolved(rt).poll_events(rt, port)
}
