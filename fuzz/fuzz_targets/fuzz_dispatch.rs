//! Fuzz target: `Bridge::dispatch`
//!
//! Runs an arbitrary request against a connected simulated camera with a
//! small output buffer. Dispatch must never panic, never report more bytes
//! than the buffer holds, and whatever it reports as JSON must parse.
//!
//! cargo fuzz run fuzz_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use ptpbridge::adapters::sim::{SimCamera, SimModel};
use ptpbridge::{Bridge, BridgeConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let config = BridgeConfig {
        scratch_capacity: 4096,
        ..BridgeConfig::default()
    };
    let mut bridge = Bridge::new(SimCamera::new(SimModel::CanonEos), config);
    let mut out = [0u8; 256];
    for setup in ["ptp_init", "ptp_connect", "ptp_open_session", "ptp_get_device_info"] {
        let _ = bridge.dispatch(setup, Some(&mut out));
    }

    if let Ok(n) = bridge.dispatch(text, Some(&mut out)) {
        assert!(n <= out.len());
        let raw = text.trim_end_matches('\0').trim().starts_with("ptp_get_liveview_frame.jpg");
        if n > 0 && !raw {
            let parsed: Result<serde_json::Value, _> = serde_json::from_slice(&out[..n]);
            assert!(parsed.is_ok(), "invalid JSON for {text:?}");
        }
    }
});
