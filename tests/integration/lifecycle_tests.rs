//! Runtime lifecycle through the text protocol: init, connect, sessions.

use ptpbridge::{Bridge, BridgeConfig, ConfigError};

use super::mock_camera::{Call, MockCamera, SCRATCH, bridge, call, ready};

fn status(b: &mut Bridge<MockCamera>) -> (i64, i64) {
    let v = super::mock_camera::json(&call(b, "ptp_status"));
    (v["initialized"].as_i64().unwrap(), v["connected"].as_i64().unwrap())
}

#[test]
fn connect_before_init_is_out_of_memory() {
    let mut b = bridge(MockCamera::generic());
    assert_eq!(call(&mut b, "ptp_connect"), "{\"error\": -4}");
    assert_eq!(status(&mut b), (0, 0));
    assert!(b.port().calls.is_empty());
}

#[test]
fn zero_scratch_capacity_never_connects() {
    let config = BridgeConfig {
        scratch_capacity: 0,
        ..BridgeConfig::default()
    };
    let mut b = Bridge::new(MockCamera::generic(), config);
    assert_eq!(call(&mut b, "ptp_connect"), "{\"error\": -4}");
    assert_eq!(status(&mut b), (0, 0));

    assert_eq!(call(&mut b, "ptp_init"), "{\"error\": 0}");
    assert_eq!(call(&mut b, "ptp_connect"), "{\"error\": -4}");
    assert_eq!(status(&mut b), (1, 0));
    assert!(b.port().calls.is_empty());
}

#[test]
fn validated_bridge_rejects_zero_capacity() {
    let config = BridgeConfig {
        scratch_capacity: 0,
        ..BridgeConfig::default()
    };
    assert!(matches!(
        Bridge::try_new(MockCamera::generic(), config),
        Err(ConfigError::ValidationFailed(_))
    ));
    assert!(Bridge::try_new(MockCamera::generic(), BridgeConfig::default()).is_ok());
}

#[test]
fn device_routes_before_init_are_refused() {
    let mut b = bridge(MockCamera::eos());
    for req in ["ptp_take_picture", "ptp_get_storage_ids", "ptp_open_session"] {
        assert_eq!(call(&mut b, req), "{\"error\": -4}", "{req}");
    }
    assert!(b.port().calls.is_empty());
}

#[test]
fn init_twice_matches_single_init() {
    let mut once = bridge(MockCamera::generic());
    call(&mut once, "ptp_init");

    let mut twice = bridge(MockCamera::generic());
    call(&mut twice, "ptp_init");
    call(&mut twice, "ptp_init");

    assert_eq!(once.runtime(), twice.runtime());
    assert_eq!(twice.runtime().scratch_capacity(), SCRATCH);
    assert_eq!(status(&mut twice), (1, 0));
}

#[test]
fn init_while_connected_closes_session_and_clears_flag() {
    let mut b = ready(MockCamera::generic());
    assert_eq!(status(&mut b), (1, 1));

    assert_eq!(call(&mut b, "ptp_init"), "{\"error\": 0}");
    assert_eq!(b.port().calls, vec![Call::CloseSession]);
    assert_eq!(status(&mut b), (1, 0));
    assert!(b.runtime().device_info().is_none());
}

#[test]
fn connect_resets_ids_and_acquires_device() {
    let mut b = bridge(MockCamera::generic());
    call(&mut b, "ptp_init");
    assert_eq!(call(&mut b, "ptp_connect"), "{\"error\": 0}");
    assert_eq!(b.port().calls, vec![Call::DeviceInit]);
    assert_eq!(b.runtime().session_id(), 0);
    assert_eq!(call(&mut b, "ptp_get_status"), "{\"error\": 0, \"connected\": 1}");
}

#[test]
fn failed_connect_leaves_flag_clear() {
    let mut cam = MockCamera::generic();
    cam.fail_on = Some((Call::DeviceInit, ptpbridge::PtpError::NoPermission));
    let mut b = bridge(cam);
    call(&mut b, "ptp_init");
    assert_eq!(call(&mut b, "ptp_connect"), "{\"error\": -2}");
    assert_eq!(status(&mut b), (1, 0));
}

#[test]
fn failed_disconnect_keeps_flag() {
    let mut cam = MockCamera::generic();
    cam.fail_on = Some((Call::DeviceClose, ptpbridge::PtpError::IoError));
    let mut b = ready(cam);
    assert_eq!(call(&mut b, "ptp_disconnect"), "{\"error\": -5}");
    assert_eq!(status(&mut b), (1, 1));
}

#[test]
fn disconnect_clears_flag() {
    let mut b = ready(MockCamera::generic());
    assert_eq!(call(&mut b, "ptp_disconnect"), "{\"error\": 0}");
    assert_eq!(status(&mut b), (1, 0));
}

#[test]
fn open_session_restarts_transaction_counter() {
    let mut b = ready(MockCamera::generic());
    call(&mut b, "ptp_get_storage_ids");
    call(&mut b, "ptp_get_storage_ids");
    assert_eq!(call(&mut b, "ptp_open_session"), "{\"error\": 0}");
    assert_eq!(b.runtime().session_id(), 1);
    // The mock spends one transaction on OpenSession itself.
    assert_eq!(b.runtime().transaction_id(), 1);
}

#[test]
fn failed_open_session_leaves_no_session() {
    let mut cam = MockCamera::generic();
    cam.fail_on = Some((Call::OpenSession, ptpbridge::PtpError::CheckCode));
    let mut b = bridge(cam);
    call(&mut b, "ptp_init");
    call(&mut b, "ptp_connect");
    assert_eq!(call(&mut b, "ptp_open_session"), "{\"error\": -8}");
    assert!(!b.runtime().has_session());
}

#[test]
fn close_session_clears_session_id() {
    let mut b = ready(MockCamera::generic());
    assert_eq!(call(&mut b, "ptp_close_session"), "{\"error\": 0}");
    assert!(!b.runtime().has_session());
}
