//! Dispatcher and response-format tests.

use ptpbridge::rpc::engine::ROUTES;
use ptpbridge::{DispatchError, ParseError, ParseMode, SENTINEL};

use super::mock_camera::{Call, MockCamera, bridge, call, call_with, config, json, ready};

const RAW_ROUTE: &str = "ptp_get_liveview_frame.jpg";

// ── Boundary ─────────────────────────────────────────────────

#[test]
fn every_route_answers_json_with_error_field_when_ready() {
    for route in ROUTES.iter().filter(|r| r.name != RAW_ROUTE) {
        let mut b = ready(MockCamera::eos());
        let resp = call(&mut b, route.name);
        let v = json(&resp);
        assert!(v.get("error").is_some_and(|e| e.is_i64()), "{}: {}", route.name, resp);
    }
}

#[test]
fn every_route_answers_json_with_error_field_before_init() {
    for route in ROUTES.iter().filter(|r| r.name != RAW_ROUTE) {
        let mut b = bridge(MockCamera::generic());
        let resp = call(&mut b, route.name);
        let v = json(&resp);
        assert!(v.get("error").is_some(), "{}: {}", route.name, resp);
    }
}

#[test]
fn unknown_operation_is_sentinel_and_writes_nothing() {
    let mut b = ready(MockCamera::eos());
    let mut out = vec![0x5Au8; 256];
    assert_eq!(b.run("ptp_make_coffee;1,2", Some(&mut out)), SENTINEL);
    assert!(out.iter().all(|&x| x == 0x5A));
    assert_eq!(
        b.dispatch("ptp_make_coffee", Some(&mut out)),
        Err(DispatchError::UnknownOperation)
    );
    assert!(b.port().calls.is_empty());
}

#[test]
fn null_output_is_sentinel_and_runs_nothing() {
    let mut b = ready(MockCamera::eos());
    assert_eq!(b.run("ptp_take_picture", None), SENTINEL);
    assert!(b.port().calls.is_empty());
}

#[test]
fn too_many_parameters_is_sentinel() {
    let mut b = ready(MockCamera::eos());
    let params: Vec<String> = (0..33).map(|i| i.to_string()).collect();
    let req = format!("ptp_hello_world;{}", params.join(","));
    let mut out = vec![0u8; 256];
    assert_eq!(
        b.dispatch(&req, Some(&mut out)),
        Err(DispatchError::Malformed(ParseError::TooManyParameters))
    );
}

#[test]
fn strict_mode_rejects_what_lenient_accepts() {
    let mut b = ready(MockCamera::eos());
    assert_eq!(call(&mut b, "ptp_drive_lens;2x"), "{\"error\": 0}");
    assert_eq!(b.port().calls, vec![Call::EosDriveLens(2)]);

    let mut strict = ptpbridge::Bridge::new(
        MockCamera::eos(),
        ptpbridge::BridgeConfig {
            parse_mode: ParseMode::Strict,
            ..config()
        },
    );
    let mut out = vec![0u8; 256];
    assert_eq!(strict.run("ptp_drive_lens;2x", Some(&mut out)), SENTINEL);
    assert!(strict.port().calls.is_empty());
}

#[test]
fn overflow_returns_zero() {
    let mut b = ready(MockCamera::eos());
    let mut out = [0u8; 16];
    assert_eq!(b.dispatch("ptp_get_enums", Some(&mut out)), Ok(0));
}

// ── Response shapes ──────────────────────────────────────────

#[test]
fn empty_storage_list_renders_empty_array() {
    let mut cam = MockCamera::generic();
    cam.storage_ids.clear();
    let mut b = ready(cam);
    assert_eq!(call(&mut b, "ptp_get_storage_ids"), "{\"error\": 0, \"resp\": []}");
}

#[test]
fn storage_ids_render_as_decimal_array() {
    let mut cam = MockCamera::generic();
    cam.storage_ids = vec![0x0001_0001, 0x0002_0001];
    let mut b = ready(cam);
    assert_eq!(
        call(&mut b, "ptp_get_storage_ids"),
        "{\"error\": 0, \"resp\": [65537,131073]}"
    );
}

#[test]
fn object_handles_pass_storage_and_parent() {
    let mut b = ready(MockCamera::generic());
    let resp = call(&mut b, "ptp_get_object_handles;0xFFFFFFFF,0");
    assert_eq!(resp, "{\"error\": 0, \"resp\": [1,2,3]}");
    assert_eq!(
        b.port().calls,
        vec![Call::GetObjectHandles {
            storage: 0xFFFF_FFFF,
            format: 0,
            parent: 0
        }]
    );
}

#[test]
fn object_info_wraps_collaborator_json() {
    let mut b = ready(MockCamera::generic());
    let v = json(&call(&mut b, "ptp_get_object_info;7"));
    assert_eq!(v["error"], 0);
    assert_eq!(v["resp"]["filename"], "IMG_0007.JPG");
    assert_eq!(b.port().calls, vec![Call::GetObjectInfo(7)]);
}

#[test]
fn storage_info_fields() {
    let mut b = ready(MockCamera::generic());
    let v = json(&call(&mut b, "ptp_get_storage_info;65537"));
    assert_eq!(v["resp"]["storage_type"], 4);
    assert_eq!(v["resp"]["free_space"], 1u64 << 33);
}

#[test]
fn device_error_is_reported_verbatim() {
    let mut cam = MockCamera::generic();
    cam.fail_on = Some((Call::GetStorageIds, ptpbridge::PtpError::IoError));
    let mut b = ready(cam);
    assert_eq!(call(&mut b, "ptp_get_storage_ids"), "{\"error\": -5}");
}

#[test]
fn zero_port_code_still_reports_failure() {
    let mut cam = MockCamera::generic();
    cam.fail_on = Some((Call::GetStorageIds, ptpbridge::PtpError::Other(0)));
    let mut b = ready(cam);
    assert_eq!(call(&mut b, "ptp_get_storage_ids"), "{\"error\": -5}");
}

#[test]
fn hello_world_and_enums() {
    let mut b = bridge(MockCamera::generic());
    assert_eq!(
        call(&mut b, "ptp_hello_world;42"),
        "{\"error\": 0, \"resp\": \"hello 42 (1)\"}"
    );

    let v = json(&call(&mut b, "ptp_get_enums"));
    let entries = v["resp"].as_array().unwrap();
    assert!(
        entries
            .iter()
            .any(|e| e["name"] == "GetDeviceInfo" && e["value"] == 0x1001 && e["type"] == 0)
    );
}

#[test]
fn custom_command_reports_response_code() {
    let mut b = ready(MockCamera::generic());
    let resp = call(&mut b, "ptp_custom_cmd;0x1016,0x5007,560");
    assert_eq!(resp, "{\"error\": 0, \"resp\": 8193}");
    assert_eq!(b.port().calls, vec![Call::SendCommand(0x1016, vec![0x5007, 560])]);
}

#[test]
fn custom_command_drops_parameters_past_five() {
    let mut b = ready(MockCamera::generic());
    call(&mut b, "ptp_custom_cmd;0x9999,1,2,3,4,5,6,7");
    assert_eq!(b.port().calls, vec![Call::SendCommand(0x9999, vec![1, 2, 3, 4, 5])]);
}

#[test]
fn return_code_reads_last_staged_response() {
    let mut cam = MockCamera::generic();
    cam.response_code = 0x2019;
    let mut b = ready(cam);
    call(&mut b, "ptp_reset");
    assert_eq!(call(&mut b, "ptp_get_return_code"), "{\"error\": 0, \"code\": 8217}");
}

// ── Live view ────────────────────────────────────────────────

#[test]
fn liveview_frame_streams_decimal_bytes() {
    let mut b = ready(MockCamera::eos());
    assert_eq!(
        call(&mut b, "ptp_get_liveview_frame"),
        "{\"error\": 0, \"resp\": [255,216,0,16,255,217]}"
    );
}

#[test]
fn liveview_frame_that_does_not_fit_returns_zero() {
    let mut cam = MockCamera::eos();
    cam.frame = vec![200; 100];
    let mut b = ready(cam);
    let mut out = vec![0u8; 128];
    assert_eq!(b.dispatch("ptp_get_liveview_frame", Some(&mut out)), Ok(0));
    assert_eq!(b.run("ptp_get_liveview_frame", Some(&mut out)), 0);
}

#[test]
fn liveview_failure_keeps_envelope() {
    let mut cam = MockCamera::eos();
    cam.fail_on = Some((Call::LiveviewFrame, ptpbridge::PtpError::CameraError));
    let mut b = ready(cam);
    assert_eq!(call(&mut b, "ptp_get_liveview_frame"), "{\"error\": -6, \"resp\": []}");
}

#[test]
fn raw_liveview_frame_is_copied_verbatim() {
    let mut b = ready(MockCamera::eos());
    let mut out = vec![0u8; 64];
    let n = b.dispatch(RAW_ROUTE, Some(&mut out)).unwrap();
    assert_eq!(&out[..n], &[0xFF, 0xD8, 0x00, 0x10, 0xFF, 0xD9]);
}

#[test]
fn raw_liveview_frame_too_large_is_zero() {
    let mut b = ready(MockCamera::eos());
    let mut out = vec![0u8; 4];
    assert_eq!(b.dispatch(RAW_ROUTE, Some(&mut out)), Ok(0));
}

#[test]
fn liveview_type_reports_port_kind() {
    let mut b = bridge(MockCamera::eos());
    assert_eq!(call(&mut b, "ptp_get_liveview_type"), "{\"error\": 0, \"resp\": 1}");
    let resp = call_with(&mut b, "ptp_get_liveview_type", 32);
    assert_eq!(json(&resp)["resp"], 1);
}
