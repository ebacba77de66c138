//! Per-device session state.
//!
//! [`RuntimeState`] is the one piece of mutable state every operation
//! touches: transaction/session ids, the scratch buffer the camera port
//! stages packets in, the cached device info, and the initialized /
//! connected status. The status lives here rather than in process-wide
//! flags, so two bridges never observe each other.
//!
//! Lifecycle:
//!
//! ```text
//!  new() ──initialize──▶ Ready ──connect──▶ Connected ──open_session──▶ InSession
//!                          ▲                   │    ▲                       │
//!                          └────disconnect─────┘    └─────close_session─────┘
//! ```
//!
//! The state is single-owner: every method takes `&mut self`, and a
//! bridge is driven by one caller issuing requests serially.

use log::{info, warn};

use crate::app::ports::CameraPort;
use crate::app::vendor::DeviceFamily;
use crate::error::{PtpError, PtpResult};
use crate::ptp::DeviceInfo;

/// Size of a PTP container header: length u32, type u16, code u16, transaction u32.
pub const CONTAINER_HEADER_LEN: usize = 12;

/// Container type of a response packet.
const CONTAINER_TYPE_RESPONSE: u16 = 3;

/// Session id sent with `OpenSession`.
const SESSION_ID: u32 = 1;

/// Initialized / connected flags for one runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub initialized: bool,
    pub connected: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RuntimeState {
    transaction_id: u32,
    session_id: u32,
    scratch: Vec<u8>,
    device_info: Option<Box<DeviceInfo>>,
    family: Option<DeviceFamily>,
    status: ConnectionStatus,
}

impl RuntimeState {
    /// An uninitialized runtime: no scratch buffer, nothing connected.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Reset to a fresh state with a zeroed scratch buffer of `capacity` bytes.
    ///
    /// If a connection is open, its session is closed first and the
    /// connected flag cleared. Any previous buffer and cached device info
    /// are dropped, so calling this repeatedly leaves the same state as
    /// calling it once. Never fails.
    pub fn initialize(&mut self, port: &mut dyn CameraPort, capacity: usize) {
        if self.status.connected {
            if let Err(e) = port.close_session(self) {
                warn!("init: closing previous session failed: {}", e);
            }
        }

        *self = Self {
            scratch: vec![0; capacity],
            status: ConnectionStatus {
                initialized: true,
                connected: false,
            },
            ..Self::default()
        };
        info!("runtime initialized ({} byte scratch buffer)", capacity);
    }

    /// Acquire the device.
    ///
    /// Refuses with [`PtpError::OutOfMemory`] unless the runtime was
    /// initialized with a non-empty scratch buffer of exactly
    /// `expected_capacity` bytes.
    pub fn connect(&mut self, port: &mut dyn CameraPort, expected_capacity: usize) -> PtpResult<()> {
        if !self.status.initialized {
            warn!("connect: runtime not initialized");
            return Err(PtpError::OutOfMemory);
        }
        if self.scratch.is_empty() || self.scratch.len() != expected_capacity {
            warn!(
                "connect: scratch buffer is {} bytes, expected {}",
                self.scratch.len(),
                expected_capacity
            );
            return Err(PtpError::OutOfMemory);
        }

        self.transaction_id = 0;
        self.session_id = 0;

        port.device_init(self)?;
        self.status.connected = true;
        info!("device connected");
        Ok(())
    }

    /// Release the device. The connected flag is only cleared on success.
    pub fn disconnect(&mut self, port: &mut dyn CameraPort) -> PtpResult<()> {
        port.device_close(self)?;
        self.status.connected = false;
        info!("device disconnected");
        Ok(())
    }

    pub fn open_session(&mut self, port: &mut dyn CameraPort) -> PtpResult<()> {
        self.transaction_id = 0;
        self.session_id = SESSION_ID;
        if let Err(e) = port.open_session(self) {
            self.session_id = 0;
            return Err(e);
        }
        info!("session {} opened", self.session_id);
        Ok(())
    }

    pub fn close_session(&mut self, port: &mut dyn CameraPort) -> PtpResult<()> {
        port.close_session(self)?;
        info!("session {} closed", self.session_id);
        self.session_id = 0;
        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    /// Hand out the current transaction id and advance the counter.
    pub fn next_transaction(&mut self) -> u32 {
        let id = self.transaction_id;
        self.transaction_id = self.transaction_id.wrapping_add(1);
        id
    }

    pub fn transaction_id(&self) -> u32 {
        self.transaction_id
    }

    /// 0 means no open session.
    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn has_session(&self) -> bool {
        self.session_id != 0
    }

    // ── Scratch buffer ────────────────────────────────────────

    pub fn scratch(&self) -> &[u8] {
        &self.scratch
    }

    pub fn scratch_capacity(&self) -> usize {
        self.scratch.len()
    }

    /// Write a response container header for `code` at the start of the
    /// scratch buffer, tagged with the last allocated transaction id.
    /// Does nothing when the buffer is too small to hold a header.
    pub fn stage_response(&mut self, code: u16) {
        let transaction = self.transaction_id.wrapping_sub(1);
        let Some(header) = self.scratch.get_mut(..CONTAINER_HEADER_LEN) else {
            return;
        };
        header[0..4].copy_from_slice(&(CONTAINER_HEADER_LEN as u32).to_le_bytes());
        header[4..6].copy_from_slice(&CONTAINER_TYPE_RESPONSE.to_le_bytes());
        header[6..8].copy_from_slice(&code.to_le_bytes());
        header[8..12].copy_from_slice(&transaction.to_le_bytes());
    }

    /// Response code of the last container staged in the scratch buffer,
    /// or 0 if there is none.
    pub fn response_code(&self) -> u16 {
        match self.scratch.get(6..8) {
            Some(b) => u16::from_le_bytes([b[0], b[1]]),
            None => 0,
        }
    }

    // ── Device info cache ─────────────────────────────────────

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device_info.as_deref()
    }

    /// Replace the cached device info. The probed device family is
    /// discarded with it.
    pub fn set_device_info(&mut self, info: DeviceInfo) {
        self.device_info = Some(Box::new(info));
        self.family = None;
    }

    pub(crate) fn cached_family(&self) -> Option<DeviceFamily> {
        self.family
    }

    pub(crate) fn cache_family(&mut self, family: DeviceFamily) {
        self.family = Some(family);
    }

    // ── Status ────────────────────────────────────────────────

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_initialized(&self) -> bool {
        self.status.initialized
    }

    pub fn is_connected(&self) -> bool {
        self.status.connected
    }
}
