//! Unified error types for the bridge.
//!
//! Two families live here:
//!
//! - [`PtpError`] travels *inside* a response as the numeric `error` field.
//!   Every handler failure ends up as one of these, never as unwinding
//!   control flow.
//! - [`ParseError`] and [`DispatchError`] are the only failures that cross
//!   the dispatch boundary; the caller sees them as the `-1` sentinel.
//!
//! All variants are `Copy` so they can be handed through the port layer
//! and the vendor resolver without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Protocol / transport errors
// ---------------------------------------------------------------------------

/// Generic I/O and library error codes reported by the camera port.
///
/// These are not PTP response codes (`0x2xxx`); those are read back from
/// the scratch buffer with `ptp_get_return_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtpError {
    /// No camera found on the transport.
    NoDevice,
    /// The transport refused access to the camera.
    NoPermission,
    /// The transport found the camera but could not open it.
    OpenFail,
    /// The runtime has no usable scratch buffer (not initialized).
    OutOfMemory,
    /// A transfer failed mid-way.
    IoError,
    /// The camera rejected the request or the request named nothing it knows.
    CameraError,
    /// Neither the generic operation nor a vendor fallback is available.
    Unsupported,
    /// The camera answered with a non-OK response code.
    CheckCode,
    /// Any other code a port implementation chooses to report. `Other(0)`
    /// is still a failure and goes on the wire as the I/O error code.
    Other(i32),
}

impl PtpError {
    /// Signed code written into the response envelope.
    pub const fn code(self) -> i32 {
        match self {
            Self::NoDevice => -1,
            Self::NoPermission => -2,
            Self::OpenFail => -3,
            Self::OutOfMemory => -4,
            Self::IoError => -5,
            Self::CameraError => -6,
            Self::Unsupported => -7,
            Self::CheckCode => -8,
            Self::Other(0) => -5,
            Self::Other(code) => code,
        }
    }

    /// Inverse of [`code`](Self::code). `0` is success and has no error value.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => None,
            -1 => Some(Self::NoDevice),
            -2 => Some(Self::NoPermission),
            -3 => Some(Self::OpenFail),
            -4 => Some(Self::OutOfMemory),
            -5 => Some(Self::IoError),
            -6 => Some(Self::CameraError),
            -7 => Some(Self::Unsupported),
            -8 => Some(Self::CheckCode),
            other => Some(Self::Other(other)),
        }
    }
}

impl fmt::Display for PtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDevice => write!(f, "no device"),
            Self::NoPermission => write!(f, "no permission"),
            Self::OpenFail => write!(f, "failed to open device"),
            Self::OutOfMemory => write!(f, "runtime not initialized"),
            Self::IoError => write!(f, "I/O error"),
            Self::CameraError => write!(f, "camera error"),
            Self::Unsupported => write!(f, "operation unsupported"),
            Self::CheckCode => write!(f, "non-OK response code"),
            Self::Other(code) => write!(f, "error code {code}"),
        }
    }
}

/// Result alias used by every port and resolver call.
pub type PtpResult<T> = core::result::Result<T, PtpError>;

/// Folds a sequence of step results, keeping the first failure.
///
/// Used by multi-step vendor sequences (release on/off) where every step
/// must still run even if an earlier one failed.
pub fn first_error(results: impl IntoIterator<Item = PtpResult<()>>) -> PtpResult<()> {
    results
        .into_iter()
        .fold(Ok(()), |acc, r| if acc.is_err() { acc } else { r })
}

// ---------------------------------------------------------------------------
// Request grammar errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// More than [`MAX_PARAMS`](crate::rpc::request::MAX_PARAMS) integers.
    TooManyParameters,
    /// A token had no digits (strict mode only).
    InvalidNumber,
    /// A numeric token was followed by something other than `,` (strict mode only).
    TrailingCharacters,
    /// A quoted token had no closing quote (strict mode only).
    UnterminatedString,
    /// More than one quoted token (strict mode only).
    DuplicateString,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyParameters => write!(f, "too many parameters"),
            Self::InvalidNumber => write!(f, "invalid numeric token"),
            Self::TrailingCharacters => write!(f, "trailing characters after token"),
            Self::UnterminatedString => write!(f, "unterminated string token"),
            Self::DuplicateString => write!(f, "more than one string token"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch boundary errors
// ---------------------------------------------------------------------------

/// Hard boundary conditions. No JSON is produced and no handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The caller supplied no output buffer.
    NoBuffer,
    /// The operation name matched no route.
    UnknownOperation,
    /// The parameter list violated the request grammar.
    Malformed(ParseError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBuffer => write!(f, "no output buffer"),
            Self::UnknownOperation => write!(f, "unknown operation"),
            Self::Malformed(e) => write!(f, "malformed request: {e}"),
        }
    }
}

impl From<ParseError> for DispatchError {
    fn from(e: ParseError) -> Self {
        Self::Malformed(e)
    }
}

impl std::error::Error for PtpError {}
impl std::error::Error for ParseError {}
impl std::error::Error for DispatchError {}
