//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that drives the bridge end-to-end
//! through `Bridge::dispatch` against the recording mock camera (or the
//! simulated camera). No real device is required.

mod dispatch_tests;
mod lifecycle_tests;
mod mock_camera;
