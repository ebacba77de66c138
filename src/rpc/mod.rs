//! Text-command front end.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  "ptp_get_object_handles;0x10001,0"                      │
//! │        │                                                 │
//! │        ▼                                                 │
//! │  ┌──────────┐   ┌──────────┐   ┌─────────┐   ┌────────┐  │
//! │  │ Request  │──▶│  Engine  │──▶│ Handler │──▶│ Writer │  │
//! │  │ (parse)  │   │ (routes) │   │         │   │ (JSON) │  │
//! │  └──────────┘   └──────────┘   └─────────┘   └────────┘  │
//! │                                     │                    │
//! │                                     ▼                    │
//! │                         vendor resolver / CameraPort     │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod engine;
pub mod handlers;
pub mod request;
pub mod writer;
