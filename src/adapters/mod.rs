//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter | Implements   | Connects to                   |
//! |---------|--------------|-------------------------------|
//! | `sim`   | CameraPort   | In-process simulated camera   |

pub mod sim;
