//! organism service library.
//!
//! Wires the metrics core into an HTTP process: strict YAML config, the
//! organ handlers (heart and brain), the `/metrics` exposition endpoint, and
//! the listener lifecycle. Consumed by the two binaries and by integration
//! tests.

pub mod app_state;
pub mod config;
pub mod delay;
pub mod logging;
pub mod ops;
pub mod organs;
pub mod router;
pub mod server;
