//! Global log stream instance.
//!
//! The control loop, the controller and the HAL adapters all log here.
//! The sampler tick does not log at all.

use crate::logging::LogStream;

/// Drive log stream.
///
/// Producers: control loop and peripheral adapters. Consumer: the drain in
/// the firmware main loop (or the host simulation).
pub static LOG_STREAM: LogStream = LogStream::new();
