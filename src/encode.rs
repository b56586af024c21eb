//! Encoding sinks.
//!
//! Sinks consume decoded frames in sequence order and own the output writer.

/// GIF file sink.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
