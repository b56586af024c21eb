//! Frame discovery over a directory tree.

/// Recursive collector and its options.
pub mod collector;
/// Directory listing capability and its implementations.
pub mod listing;
