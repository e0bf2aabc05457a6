//! Client-side helpers for the Jupyter channel messaging convention: message
//! envelope construction, parent/child reply correlation, and the
//! shutdown/restart handshake over a set of kernel channels.
//!
//! This crate does not own any wire transport. The [`channels::ChannelSet`]
//! it operates on is a record of in-process stream endpoints; the caller is
//! responsible for bridging those endpoints to ZeroMQ sockets, WebSockets, or
//! whatever carries the messages to the kernel.

/// Jupyter message types
pub mod jupyter_message;

/// Parent/child message correlation
pub mod correlation;

/// Kernel channel endpoints
pub mod channels;

/// The shutdown/restart handshake
pub mod shutdown;

/// Error types
pub mod error;
