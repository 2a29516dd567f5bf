//! Relay ingest: newline-delimited JSON over TCP feeding the viewer.
//!
//! An exporter (or any other producer) connects to the relay port and sends
//! `RelayMessage` lines: `image` payloads replace the point store and the
//! source-image panel, `lines` payloads draw auxiliary loop geometry inside
//! the cube. A listener thread pushes raw lines into a shared queue; a Bevy
//! system drains and decodes it on the main schedule.

/// Listener thread, message queue, and decoding systems.
pub mod channel;
