/// Scene tunables shared between the render engine and the exporter.
pub mod render_settings;

/// Wire types for the image/lines relay channel.
pub mod relay;
