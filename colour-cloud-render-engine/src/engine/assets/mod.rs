//! In-memory data backing the scene: the live point store and the source
//! image shown in the 2D panel.

/// Point store resource, sample type, and image decomposition.
pub mod point_store;

/// Resized source-image pixels backing the 2D panel texture.
pub mod source_image;
