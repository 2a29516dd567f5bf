//! Orbit camera for colour-cube navigation.
//!
//! Left-drag rotation and wheel dolly around the cube origin, with smooth
//! interpolation. Rotation is locked while a selection gesture owns the
//! pointer.

/// Orbit camera resource and controller system.
pub mod orbit_camera;
