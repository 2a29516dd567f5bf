/// Side length of the RGB colour cube in world units. Point positions are
/// derived from colour as `rgb * CUBE_SIDE - CUBE_SIDE / 2`, so the cube is
/// centred on the origin.
pub const CUBE_SIDE: f32 = 750.0;

/// Screen-space size of base cloud points, in pixels.
pub const SMALL_POINT: f32 = 15.0;

/// Screen-space size of highlighted (selected) points, in pixels.
pub const LARGE_POINT: f32 = 30.0;

/// Colour override applied to the highlight layer.
pub const SELECTED_COLOUR: [f32; 3] = [1.0, 1.0, 1.0];

/// Relayed images are resized to this width (height keeps the aspect ratio)
/// before being decomposed into per-pixel samples.
pub const IMAGE_WIDTH: u32 = 450;

/// Number of random in-cube particles seeded at startup, before any image
/// has been received.
pub const SEED_PARTICLES: usize = 1000;
