use bevy::prelude::*;
use constants::render_settings::{CUBE_SIDE, IMAGE_WIDTH, SEED_PARTICLES};
use image::RgbaImage;
use rand::Rng;

/// One per-pixel sample: a colour with channels in [0,1] and the
/// source-image pixel coordinate it was lifted from.
///
/// The 3D position is always derived from the colour, never stored, so the
/// two cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColourPoint {
    pub rgb: Vec3,
    pub xy: UVec2,
}

/// Bit-exact identity of a sample: colour channel bits plus pixel coordinate.
pub type PointKey = (u32, u32, u32, u32, u32);

impl ColourPoint {
    pub fn new(rgb: Vec3, xy: UVec2) -> Self {
        Self { rgb, xy }
    }

    /// World position inside the colour cube, centred on the origin.
    pub fn position(&self) -> Vec3 {
        self.rgb * CUBE_SIDE - CUBE_SIDE / 2.0
    }

    /// Value identity used for set semantics in the selection layer.
    /// Candidate sets may contain distinct instances of the same logical
    /// point, so comparison goes through this key rather than references.
    pub fn key(&self) -> PointKey {
        (
            self.rgb.x.to_bits(),
            self.rgb.y.to_bits(),
            self.rgb.z.to_bits(),
            self.xy.x,
            self.xy.y,
        )
    }

    /// Colour-only identity, used by same-colour selection expansion.
    pub fn colour_key(&self) -> [u32; 3] {
        [
            self.rgb.x.to_bits(),
            self.rgb.y.to_bits(),
            self.rgb.z.to_bits(),
        ]
    }
}

/// The live, ordered set of visualizable samples.
///
/// Replaced wholesale when a new image arrives and never mutated element by
/// element. Exactly one store is live at a time; it is passed explicitly to
/// the selection components rather than reached through a global.
#[derive(Resource, Default)]
pub struct PointStore {
    points: Vec<ColourPoint>,
}

impl PointStore {
    pub fn replace(&mut self, points: Vec<ColourPoint>) {
        self.points = points;
    }

    pub fn points(&self) -> &[ColourPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Fired after the store contents are swapped. Point identities do not
/// survive a swap, so listeners rebuild the GPU cloud and drop any selection.
#[derive(Event)]
pub struct PointStoreReplaced;

/// Decompose a decoded (already resized) image into one sample per pixel.
pub fn decompose_image(rgba: &RgbaImage) -> Vec<ColourPoint> {
    let mut points = Vec::with_capacity((rgba.width() * rgba.height()) as usize);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        points.push(ColourPoint::new(
            Vec3::new(
                r as f32 / 255.0,
                g as f32 / 255.0,
                b as f32 / 255.0,
            ),
            UVec2::new(x, y),
        ));
    }
    points
}

/// Random in-cube particles shown before any image has been received.
/// Coordinates are assigned on a virtual image grid so the samples behave
/// like any others under selection.
pub fn seed_points() -> Vec<ColourPoint> {
    let mut rng = rand::thread_rng();
    (0..SEED_PARTICLES)
        .map(|i| {
            let rgb = Vec3::new(
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
            );
            let xy = UVec2::new(i as u32 % IMAGE_WIDTH, i as u32 / IMAGE_WIDTH);
            ColourPoint::new(rgb, xy)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_derived_from_colour() {
        let black = ColourPoint::new(Vec3::ZERO, UVec2::ZERO);
        assert_eq!(black.position(), Vec3::splat(-CUBE_SIDE / 2.0));

        let white = ColourPoint::new(Vec3::ONE, UVec2::ZERO);
        assert_eq!(white.position(), Vec3::splat(CUBE_SIDE / 2.0));

        let mid = ColourPoint::new(Vec3::splat(0.5), UVec2::ZERO);
        assert_eq!(mid.position(), Vec3::ZERO);
    }

    #[test]
    fn keys_compare_by_value_not_reference() {
        let a = ColourPoint::new(Vec3::new(0.25, 0.5, 0.75), UVec2::new(3, 7));
        let b = ColourPoint::new(Vec3::new(0.25, 0.5, 0.75), UVec2::new(3, 7));
        assert_eq!(a.key(), b.key());

        let c = ColourPoint::new(Vec3::new(0.25, 0.5, 0.75), UVec2::new(3, 8));
        assert_ne!(a.key(), c.key());
        assert_eq!(a.colour_key(), c.colour_key());
    }

    #[test]
    fn decompose_maps_every_pixel() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));

        let points = decompose_image(&img);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].rgb, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(points[0].xy, UVec2::new(0, 0));
        assert_eq!(points[1].rgb, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(points[1].xy, UVec2::new(1, 0));
    }

    #[test]
    fn replace_swaps_contents_atomically() {
        let mut store = PointStore::default();
        store.replace(seed_points());
        assert_eq!(store.len(), SEED_PARTICLES);

        store.replace(vec![ColourPoint::new(Vec3::ONE, UVec2::ZERO)]);
        assert_eq!(store.len(), 1);
    }
}
