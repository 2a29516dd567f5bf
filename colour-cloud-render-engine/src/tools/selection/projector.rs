use bevy::prelude::*;

/// Project a world-space position to 2D normalized device coordinates.
/// Values outside [-1, 1] mean off-screen and pass through unclamped.
pub fn world_to_ndc(clip_from_world: &Mat4, world: Vec3) -> Vec2 {
    let clip = *clip_from_world * world.extend(1.0);
    Vec2::new(clip.x / clip.w, clip.y / clip.w)
}

/// Map a screen-space pixel coordinate to NDC. The y axis flips because
/// screen y grows downward while NDC y grows upward. No ray casting is
/// involved; screen points are already a 2D concept.
pub fn screen_to_ndc(viewport: Vec2, screen: Vec2) -> Vec2 {
    Vec2::new(
        (screen.x / viewport.x) * 2.0 - 1.0,
        -((screen.y / viewport.y) * 2.0 - 1.0),
    )
}

/// Map a screen-space pixel coordinate into the 2D overlay camera's world
/// space: origin at the viewport centre, y up.
pub fn screen_to_overlay(viewport: Vec2, screen: Vec2) -> Vec2 {
    Vec2::new(screen.x - viewport.x / 2.0, viewport.y / 2.0 - screen.y)
}

/// Combined clip-from-world matrix of the live camera. Built fresh at every
/// call site so viewport resizes and orbit adjustments are always reflected;
/// nothing here is cached.
pub fn clip_from_world(camera: &Camera, transform: &GlobalTransform) -> Mat4 {
    camera.clip_from_view() * Mat4::from(transform.affine()).inverse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_to_ndc_flips_y() {
        let viewport = Vec2::new(200.0, 200.0);
        assert_eq!(screen_to_ndc(viewport, Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(screen_to_ndc(viewport, Vec2::new(100.0, 100.0)), Vec2::new(0.0, 0.0));
        assert_eq!(screen_to_ndc(viewport, Vec2::new(200.0, 200.0)), Vec2::new(1.0, -1.0));
        // Bottom-left corner: minimal x, minimal NDC y.
        assert_eq!(screen_to_ndc(viewport, Vec2::new(0.0, 200.0)), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn world_to_ndc_drops_depth_under_identity() {
        let m = Mat4::IDENTITY;
        let ndc = world_to_ndc(&m, Vec3::new(0.25, -0.5, 0.9));
        assert_eq!(ndc, Vec2::new(0.25, -0.5));
    }

    #[test]
    fn world_to_ndc_applies_perspective_divide() {
        let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 1.0, 1.0, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let clip_from_world = projection * view;

        // A point on the view axis lands at the NDC origin.
        let centre = world_to_ndc(&clip_from_world, Vec3::ZERO);
        assert!(centre.length() < 1e-6, "centre = {centre:?}");

        // A point to the camera's right has positive NDC x.
        let right = world_to_ndc(&clip_from_world, Vec3::new(1.0, 0.0, 0.0));
        assert!(right.x > 0.0);
        assert!(right.y.abs() < 1e-6);

        // Depth has no influence on the 2D output for on-axis points.
        let nearer = world_to_ndc(&clip_from_world, Vec3::new(0.0, 0.0, 5.0));
        assert!(nearer.length() < 1e-6);
    }

    #[test]
    fn screen_to_overlay_centres_the_origin() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(
            screen_to_overlay(viewport, Vec2::new(400.0, 300.0)),
            Vec2::ZERO
        );
        assert_eq!(
            screen_to_overlay(viewport, Vec2::new(0.0, 0.0)),
            Vec2::new(-400.0, 300.0)
        );
    }
}
