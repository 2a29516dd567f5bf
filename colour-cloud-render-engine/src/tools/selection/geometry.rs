use bevy::prelude::*;
use std::collections::HashSet;

use super::projector::{screen_to_ndc, world_to_ndc};
use super::state::Gesture;
use crate::engine::assets::point_store::{ColourPoint, PointKey};

/// Compute the subset of `points` contained in the gesture.
///
/// Both the gesture vertices (screen space) and the point positions (world
/// space) are brought into NDC before comparison; the gesture is never
/// tested against 3D points directly. Degenerate gestures select nothing.
pub fn select(
    gesture: &Gesture,
    viewport: Vec2,
    clip_from_world: &Mat4,
    points: &[ColourPoint],
) -> Vec<ColourPoint> {
    match gesture {
        Gesture::Box { start, end } => {
            let a = screen_to_ndc(viewport, *start);
            let b = screen_to_ndc(viewport, *end);
            let min = a.min(b);
            let max = a.max(b);
            if min.x == max.x || min.y == max.y {
                return Vec::new();
            }

            points
                .iter()
                .copied()
                .filter(|point| {
                    let ndc = world_to_ndc(clip_from_world, point.position());
                    min.x <= ndc.x && ndc.x <= max.x && min.y <= ndc.y && ndc.y <= max.y
                })
                .collect()
        }
        Gesture::Path(vertices) => {
            if vertices.len() < 3 {
                return Vec::new();
            }
            let polygon: Vec<Vec2> = vertices
                .iter()
                .map(|v| screen_to_ndc(viewport, *v))
                .collect();

            points
                .iter()
                .copied()
                .filter(|point| {
                    point_in_polygon(world_to_ndc(clip_from_world, point.position()), &polygon)
                })
                .collect()
        }
    }
}

/// Grow the candidate set to every store point sharing a colour with it.
/// The result stays duplicate-free under value identity.
pub fn expand_same_colour(
    candidates: Vec<ColourPoint>,
    points: &[ColourPoint],
) -> Vec<ColourPoint> {
    let colours: HashSet<[u32; 3]> = candidates.iter().map(|p| p.colour_key()).collect();
    let mut seen: HashSet<PointKey> = candidates.iter().map(|p| p.key()).collect();

    let mut expanded = candidates;
    for point in points {
        if colours.contains(&point.colour_key()) && seen.insert(point.key()) {
            expanded.push(*point);
        }
    }
    expanded
}

/// Even-odd crossing-number test against an implicitly closed polygon.
/// An edge counts as crossing the horizontal ray through `p` iff exactly one
/// of its endpoints has y strictly greater than `p.y`, which keeps vertices
/// exactly on the ray from being counted twice. Self-intersecting polygons
/// are evaluated mechanically.
fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y)
            && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::point_store::ColourPoint;
    use constants::render_settings::CUBE_SIDE;

    /// A point whose derived world position equals `pos` (up to float
    /// round-trip), so tests can place samples at known NDC under an
    /// identity projection.
    fn point_at(pos: Vec3) -> ColourPoint {
        ColourPoint::new((pos + CUBE_SIDE / 2.0) / CUBE_SIDE, UVec2::ZERO)
    }

    #[test]
    fn triangle_contains_point_by_even_odd_trace() {
        let triangle = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 3.0), &triangle));
        assert!(!point_in_polygon(Vec2::new(11.0, 3.0), &triangle));
        assert!(!point_in_polygon(Vec2::new(5.0, 11.0), &triangle));
    }

    #[test]
    fn degenerate_box_selects_nothing() {
        let gesture = Gesture::Box {
            start: Vec2::new(50.0, 50.0),
            end: Vec2::new(50.0, 50.0),
        };
        let points = vec![point_at(Vec3::ZERO)];
        let selected = select(&gesture, Vec2::new(200.0, 200.0), &Mat4::IDENTITY, &points);
        assert!(selected.is_empty());
    }

    #[test]
    fn short_paths_select_nothing() {
        let points = vec![point_at(Vec3::ZERO)];
        for vertices in [vec![], vec![Vec2::ZERO], vec![Vec2::ZERO, Vec2::ONE]] {
            let gesture = Gesture::Path(vertices);
            let selected =
                select(&gesture, Vec2::new(200.0, 200.0), &Mat4::IDENTITY, &points);
            assert!(selected.is_empty());
        }
    }

    #[test]
    fn box_from_origin_selects_the_upper_left_quadrant() {
        // Screen (0,0)→(100,100) in a 200×200 viewport covers NDC x∈[-1,0],
        // y∈[0,1] under the y-flip convention.
        let gesture = Gesture::Box {
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(100.0, 100.0),
        };
        let viewport = Vec2::new(200.0, 200.0);

        let inside = point_at(Vec3::new(-0.5, 0.5, 0.0));
        let wrong_x = point_at(Vec3::new(0.5, 0.5, 0.0));
        let wrong_y = point_at(Vec3::new(-0.5, -0.5, 0.0));
        let on_corner = point_at(Vec3::new(0.0, 0.0, 0.0)); // inclusive bounds

        let points = vec![inside, wrong_x, wrong_y, on_corner];
        let selected = select(&gesture, viewport, &Mat4::IDENTITY, &points);
        assert_eq!(selected, vec![inside, on_corner]);
    }

    #[test]
    fn box_corners_are_order_independent() {
        let viewport = Vec2::new(200.0, 200.0);
        let points = vec![point_at(Vec3::new(-0.5, 0.5, 0.0))];

        let forward = Gesture::Box {
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(100.0, 100.0),
        };
        let backward = Gesture::Box {
            start: Vec2::new(100.0, 100.0),
            end: Vec2::new(0.0, 0.0),
        };

        assert_eq!(
            select(&forward, viewport, &Mat4::IDENTITY, &points),
            select(&backward, viewport, &Mat4::IDENTITY, &points)
        );
    }

    #[test]
    fn lasso_selects_enclosed_points() {
        // A screen-space triangle over the upper-left viewport quarter.
        let gesture = Gesture::Path(vec![
            Vec2::new(10.0, 10.0),
            Vec2::new(90.0, 10.0),
            Vec2::new(50.0, 90.0),
        ]);
        let viewport = Vec2::new(200.0, 200.0);

        let inside = point_at(Vec3::new(-0.5, 0.7, 0.0)); // screen ≈ (50, 30)
        let outside = point_at(Vec3::new(0.5, 0.5, 0.0));

        let selected = select(&gesture, viewport, &Mat4::IDENTITY, &[inside, outside]);
        assert_eq!(selected, vec![inside]);
    }

    #[test]
    fn expansion_pulls_in_colour_twins() {
        let a = ColourPoint::new(Vec3::new(0.5, 0.0, 0.0), UVec2::new(0, 0));
        let twin = ColourPoint::new(Vec3::new(0.5, 0.0, 0.0), UVec2::new(9, 9));
        let other = ColourPoint::new(Vec3::new(0.0, 0.5, 0.0), UVec2::new(1, 1));
        let store = [a, twin, other];

        let expanded = expand_same_colour(vec![a], &store);
        assert_eq!(expanded, vec![a, twin]);
    }

    #[test]
    fn expansion_does_not_duplicate_candidates() {
        let a = ColourPoint::new(Vec3::new(0.5, 0.0, 0.0), UVec2::new(0, 0));
        let store = [a];
        let expanded = expand_same_colour(vec![a], &store);
        assert_eq!(expanded, vec![a]);
    }
}
