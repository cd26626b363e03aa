//! Distance checks for placement and combat
//!
//! Everything here compares squared distances so the per-frame paths never
//! take a square root.

use glam::Vec2;

/// True if `a` and `b` are within `radius` of each other
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}

/// Squared distance from `p` to the segment `a`-`b`
pub fn distance_to_segment_squared(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 0.0001 {
        return p.distance_squared(a); // Degenerate segment
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

/// True if `p` lies within `half_width` of any leg of `path`
pub fn near_path(p: Vec2, path: &[Vec2], half_width: f32) -> bool {
    let limit = half_width * half_width;
    match path {
        [] => false,
        [only] => p.distance_squared(*only) < limit,
        _ => path
            .windows(2)
            .any(|leg| distance_to_segment_squared(p, leg[0], leg[1]) < limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_radius_is_inclusive() {
        assert!(within_radius(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0));
        assert!(!within_radius(Vec2::ZERO, Vec2::new(3.0, 4.1), 5.0));
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        assert!((distance_to_segment_squared(Vec2::new(50.0, 10.0), a, b) - 100.0).abs() < 1e-4);
        // Past the end clamps to the endpoint
        assert!((distance_to_segment_squared(Vec2::new(103.0, 4.0), a, b) - 25.0).abs() < 1e-4);
        assert!((distance_to_segment_squared(Vec2::new(3.0, 4.0), a, a) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_near_path() {
        let path = [Vec2::new(0.0, 100.0), Vec2::new(200.0, 100.0), Vec2::new(200.0, 300.0)];
        assert!(near_path(Vec2::new(60.0, 100.0), &path, 20.0));
        assert!(near_path(Vec2::new(210.0, 250.0), &path, 20.0));
        assert!(!near_path(Vec2::new(60.0, 140.0), &path, 20.0));
        assert!(!near_path(Vec2::ZERO, &[], 20.0));
    }
}
