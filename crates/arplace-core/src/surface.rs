//! Ray intersection against bounded planar surfaces

use bevy_math::{Quat, Ray3d, Vec2, Vec3};

use crate::pose::PlacementPose;

/// Rays closer to parallel than this are treated as missing the plane
const PARALLEL_EPSILON: f32 = 1e-6;

/// A detected planar region.
///
/// The plane passes through `center` and its normal is `rotation * Y`. The
/// boundary polygon is expressed in the plane's local X/Z coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedPlane {
    pub center: Vec3,
    pub rotation: Quat,
    pub boundary: Vec<Vec2>,
}

impl DetectedPlane {
    /// Axis-aligned rectangle of `size` (X width, Z depth) centered on `center`
    pub fn rectangle(center: Vec3, rotation: Quat, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            center,
            rotation,
            boundary: vec![
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ],
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Distance along the ray and hit pose, if the ray hits inside the boundary
    pub fn intersect(&self, ray: Ray3d) -> Option<(f32, PlacementPose)> {
        let normal = self.normal();
        let denom = normal.dot(*ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let distance = (self.center - ray.origin).dot(normal) / denom;
        if distance < 0.0 {
            return None;
        }

        let point = ray.origin + *ray.direction * distance;
        let local = self.rotation.inverse() * (point - self.center);
        if !contains(&self.boundary, Vec2::new(local.x, local.z)) {
            return None;
        }

        Some((distance, PlacementPose::new(point, self.rotation)))
    }
}

/// Closest in-bounds hit among `planes`
pub fn closest_hit<'a>(
    planes: impl IntoIterator<Item = &'a DetectedPlane>,
    ray: Ray3d,
) -> Option<PlacementPose> {
    planes
        .into_iter()
        .filter_map(|plane| plane.intersect(ray))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, pose)| pose)
}

/// Even-odd point-in-polygon test
fn contains(polygon: &[Vec2], point: Vec2) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_math::Dir3;

    fn floor() -> DetectedPlane {
        DetectedPlane::rectangle(Vec3::ZERO, Quat::IDENTITY, Vec2::new(2.0, 2.0))
    }

    fn down_from(x: f32, z: f32) -> Ray3d {
        Ray3d::new(Vec3::new(x, 3.0, z), Dir3::NEG_Y)
    }

    #[test]
    fn test_hit_inside_boundary() {
        let (distance, pose) = floor().intersect(down_from(0.5, -0.25)).unwrap();
        assert!((distance - 3.0).abs() < 1e-5);
        assert!((pose.position - Vec3::new(0.5, 0.0, -0.25)).length() < 1e-5);
        assert_eq!(pose.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_miss_outside_boundary() {
        assert!(floor().intersect(down_from(1.5, 0.0)).is_none());
    }

    #[test]
    fn test_miss_behind_origin_and_parallel() {
        let up = Ray3d::new(Vec3::new(0.0, 1.0, 0.0), Dir3::Y);
        assert!(floor().intersect(up).is_none());

        let sideways = Ray3d::new(Vec3::new(0.0, 1.0, 0.0), Dir3::X);
        assert!(floor().intersect(sideways).is_none());
    }

    #[test]
    fn test_concave_boundary() {
        // L-shaped surface missing its upper right quadrant
        let plane = DetectedPlane {
            center: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            boundary: vec![
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(-1.0, 1.0),
            ],
        };
        assert!(plane.intersect(down_from(-0.5, 0.5)).is_some());
        assert!(plane.intersect(down_from(0.5, 0.5)).is_none());
    }

    #[test]
    fn test_closest_plane_wins() {
        let table = DetectedPlane::rectangle(
            Vec3::new(0.0, 0.8, 0.0),
            Quat::IDENTITY,
            Vec2::new(1.0, 1.0),
        );
        let planes = vec![floor(), table];
        let pose = closest_hit(&planes, down_from(0.0, 0.0)).unwrap();
        assert!((pose.position.y - 0.8).abs() < 1e-5);

        let pose = closest_hit(&planes, down_from(0.9, 0.0)).unwrap();
        assert!(pose.position.y.abs() < 1e-5);
    }

    #[test]
    fn test_tilted_plane_reports_its_rotation() {
        let rotation = Quat::from_rotation_z(30f32.to_radians());
        let wall = DetectedPlane::rectangle(Vec3::new(0.0, 1.0, 0.0), rotation, Vec2::new(1.0, 1.0));
        let ray = Ray3d::new(Vec3::new(0.0, 3.0, 0.0), Dir3::NEG_Y);
        let (_, pose) = wall.intersect(ray).unwrap();
        assert_eq!(pose.rotation, rotation);
        assert!((pose.position - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }
}
