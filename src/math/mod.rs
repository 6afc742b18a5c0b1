pub mod distance_3d;
pub mod spatial_hash;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Returns the diagonal length of the axis-aligned bounding box of `points`.
///
/// Returns `0.0` for an empty slice or when all points coincide.
#[must_use]
pub fn bounding_box_diagonal(points: &[Point3]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };

    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }

    (max - min).norm()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn diagonal_of_unit_box() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.5, 0.2, 0.9),
            Point3::new(1.0, 1.0, 1.0),
        ];
        let d = bounding_box_diagonal(&points);
        assert!((d - 3.0_f64.sqrt()).abs() < TOL, "d={d}");
    }

    #[test]
    fn diagonal_of_coincident_points_is_zero() {
        let points = [Point3::new(2.0, 3.0, 4.0); 4];
        assert!(bounding_box_diagonal(&points).abs() < TOL);
    }

    #[test]
    fn diagonal_of_empty_slice_is_zero() {
        assert!(bounding_box_diagonal(&[]).abs() < TOL);
    }
}
