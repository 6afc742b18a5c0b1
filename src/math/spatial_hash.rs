use std::collections::HashMap;

use crate::math::Point3;

/// Uniform hash grid over quantized 3D coordinates.
///
/// Stored points are bucketed by the integer cell containing them; a lookup
/// probes the 27 cells surrounding the query point. With the cell size equal
/// to the search tolerance, any stored point within tolerance of a query is
/// guaranteed to lie in one of the probed cells, so lookups never scan the
/// whole point set.
#[derive(Debug)]
pub struct SpatialHash {
    cell_size: f64,
    cells: HashMap<(i64, i64, i64), Vec<usize>>,
    points: Vec<Point3>,
}

impl SpatialHash {
    /// Creates an empty grid. `cell_size` must be positive.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            points: Vec::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, p: &Point3) -> (i64, i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
            (p.z / self.cell_size).floor() as i64,
        )
    }

    /// Inserts a point and returns its slot index (insertion order).
    pub fn insert(&mut self, p: Point3) -> usize {
        let slot = self.points.len();
        let cell = self.cell_of(&p);
        self.points.push(p);
        self.cells.entry(cell).or_default().push(slot);
        slot
    }

    /// Returns the slot of a stored point whose Euclidean distance to `p` is
    /// less than `tolerance`, or `None` if there is no such point.
    ///
    /// Probe order is fixed, so the result is deterministic for a fixed
    /// insertion sequence. `tolerance` must not exceed the cell size.
    #[must_use]
    pub fn find_within(&self, p: &Point3, tolerance: f64) -> Option<usize> {
        let (cx, cy, cz) = self.cell_of(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(slots) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &slot in slots {
                        if (self.points[slot] - p).norm() < tolerance {
                            return Some(slot);
                        }
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn finds_coincident_point() {
        let mut grid = SpatialHash::new(1e-3);
        let slot = grid.insert(Point3::new(1.0, 2.0, 3.0));
        let found = grid.find_within(&Point3::new(1.0, 2.0, 3.0), 1e-3);
        assert_eq!(found, Some(slot));
    }

    #[test]
    fn finds_point_across_cell_boundary() {
        let mut grid = SpatialHash::new(1e-3);
        // Just below a cell boundary; the query just above it.
        let slot = grid.insert(Point3::new(1e-3 - 1e-7, 0.0, 0.0));
        let found = grid.find_within(&Point3::new(1e-3 + 1e-7, 0.0, 0.0), 1e-3);
        assert_eq!(found, Some(slot));
    }

    #[test]
    fn rejects_point_outside_tolerance() {
        let mut grid = SpatialHash::new(1e-3);
        grid.insert(Point3::new(0.0, 0.0, 0.0));
        let found = grid.find_within(&Point3::new(5e-3, 0.0, 0.0), 1e-3);
        assert_eq!(found, None);
    }

    #[test]
    fn returns_first_inserted_within_tolerance() {
        let mut grid = SpatialHash::new(1.0);
        let a = grid.insert(Point3::new(0.1, 0.0, 0.0));
        grid.insert(Point3::new(0.2, 0.0, 0.0));
        let found = grid.find_within(&Point3::new(0.15, 0.0, 0.0), 1.0);
        assert_eq!(found, Some(a));
    }

    #[test]
    fn negative_coordinates_hash_correctly() {
        let mut grid = SpatialHash::new(1e-3);
        let slot = grid.insert(Point3::new(-1.0, -2.0, -3.0));
        let found = grid.find_within(&Point3::new(-1.0, -2.0, -3.0), 1e-3);
        assert_eq!(found, Some(slot));
    }
}
