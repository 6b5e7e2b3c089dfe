//! Inclusive rectangular regions on the placement grid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid cell coordinate `(x, y)`.
pub type GridPos = (i32, i32);

/// An axis-aligned rectangle of grid cells, inclusive on both ends.
///
/// `Region { xmin: 1, xmax: 2, ymin: 1, ymax: 1 }` covers the two cells
/// `(1, 1)` and `(2, 1)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Region {
    /// Leftmost column.
    pub xmin: i32,
    /// Rightmost column.
    pub xmax: i32,
    /// Lowest row.
    pub ymin: i32,
    /// Highest row.
    pub ymax: i32,
}

impl Region {
    /// Creates a region from its corner coordinates.
    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// A region covering exactly one cell.
    pub fn cell(pos: GridPos) -> Self {
        Self::new(pos.0, pos.1, pos.0, pos.1)
    }

    /// Returns whether the region covers the given cell.
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.0 >= self.xmin && pos.0 <= self.xmax && pos.1 >= self.ymin && pos.1 <= self.ymax
    }

    /// Returns the cells shared by both regions, or `None` if they are disjoint.
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        let xmin = self.xmin.max(other.xmin);
        let xmax = self.xmax.min(other.xmax);
        let ymin = self.ymin.max(other.ymin);
        let ymax = self.ymax.min(other.ymax);
        if xmin <= xmax && ymin <= ymax {
            Some(Region::new(xmin, ymin, xmax, ymax))
        } else {
            None
        }
    }

    /// Number of cells covered.
    pub fn cell_count(&self) -> usize {
        if self.xmax < self.xmin || self.ymax < self.ymin {
            return 0;
        }
        ((self.xmax - self.xmin + 1) as usize) * ((self.ymax - self.ymin + 1) as usize)
    }

    /// Iterates the covered cells in row-major order (`y` outer, `x` inner).
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        (self.ymin..=self.ymax).flat_map(move |y| (self.xmin..=self.xmax).map(move |x| (x, y)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.xmin == self.xmax && self.ymin == self.ymax {
            write!(f, "({}, {})", self.xmin, self.ymin)
        } else {
            write!(
                f,
                "x {}..={}, y {}..={}",
                self.xmin, self.xmax, self.ymin, self.ymax
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let r = Region::new(1, 1, 3, 2);
        assert!(r.contains((1, 1)));
        assert!(r.contains((3, 2)));
        assert!(!r.contains((4, 2)));
        assert!(!r.contains((0, 1)));
    }

    #[test]
    fn intersect_overlapping() {
        let a = Region::new(0, 0, 3, 3);
        let b = Region::new(2, 1, 5, 5);
        assert_eq!(a.intersect(&b), Some(Region::new(2, 1, 3, 3)));
    }

    #[test]
    fn intersect_touching_edges_shares_cells() {
        let a = Region::new(0, 0, 2, 2);
        let b = Region::new(2, 0, 4, 2);
        let shared = a.intersect(&b).unwrap();
        assert_eq!(shared.cell_count(), 3);
    }

    #[test]
    fn intersect_disjoint() {
        let a = Region::new(0, 0, 1, 1);
        let b = Region::new(3, 3, 4, 4);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn cells_row_major() {
        let r = Region::new(1, 5, 2, 6);
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![(1, 5), (2, 5), (1, 6), (2, 6)]);
        assert_eq!(r.cell_count(), 4);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Region::cell((2, 3))), "(2, 3)");
        assert_eq!(format!("{}", Region::new(1, 2, 3, 4)), "x 1..=3, y 2..=4");
    }

    #[test]
    fn serde_roundtrip() {
        let r = Region::new(1, 2, 3, 4);
        let json = serde_json::to_string(&r).unwrap();
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
