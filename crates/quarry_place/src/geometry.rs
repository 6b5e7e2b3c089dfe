//! Cluster boxes: the rectangular footprint a cluster occupies during annealing.

use crate::board::{Board, CellType};
use crate::cluster::Cluster;
use crate::ids::ClusterId;
use quarry_common::Region;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The rectangle currently assigned to one cluster.
///
/// Boxes are plain values: the move generator works on a copy and the
/// annealing state replaces whole entries on commit, so a trial box never
/// aliases a committed one.
///
/// Extents follow the annealer's continuous convention: the box spans
/// `xmax - xmin` by `ymax - ymin` units of area for overlap and capacity,
/// while realization claims the inclusive cell range `xmin..=xmax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterBox {
    /// Owning cluster.
    pub c_id: ClusterId,
    /// Left edge.
    pub xmin: i32,
    /// Right edge.
    pub xmax: i32,
    /// Bottom edge.
    pub ymin: i32,
    /// Top edge.
    pub ymax: i32,
    /// Generic cells the cluster needs.
    pub total_clb_size: usize,
    /// Special cells the cluster needs, by type.
    pub special_blocks: BTreeMap<CellType, usize>,
}

impl ClusterBox {
    /// Creates a box with no recorded demand.
    pub fn new(c_id: ClusterId, xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            c_id,
            xmin,
            xmax,
            ymin,
            ymax,
            total_clb_size: 0,
            special_blocks: BTreeMap::new(),
        }
    }

    /// Copies the cluster's demand into the box's snapshot.
    pub fn refresh_demand(&mut self, cluster: &Cluster, generic: CellType) {
        self.total_clb_size = cluster.generic_count(generic);
        self.special_blocks = cluster.special_demand(generic);
    }

    /// The inclusive cell footprint.
    pub fn region(&self) -> Region {
        Region::new(self.xmin, self.ymin, self.xmax, self.ymax)
    }

    /// Midpoint of the box, used as the cluster's net terminal position.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.xmin + self.xmax) as f64 / 2.0,
            (self.ymin + self.ymax) as f64 / 2.0,
        )
    }

    /// Intersection area with another box, zero when disjoint or only touching.
    pub fn overlap_area(&self, other: &ClusterBox) -> i64 {
        let dx = self.xmax.min(other.xmax) - self.xmin.max(other.xmin);
        let dy = self.ymax.min(other.ymax) - self.ymin.max(other.ymin);
        i64::from(dx.max(0)) * i64::from(dy.max(0))
    }

    /// Whether every edge stays clear of the board margin.
    pub fn is_legal(&self, board: &Board) -> bool {
        let margin = board.margin();
        self.xmin >= margin
            && self.ymin >= margin
            && self.xmax < board.width() - margin
            && self.ymax < board.height() - margin
    }

    /// Counts cells of each demanded special type inside the box, scanning
    /// only columns whose lane matches that type.
    pub fn special_supply(&self, board: &Board) -> BTreeMap<CellType, usize> {
        self.special_blocks
            .keys()
            .map(|&t| {
                let count = (self.xmin..=self.xmax)
                    .filter(|&x| board.lane(x) == Some(t))
                    .map(|x| {
                        (self.ymin..=self.ymax)
                            .filter(|&y| board.cell_type((x, y)) == Some(t))
                            .count()
                    })
                    .sum();
                (t, count)
            })
            .collect()
    }
}
