//! The shared occupancy grid realization claims cells on.

use crate::board::Board;
use crate::ids::ClusterId;
use quarry_common::{GridPos, InternalError, QuarryResult};

/// Records which cluster owns each board cell.
///
/// A cell can be claimed once; a second claim is an internal error.
#[derive(Debug, Clone)]
pub struct Occupancy {
    width: i32,
    height: i32,
    owners: Vec<Option<ClusterId>>,
    claimed: usize,
}

impl Occupancy {
    /// An empty grid covering the whole board.
    pub fn new(board: &Board) -> Self {
        let (width, height) = (board.width(), board.height());
        Self {
            width,
            height,
            owners: vec![None; (width * height) as usize],
            claimed: 0,
        }
    }

    fn index(&self, (x, y): GridPos) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// The cluster owning `pos`, if any.
    pub fn owner(&self, pos: GridPos) -> Option<ClusterId> {
        self.index(pos).and_then(|i| self.owners[i])
    }

    /// Whether `pos` is owned by any cluster.
    pub fn is_claimed(&self, pos: GridPos) -> bool {
        self.owner(pos).is_some()
    }

    /// Marks `pos` as owned by `cluster`.
    pub fn claim(&mut self, pos: GridPos, cluster: ClusterId) -> QuarryResult<()> {
        let Some(i) = self.index(pos) else {
            return Err(InternalError::new(format!(
                "cluster {cluster} claimed ({}, {}) outside the board",
                pos.0, pos.1
            )));
        };
        if let Some(owner) = self.owners[i] {
            return Err(InternalError::new(format!(
                "cell ({}, {}) claimed by cluster {cluster} is already owned by cluster {owner}",
                pos.0, pos.1
            )));
        }
        self.owners[i] = Some(cluster);
        self.claimed += 1;
        Ok(())
    }

    /// Number of claimed cells.
    pub fn claimed_count(&self) -> usize {
        self.claimed
    }
}
