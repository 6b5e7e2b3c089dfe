//! Clusters: pre-grouped netlist blocks placed as one rigid unit.

use crate::board::CellType;
use std::collections::{BTreeMap, BTreeSet};

/// A set of block identifiers whose first character names the cell type
/// each block requires.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cluster {
    blocks: BTreeSet<String>,
}

impl Cluster {
    /// Creates a cluster from block identifiers.
    pub fn new<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocks: blocks.into_iter().map(Into::into).collect(),
        }
    }

    /// The block identifiers in this cluster.
    pub fn blocks(&self) -> &BTreeSet<String> {
        &self.blocks
    }

    /// Number of blocks that need a cell of `generic` type.
    pub fn generic_count(&self, generic: CellType) -> usize {
        self.block_types().filter(|&t| t == generic).count()
    }

    /// Required count of every non-generic block type.
    pub fn special_demand(&self, generic: CellType) -> BTreeMap<CellType, usize> {
        let mut demand = BTreeMap::new();
        for t in self.block_types().filter(|&t| t != generic) {
            *demand.entry(t).or_default() += 1;
        }
        demand
    }

    fn block_types(&self) -> impl Iterator<Item = CellType> + '_ {
        self.blocks.iter().filter_map(|b| CellType::of_block(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_type() {
        let cluster = Cluster::new(["c0", "c1", "c2", "m0", "m1", "d0", "r5"]);
        let generic = CellType::new('c');
        assert_eq!(cluster.generic_count(generic), 3);
        let demand = cluster.special_demand(generic);
        assert_eq!(demand[&CellType::new('m')], 2);
        assert_eq!(demand[&CellType::new('d')], 1);
        assert_eq!(demand[&CellType::new('r')], 1);
        assert!(!demand.contains_key(&generic));
    }

    #[test]
    fn empty_identifiers_are_ignored() {
        let cluster = Cluster::new(["", "c0"]);
        assert_eq!(cluster.generic_count(CellType::new('c')), 1);
        assert!(cluster.special_demand(CellType::new('c')).is_empty());
    }
}
