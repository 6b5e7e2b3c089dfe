//! Contested cells between boxes and the order clusters resolve them in.

use crate::ids::ClusterId;
use crate::placement::Placement;
use quarry_common::GridPos;
use std::collections::{BTreeMap, BTreeSet};

/// For each cluster, the footprint cells it shares with at least one other box.
pub fn contested_cells(placement: &Placement) -> BTreeMap<ClusterId, BTreeSet<GridPos>> {
    let mut contested: BTreeMap<ClusterId, BTreeSet<GridPos>> =
        placement.keys().map(|&id| (id, BTreeSet::new())).collect();
    let boxes: Vec<_> = placement.iter().collect();

    for (i, &(&a_id, a)) in boxes.iter().enumerate() {
        for &(&b_id, b) in &boxes[i + 1..] {
            let Some(shared) = a.region().intersect(&b.region()) else {
                continue;
            };
            let cells: Vec<GridPos> = shared.cells().collect();
            contested.entry(a_id).or_default().extend(cells.iter().copied());
            contested.entry(b_id).or_default().extend(cells);
        }
    }
    contested
}

/// Most contested clusters first.
///
/// A cluster's contention is its shared-cell count over its generic demand,
/// zero when it has no generic demand. Ties go to the lower cluster id.
pub fn resolution_order(
    contested: &BTreeMap<ClusterId, BTreeSet<GridPos>>,
    generic_demand: &BTreeMap<ClusterId, usize>,
) -> Vec<ClusterId> {
    let ratio = |id: &ClusterId| {
        let needed = generic_demand.get(id).copied().unwrap_or(0);
        let shared = contested.get(id).map_or(0, BTreeSet::len);
        if needed == 0 {
            0.0
        } else {
            shared as f64 / needed as f64
        }
    };

    let mut order: Vec<ClusterId> = generic_demand.keys().copied().collect();
    order.sort_by(|a, b| ratio(b).total_cmp(&ratio(a)).then(a.cmp(b)));
    order
}
