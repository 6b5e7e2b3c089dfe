//! Placement energy: wire length, box overlap, and legalization penalty.
//!
//! The total energy of a placement is
//! `hpwl + overlap_area * overlap_weight + legalization`. Annealing evaluates
//! one moved box per step, so besides the full recomputation this module
//! offers [`EnergyModel::delta`], which only touches the nets, box pairs, and
//! legalization term involving the moved cluster.

use crate::board::{Board, CellType};
use crate::geometry::ClusterBox;
use crate::ids::ClusterId;
use crate::netlist::{Netlist, NetlistIndex, Terminal};
use crate::placement::Placement;
use quarry_config::PlacerConfig;
use std::collections::{BTreeMap, BTreeSet};

/// Weights for the energy components.
#[derive(Debug, Clone)]
pub struct EnergyModel {
    /// Energy per unit of overlapped area.
    pub overlap_weight: f64,
    /// Energy per missing special block, by type.
    pub penalties: BTreeMap<CellType, f64>,
    /// Types never charged a legalization penalty.
    pub ignored: BTreeSet<CellType>,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self::from_config(&PlacerConfig::default())
    }
}

/// Change in each energy component caused by replacing one box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyDelta {
    /// Change in HPWL over the nets touching the moved cluster.
    pub wire: f64,
    /// Change in overlapped area between the moved box and all others.
    pub overlap: i64,
    /// Change in the moved box's legalization penalty.
    pub legal: f64,
}

impl EnergyDelta {
    /// Weighted total change.
    pub fn total(&self, overlap_weight: f64) -> f64 {
        self.wire + self.overlap as f64 * overlap_weight + self.legal
    }
}

impl EnergyModel {
    /// Reads weights and the effective ignored set from the placer config.
    pub fn from_config(config: &PlacerConfig) -> Self {
        Self {
            overlap_weight: config.overlap_weight,
            penalties: config
                .legalization_penalty
                .iter()
                .map(|(&t, &w)| (CellType::new(t), w))
                .collect(),
            ignored: config.ignored_types().into_iter().map(CellType::new).collect(),
        }
    }

    /// Full energy of a placement.
    pub fn total_energy(&self, board: &Board, netlist: &Netlist, placement: &Placement) -> f64 {
        total_hpwl(netlist, placement)
            + total_overlap(placement) as f64 * self.overlap_weight
            + self.total_legalization(board, placement)
    }

    /// Sum of legalization penalties over every box.
    pub fn total_legalization(&self, board: &Board, placement: &Placement) -> f64 {
        placement
            .values()
            .map(|b| self.box_legalization(board, b))
            .sum()
    }

    /// Penalty for the special blocks a box cannot hold.
    ///
    /// For each demanded type outside the ignored set, every block the box's
    /// matching lanes cannot supply costs that type's penalty.
    pub fn box_legalization(&self, board: &Board, b: &ClusterBox) -> f64 {
        let supply = b.special_supply(board);
        b.special_blocks
            .iter()
            .filter(|(t, _)| !self.ignored.contains(*t))
            .map(|(t, &required)| {
                let available = supply.get(t).copied().unwrap_or(0);
                let missing = required.saturating_sub(available);
                missing as f64 * self.penalties.get(t).copied().unwrap_or(0.0)
            })
            .sum()
    }

    /// Energy change from replacing `candidate.c_id`'s box with `candidate`.
    ///
    /// The live placement is not modified.
    pub fn delta(
        &self,
        board: &Board,
        netlist: &Netlist,
        index: &NetlistIndex,
        placement: &Placement,
        candidate: &ClusterBox,
    ) -> EnergyDelta {
        let Some(current) = placement.get(&candidate.c_id) else {
            return EnergyDelta::default();
        };

        let mut wire = 0.0;
        let moved_center = candidate.center();
        for net in index.nets_of(candidate.c_id) {
            let terminals = netlist.terminals(net);
            let old = net_hpwl(netlist, terminals, |id| placement.get(&id).map(ClusterBox::center));
            let new = net_hpwl(netlist, terminals, |id| {
                if id == candidate.c_id {
                    Some(moved_center)
                } else {
                    placement.get(&id).map(ClusterBox::center)
                }
            });
            wire += new - old;
        }

        let mut overlap = 0;
        for (&id, other) in placement {
            if id == candidate.c_id {
                continue;
            }
            overlap += candidate.overlap_area(other) - current.overlap_area(other);
        }

        let legal = self.box_legalization(board, candidate) - self.box_legalization(board, current);

        EnergyDelta {
            wire,
            overlap,
            legal,
        }
    }
}

/// Total half-perimeter wire length of every net.
pub fn total_hpwl(netlist: &Netlist, placement: &Placement) -> f64 {
    netlist
        .nets()
        .map(|(_, terminals)| net_hpwl(netlist, terminals, |id| placement.get(&id).map(ClusterBox::center)))
        .sum()
}

/// Total overlapped area over every unordered pair of boxes.
pub fn total_overlap(placement: &Placement) -> i64 {
    let boxes: Vec<&ClusterBox> = placement.values().collect();
    let mut total = 0;
    for (i, a) in boxes.iter().enumerate() {
        for b in &boxes[i + 1..] {
            total += a.overlap_area(b);
        }
    }
    total
}

/// Half-perimeter of the bounding box of a net's terminal positions.
///
/// Terminals without a known position are skipped; a net with no positioned
/// terminal has zero length.
fn net_hpwl(
    netlist: &Netlist,
    terminals: &[Terminal],
    center_of: impl Fn(ClusterId) -> Option<(f64, f64)>,
) -> f64 {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for terminal in terminals {
        let pos = match terminal {
            Terminal::Fixed(key) => netlist.fixed_position(key),
            Terminal::Cluster(id) => center_of(*id),
        };
        if let Some((x, y)) = pos {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_x > max_x {
        return 0.0;
    }
    (max_x - min_x) + (max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Cluster;
    use crate::ids::NetId;

    fn cid(n: u32) -> ClusterId {
        ClusterId::from_raw(n)
    }

    fn board() -> Board {
        Board::from_rows(
            &[
                "ccmccccc", "ccmccccc", "ccmccdcc", "ccmccdcc", "ccmccdcc", "cccccdcc", "cccccdcc",
                "cccccccc",
            ],
            CellType::new('c'),
            0,
            "test",
        )
        .unwrap()
    }

    fn setup() -> (Netlist, Placement) {
        let clusters: BTreeMap<_, _> = (0..3).map(|i| (cid(i), Cluster::new(["c0"]))).collect();
        let nets = BTreeMap::from([
            (NetId::from_raw(0), ["x0", "x1"].iter().map(|s| s.to_string()).collect()),
            (NetId::from_raw(1), ["x1", "x2", "p0"].iter().map(|s| s.to_string()).collect()),
        ]);
        let fixed = BTreeMap::from([("p0".to_string(), (0.0, 7.0))]);
        let netlist = Netlist::from_keys(nets, fixed, &clusters).unwrap();

        let placement = Placement::from([
            (cid(0), ClusterBox::new(cid(0), 0, 0, 2, 2)),
            (cid(1), ClusterBox::new(cid(1), 1, 1, 3, 3)),
            (cid(2), ClusterBox::new(cid(2), 4, 4, 6, 6)),
        ]);
        (netlist, placement)
    }

    #[test]
    fn hpwl_of_two_centers() {
        let (netlist, placement) = setup();
        // net 0: centers (1,1) and (2,2) -> 1 + 1
        // net 1: (2,2), (5,5), (0,7) -> 5 + 5
        assert_eq!(total_hpwl(&netlist, &placement), 12.0);
    }

    #[test]
    fn hpwl_empty_netlist() {
        let (_, placement) = setup();
        assert_eq!(total_hpwl(&Netlist::default(), &placement), 0.0);
    }

    #[test]
    fn overlap_counts_each_pair_once() {
        let (_, placement) = setup();
        assert_eq!(total_overlap(&placement), 1);
    }

    #[test]
    fn legalization_charges_missing_blocks() {
        let board = board();
        let model = EnergyModel::default();
        let mut b = ClusterBox::new(cid(0), 1, 1, 3, 2);
        b.special_blocks.insert(CellType::new('m'), 3);
        // Column 2 is a memory lane, the box only covers two of its rows
        assert_eq!(model.box_legalization(&board, &b), 30.0);

        b.ymax = 3;
        assert_eq!(model.box_legalization(&board, &b), 0.0);
    }

    #[test]
    fn ignored_types_are_free() {
        let board = board();
        let mut model = EnergyModel::default();
        let mut b = ClusterBox::new(cid(0), 0, 0, 1, 1);
        b.special_blocks.insert(CellType::new('m'), 5);
        assert_eq!(model.box_legalization(&board, &b), 150.0);

        model.ignored.insert(CellType::new('m'));
        assert_eq!(model.box_legalization(&board, &b), 0.0);
    }

    #[test]
    fn total_is_sum_of_terms() {
        let board = board();
        let (netlist, mut placement) = setup();
        placement
            .get_mut(&cid(2))
            .unwrap()
            .special_blocks
            .insert(CellType::new('d'), 1);
        let model = EnergyModel::default();
        let expected = total_hpwl(&netlist, &placement)
            + total_overlap(&placement) as f64 * model.overlap_weight
            + model.total_legalization(&board, &placement);
        assert_eq!(model.total_energy(&board, &netlist, &placement), expected);
    }

    #[test]
    fn delta_matches_full_recomputation() {
        let board = board();
        let (netlist, mut placement) = setup();
        placement
            .get_mut(&cid(1))
            .unwrap()
            .special_blocks
            .insert(CellType::new('m'), 2);
        let index = NetlistIndex::build(&netlist);
        let model = EnergyModel::default();
        let before = model.total_energy(&board, &netlist, &placement);

        let mut candidate = placement[&cid(1)].clone();
        candidate.xmin += 1;
        candidate.xmax += 2;
        candidate.ymin -= 1;
        candidate.ymax -= 1;

        let delta = model.delta(&board, &netlist, &index, &placement, &candidate);
        placement.insert(cid(1), candidate);
        let after = model.total_energy(&board, &netlist, &placement);
        assert!((before + delta.total(model.overlap_weight) - after).abs() < 1e-9);
    }

    #[test]
    fn delta_of_unchanged_box_is_zero() {
        let board = board();
        let (netlist, placement) = setup();
        let index = NetlistIndex::build(&netlist);
        let model = EnergyModel::default();
        let delta = model.delta(&board, &netlist, &index, &placement, &placement[&cid(0)]);
        assert_eq!(delta, EnergyDelta::default());
    }
}
