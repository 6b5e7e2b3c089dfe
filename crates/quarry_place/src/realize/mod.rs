//! Realization: turning annealed boxes into an exact, conflict-free cell
//! assignment.
//!
//! Runs once after annealing, in order:
//!
//! 1. special blocks get exact cells of their type ([`special`]);
//! 2. the cells each box shares with other boxes are marked contested
//!    ([`overlap`]);
//! 3. clusters are ordered most contested first;
//! 4. each cluster claims the uncontested generic cells of its box, then
//!    grows outward until its demand is met ([`generic`]);
//! 5. per-type centroids are computed over the claimed cells.
//!
//! Every claim goes through one [`Occupancy`] grid, so no cell ends up owned
//! twice.

pub mod generic;
pub mod occupancy;
pub mod overlap;
pub mod special;

pub use occupancy::Occupancy;

use crate::board::{Board, CellType};
use crate::cluster::Cluster;
use crate::error::{PlaceError, PlaceResult};
use crate::ids::ClusterId;
use crate::placement::Placement;
use quarry_common::GridPos;
use quarry_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Cells claimed by one cluster, by type.
pub type CellSets = BTreeMap<CellType, BTreeSet<GridPos>>;

/// The outcome of realization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Realization {
    /// Claimed cells per cluster and type.
    pub cells: BTreeMap<ClusterId, CellSets>,
    /// Centroid of each non-empty cell set.
    pub centroids: BTreeMap<ClusterId, BTreeMap<CellType, (f64, f64)>>,
}

impl Realization {
    /// Cells of `cell_type` claimed by `cluster`.
    pub fn cells_of(&self, cluster: ClusterId, cell_type: CellType) -> Option<&BTreeSet<GridPos>> {
        self.cells.get(&cluster).and_then(|sets| sets.get(&cell_type))
    }

    /// Centroid of the cells of `cell_type` claimed by `cluster`.
    pub fn centroid(&self, cluster: ClusterId, cell_type: CellType) -> Option<(f64, f64)> {
        self.centroids
            .get(&cluster)
            .and_then(|c| c.get(&cell_type))
            .copied()
    }

    /// Total number of claimed cells.
    pub fn cell_count(&self) -> usize {
        self.cells
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }
}

/// What one cluster needs realized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Demand {
    /// Generic cells.
    pub generic: usize,
    /// Special cells by type, ignored types left out.
    pub special: BTreeMap<CellType, usize>,
}

impl Demand {
    /// Reads a cluster's demand.
    pub fn of(cluster: &Cluster, generic: CellType, ignored: &BTreeSet<CellType>) -> Self {
        let mut special = cluster.special_demand(generic);
        special.retain(|t, _| !ignored.contains(t));
        Self {
            generic: cluster.generic_count(generic),
            special,
        }
    }
}

/// Realizes `placement` into exact cells.
///
/// Special types in `ignored` are not assigned. Fails up front with
/// [`PlaceError::InfeasibleDemand`] when the board lacks enough cells of a
/// special type for all clusters together, and with
/// [`PlaceError::LegalizationExhausted`] when a cluster's generic demand
/// cannot be met.
pub fn realize(
    board: &Board,
    clusters: &BTreeMap<ClusterId, Cluster>,
    placement: &Placement,
    ignored: &BTreeSet<CellType>,
    sink: &DiagnosticSink,
) -> PlaceResult<Realization> {
    if let Some(&id) = placement.keys().find(|id| !clusters.contains_key(*id)) {
        return Err(PlaceError::UnknownCluster(id));
    }
    let generic = board.generic_type();
    let demands: BTreeMap<ClusterId, Demand> = clusters
        .iter()
        .map(|(&id, c)| (id, Demand::of(c, generic, ignored)))
        .collect();
    check_supply(board, &demands, sink)?;

    let mut occupancy = Occupancy::new(board);
    let mut cells: BTreeMap<ClusterId, CellSets> = BTreeMap::new();

    for (&id, demand) in &demands {
        let b = placement.get(&id).ok_or(PlaceError::MissingBox(id))?;
        let assigned = special::assign_special(board, id, b, &demand.special, &mut occupancy, sink)?;
        cells.insert(id, assigned);
    }

    let contested = overlap::contested_cells(placement);
    let generic_demand: BTreeMap<ClusterId, usize> =
        demands.iter().map(|(&id, d)| (id, d.generic)).collect();
    let no_contest = BTreeSet::new();

    for id in overlap::resolution_order(&contested, &generic_demand) {
        let b = placement.get(&id).ok_or(PlaceError::MissingBox(id))?;
        let needed = generic_demand[&id];
        let shared = contested.get(&id).unwrap_or(&no_contest);
        let mut claimed = generic::claim_in_box(board, id, b, needed, shared, &mut occupancy)?;
        generic::de_overlap(board, id, b, needed, &mut claimed, &mut occupancy, sink)?;
        cells.entry(id).or_default().insert(generic, claimed);
    }

    let centroids = cells
        .iter()
        .map(|(&id, sets)| {
            let per_type: BTreeMap<CellType, (f64, f64)> = sets
                .iter()
                .filter_map(|(&t, set)| centroid(set).map(|c| (t, c)))
                .collect();
            (id, per_type)
        })
        .collect();

    sink.emit(Diagnostic::note(
        DiagnosticCode::new(Category::Legalize, 201),
        format!(
            "realized {} cluster(s) on {} cell(s)",
            cells.len(),
            occupancy.claimed_count()
        ),
    ));

    Ok(Realization { cells, centroids })
}

/// Compares each special type's total demand with the board's supply.
fn check_supply(
    board: &Board,
    demands: &BTreeMap<ClusterId, Demand>,
    sink: &DiagnosticSink,
) -> PlaceResult<()> {
    let mut totals: BTreeMap<CellType, usize> = BTreeMap::new();
    for demand in demands.values() {
        for (&t, &n) in &demand.special {
            *totals.entry(t).or_default() += n;
        }
    }

    for (t, required) in totals {
        let available = board.count_of(t);
        if available < required {
            sink.emit(
                Diagnostic::error(
                    DiagnosticCode::new(Category::Legalize, 1),
                    format!("not enough '{t}' cells on the board"),
                )
                .with_note(format!("{required} required, {available} available")),
            );
            return Err(PlaceError::InfeasibleDemand {
                cell_type: t,
                required,
                available,
            });
        }
    }
    Ok(())
}

fn centroid(cells: &BTreeSet<GridPos>) -> Option<(f64, f64)> {
    if cells.is_empty() {
        return None;
    }
    let n = cells.len() as f64;
    let (sx, sy) = cells
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x as f64, sy + y as f64));
    Some((sx / n, sy / n))
}

/// Sorts cells by Manhattan distance to `target`, then by row and column.
pub(crate) fn nearest_first(cells: &mut [GridPos], target: (f64, f64)) {
    let dist = |(x, y): GridPos| (x as f64 - target.0).abs() + (y as f64 - target.1).abs();
    cells.sort_by(|a, b| {
        dist(*a)
            .total_cmp(&dist(*b))
            .then((a.1, a.0).cmp(&(b.1, b.0)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ClusterBox;

    fn cid(n: u32) -> ClusterId {
        ClusterId::from_raw(n)
    }

    fn board() -> Board {
        let rows = [
            "cccccccccc",
            "ccmccccdcc",
            "ccmccccdcc",
            "ccmccccccc",
            "ccmccccccc",
            "ccmccccccc",
            "ccmccccccc",
            "ccmccccccc",
            "ccmccccccc",
            "cccccccccc",
        ];
        Board::from_rows(&rows, CellType::new('c'), 1, "test").unwrap()
    }

    fn inputs() -> (BTreeMap<ClusterId, Cluster>, Placement) {
        let clusters = BTreeMap::from([
            (cid(0), Cluster::new(["c0", "c1", "c2", "c3", "m0", "m1", "r0"])),
            (cid(1), Cluster::new(["c4", "c5", "c6", "d0"])),
            (cid(2), Cluster::new(["c7", "c8", "m2"])),
        ]);
        let placement = Placement::from([
            (cid(0), ClusterBox::new(cid(0), 1, 1, 4, 2)),
            (cid(1), ClusterBox::new(cid(1), 4, 1, 7, 2)),
            (cid(2), ClusterBox::new(cid(2), 1, 5, 3, 6)),
        ]);
        (clusters, placement)
    }

    fn ignored() -> BTreeSet<CellType> {
        BTreeSet::from([CellType::new('r')])
    }

    #[test]
    fn every_cluster_gets_exact_counts() {
        let board = board();
        let (clusters, placement) = inputs();
        let sink = DiagnosticSink::new();
        let r = realize(&board, &clusters, &placement, &ignored(), &sink).unwrap();

        let c = CellType::new('c');
        for (&id, cluster) in &clusters {
            let demand = Demand::of(cluster, c, &ignored());
            assert_eq!(r.cells_of(id, c).map_or(0, BTreeSet::len), demand.generic);
            for (t, &n) in &demand.special {
                let got = r.cells_of(id, *t).unwrap();
                assert_eq!(got.len(), n);
                assert!(got.iter().all(|&p| board.cell_type(p) == Some(*t)));
            }
        }
        assert!(r.cells_of(cid(0), CellType::new('r')).is_none());
        assert_eq!(r.cell_count(), 4 + 2 + 3 + 1 + 2 + 1);
    }

    #[test]
    fn no_cell_is_claimed_twice() {
        let board = board();
        let (clusters, placement) = inputs();
        let sink = DiagnosticSink::new();
        let r = realize(&board, &clusters, &placement, &ignored(), &sink).unwrap();

        let mut seen = BTreeSet::new();
        for sets in r.cells.values() {
            for &pos in sets.values().flatten() {
                assert!(seen.insert(pos), "{pos:?} claimed twice");
            }
        }
    }

    #[test]
    fn centroids_average_claimed_cells() {
        let board = board();
        let (clusters, placement) = inputs();
        let sink = DiagnosticSink::new();
        let r = realize(&board, &clusters, &placement, &ignored(), &sink).unwrap();
        // Cluster 0 takes both memory cells of column 2 inside its box
        assert_eq!(r.centroid(cid(0), CellType::new('m')), Some((2.0, 1.5)));
        assert_eq!(r.centroid(cid(1), CellType::new('d')), Some((7.0, 1.0)));
    }

    #[test]
    fn summary_note_emitted() {
        let board = board();
        let (clusters, placement) = inputs();
        let sink = DiagnosticSink::new();
        realize(&board, &clusters, &placement, &ignored(), &sink).unwrap();
        let diags = sink.diagnostics();
        assert_eq!(diags.last().unwrap().code.to_string(), "L201");
        assert!(!sink.has_errors());
    }

    #[test]
    fn total_shortage_fails_before_claiming() {
        let board = board();
        let clusters = BTreeMap::from([(cid(0), Cluster::new(["c0", "d0", "d1", "d2"]))]);
        let placement = Placement::from([(cid(0), ClusterBox::new(cid(0), 6, 1, 8, 3))]);
        let sink = DiagnosticSink::new();
        let err = realize(&board, &clusters, &placement, &ignored(), &sink).unwrap_err();
        assert!(matches!(
            err,
            PlaceError::InfeasibleDemand { required: 3, available: 2, .. }
        ));
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn missing_and_unknown_boxes_rejected() {
        let board = board();
        let (clusters, mut placement) = inputs();
        let sink = DiagnosticSink::new();

        let mut extra = placement.clone();
        extra.insert(cid(7), ClusterBox::new(cid(7), 1, 1, 2, 2));
        let err = realize(&board, &clusters, &extra, &ignored(), &sink).unwrap_err();
        assert!(matches!(err, PlaceError::UnknownCluster(id) if id == cid(7)));

        placement.remove(&cid(1));
        let err = realize(&board, &clusters, &placement, &ignored(), &sink).unwrap_err();
        assert!(matches!(err, PlaceError::MissingBox(id) if id == cid(1)));
    }

    #[test]
    fn nearest_first_breaks_ties_by_row() {
        let mut cells = vec![(4, 2), (2, 4), (3, 3), (2, 2)];
        nearest_first(&mut cells, (3.0, 3.0));
        assert_eq!(cells, vec![(3, 3), (2, 2), (4, 2), (2, 4)]);
    }
}
