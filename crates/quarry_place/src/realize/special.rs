//! Special-block assignment: exact cells for memory, DSP and other typed blocks.

use super::{nearest_first, CellSets};
use crate::board::{Board, CellType};
use crate::error::{PlaceError, PlaceResult};
use crate::geometry::ClusterBox;
use crate::ids::ClusterId;
use crate::realize::occupancy::Occupancy;
use quarry_common::GridPos;
use quarry_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use std::collections::BTreeMap;

/// Claims cells for every special type `demand` lists.
///
/// Cells inside the box footprint are taken first in row-major order. Any
/// shortfall is filled from the unclaimed cells of that type anywhere on the
/// board, nearest to the box center first.
pub fn assign_special(
    board: &Board,
    cluster: ClusterId,
    b: &ClusterBox,
    demand: &BTreeMap<CellType, usize>,
    occupancy: &mut Occupancy,
    sink: &DiagnosticSink,
) -> PlaceResult<CellSets> {
    let mut assigned = CellSets::new();
    let mut remaining = demand.clone();

    for pos in b.region().cells() {
        let Some(t) = board.cell_type(pos) else {
            continue;
        };
        let Some(left) = remaining.get_mut(&t) else {
            continue;
        };
        if *left == 0 || occupancy.is_claimed(pos) {
            continue;
        }
        occupancy.claim(pos, cluster)?;
        assigned.entry(t).or_default().insert(pos);
        *left -= 1;
    }

    let center = b.center();
    for (&t, &left) in &remaining {
        if left == 0 {
            continue;
        }
        let mut free: Vec<GridPos> = board
            .cells()
            .filter(|&(pos, ct)| ct == t && !occupancy.is_claimed(pos))
            .map(|(pos, _)| pos)
            .collect();
        if free.len() < left {
            return Err(PlaceError::InfeasibleDemand {
                cell_type: t,
                required: left,
                available: free.len(),
            });
        }
        nearest_first(&mut free, center);
        for &pos in &free[..left] {
            occupancy.claim(pos, cluster)?;
            assigned.entry(t).or_default().insert(pos);
        }
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::new(Category::Legalize, 101),
                format!("cluster {cluster}: {left} '{t}' block(s) placed outside its box"),
            )
            .with_label(Label::primary(b.region(), "cluster box")),
        );
    }

    Ok(assigned)
}
