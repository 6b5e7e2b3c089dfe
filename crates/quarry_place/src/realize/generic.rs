//! Generic-cell claim and de-overlap.
//!
//! Each cluster first takes the uncontested generic cells of its own box.
//! Whatever is still missing is grown outward from the cells it already
//! holds: the search radius starts at 2 and widens by 2 on each fruitless
//! attempt, the last attempt scans the whole board, and any progress resets
//! the radius. Candidates are taken nearest to the board center first.

use super::nearest_first;
use crate::board::Board;
use crate::error::{PlaceError, PlaceResult};
use crate::geometry::ClusterBox;
use crate::ids::ClusterId;
use crate::realize::occupancy::Occupancy;
use quarry_common::{GridPos, QuarryResult};
use quarry_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use std::collections::BTreeSet;

/// Attempts de-overlap makes without progress before giving up.
pub const MAX_EFFORT: u32 = 5;

/// Claims up to `needed` generic cells inside the box, skipping claimed,
/// contested, and margin cells.
pub fn claim_in_box(
    board: &Board,
    cluster: ClusterId,
    b: &ClusterBox,
    needed: usize,
    contested: &BTreeSet<GridPos>,
    occupancy: &mut Occupancy,
) -> QuarryResult<BTreeSet<GridPos>> {
    let generic = board.generic_type();
    let mut claimed = BTreeSet::new();
    for pos in b.region().cells() {
        if claimed.len() == needed {
            break;
        }
        if occupancy.is_claimed(pos) || contested.contains(&pos) || !board.is_cell_legal(pos, generic) {
            continue;
        }
        occupancy.claim(pos, cluster)?;
        claimed.insert(pos);
    }
    Ok(claimed)
}

/// Unclaimed legal generic cells within `reach` Manhattan hops of any seed,
/// or anywhere on the board when `reach` is `None`, nearest to the board
/// center first.
pub fn exterior_cells(
    board: &Board,
    occupancy: &Occupancy,
    seeds: &[GridPos],
    reach: Option<i32>,
) -> Vec<GridPos> {
    let generic = board.generic_type();
    let free = |pos: GridPos| !occupancy.is_claimed(pos) && board.is_cell_legal(pos, generic);

    let mut found = BTreeSet::new();
    match reach {
        None => found.extend(board.legal_region().cells().filter(|&pos| free(pos))),
        Some(d) => {
            for &(x, y) in seeds {
                for dy in -d..=d {
                    let span = d - dy.abs();
                    for dx in -span..=span {
                        let pos = (x + dx, y + dy);
                        if free(pos) {
                            found.insert(pos);
                        }
                    }
                }
            }
        }
    }

    let mut cells: Vec<GridPos> = found.into_iter().collect();
    nearest_first(&mut cells, board.center());
    cells
}

/// Grows `claimed` until it holds `needed` cells.
///
/// Fails with [`PlaceError::LegalizationExhausted`] after [`MAX_EFFORT`]
/// consecutive attempts without progress.
pub fn de_overlap(
    board: &Board,
    cluster: ClusterId,
    b: &ClusterBox,
    needed: usize,
    claimed: &mut BTreeSet<GridPos>,
    occupancy: &mut Occupancy,
    sink: &DiagnosticSink,
) -> PlaceResult<()> {
    let mut effort = 0;
    let mut escalated = false;

    while claimed.len() < needed && effort < MAX_EFFORT {
        let whole_board = effort == MAX_EFFORT - 1;
        if whole_board && !escalated {
            escalated = true;
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Legalize, 102),
                    format!(
                        "cluster {cluster}: searching the whole board for {} generic cell(s)",
                        needed - claimed.len()
                    ),
                )
                .with_label(Label::primary(b.region(), "cluster box")),
            );
        }

        // A cluster holding nothing yet grows from its box footprint
        let seeds: Vec<GridPos> = if claimed.is_empty() {
            b.region().cells().collect()
        } else {
            claimed.iter().copied().collect()
        };
        let reach = (!whole_board).then_some((effort as i32 + 1) * 2);

        let before = claimed.len();
        for pos in exterior_cells(board, occupancy, &seeds, reach) {
            if claimed.len() == needed {
                break;
            }
            occupancy.claim(pos, cluster)?;
            claimed.insert(pos);
        }

        if claimed.len() > before {
            effort = 0;
        } else {
            effort += 1;
        }
    }

    if claimed.len() < needed {
        sink.emit(
            Diagnostic::error(
                DiagnosticCode::new(Category::Legalize, 2),
                format!(
                    "cluster {cluster}: only {} of {needed} generic cells could be claimed",
                    claimed.len()
                ),
            )
            .with_label(Label::primary(b.region(), "cluster box"))
            .with_help("the board has too few free generic cells left for this placement"),
        );
        return Err(PlaceError::LegalizationExhausted {
            cluster,
            needed,
            claimed: claimed.len(),
        });
    }
    Ok(())
}
