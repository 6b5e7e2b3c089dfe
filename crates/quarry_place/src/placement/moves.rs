//! Single-box perturbations proposed to the annealer.

use crate::board::Board;
use crate::geometry::ClusterBox;
use crate::ids::ClusterId;
use crate::placement::Placement;
use rand::Rng;

/// Widens `b` rightward from its `xmin` until it spans enough generic
/// columns to hold `total_clb_size` blocks at its current height.
///
/// A column counts toward the width when its lane is the generic type or it
/// lies past the right board edge; special-purpose lanes are stepped over.
/// Legality is not checked here.
pub fn resize_to_capacity(b: &mut ClusterBox, board: &Board) {
    let height = (b.ymax - b.ymin).max(1) as usize;
    let required_width = b.total_clb_size.div_ceil(height);
    let generic = board.generic_type();

    let mut width = 0;
    let mut x = b.xmin;
    while width < required_width {
        x += 1;
        match board.lane(x) {
            Some(lane) if lane != generic => {}
            _ => width += 1,
        }
    }
    b.xmax = x;
}

/// Proposes one candidate move, or `None` if the perturbed box is illegal.
///
/// Picks a cluster uniformly from `order`, shifts its box by
/// `dx, dy ∈ {-1, 0, 1}` keeping its height, then regrows it to capacity.
/// The returned box is a fresh copy; the placement is untouched.
pub fn propose_move(
    rng: &mut impl Rng,
    order: &[ClusterId],
    placement: &Placement,
    board: &Board,
) -> Option<ClusterBox> {
    if order.is_empty() {
        return None;
    }
    let c_id = order[rng.gen_range(0..order.len())];
    let current = placement.get(&c_id)?;

    let dx = rng.gen_range(-1..=1);
    let dy = rng.gen_range(-1..=1);

    let mut candidate = current.clone();
    candidate.xmin += dx;
    candidate.ymin += dy;
    candidate.ymax += dy;
    resize_to_capacity(&mut candidate, board);

    candidate.is_legal(board).then_some(candidate)
}
