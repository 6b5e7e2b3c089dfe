//! Cluster placement and realization for the quarry FPGA placer.
//!
//! Clusters of netlist blocks are placed as rigid rectangles ("boxes") on a
//! heterogeneous [`Board`], refined by simulated annealing over wire length,
//! box overlap, and a special-block legalization penalty, then realized into
//! an exact, conflict-free cell assignment.
//!
//! # Pipeline
//!
//! 1. **Validate**: boxes outside the legal area are reported
//! 2. **Anneal**: [`ClusterAnnealer`] driven by the reference [`Annealer`]
//! 3. **Realize**: special blocks, overlap partition, generic claim, de-overlap
//!
//! # Usage
//!
//! ```ignore
//! use quarry_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
//! use quarry_place::place_clusters;
//!
//! let sink = DiagnosticSink::new();
//! let result = place_clusters(&board, &clusters, &netlist, &initial, &config, &sink);
//! let renderer = TerminalRenderer::new(true);
//! for diag in sink.take_all() {
//!     eprint!("{}", renderer.render(&diag));
//! }
//! for (id, cells) in &result?.realization.cells {
//!     println!("cluster {id}: {cells:?}");
//! }
//! ```

#![warn(missing_docs)]

pub mod board;
pub mod cluster;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod netlist;
pub mod placement;
pub mod realize;

pub use board::{analyze_lanes, Board, CellType};
pub use cluster::Cluster;
pub use error::{PlaceError, PlaceResult};
pub use geometry::ClusterBox;
pub use ids::{ClusterId, NetId};
pub use netlist::{Netlist, NetlistIndex, Terminal};
pub use placement::{AnnealProblem, AnnealStats, Annealer, ClusterAnnealer, EnergyModel, Placement};
pub use realize::{realize, Realization};

use quarry_config::PlacerConfig;
use quarry_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use std::collections::BTreeMap;

/// Everything a placement run produces.
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    /// Boxes after annealing.
    pub placement: Placement,
    /// The exact cell assignment.
    pub realization: Realization,
    /// Annealing counters.
    pub stats: AnnealStats,
}

/// Anneals `initial` and realizes the result.
///
/// The schedule, weights, and seed come from `config`; the same inputs and
/// seed always produce the same outcome.
pub fn place_clusters(
    board: &Board,
    clusters: &BTreeMap<ClusterId, Cluster>,
    netlist: &Netlist,
    initial: &Placement,
    config: &PlacerConfig,
    sink: &DiagnosticSink,
) -> PlaceResult<PlacementOutcome> {
    // 1. Validate
    for (id, b) in initial {
        if !b.is_legal(board) {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Input, 101),
                    format!("initial box of cluster {id} crosses the board margin"),
                )
                .with_label(Label::primary(b.region(), "initial box"))
                .with_label(Label::secondary(board.legal_region(), "legal area")),
            );
        }
    }

    // 2. Anneal
    let mut state = ClusterAnnealer::new(
        board.clone(),
        clusters.clone(),
        netlist.clone(),
        initial.clone(),
        config,
    )?;
    let annealer = Annealer::from_config(config, clusters.len());
    let stats = annealer.run(&mut state)?;
    sink.emit(
        Diagnostic::note(
            DiagnosticCode::new(Category::Anneal, 1),
            format!(
                "annealing finished after {} steps: {} moves accepted, {:.2}% improvement",
                stats.steps,
                stats.accepted,
                stats.improvement_percent()
            ),
        )
        .with_note(format!(
            "{} moves committed during the run, {} rejected, best state restored",
            state.changes(),
            stats.rejected
        ))
        .with_note(format!(
            "energy {:.3} -> {:.3}",
            stats.initial_energy, stats.best_energy
        )),
    );

    // 3. Realize
    let realization = realize(
        state.board(),
        state.clusters(),
        state.placement(),
        state.ignored_types(),
        sink,
    )?;

    Ok(PlacementOutcome {
        placement: state.placement().clone(),
        realization,
        stats,
    })
}
