//! Error type for the placement and realization pipeline.

use crate::board::CellType;
use crate::ids::{ClusterId, NetId};
use quarry_common::InternalError;

/// Result alias used throughout the placer.
pub type PlaceResult<T> = Result<T, PlaceError>;

/// Failures surfaced by the placer.
///
/// Illegal moves are never errors; they become no-op annealing steps.
/// `InfeasibleDemand` and `LegalizationExhausted` mean the board cannot hold
/// this placement. `Internal` means an invariant was broken.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The whole board has fewer cells of a type than the clusters demand.
    #[error("not enough '{cell_type}' cells on the board: {required} required, {available} available")]
    InfeasibleDemand {
        /// The block type in short supply.
        cell_type: CellType,
        /// Cells still required when the search ran out.
        required: usize,
        /// Unclaimed cells of that type left on the board.
        available: usize,
    },

    /// De-overlap gave up on a cluster after every escalation tier.
    #[error("could not legalize cluster {cluster}: claimed {claimed} of {needed} generic cells")]
    LegalizationExhausted {
        /// The cluster left short.
        cluster: ClusterId,
        /// Generic cells the cluster needs.
        needed: usize,
        /// Generic cells it ended up with.
        claimed: usize,
    },

    /// The board geometry is malformed.
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    /// A net references a fixed terminal or cluster that does not exist.
    #[error("net {net} references unknown terminal '{key}'")]
    UnknownTerminal {
        /// The offending net.
        net: NetId,
        /// The terminal key as given.
        key: String,
    },

    /// The initial placement has no box for a cluster.
    #[error("initial placement has no box for cluster {0}")]
    MissingBox(ClusterId),

    /// The initial placement has a box for a cluster that does not exist.
    #[error("initial placement has a box for unknown cluster {0}")]
    UnknownCluster(ClusterId),

    /// A cluster needs a special block type that has no legalization penalty.
    #[error("no legalization penalty configured for block type '{0}'")]
    MissingPenalty(CellType),

    /// An internal invariant was violated.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
