//! Box-level placement by simulated annealing.
//!
//! A [`Placement`] maps every cluster to one [`ClusterBox`]. The
//! [`ClusterAnnealer`] perturbs one box per step, scores it with the
//! [`EnergyModel`], and the generic [`Annealer`] decides what to keep.

pub mod anneal;
pub mod cost;
pub mod moves;
pub mod state;

use crate::geometry::ClusterBox;
use crate::ids::ClusterId;
use std::collections::BTreeMap;

pub use anneal::{AnnealProblem, AnnealStats, Annealer};
pub use cost::{total_hpwl, total_overlap, EnergyDelta, EnergyModel};
pub use moves::{propose_move, resize_to_capacity};
pub use state::{ClusterAnnealer, PlacementSnapshot, StepPhase};

/// Cluster boxes keyed by cluster.
pub type Placement = BTreeMap<ClusterId, ClusterBox>;
