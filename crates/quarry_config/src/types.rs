//! Configuration types deserialized from `quarry.toml`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Block type character of registers, which fold mode leaves out of legalization.
pub const REGISTER_TYPE: char = 'r';

/// The top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuarryConfig {
    /// Annealing and legalization settings.
    #[serde(default)]
    pub placer: PlacerConfig,
}

/// Every tunable of the cluster placer.
///
/// Missing fields take the defaults from [`PlacerConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerConfig {
    /// Energy added per unit of box-on-box overlap area.
    pub overlap_weight: f64,
    /// Energy added per missing special block, keyed by block type.
    pub legalization_penalty: BTreeMap<char, f64>,
    /// Block types never charged a legalization penalty and never assigned
    /// exact cells during realization.
    pub ignored_legalization_types: BTreeSet<char>,
    /// Registers are folded into logic cells, so `r` is treated as ignored.
    pub fold_mode: bool,
    /// Starting temperature of the annealing schedule.
    pub t_max: f64,
    /// Final temperature of the annealing schedule.
    pub t_min: f64,
    /// Annealing steps per cluster; the total budget scales with cluster count.
    pub steps_per_cluster: u64,
    /// Seed of the single random source owned by the annealing state.
    pub seed: u64,
    /// Cross-check the incremental energy against a full recomputation at
    /// the start of every step.
    pub verify_energy: bool,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            overlap_weight: 30.0,
            legalization_penalty: BTreeMap::from([('m', 30.0), ('d', 200.0)]),
            ignored_legalization_types: BTreeSet::new(),
            fold_mode: true,
            t_max: 10.0,
            t_min: 0.1,
            steps_per_cluster: 3000,
            seed: 0,
            verify_energy: cfg!(debug_assertions),
        }
    }
}

impl PlacerConfig {
    /// Returns the effective set of ignored block types, including the
    /// register type when fold mode is on.
    pub fn ignored_types(&self) -> BTreeSet<char> {
        let mut ignored = self.ignored_legalization_types.clone();
        if self.fold_mode {
            ignored.insert(REGISTER_TYPE);
        }
        ignored
    }

    /// Total annealing iteration budget for the given number of clusters.
    pub fn iteration_budget(&self, cluster_count: usize) -> u64 {
        self.steps_per_cluster.saturating_mul(cluster_count as u64)
    }
}
