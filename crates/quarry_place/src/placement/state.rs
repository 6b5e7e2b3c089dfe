//! The annealing state machine over cluster boxes.
//!
//! [`ClusterAnnealer`] holds the committed placement and its energy, and
//! walks each step through `Idle → Proposed → Committed | Discarded`. The
//! committed energy is maintained incrementally; with `verify_energy` on,
//! every proposal first checks it against a full recomputation.

use crate::board::{Board, CellType};
use crate::cluster::Cluster;
use crate::error::{PlaceError, PlaceResult};
use crate::geometry::ClusterBox;
use crate::ids::ClusterId;
use crate::netlist::{Netlist, NetlistIndex};
use crate::placement::anneal::AnnealProblem;
use crate::placement::cost::EnergyModel;
use crate::placement::moves::propose_move;
use crate::placement::Placement;
use quarry_common::InternalError;
use quarry_config::PlacerConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet};

/// Where the current annealing step stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    /// No step has run yet, or the state was just restored.
    Idle,
    /// A proposal is outstanding (possibly an empty one).
    Proposed,
    /// The last proposal was committed.
    Committed,
    /// The last proposal was discarded.
    Discarded,
}

#[derive(Debug, Clone)]
struct PendingMove {
    candidate: Option<ClusterBox>,
    energy: Option<f64>,
}

/// A restorable copy of the committed placement and its energy.
#[derive(Debug, Clone)]
pub struct PlacementSnapshot {
    placement: Placement,
    energy: f64,
}

/// Annealing state: inputs, committed placement, energy, and random source.
#[derive(Debug)]
pub struct ClusterAnnealer {
    board: Board,
    clusters: BTreeMap<ClusterId, Cluster>,
    netlist: Netlist,
    index: NetlistIndex,
    model: EnergyModel,
    order: Vec<ClusterId>,
    placement: Placement,
    energy: f64,
    initial_energy: f64,
    rng: StdRng,
    verify: bool,
    phase: StepPhase,
    pending: Option<PendingMove>,
    changes: u64,
    has_changed: bool,
}

impl ClusterAnnealer {
    /// Builds the annealing state from an initial placement.
    ///
    /// Every cluster needs exactly one box. Each box's demand snapshot is
    /// refreshed from its cluster, and every special type a cluster needs
    /// must be either ignored or have a legalization penalty.
    pub fn new(
        board: Board,
        clusters: BTreeMap<ClusterId, Cluster>,
        netlist: Netlist,
        mut placement: Placement,
        config: &PlacerConfig,
    ) -> PlaceResult<Self> {
        if let Some(&id) = placement.keys().find(|id| !clusters.contains_key(*id)) {
            return Err(PlaceError::UnknownCluster(id));
        }
        let model = EnergyModel::from_config(config);
        let generic = board.generic_type();
        for (&id, cluster) in &clusters {
            let b = placement.get_mut(&id).ok_or(PlaceError::MissingBox(id))?;
            b.c_id = id;
            b.refresh_demand(cluster, generic);
            if let Some(&t) = b
                .special_blocks
                .keys()
                .find(|t| !model.ignored.contains(*t) && !model.penalties.contains_key(*t))
            {
                return Err(PlaceError::MissingPenalty(t));
            }
        }

        let index = NetlistIndex::build(&netlist);
        let energy = model.total_energy(&board, &netlist, &placement);
        Ok(Self {
            order: clusters.keys().copied().collect(),
            board,
            clusters,
            netlist,
            index,
            model,
            placement,
            energy,
            initial_energy: energy,
            rng: StdRng::seed_from_u64(config.seed),
            verify: config.verify_energy,
            phase: StepPhase::Idle,
            pending: None,
            changes: 0,
            has_changed: false,
        })
    }

    /// The board being placed on.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The clusters being placed.
    pub fn clusters(&self) -> &BTreeMap<ClusterId, Cluster> {
        &self.clusters
    }

    /// The committed placement.
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Energy of the placement passed to [`new`](Self::new).
    pub fn initial_energy(&self) -> f64 {
        self.initial_energy
    }

    /// Number of committed non-empty moves.
    pub fn changes(&self) -> u64 {
        self.changes
    }

    /// Whether the last commit changed the placement.
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    /// Current step phase.
    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// The outstanding candidate box, if any.
    pub fn candidate(&self) -> Option<&ClusterBox> {
        self.pending.as_ref().and_then(|p| p.candidate.as_ref())
    }

    /// Clusters whose committed box crosses the board margin.
    pub fn illegal_boxes(&self) -> Vec<&ClusterBox> {
        self.placement
            .values()
            .filter(|b| !b.is_legal(&self.board))
            .collect()
    }

    /// Special types that carry no legalization penalty and are left out of
    /// realization.
    pub fn ignored_types(&self) -> &BTreeSet<CellType> {
        &self.model.ignored
    }

    /// Energy of the committed placement recomputed from scratch.
    pub fn full_energy(&self) -> f64 {
        self.model
            .total_energy(&self.board, &self.netlist, &self.placement)
    }

    /// Checks the maintained energy against a full recomputation.
    pub fn check_energy(&self) -> Result<(), InternalError> {
        let reference = self.full_energy();
        let tolerance = 1e-6 * reference.abs().max(1.0);
        if (reference - self.energy).abs() > tolerance {
            return Err(InternalError::new(format!(
                "incremental energy {} diverged from full recomputation {reference}",
                self.energy
            )));
        }
        Ok(())
    }
}

impl AnnealProblem for ClusterAnnealer {
    type Snapshot = PlacementSnapshot;

    fn propose(&mut self) -> PlaceResult<()> {
        if self.phase == StepPhase::Proposed {
            return Err(
                InternalError::new("new move proposed before the last one was resolved").into(),
            );
        }
        if self.verify {
            self.check_energy()?;
        }
        let candidate = propose_move(&mut self.rng, &self.order, &self.placement, &self.board);
        self.pending = Some(PendingMove {
            candidate,
            energy: None,
        });
        self.phase = StepPhase::Proposed;
        Ok(())
    }

    fn cost(&mut self) -> f64 {
        let Some(pending) = self.pending.as_mut() else {
            return self.energy;
        };
        if let Some(energy) = pending.energy {
            return energy;
        }
        let energy = match &pending.candidate {
            Some(candidate) => {
                let delta = self.model.delta(
                    &self.board,
                    &self.netlist,
                    &self.index,
                    &self.placement,
                    candidate,
                );
                self.energy + delta.total(self.model.overlap_weight)
            }
            None => self.energy,
        };
        pending.energy = Some(energy);
        energy
    }

    fn commit(&mut self) {
        let energy = self.cost();
        match self.pending.take().and_then(|p| p.candidate) {
            Some(candidate) => {
                self.placement.insert(candidate.c_id, candidate);
                self.energy = energy;
                self.changes += 1;
                self.has_changed = true;
            }
            None => self.has_changed = false,
        }
        self.phase = StepPhase::Committed;
    }

    fn discard(&mut self) {
        self.pending = None;
        self.phase = StepPhase::Discarded;
    }

    fn current_energy(&self) -> f64 {
        self.energy
    }

    fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    fn snapshot(&self) -> PlacementSnapshot {
        PlacementSnapshot {
            placement: self.placement.clone(),
            energy: self.energy,
        }
    }

    fn restore(&mut self, snapshot: PlacementSnapshot) {
        self.placement = snapshot.placement;
        self.energy = snapshot.energy;
        self.pending = None;
        self.phase = StepPhase::Idle;
    }
}
