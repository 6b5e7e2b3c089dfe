//! Simulated annealing driver.
//!
//! The driver owns the temperature schedule and the Metropolis acceptance
//! rule; the problem being annealed owns its state, its moves, and the random
//! source. Each step is `propose → cost → commit | discard`. The temperature
//! decays exponentially from `t_max` to `t_min` over a fixed step budget, and
//! the best state seen is restored at the end.

use crate::error::PlaceResult;
use quarry_config::PlacerConfig;
use rand::rngs::StdRng;
use rand::Rng;

/// The contract a problem offers to the annealing driver.
pub trait AnnealProblem {
    /// A restorable copy of the committed state.
    type Snapshot;

    /// Proposes zero or one candidate move.
    fn propose(&mut self) -> PlaceResult<()>;

    /// Energy the state would have if the outstanding candidate were
    /// committed, or the current energy when there is none.
    fn cost(&mut self) -> f64;

    /// Applies the outstanding candidate, if any.
    fn commit(&mut self);

    /// Drops the outstanding candidate.
    fn discard(&mut self);

    /// Energy of the committed state.
    fn current_energy(&self) -> f64;

    /// The problem's single random source, shared with the driver so a run
    /// is reproducible from one seed.
    fn rng(&mut self) -> &mut StdRng;

    /// Copies the committed state.
    fn snapshot(&self) -> Self::Snapshot;

    /// Replaces the committed state.
    fn restore(&mut self, snapshot: Self::Snapshot);
}

/// Temperature schedule and step budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Annealer {
    /// Starting temperature.
    pub t_max: f64,
    /// Final temperature.
    pub t_min: f64,
    /// Number of steps to run.
    pub steps: u64,
}

/// Counters collected over one annealing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnealStats {
    /// Steps executed.
    pub steps: u64,
    /// Candidates committed (including zero-move steps).
    pub accepted: u64,
    /// Candidates discarded.
    pub rejected: u64,
    /// Energy before the first step.
    pub initial_energy: f64,
    /// Energy of the restored best state.
    pub best_energy: f64,
}

impl AnnealStats {
    /// Relative improvement of the best energy over the initial one, in percent.
    pub fn improvement_percent(&self) -> f64 {
        if self.initial_energy == 0.0 {
            return 0.0;
        }
        (self.initial_energy - self.best_energy) / self.initial_energy * 100.0
    }
}

impl Annealer {
    /// Builds the schedule from the config for `cluster_count` clusters.
    pub fn from_config(config: &PlacerConfig, cluster_count: usize) -> Self {
        Self {
            t_max: config.t_max,
            t_min: config.t_min,
            steps: config.iteration_budget(cluster_count),
        }
    }

    /// Temperature at `step` of the run.
    pub fn temperature(&self, step: u64) -> f64 {
        if self.steps == 0 {
            return self.t_max;
        }
        let factor = -(self.t_max / self.t_min).ln();
        self.t_max * (factor * step as f64 / self.steps as f64).exp()
    }

    /// Anneals `problem` for the full step budget and leaves it in the best
    /// state seen.
    pub fn run<P: AnnealProblem>(&self, problem: &mut P) -> PlaceResult<AnnealStats> {
        let initial_energy = problem.current_energy();
        let mut stats = AnnealStats {
            initial_energy,
            best_energy: initial_energy,
            ..AnnealStats::default()
        };
        let mut best = problem.snapshot();

        for step in 1..=self.steps {
            let temperature = self.temperature(step);
            problem.propose()?;
            let energy = problem.cost();
            let delta = energy - problem.current_energy();

            let accept = delta <= 0.0 || problem.rng().gen::<f64>() < (-delta / temperature).exp();
            if accept {
                problem.commit();
                stats.accepted += 1;
                if energy < stats.best_energy {
                    stats.best_energy = energy;
                    best = problem.snapshot();
                }
            } else {
                problem.discard();
                stats.rejected += 1;
            }
            stats.steps = step;
        }

        problem.restore(best);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Walks an integer toward zero with energy `x^2`.
    struct Walk {
        x: i64,
        pending: Option<i64>,
        rng: StdRng,
    }

    impl AnnealProblem for Walk {
        type Snapshot = i64;

        fn propose(&mut self) -> PlaceResult<()> {
            let step = if self.rng.gen::<bool>() { 1 } else { -1 };
            self.pending = Some(self.x + step);
            Ok(())
        }

        fn cost(&mut self) -> f64 {
            let x = self.pending.unwrap_or(self.x);
            (x * x) as f64
        }

        fn commit(&mut self) {
            if let Some(x) = self.pending.take() {
                self.x = x;
            }
        }

        fn discard(&mut self) {
            self.pending = None;
        }

        fn current_energy(&self) -> f64 {
            (self.x * self.x) as f64
        }

        fn rng(&mut self) -> &mut StdRng {
            &mut self.rng
        }

        fn snapshot(&self) -> i64 {
            self.x
        }

        fn restore(&mut self, snapshot: i64) {
            self.x = snapshot;
        }
    }

    fn walk(seed: u64) -> Walk {
        Walk {
            x: 40,
            pending: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[test]
    fn schedule_endpoints() {
        let annealer = Annealer {
            t_max: 10.0,
            t_min: 0.1,
            steps: 100,
        };
        assert!((annealer.temperature(0) - 10.0).abs() < 1e-12);
        assert!((annealer.temperature(100) - 0.1).abs() < 1e-12);
        assert!(annealer.temperature(50) < annealer.temperature(49));
    }

    #[test]
    fn run_finds_minimum_and_restores_best() {
        let annealer = Annealer {
            t_max: 10.0,
            t_min: 0.1,
            steps: 5000,
        };
        let mut problem = walk(1);
        let stats = annealer.run(&mut problem).unwrap();
        assert_eq!(stats.steps, 5000);
        assert_eq!(stats.accepted + stats.rejected, 5000);
        assert_eq!(problem.current_energy(), stats.best_energy);
        assert!(stats.best_energy <= stats.initial_energy);
        assert_eq!(problem.x, 0);
        assert!((stats.improvement_percent() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_budget_is_a_no_op() {
        let annealer = Annealer {
            t_max: 10.0,
            t_min: 0.1,
            steps: 0,
        };
        let mut problem = walk(1);
        let stats = annealer.run(&mut problem).unwrap();
        assert_eq!(stats.steps, 0);
        assert_eq!(problem.x, 40);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let annealer = Annealer {
            t_max: 50.0,
            t_min: 1.0,
            steps: 300,
        };
        let (mut a, mut b) = (walk(9), walk(9));
        let sa = annealer.run(&mut a).unwrap();
        let sb = annealer.run(&mut b).unwrap();
        assert_eq!(sa, sb);
        assert_eq!(a.x, b.x);
    }

    #[test]
    fn from_config_scales_budget() {
        let config = PlacerConfig {
            steps_per_cluster: 10,
            ..PlacerConfig::default()
        };
        let annealer = Annealer::from_config(&config, 4);
        assert_eq!(annealer.steps, 40);
        assert_eq!(annealer.t_max, config.t_max);
    }
}
