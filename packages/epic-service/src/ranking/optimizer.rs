use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::{
	Error, Result,
	ranking::{ScoredItem, objective::NdcgObjective},
};

/// Outcome of one optimizer run.
#[derive(Clone, Debug)]
pub struct Optimized {
	pub ordering: Vec<ScoredItem>,
	pub iterations: u32,
	/// NDCG@k of `ordering`.
	pub objective: f64,
}

/// Reorders a scored candidate list to maximize NDCG@k.
pub trait Optimizer {
	fn optimize(&self, ordering: Vec<ScoredItem>, k: usize) -> Optimized;
}

/// Keeps the incoming order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Baseline;
impl Optimizer for Baseline {
	fn optimize(&self, ordering: Vec<ScoredItem>, k: usize) -> Optimized {
		let objective = NdcgObjective::new(&ordering, k).evaluate(&ordering);

		Optimized { ordering, iterations: 0, objective }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HillClimbingParams {
	pub max_iterations: u32,
	/// Consecutive rounds with gain at or below `min_improvement` before giving up.
	pub patience: u32,
	pub min_improvement: f64,
}
impl HillClimbingParams {
	pub fn from_config(cfg: &epic_config::RankingHillClimbing) -> Self {
		Self {
			max_iterations: cfg.max_iterations,
			patience: cfg.patience,
			min_improvement: cfg.min_improvement,
		}
	}

	pub fn validate(&self) -> Result<()> {
		if self.max_iterations == 0 {
			return Err(Error::Ranking {
				message: "hill_climbing.max_iterations must be greater than zero.".to_string(),
			});
		}
		if self.patience == 0 {
			return Err(Error::Ranking {
				message: "hill_climbing.patience must be greater than zero.".to_string(),
			});
		}
		if !self.min_improvement.is_finite() || self.min_improvement < 0.0 {
			return Err(Error::Ranking {
				message: "hill_climbing.min_improvement must be a finite number zero or greater."
					.to_string(),
			});
		}

		Ok(())
	}
}
impl Default for HillClimbingParams {
	fn default() -> Self {
		Self::from_config(&epic_config::RankingHillClimbing::default())
	}
}

/// Steepest ascent over adjacent swaps.
///
/// Each round evaluates every adjacent swap of the current ordering and applies the single
/// best strictly improving one. The search stops on a round with no improving swap, after
/// `patience` consecutive rounds whose gain does not exceed `min_improvement`, or after
/// `max_iterations` rounds. The objective never decreases between rounds.
#[derive(Clone, Copy, Debug)]
pub struct HillClimbing {
	params: HillClimbingParams,
}
impl HillClimbing {
	pub fn new(params: HillClimbingParams) -> Result<Self> {
		params.validate()?;

		Ok(Self { params })
	}
}
impl Optimizer for HillClimbing {
	fn optimize(&self, mut ordering: Vec<ScoredItem>, k: usize) -> Optimized {
		let objective = NdcgObjective::new(&ordering, k);
		let mut current = objective.evaluate(&ordering);

		if ordering.len() < 2 {
			return Optimized { ordering, iterations: 0, objective: current };
		}

		let mut iterations = 0;
		let mut stale_rounds = 0;

		while iterations < self.params.max_iterations {
			iterations += 1;

			let mut best: Option<(usize, f64)> = None;

			for idx in 0..ordering.len() - 1 {
				ordering.swap(idx, idx + 1);

				let candidate = objective.evaluate(&ordering);

				ordering.swap(idx, idx + 1);

				if candidate > best.map_or(current, |(_, value)| value) {
					best = Some((idx, candidate));
				}
			}

			let Some((idx, value)) = best else {
				break;
			};

			ordering.swap(idx, idx + 1);

			let gain = value - current;

			current = value;

			if gain <= self.params.min_improvement {
				stale_rounds += 1;

				if stale_rounds >= self.params.patience {
					break;
				}
			} else {
				stale_rounds = 0;
			}
		}

		Optimized { ordering, iterations, objective: current }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AnnealingParams {
	pub initial_temp: f64,
	/// Per-iteration temperature multiplier in `(0, 1)`.
	pub cooling_rate: f64,
	pub min_temp: f64,
	pub max_iterations: u32,
}
impl AnnealingParams {
	pub fn from_config(cfg: &epic_config::RankingSimulatedAnnealing) -> Self {
		Self {
			initial_temp: cfg.initial_temp,
			cooling_rate: cfg.cooling_rate,
			min_temp: cfg.min_temp,
			max_iterations: cfg.max_iterations,
		}
	}

	pub fn validate(&self) -> Result<()> {
		if !self.initial_temp.is_finite() || self.initial_temp <= 0.0 {
			return Err(Error::Ranking {
				message: "simulated_annealing.initial_temp must be a finite number greater than zero."
					.to_string(),
			});
		}
		if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
			return Err(Error::Ranking {
				message: "simulated_annealing.cooling_rate must be in the range (0.0, 1.0)."
					.to_string(),
			});
		}
		if !self.min_temp.is_finite() || self.min_temp <= 0.0 {
			return Err(Error::Ranking {
				message: "simulated_annealing.min_temp must be a finite number greater than zero."
					.to_string(),
			});
		}

		Ok(())
	}
}
impl Default for AnnealingParams {
	fn default() -> Self {
		Self::from_config(&epic_config::RankingSimulatedAnnealing::default())
	}
}

/// Random two-position swaps with Metropolis acceptance on a geometric cooling schedule.
///
/// Improvements are always accepted; a worse neighbour is accepted with probability
/// `exp(delta / temperature)`. The best ordering ever visited is returned, not the final
/// state. Each run owns its generator: seeded runs are reproducible, unseeded runs draw
/// from OS entropy.
#[derive(Clone, Copy, Debug)]
pub struct SimulatedAnnealing {
	params: AnnealingParams,
	seed: Option<u64>,
}
impl SimulatedAnnealing {
	pub fn new(params: AnnealingParams, seed: Option<u64>) -> Result<Self> {
		params.validate()?;

		Ok(Self { params, seed })
	}
}
impl Optimizer for SimulatedAnnealing {
	fn optimize(&self, ordering: Vec<ScoredItem>, k: usize) -> Optimized {
		let objective = NdcgObjective::new(&ordering, k);
		let len = ordering.len();
		let mut current_value = objective.evaluate(&ordering);

		if len < 2 {
			return Optimized { ordering, iterations: 0, objective: current_value };
		}

		let mut rng = match self.seed {
			Some(seed) => ChaCha8Rng::seed_from_u64(seed),
			None => ChaCha8Rng::from_entropy(),
		};
		let mut current = ordering;
		let mut best = current.clone();
		let mut best_value = current_value;
		let mut temperature = self.params.initial_temp;
		let mut iterations = 0;

		while iterations < self.params.max_iterations && temperature >= self.params.min_temp {
			iterations += 1;

			let first = rng.gen_range(0..len);
			let mut second = rng.gen_range(0..len - 1);

			if second >= first {
				second += 1;
			}

			current.swap(first, second);

			let candidate = objective.evaluate(&current);
			let delta = candidate - current_value;

			if delta > 0.0 || rng.r#gen::<f64>() < (delta / temperature).exp() {
				current_value = candidate;

				if current_value > best_value {
					best_value = current_value;
					best.clone_from(&current);
				}
			} else {
				current.swap(first, second);
			}

			temperature *= self.params.cooling_rate;
		}

		Optimized { ordering: best, iterations, objective: best_value }
	}
}
