use serde::Serialize;

use crate::{
	Error, Result,
	ranking::{
		ScoredItem,
		objective::ndcg_at_k,
		optimizer::{AnnealingParams, Optimizer, SimulatedAnnealing},
	},
};

/// Cartesian grid of annealing schedules, evaluated with one fixed seed.
#[derive(Clone, Debug, PartialEq)]
pub struct TuningGrid {
	pub initial_temps: Vec<f64>,
	pub cooling_rates: Vec<f64>,
	pub min_temps: Vec<f64>,
	pub seed: u64,
	pub max_k: usize,
	/// Iteration cap shared by every combination.
	pub max_iterations: u32,
}
impl TuningGrid {
	pub fn from_config(cfg: &epic_config::Config) -> Self {
		Self {
			initial_temps: cfg.tuning.initial_temps.clone(),
			cooling_rates: cfg.tuning.cooling_rates.clone(),
			min_temps: cfg.tuning.min_temps.clone(),
			seed: cfg.tuning.seed,
			max_k: cfg.tuning.max_k as usize,
			max_iterations: cfg.ranking.simulated_annealing.max_iterations,
		}
	}

	pub fn combinations(&self) -> usize {
		self.initial_temps.len() * self.cooling_rates.len() * self.min_temps.len()
	}

	fn schedules(&self) -> impl Iterator<Item = AnnealingParams> + '_ {
		self.initial_temps.iter().flat_map(move |&initial_temp| {
			self.cooling_rates.iter().flat_map(move |&cooling_rate| {
				self.min_temps.iter().map(move |&min_temp| AnnealingParams {
					initial_temp,
					cooling_rate,
					min_temp,
					max_iterations: self.max_iterations,
				})
			})
		})
	}
}
impl Default for TuningGrid {
	fn default() -> Self {
		Self::from_config(&epic_config::Config::default())
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct TuningReport {
	pub k: usize,
	pub combinations: usize,
	/// NDCG@k of the heuristic order with no optimization.
	pub baseline_ndcg: f64,
	pub best_ndcg: f64,
	pub best: AnnealingParams,
	/// Relative gain over the baseline, in percent.
	pub improvement_pct: f64,
}

/// Grid-searches annealing schedules over one scored candidate list.
///
/// `scored` is expected in heuristic order (highest first). The first schedule reaching the
/// best NDCG wins ties.
pub fn tune_simulated_annealing(scored: &[ScoredItem], grid: &TuningGrid) -> Result<TuningReport> {
	if scored.is_empty() {
		return Err(Error::Validation {
			message: "tuning requires at least one scored candidate.".to_string(),
		});
	}
	if grid.combinations() == 0 {
		return Err(Error::Validation {
			message: "tuning grid must contain at least one combination.".to_string(),
		});
	}

	let k = grid.max_k.min(scored.len());
	let combinations = grid.combinations();
	let mut best: Option<(AnnealingParams, f64)> = None;

	for (idx, params) in grid.schedules().enumerate() {
		let optimized =
			SimulatedAnnealing::new(params, Some(grid.seed))?.optimize(scored.to_vec(), k);

		if best.is_none_or(|(_, value)| optimized.objective > value) {
			best = Some((params, optimized.objective));
		}
		if (idx + 1) % 10 == 0 {
			tracing::info!(evaluated = idx + 1, combinations, "Tuning in progress.");
		}
	}

	let Some((best, best_ndcg)) = best else {
		return Err(Error::Validation {
			message: "tuning grid must contain at least one combination.".to_string(),
		});
	};
	let scores: Vec<f64> = scored.iter().map(|item| item.score).collect();
	let baseline_ndcg = ndcg_at_k(&scores, k);
	let improvement_pct = 100.0 * (best_ndcg - baseline_ndcg) / baseline_ndcg.max(1e-9);

	tracing::info!(
		k,
		baseline_ndcg,
		best_ndcg,
		initial_temp = best.initial_temp,
		cooling_rate = best.cooling_rate,
		min_temp = best.min_temp,
		"Tuning completed."
	);

	Ok(TuningReport { k, combinations, baseline_ndcg, best_ndcg, best, improvement_pct })
}
