use serde_json::Value;

use crate::{Error, Result};
use epic_config::Config;

/// Every setting that can change which items are returned or how they are ordered.
///
/// `service.log_level` is excluded; the snapshot identifies behavior, not deployment.
pub fn build_policy_snapshot(cfg: &Config) -> Value {
	serde_json::json!({
		"retrieval": {
			"default_strategy": cfg.retrieval.default_strategy,
			"category_penalty": cfg.retrieval.category_penalty,
			"store_penalty": cfg.retrieval.store_penalty,
			"rating_penalty_factor": cfg.retrieval.rating_penalty_factor,
		},
		"scoring": {
			"weights": {
				"price": cfg.scoring.weights.price,
				"rating": cfg.scoring.weights.rating,
				"popularity": cfg.scoring.weights.popularity,
				"category_match": cfg.scoring.weights.category_match,
				"richness": cfg.scoring.weights.richness,
			},
			"richness": {
				"description_weight": cfg.scoring.richness.description_weight,
				"feature_weight": cfg.scoring.richness.feature_weight,
				"description_cap": cfg.scoring.richness.description_cap,
				"feature_cap": cfg.scoring.richness.feature_cap,
			},
		},
		"ranking": {
			"default_strategy": cfg.ranking.default_strategy,
			"k": cfg.ranking.k,
			"hill_climbing": {
				"max_iterations": cfg.ranking.hill_climbing.max_iterations,
				"patience": cfg.ranking.hill_climbing.patience,
				"min_improvement": cfg.ranking.hill_climbing.min_improvement,
			},
			"simulated_annealing": {
				"initial_temp": cfg.ranking.simulated_annealing.initial_temp,
				"cooling_rate": cfg.ranking.simulated_annealing.cooling_rate,
				"min_temp": cfg.ranking.simulated_annealing.min_temp,
				"max_iterations": cfg.ranking.simulated_annealing.max_iterations,
			},
		},
	})
}

pub fn hash_policy_snapshot(payload: &Value) -> Result<String> {
	let raw = serde_json::to_vec(payload).map_err(|err| Error::Internal {
		message: format!("Failed to encode policy snapshot: {err}"),
	})?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}
