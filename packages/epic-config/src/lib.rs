mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Ranking, RankingHillClimbing, RankingSimulatedAnnealing, Retrieval, Scoring,
	ScoringRichness, ScoringWeights, Service, Tuning,
};

use std::{fs, path::Path};

pub const RETRIEVAL_STRATEGIES: [&str; 4] = ["linear", "bfs", "dfs", "priority"];
pub const RANKING_STRATEGIES: [&str; 3] = ["baseline", "hill_climbing", "simulated_annealing"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if !RETRIEVAL_STRATEGIES.contains(&cfg.retrieval.default_strategy.as_str()) {
		return Err(Error::Validation {
			message: "retrieval.default_strategy must be one of linear, bfs, dfs, or priority."
				.to_string(),
		});
	}

	for (label, value) in [
		("retrieval.category_penalty", cfg.retrieval.category_penalty),
		("retrieval.store_penalty", cfg.retrieval.store_penalty),
		("retrieval.rating_penalty_factor", cfg.retrieval.rating_penalty_factor),
	] {
		non_negative(label, value)?;
	}

	validate_scoring(cfg)?;

	if !RANKING_STRATEGIES.contains(&cfg.ranking.default_strategy.as_str()) {
		return Err(Error::Validation {
			message: "ranking.default_strategy must be one of baseline, hill_climbing, or simulated_annealing."
				.to_string(),
		});
	}
	if cfg.ranking.k == 0 {
		return Err(Error::Validation {
			message: "ranking.k must be greater than zero.".to_string(),
		});
	}

	let hill_climbing = &cfg.ranking.hill_climbing;

	if hill_climbing.max_iterations == 0 {
		return Err(Error::Validation {
			message: "ranking.hill_climbing.max_iterations must be greater than zero.".to_string(),
		});
	}
	if hill_climbing.patience == 0 {
		return Err(Error::Validation {
			message: "ranking.hill_climbing.patience must be greater than zero.".to_string(),
		});
	}

	non_negative("ranking.hill_climbing.min_improvement", hill_climbing.min_improvement)?;

	let annealing = &cfg.ranking.simulated_annealing;

	validate_annealing(
		"ranking.simulated_annealing",
		annealing.initial_temp,
		annealing.cooling_rate,
		annealing.min_temp,
	)?;

	if annealing.max_iterations == 0 {
		return Err(Error::Validation {
			message: "ranking.simulated_annealing.max_iterations must be greater than zero."
				.to_string(),
		});
	}

	validate_tuning(cfg)?;

	Ok(())
}

fn validate_scoring(cfg: &Config) -> Result<()> {
	let weights = &cfg.scoring.weights;
	let mut total = 0.0;

	for (label, value) in [
		("scoring.weights.price", weights.price),
		("scoring.weights.rating", weights.rating),
		("scoring.weights.popularity", weights.popularity),
		("scoring.weights.category_match", weights.category_match),
		("scoring.weights.richness", weights.richness),
	] {
		non_negative(label, value)?;

		total += value;
	}

	if total <= 0.0 {
		return Err(Error::Validation {
			message: "scoring.weights must not all be zero.".to_string(),
		});
	}

	let richness = &cfg.scoring.richness;

	non_negative("scoring.richness.description_weight", richness.description_weight)?;
	non_negative("scoring.richness.feature_weight", richness.feature_weight)?;

	if richness.description_weight + richness.feature_weight > 1.0 {
		return Err(Error::Validation {
			message: "scoring.richness.description_weight and scoring.richness.feature_weight must sum to 1.0 or less."
				.to_string(),
		});
	}

	for (label, value) in [
		("scoring.richness.description_cap", richness.description_cap),
		("scoring.richness.feature_cap", richness.feature_cap),
	] {
		if !value.is_finite() || value <= 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number greater than zero."),
			});
		}
	}

	Ok(())
}

fn validate_tuning(cfg: &Config) -> Result<()> {
	let tuning = &cfg.tuning;

	for (label, values) in [
		("tuning.initial_temps", &tuning.initial_temps),
		("tuning.cooling_rates", &tuning.cooling_rates),
		("tuning.min_temps", &tuning.min_temps),
	] {
		if values.is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	for &initial_temp in &tuning.initial_temps {
		for &cooling_rate in &tuning.cooling_rates {
			for &min_temp in &tuning.min_temps {
				validate_annealing("tuning", initial_temp, cooling_rate, min_temp)?;
			}
		}
	}

	if tuning.max_k == 0 {
		return Err(Error::Validation {
			message: "tuning.max_k must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn validate_annealing(
	prefix: &str,
	initial_temp: f64,
	cooling_rate: f64,
	min_temp: f64,
) -> Result<()> {
	if !initial_temp.is_finite() || initial_temp <= 0.0 {
		return Err(Error::Validation {
			message: format!("{prefix} initial_temp must be a finite number greater than zero."),
		});
	}
	if !cooling_rate.is_finite() || cooling_rate <= 0.0 || cooling_rate >= 1.0 {
		return Err(Error::Validation {
			message: format!("{prefix} cooling_rate must be in the range (0.0, 1.0)."),
		});
	}
	if !min_temp.is_finite() || min_temp <= 0.0 {
		return Err(Error::Validation {
			message: format!("{prefix} min_temp must be a finite number greater than zero."),
		});
	}

	Ok(())
}

fn non_negative(label: &str, value: f64) -> Result<()> {
	if !value.is_finite() {
		return Err(Error::Validation { message: format!("{label} must be a finite number.") });
	}
	if value < 0.0 {
		return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
	cfg.retrieval.default_strategy = cfg.retrieval.default_strategy.trim().to_lowercase();
	cfg.ranking.default_strategy = cfg.ranking.default_strategy.trim().to_lowercase();
}
