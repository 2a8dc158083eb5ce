use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub retrieval: Retrieval,
	pub scoring: Scoring,
	pub ranking: Ranking,
	pub tuning: Tuning,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "info".to_string() }
	}
}

/// Retrieval strategy selection and the priority-scan penalty constants.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	/// One of linear, bfs, dfs, or priority.
	pub default_strategy: String,
	pub category_penalty: f64,
	pub store_penalty: f64,
	/// Multiplied by the rating deficit.
	pub rating_penalty_factor: f64,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self {
			default_strategy: "linear".to_string(),
			category_penalty: 100.0,
			store_penalty: 75.0,
			rating_penalty_factor: 10.0,
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Scoring {
	pub weights: ScoringWeights,
	pub richness: ScoringRichness,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
	pub price: f64,
	pub rating: f64,
	pub popularity: f64,
	pub category_match: f64,
	pub richness: f64,
}
impl Default for ScoringWeights {
	fn default() -> Self {
		Self { price: 0.25, rating: 0.35, popularity: 0.20, category_match: 0.15, richness: 0.05 }
	}
}

/// Listing completeness blend: description length and feature count, each capped.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScoringRichness {
	pub description_weight: f64,
	pub feature_weight: f64,
	pub description_cap: f64,
	pub feature_cap: f64,
}
impl Default for ScoringRichness {
	fn default() -> Self {
		Self {
			description_weight: 0.6,
			feature_weight: 0.4,
			description_cap: 500.0,
			feature_cap: 10.0,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	/// One of baseline, hill_climbing, or simulated_annealing.
	pub default_strategy: String,
	/// NDCG cutoff.
	pub k: u32,
	pub hill_climbing: RankingHillClimbing,
	pub simulated_annealing: RankingSimulatedAnnealing,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			default_strategy: "baseline".to_string(),
			k: 10,
			hill_climbing: RankingHillClimbing::default(),
			simulated_annealing: RankingSimulatedAnnealing::default(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RankingHillClimbing {
	pub max_iterations: u32,
	/// Consecutive rounds with gain at or below `min_improvement` before stopping.
	pub patience: u32,
	pub min_improvement: f64,
}
impl Default for RankingHillClimbing {
	fn default() -> Self {
		Self { max_iterations: 500, patience: 50, min_improvement: 0.0 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RankingSimulatedAnnealing {
	pub initial_temp: f64,
	pub cooling_rate: f64,
	pub min_temp: f64,
	pub max_iterations: u32,
}
impl Default for RankingSimulatedAnnealing {
	fn default() -> Self {
		Self { initial_temp: 1.0, cooling_rate: 0.995, min_temp: 0.001, max_iterations: 2_000 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Tuning {
	pub initial_temps: Vec<f64>,
	pub cooling_rates: Vec<f64>,
	pub min_temps: Vec<f64>,
	pub seed: u64,
	/// Upper bound on the tuning cutoff; the effective k is `min(max_k, candidates)`.
	pub max_k: u32,
}
impl Default for Tuning {
	fn default() -> Self {
		Self {
			initial_temps: vec![0.5, 1.0, 2.0, 5.0],
			cooling_rates: vec![0.99, 0.995, 0.998],
			min_temps: vec![0.001, 0.01, 0.1],
			seed: 42,
			max_k: 10,
		}
	}
}
