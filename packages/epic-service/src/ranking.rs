pub mod objective;
pub mod optimizer;
pub mod scorer;
pub mod tuning;

pub use objective::{dcg_at_k, ndcg_at_k};
pub use optimizer::{
	AnnealingParams, Baseline, HillClimbing, HillClimbingParams, Optimized, Optimizer,
	SimulatedAnnealing,
};
pub use scorer::{
	FeatureRanges, RichnessParams, ScoreComponents, ScoringConfig, ScoringWeights, compute_score,
	normalize,
};
pub use tuning::{TuningGrid, TuningReport, tune_simulated_annealing};

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
	sync::Arc,
	time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, StrategyDomain, retrieval::SearchResult};
use epic_config::Config;
use epic_domain::{Catalog, Item};

pub const DEFAULT_K: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStrategy {
	Baseline,
	HillClimbing,
	SimulatedAnnealing,
}
impl RankingStrategy {
	pub const ALL: [Self; 3] = [Self::Baseline, Self::HillClimbing, Self::SimulatedAnnealing];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Baseline => "baseline",
			Self::HillClimbing => "hill_climbing",
			Self::SimulatedAnnealing => "simulated_annealing",
		}
	}
}
impl Display for RankingStrategy {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for RankingStrategy {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		Self::ALL.into_iter().find(|strategy| strategy.as_str() == raw).ok_or_else(|| {
			Error::UnknownStrategy { domain: StrategyDomain::Ranking, name: raw.to_string() }
		})
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
	pub id: String,
	pub score: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct RankedResult {
	pub items: Vec<ScoredItem>,
	pub strategy: RankingStrategy,
	/// Optimizer rounds; zero for the baseline.
	pub iterations: u32,
	/// NDCG@k of the full ordering, before truncation.
	pub objective_value: f64,
	#[serde(rename = "elapsed_ms", with = "crate::duration_ms")]
	pub elapsed: Duration,
}
impl RankedResult {
	fn empty(strategy: RankingStrategy) -> Self {
		Self {
			items: Vec::new(),
			strategy,
			iterations: 0,
			objective_value: 1.0,
			elapsed: Duration::ZERO,
		}
	}

	pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
		self.items.iter().map(|item| item.id.as_str())
	}
}

#[derive(Clone, Debug)]
pub struct RankRequest {
	pub strategy: RankingStrategy,
	/// Boosts items in this category when set.
	pub target_category: Option<String>,
	pub max_results: Option<usize>,
	/// NDCG cutoff.
	pub k: usize,
	/// Simulated annealing only.
	pub seed: Option<u64>,
}
impl RankRequest {
	pub fn new(strategy: RankingStrategy) -> Self {
		Self { strategy, ..Default::default() }
	}
}
impl Default for RankRequest {
	fn default() -> Self {
		Self {
			strategy: RankingStrategy::Baseline,
			target_category: None,
			max_results: None,
			k: DEFAULT_K,
			seed: None,
		}
	}
}

/// Scores retrieval candidates and reorders them for NDCG@k.
#[derive(Clone, Debug)]
pub struct HeuristicRanker {
	catalog: Arc<Catalog>,
	scoring: ScoringConfig,
	hill_climbing: HillClimbingParams,
	annealing: AnnealingParams,
}
impl HeuristicRanker {
	pub fn new(catalog: Arc<Catalog>) -> Self {
		Self {
			catalog,
			scoring: ScoringConfig::default(),
			hill_climbing: HillClimbingParams::default(),
			annealing: AnnealingParams::default(),
		}
	}

	pub fn from_config(catalog: Arc<Catalog>, cfg: &Config) -> Result<Self> {
		Self::new(catalog)
			.with_scoring(ScoringConfig::from_config(&cfg.scoring)?)
			.with_hill_climbing(HillClimbingParams::from_config(&cfg.ranking.hill_climbing))?
			.with_annealing(AnnealingParams::from_config(&cfg.ranking.simulated_annealing))
	}

	pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
		self.scoring = scoring;

		self
	}

	pub fn with_hill_climbing(mut self, params: HillClimbingParams) -> Result<Self> {
		params.validate()?;

		self.hill_climbing = params;

		Ok(self)
	}

	pub fn with_annealing(mut self, params: AnnealingParams) -> Result<Self> {
		params.validate()?;

		self.annealing = params;

		Ok(self)
	}

	pub fn catalog(&self) -> &Arc<Catalog> {
		&self.catalog
	}

	pub fn scoring(&self) -> &ScoringConfig {
		&self.scoring
	}

	pub fn annealing(&self) -> &AnnealingParams {
		&self.annealing
	}

	/// Resolves and scores candidates, highest score first.
	///
	/// IDs missing from the catalog are stale references: they are logged and skipped. Equal
	/// scores keep candidate order.
	pub fn score_candidates(
		&self,
		ids: &[String],
		target_category: Option<&str>,
	) -> Vec<ScoredItem> {
		let items: Vec<&Item> = ids
			.iter()
			.filter_map(|id| {
				let item = self.catalog.get(id);

				if item.is_none() {
					tracing::warn!(item_id = %id, "Skipping candidate missing from catalog.");
				}

				item
			})
			.collect();
		let ranges = FeatureRanges::from_items(items.iter().copied());
		let weights = self.scoring.normalized();
		let mut scored: Vec<ScoredItem> = items
			.iter()
			.map(|item| ScoredItem {
				id: item.id().to_string(),
				score: ScoreComponents::compute(item, &self.scoring, &ranges, target_category)
					.weighted(&weights),
			})
			.collect();

		scored.sort_by(|a, b| b.score.total_cmp(&a.score));

		scored
	}

	/// Scores, sorts (the baseline pass), optimizes, then truncates.
	///
	/// An empty or fully stale candidate list is vacuously optimal: objective 1.0, zero
	/// iterations, zero elapsed time.
	pub fn rank(&self, search: &SearchResult, request: &RankRequest) -> Result<RankedResult> {
		let optimizer: Box<dyn Optimizer> = match request.strategy {
			RankingStrategy::Baseline => Box::new(Baseline),
			RankingStrategy::HillClimbing => Box::new(HillClimbing::new(self.hill_climbing)?),
			RankingStrategy::SimulatedAnnealing =>
				Box::new(SimulatedAnnealing::new(self.annealing, request.seed)?),
		};

		if search.ids.is_empty() {
			return Ok(RankedResult::empty(request.strategy));
		}

		let started = Instant::now();
		let scored = self.score_candidates(&search.ids, request.target_category.as_deref());

		if scored.is_empty() {
			return Ok(RankedResult::empty(request.strategy));
		}

		let Optimized { mut ordering, iterations, objective } =
			optimizer.optimize(scored, request.k);

		if let Some(max_results) = request.max_results {
			ordering.truncate(max_results);
		}

		let elapsed = started.elapsed();

		tracing::debug!(
			strategy = %request.strategy,
			candidates = search.ids.len(),
			ranked = ordering.len(),
			iterations,
			objective,
			elapsed_ms = elapsed.as_secs_f64() * 1_000.0,
			"Ranking completed."
		);

		Ok(RankedResult {
			items: ordering,
			strategy: request.strategy,
			iterations,
			objective_value: objective,
			elapsed,
		})
	}
}
