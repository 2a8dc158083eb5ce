pub mod browse;
pub mod duration_ms;
pub mod error;
pub mod policy;
pub mod ranking;
pub mod rerank;
pub mod retrieval;
pub mod search;
pub mod tune;

pub use browse::{CategoryCount, ListRequest, ListResponse};
pub use error::{Error, ErrorKind, Result, StrategyDomain};
pub use ranking::{
	HeuristicRanker, RankRequest, RankedResult, RankingStrategy, ScoredItem, ScoringConfig,
	ScoringWeights, TuningGrid, TuningReport,
};
pub use rerank::{RerankItem, RerankMetadata, RerankRequest, RerankResponse};
pub use retrieval::{RetrievalEngine, SearchResult, SearchStrategy};
pub use search::{SearchMetadata, SearchRequest, SearchResponse};
pub use tune::TuneRequest;

use std::sync::Arc;

use epic_config::Config;
use epic_domain::Catalog;
use retrieval::PriorityHeuristic;

/// Retrieval and re-ranking over one immutable catalog snapshot.
pub struct EpicService {
	pub cfg: Config,
	catalog: Arc<Catalog>,
	retrieval: RetrievalEngine,
	ranker: HeuristicRanker,
	default_retrieval: SearchStrategy,
	default_ranking: RankingStrategy,
	policy_id: String,
}
impl EpicService {
	pub fn new(cfg: Config, catalog: Catalog) -> Result<Self> {
		Self::from_shared(cfg, Arc::new(catalog))
	}

	pub fn from_shared(cfg: Config, catalog: Arc<Catalog>) -> Result<Self> {
		epic_config::validate(&cfg)?;

		let default_retrieval = cfg.retrieval.default_strategy.parse()?;
		let default_ranking = cfg.ranking.default_strategy.parse()?;
		let retrieval = RetrievalEngine::with_heuristic(
			catalog.clone(),
			PriorityHeuristic::from_config(&cfg.retrieval),
		);
		let ranker = HeuristicRanker::from_config(catalog.clone(), &cfg)?;
		let policy_id = policy::hash_policy_snapshot(&policy::build_policy_snapshot(&cfg))?;

		tracing::debug!(
			items = catalog.len(),
			categories = retrieval.tree().categories().len(),
			stores = retrieval.tree().stores().len(),
			policy_id = %policy_id,
			"Service ready."
		);

		Ok(Self {
			cfg,
			catalog,
			retrieval,
			ranker,
			default_retrieval,
			default_ranking,
			policy_id,
		})
	}

	pub fn catalog(&self) -> &Arc<Catalog> {
		&self.catalog
	}

	pub fn retrieval(&self) -> &RetrievalEngine {
		&self.retrieval
	}

	pub fn ranker(&self) -> &HeuristicRanker {
		&self.ranker
	}

	/// blake3 hash of the behavior-affecting config.
	pub fn policy_id(&self) -> &str {
		&self.policy_id
	}
}

pub(crate) fn resolve_max_results(raw: Option<i64>) -> Result<Option<usize>> {
	match raw {
		None => Ok(None),
		Some(value) if value < 0 => Err(Error::Validation {
			message: format!("max_results must be zero or greater, got {value}."),
		}),
		Some(value) => usize::try_from(value)
			.map(Some)
			.map_err(|_| Error::Validation { message: "max_results is out of range.".to_string() }),
	}
}
