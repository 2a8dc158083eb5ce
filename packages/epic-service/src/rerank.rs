use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
	EpicService, Error, RankRequest, RankingStrategy, Result, SearchStrategy, resolve_max_results,
};
use epic_domain::{Filter, Item};

const DEFAULT_RERANK_RESULTS: usize = 20;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RerankRequest {
	#[serde(default)]
	pub filter: Map<String, Value>,
	/// Falls back to `ranking.default_strategy`.
	pub strategy: Option<String>,
	/// Falls back to `ranking.k`.
	pub k: Option<u32>,
	pub max_results: Option<i64>,
	pub seed: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RerankItem {
	/// 1-based.
	pub rank: usize,
	pub score: f64,
	pub item: Item,
}

#[derive(Clone, Debug, Serialize)]
pub struct RerankMetadata {
	pub strategy: RankingStrategy,
	pub iterations: u32,
	pub objective_value: f64,
	#[serde(rename = "elapsed_ms", with = "crate::duration_ms")]
	pub elapsed: Duration,
	pub count: usize,
	/// Retrieval matches before scoring.
	pub candidates: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct RerankResponse {
	pub items: Vec<RerankItem>,
	pub metadata: RerankMetadata,
}

impl EpicService {
	/// Linear retrieval followed by heuristic re-ranking.
	///
	/// The filter's category doubles as the ranking target category. The strategy name is
	/// resolved before any retrieval or scoring work.
	pub fn rerank(&self, req: RerankRequest) -> Result<RerankResponse> {
		let strategy: RankingStrategy = match req.strategy.as_deref() {
			Some(raw) => raw.trim().to_ascii_lowercase().parse()?,
			None => self.default_ranking,
		};
		let k = req.k.unwrap_or(self.cfg.ranking.k);

		if k == 0 {
			return Err(Error::Validation { message: "k must be greater than zero.".to_string() });
		}

		let filter = Filter::from_map(&req.filter)?;
		let max_results = resolve_max_results(req.max_results)?.unwrap_or(DEFAULT_RERANK_RESULTS);
		let candidates = self.retrieval.search(&filter, SearchStrategy::Linear, None);
		let ranked = self.ranker.rank(
			&candidates,
			&RankRequest {
				strategy,
				target_category: filter.category().map(str::to_string),
				max_results: Some(max_results),
				k: k as usize,
				seed: req.seed,
			},
		)?;
		let items = ranked
			.items
			.iter()
			.enumerate()
			.map(|(idx, scored)| {
				Ok(RerankItem {
					rank: idx + 1,
					score: scored.score,
					item: self.catalog.require(&scored.id)?.clone(),
				})
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(RerankResponse {
			metadata: RerankMetadata {
				strategy: ranked.strategy,
				iterations: ranked.iterations,
				objective_value: ranked.objective_value,
				elapsed: ranked.elapsed,
				count: items.len(),
				candidates: candidates.count(),
			},
			items,
		})
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use crate::{EpicService, RankingStrategy, RerankRequest};
	use epic_config::Config;
	use epic_domain::{Catalog, Item};

	fn service() -> EpicService {
		let items = [
			("h1", "Home", 25.0, 4.5),
			("h2", "Home", 60.0, 3.5),
			("e1", "Electronics", 15.0, 4.8),
			("h3", "Home", 40.0, 4.9),
		]
		.into_iter()
		.map(|(id, category, price, rating)| {
			Item::new(id, id, price, category, rating, "Store").expect("Item must be valid.")
		});

		EpicService::new(Config::default(), Catalog::build(items)).expect("Service must build.")
	}

	#[test]
	fn ranks_are_one_based_and_scores_descend() {
		let response = service()
			.rerank(RerankRequest {
				filter: json!({ "category": "home" }).as_object().cloned().unwrap_or_default(),
				..RerankRequest::default()
			})
			.expect("Rerank must succeed.");
		let ranks: Vec<usize> = response.items.iter().map(|item| item.rank).collect();

		assert_eq!(ranks, vec![1, 2, 3]);
		assert!(response.items.iter().all(|item| item.item.category() == "Home"));
		assert!(response.items.windows(2).all(|pair| pair[0].score >= pair[1].score));
		assert_eq!(response.metadata.strategy, RankingStrategy::Baseline);
		assert_eq!(response.metadata.candidates, 3);
	}

	#[test]
	fn max_results_truncates_after_ranking() {
		let response = service()
			.rerank(RerankRequest {
				strategy: Some("hill_climbing".to_string()),
				max_results: Some(1),
				..RerankRequest::default()
			})
			.expect("Rerank must succeed.");

		assert_eq!(response.items.len(), 1);
		assert_eq!(response.metadata.candidates, 4);
	}

	#[test]
	fn unknown_strategy_is_a_ranking_error() {
		let err = service()
			.rerank(RerankRequest {
				strategy: Some("genetic".to_string()),
				..RerankRequest::default()
			})
			.expect_err("Expected unknown strategy.");

		assert!(err.is_ranking_error(), "Unexpected error: {err}");
	}

	#[test]
	fn seeded_annealing_is_reproducible() {
		let service = service();
		let request = RerankRequest {
			strategy: Some("simulated_annealing".to_string()),
			seed: Some(7),
			..RerankRequest::default()
		};
		let first = service.rerank(request.clone()).expect("Rerank must succeed.");
		let second = service.rerank(request).expect("Rerank must succeed.");
		let ids = |response: &crate::RerankResponse| {
			response.items.iter().map(|item| item.item.id().to_string()).collect::<Vec<_>>()
		};

		assert_eq!(ids(&first), ids(&second));
		assert_eq!(first.metadata.iterations, second.metadata.iterations);
		assert_eq!(first.metadata.objective_value, second.metadata.objective_value);
	}
}
