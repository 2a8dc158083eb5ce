use std::sync::Arc;

use proptest::prelude::*;

use epic_domain::{Catalog, Filter, Item};
use epic_service::{
	HeuristicRanker, RankRequest, RankingStrategy, RetrievalEngine, ScoringConfig, ScoringWeights,
	SearchResult, SearchStrategy,
	ranking::{FeatureRanges, compute_score, ndcg_at_k},
};

fn fixture() -> (RetrievalEngine, HeuristicRanker) {
	let catalog = Arc::new(epic_testkit::ranking().expect("Fixture must build."));

	(RetrievalEngine::new(catalog.clone()), HeuristicRanker::new(catalog))
}

fn electronics(engine: &RetrievalEngine) -> SearchResult {
	let filter = Filter::builder().category("electronics").build().expect("Filter must be valid.");

	engine.search(&filter, SearchStrategy::Linear, None)
}

fn scores(result: &epic_service::RankedResult) -> Vec<f64> {
	result.items.iter().map(|item| item.score).collect()
}

#[test]
fn baseline_is_idempotent() {
	let (engine, ranker) = fixture();
	let candidates = electronics(&engine);
	let first = ranker.rank(&candidates, &RankRequest::default()).expect("Ranking must succeed.");
	let second = ranker.rank(&candidates, &RankRequest::default()).expect("Ranking must succeed.");

	assert_eq!(first.items, second.items);
	assert_eq!(first.iterations, 0);
}

#[test]
fn target_category_lifts_matching_items() {
	let (engine, ranker) = fixture();
	let everything = engine.search(&Filter::default(), SearchStrategy::Linear, None);
	let request = RankRequest {
		target_category: Some("Books".to_string()),
		..RankRequest::default()
	};
	let boosted = ranker.rank(&everything, &request).expect("Ranking must succeed.");
	let neutral = ranker.rank(&everything, &RankRequest::default()).expect("Ranking must succeed.");
	let position = |result: &epic_service::RankedResult| {
		result.ids().position(|id| id == "book-ok").expect("book-ok must be ranked.")
	};

	assert!(
		position(&boosted) < position(&neutral),
		"Unexpected positions: {} vs {}",
		position(&boosted),
		position(&neutral)
	);
}

#[test]
fn hill_climbing_matches_or_beats_baseline() {
	let (engine, ranker) = fixture();
	let candidates = engine.search(&Filter::default(), SearchStrategy::Bfs, None);
	let baseline =
		ranker.rank(&candidates, &RankRequest::default()).expect("Ranking must succeed.");
	let climbed = ranker
		.rank(&candidates, &RankRequest::new(RankingStrategy::HillClimbing))
		.expect("Ranking must succeed.");

	assert!(climbed.objective_value >= baseline.objective_value - 1e-12);
	assert!(climbed.iterations >= 1);
}

#[test]
fn seeded_annealing_is_deterministic() {
	let (engine, ranker) = fixture();
	let candidates = engine.search(&Filter::default(), SearchStrategy::Priority, None);
	let request = RankRequest {
		strategy: RankingStrategy::SimulatedAnnealing,
		k: 5,
		seed: Some(42),
		..RankRequest::default()
	};
	let first = ranker.rank(&candidates, &request).expect("Ranking must succeed.");
	let second = ranker.rank(&candidates, &request).expect("Ranking must succeed.");

	assert_eq!(first.items, second.items);
	assert_eq!(first.iterations, second.iterations);
	assert_eq!(first.objective_value, second.objective_value);
	assert!(first.objective_value <= 1.0 + 1e-12);
}

#[test]
fn empty_candidates_are_vacuously_optimal() {
	let (_, ranker) = fixture();

	let empty = SearchResult::from_ids(Vec::new(), SearchStrategy::Linear);

	for strategy in RankingStrategy::ALL {
		let result =
			ranker.rank(&empty, &RankRequest::new(strategy)).expect("Ranking must succeed.");

		assert!(result.items.is_empty());
		assert_eq!(result.objective_value, 1.0);
		assert_eq!(result.iterations, 0);
	}
}

#[test]
fn truncation_keeps_the_best_prefix() {
	let (engine, ranker) = fixture();
	let candidates = electronics(&engine);
	let full = ranker.rank(&candidates, &RankRequest::default()).expect("Ranking must succeed.");
	let top = ranker
		.rank(&candidates, &RankRequest { max_results: Some(2), ..RankRequest::default() })
		.expect("Ranking must succeed.");

	assert_eq!(top.items.as_slice(), &full.items[..2]);
	assert_eq!(top.objective_value, full.objective_value);
}

#[test]
fn custom_weights_change_the_leader() {
	let (engine, ranker) = fixture();
	let candidates = electronics(&engine);
	let price_only = ScoringConfig::new(ScoringWeights {
		price: 1.0,
		rating: 0.0,
		popularity: 0.0,
		category_match: 0.0,
		richness: 0.0,
	})
	.expect("Weights must be valid.");
	let ranked = ranker
		.with_scoring(price_only)
		.rank(&candidates, &RankRequest::default())
		.expect("Ranking must succeed.");

	assert_eq!(ranked.ids().next(), Some("cheap-bad"));
	assert_eq!(scores(&ranked)[0], 1.0);
}

#[test]
fn ndcg_reference_values() {
	assert!((ndcg_at_k(&[3.0, 2.0, 1.0], 3) - 1.0).abs() < 1e-12);
	assert!(ndcg_at_k(&[1.0, 2.0, 3.0], 3) < 1.0);
	assert_eq!(ndcg_at_k(&[], 5), 1.0);
	assert_eq!(ndcg_at_k(&[0.0, 0.0, 0.0], 3), 1.0);
}

fn arb_weights() -> impl Strategy<Value = ScoringWeights> {
	(0.0_f64..5.0, 0.0_f64..5.0, 0.0_f64..5.0, 0.0_f64..5.0, 0.01_f64..5.0).prop_map(
		|(price, rating, popularity, category_match, richness)| ScoringWeights {
			price,
			rating,
			popularity,
			category_match,
			richness,
		},
	)
}

proptest! {
	#[test]
	fn scores_stay_in_unit_range(
		rows in prop::collection::vec(
			(0.0_f64..1_000.0, 0.0_f64..=5.0, 0_u64..100_000, 0_usize..800, 0_usize..20),
			1..20,
		),
		weights in arb_weights(),
		target in prop::option::of(prop::sample::select(vec!["home", "Books"])),
	) {
		let items: Vec<Item> = rows
			.iter()
			.enumerate()
			.map(|(idx, &(price, rating, count, description, features))| {
				Item::new(format!("p{idx}"), "Item", price, "home", rating, "s")
					.expect("Generated item must be valid.")
					.with_rating_count(count)
					.with_description("x".repeat(description))
					.with_features(vec!["f".to_string(); features])
			})
			.collect();
		let config = ScoringConfig::new(weights).expect("Weights must be valid.");
		let ranges = FeatureRanges::from_items(&items);

		for item in &items {
			let score = compute_score(item, &config, &ranges, target);

			prop_assert!((0.0..=1.0).contains(&score), "Unexpected score: {}", score);
		}
	}

	#[test]
	fn hill_climbing_never_loses_to_its_start(
		rows in prop::collection::vec((1.0_f64..100.0, 0.0_f64..=5.0), 0..15),
		k in 1_usize..12,
	) {
		let items = rows.iter().enumerate().map(|(idx, &(price, rating))| {
			Item::new(format!("p{idx}"), "Item", price, "home", rating, "s")
				.expect("Generated item must be valid.")
		});
		let catalog = Arc::new(Catalog::build(items));
		let ranker = HeuristicRanker::new(catalog.clone());
		let candidates = SearchResult::from_ids(
			catalog.ids().map(str::to_string).collect(),
			SearchStrategy::Linear,
		);
		let baseline = ranker
			.rank(&candidates, &RankRequest { k, ..RankRequest::default() })
			.expect("Ranking must succeed.");
		let request = RankRequest { k, ..RankRequest::new(RankingStrategy::HillClimbing) };
		let climbed = ranker.rank(&candidates, &request).expect("Ranking must succeed.");

		prop_assert!(climbed.objective_value >= baseline.objective_value - 1e-12);
		prop_assert_eq!(climbed.items.len(), baseline.items.len());
	}
}
