use std::{collections::BTreeSet, sync::Arc};

use proptest::prelude::*;

use epic_domain::{Catalog, Filter, Item, SortBy};
use epic_service::{RetrievalEngine, SearchStrategy};

fn engine(catalog: Catalog) -> RetrievalEngine {
	RetrievalEngine::new(Arc::new(catalog))
}

fn marketplace() -> RetrievalEngine {
	engine(epic_testkit::marketplace().expect("Fixture must build."))
}

fn id_set(ids: &[String]) -> BTreeSet<String> {
	ids.iter().cloned().collect()
}

#[test]
fn books_sorted_by_price_then_truncated() {
	let catalog = epic_testkit::books().expect("Fixture must build.");
	let engine = engine(catalog.clone());
	let filter = Filter::builder()
		.category("Books")
		.sort_by(SortBy::PriceAsc)
		.build()
		.expect("Filter must be valid.");
	let all = engine.search(&filter, SearchStrategy::Linear, None);

	assert_eq!(all.count(), 5);
	assert_eq!(
		epic_testkit::prices(&catalog, &all.ids).expect("Prices must resolve."),
		vec![35.0, 38.0, 42.0, 48.0, 55.0]
	);

	let top = engine.search(&filter, SearchStrategy::Linear, Some(3));

	assert_eq!(
		epic_testkit::prices(&catalog, &top.ids).expect("Prices must resolve."),
		vec![35.0, 38.0, 42.0]
	);
}

#[test]
fn category_pruning_scans_only_that_category() {
	let engine = marketplace();
	let filter = Filter::builder().category("Electronics").build().expect("Filter must be valid.");

	for strategy in [SearchStrategy::Bfs, SearchStrategy::Dfs] {
		let result = engine.search(&filter, strategy, None);

		assert_eq!(result.scanned, 3, "Unexpected scanned count for {strategy}.");
		assert_eq!(result.count(), 3);
	}

	assert_eq!(engine.search(&filter, SearchStrategy::Linear, None).scanned, 10);
	assert_eq!(engine.search(&filter, SearchStrategy::Priority, None).scanned, 10);
}

#[test]
fn store_pruning_spans_categories() {
	let engine = marketplace();
	let filter = Filter::builder().store("storeb").build().expect("Filter must be valid.");
	let result = engine.search(&filter, SearchStrategy::Bfs, None);

	assert_eq!(result.scanned, 2);
	assert_eq!(id_set(&result.ids), id_set(&["p3", "p7"].map(String::from)));
}

#[test]
fn unconstrained_traversals_scan_everything() {
	let engine = marketplace();
	let filter = Filter::builder().min_rating(4.5).build().expect("Filter must be valid.");

	for strategy in SearchStrategy::ALL {
		assert_eq!(engine.search(&filter, strategy, None).scanned, 10, "Strategy {strategy}.");
	}
}

#[test]
fn bounds_are_inclusive() {
	let engine = marketplace();
	let filter = Filter::builder()
		.price_min(18.0)
		.price_max(35.0)
		.min_rating(4.5)
		.build()
		.expect("Filter must be valid.");
	let result = engine.search(&filter, SearchStrategy::Linear, None);

	let expected = ["p1", "p2", "p8"].map(String::from);

	assert_eq!(id_set(&result.ids), id_set(&expected));
}

#[test]
fn zero_max_results_yields_nothing() {
	let result = marketplace().search(&Filter::default(), SearchStrategy::Dfs, Some(0));

	assert!(result.ids.is_empty());
	assert_eq!(result.scanned, 10);
}

#[test]
fn empty_catalog_matches_nothing() {
	let engine = engine(Catalog::new());

	for strategy in SearchStrategy::ALL {
		let result = engine.search(&Filter::default(), strategy, None);

		assert!(result.ids.is_empty());
		assert_eq!(result.scanned, 0);
	}
}

#[test]
fn engine_keeps_its_catalog_snapshot_after_make_mut() {
	let item = |id: &str| {
		Item::new(id, "Item", 10.0, "home", 4.0, "north").expect("Item must be valid.")
	};
	let mut shared = Arc::new(Catalog::build([item("a")]));
	let engine = RetrievalEngine::new(Arc::clone(&shared));

	Arc::make_mut(&mut shared).insert(item("b"));

	for strategy in SearchStrategy::ALL {
		let result = engine.search(&Filter::default(), strategy, None);

		assert_eq!(result.ids, vec!["a".to_string()], "Strategy {strategy}.");
		assert_eq!(result.scanned, 1, "Strategy {strategy}.");
	}

	let rebuilt = RetrievalEngine::new(shared);

	assert_eq!(
		id_set(&rebuilt.search(&Filter::default(), SearchStrategy::Linear, None).ids),
		id_set(&["a", "b"].map(String::from))
	);
}

#[test]
fn blank_item_store_matches_no_store_filter() {
	let catalog = Catalog::build([
		Item::new("p1", "Mug", 10.0, "home", 4.0, "").expect("Item must be valid."),
		Item::new("p2", "Cup", 12.0, "home", 4.0, "Unknown").expect("Item must be valid."),
	]);
	let engine = engine(catalog);
	let filter = Filter::builder().store("unknown").build().expect("Filter must be valid.");

	for strategy in SearchStrategy::ALL {
		let result = engine.search(&filter, strategy, None);

		assert_eq!(result.ids, vec!["p2".to_string()], "Strategy {strategy}.");
	}
}

fn arb_item() -> impl Strategy<Value = (f64, usize, f64, usize)> {
	(0.0_f64..100.0, 0_usize..3, 0.0_f64..=5.0, 0_usize..3)
}

fn arb_filter() -> impl Strategy<Value = Filter> {
	(
		prop::option::of(0.0_f64..50.0),
		prop::option::of(0_usize..4),
		prop::option::of(0.0_f64..=5.0),
		prop::option::of(0_usize..4),
		prop::option::of(prop::sample::select(SortBy::ALL.to_vec())),
	)
		.prop_map(|(price_min, category, min_rating, store, sort_by)| {
			let mut builder = Filter::builder();

			if let Some(price_min) = price_min {
				builder = builder.price_min(price_min).price_max(price_min + 40.0);
			}
			if let Some(category) = category {
				builder = builder.category(CATEGORIES[category].to_uppercase());
			}
			if let Some(min_rating) = min_rating {
				builder = builder.min_rating(min_rating);
			}
			if let Some(store) = store {
				builder = builder.store(FILTER_STORES[store]);
			}
			if let Some(sort_by) = sort_by {
				builder = builder.sort_by(sort_by);
			}

			builder.build().expect("Generated filter must be valid.")
		})
}

// The fourth label of each list never appears in generated catalogs.
const CATEGORIES: [&str; 4] = ["home", "Books", "garden", "toys"];
const STORES: [&str; 4] = ["north", "South", "", "east"];
// Blank item stores share the "unknown" tree node but match no store filter.
const FILTER_STORES: [&str; 4] = ["NORTH", "south", "unknown", "east"];

proptest! {
	#[test]
	fn strategies_agree_on_the_match_set(
		rows in prop::collection::vec(arb_item(), 0..40),
		filter in arb_filter(),
	) {
		let items = rows.iter().enumerate().map(|(idx, &(price, category, rating, store))| {
			Item::new(format!("p{idx}"), "Item", price, CATEGORIES[category], rating, STORES[store])
				.expect("Generated item must be valid.")
		});
		let catalog = Catalog::build(items);
		let engine = engine(catalog.clone());
		let linear = engine.search(&filter, SearchStrategy::Linear, None);
		let expected: BTreeSet<String> = catalog
			.iter()
			.filter(|item| filter.matches(item))
			.map(|item| item.id().to_string())
			.collect();

		prop_assert_eq!(id_set(&linear.ids), expected.clone());

		for strategy in [SearchStrategy::Bfs, SearchStrategy::Dfs, SearchStrategy::Priority] {
			let result = engine.search(&filter, strategy, None);

			prop_assert_eq!(id_set(&result.ids), expected.clone());
			prop_assert_eq!(result.ids.len(), expected.len());
			prop_assert!(result.scanned <= catalog.len());
		}

		if let Some(sort_by) = filter.sort_by() {
			let resolved: Vec<&Item> =
				linear.ids.iter().filter_map(|id| catalog.get(id)).collect();

			let sorted = resolved.windows(2).all(|pair| {
				sort_by.compare(pair[0], pair[1]) != std::cmp::Ordering::Greater
			});
			prop_assert!(sorted);
		}
	}
}
