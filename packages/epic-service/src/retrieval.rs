pub mod heuristic;
pub mod tree;

pub use heuristic::PriorityHeuristic;
pub use tree::{NodeId, SearchTree};

use std::{
	cmp::{Ordering, Reverse},
	collections::{BinaryHeap, VecDeque},
	fmt::{Display, Formatter},
	str::FromStr,
	sync::Arc,
	time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, StrategyDomain};
use epic_domain::{Catalog, Filter, Item};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
	Linear,
	Bfs,
	Dfs,
	Priority,
}
impl SearchStrategy {
	pub const ALL: [Self; 4] = [Self::Linear, Self::Bfs, Self::Dfs, Self::Priority];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Linear => "linear",
			Self::Bfs => "bfs",
			Self::Dfs => "dfs",
			Self::Priority => "priority",
		}
	}
}
impl Display for SearchStrategy {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for SearchStrategy {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		Self::ALL.into_iter().find(|strategy| strategy.as_str() == raw).ok_or_else(|| {
			Error::UnknownStrategy { domain: StrategyDomain::Retrieval, name: raw.to_string() }
		})
	}
}

/// Matching IDs in final order plus traversal diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
	pub ids: Vec<String>,
	pub strategy: SearchStrategy,
	/// Leaves actually tested against the filter.
	pub scanned: usize,
	#[serde(rename = "elapsed_ms", with = "crate::duration_ms")]
	pub elapsed: Duration,
}
impl SearchResult {
	/// Wraps an externally produced candidate list.
	pub fn from_ids(ids: Vec<String>, strategy: SearchStrategy) -> Self {
		Self { scanned: ids.len(), ids, strategy, elapsed: Duration::ZERO }
	}

	pub fn count(&self) -> usize {
		self.ids.len()
	}
}

struct Discovery {
	slots: Vec<u32>,
	scanned: usize,
}

struct Queued<'a> {
	distance: f64,
	id: &'a str,
	slot: u32,
}
impl Ord for Queued<'_> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.distance
			.total_cmp(&other.distance)
			.then_with(|| self.id.cmp(other.id))
			.then_with(|| self.slot.cmp(&other.slot))
	}
}
impl PartialOrd for Queued<'_> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl PartialEq for Queued<'_> {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}
impl Eq for Queued<'_> {}

/// Candidate retrieval over one catalog snapshot.
///
/// The tree is built once at construction. Later catalog updates made through
/// `Arc::make_mut` are not visible here; build a new engine to pick them up.
#[derive(Clone, Debug)]
pub struct RetrievalEngine {
	catalog: Arc<Catalog>,
	tree: SearchTree,
	heuristic: PriorityHeuristic,
}
impl RetrievalEngine {
	pub fn new(catalog: Arc<Catalog>) -> Self {
		Self::with_heuristic(catalog, PriorityHeuristic::default())
	}

	pub fn with_heuristic(catalog: Arc<Catalog>, heuristic: PriorityHeuristic) -> Self {
		let tree = SearchTree::build(&catalog);

		Self { catalog, tree, heuristic }
	}

	pub fn catalog(&self) -> &Arc<Catalog> {
		&self.catalog
	}

	pub fn tree(&self) -> &SearchTree {
		&self.tree
	}

	pub fn heuristic(&self) -> &PriorityHeuristic {
		&self.heuristic
	}

	/// Runs one traversal, then applies the filter's sort (stable) and truncates.
	///
	/// Every strategy yields the same ID set for a given filter; only discovery order and
	/// the scanned count differ.
	pub fn search(
		&self,
		filter: &Filter,
		strategy: SearchStrategy,
		max_results: Option<usize>,
	) -> SearchResult {
		let started = Instant::now();
		let Discovery { mut slots, scanned } = match strategy {
			SearchStrategy::Linear => self.linear(filter),
			SearchStrategy::Bfs => self.breadth_first(filter),
			SearchStrategy::Dfs => self.depth_first(filter),
			SearchStrategy::Priority => self.priority(filter),
		};
		let items = self.catalog.as_slice();

		if let Some(sort_by) = filter.sort_by() {
			slots.sort_by(|&a, &b| sort_by.compare(&items[a as usize], &items[b as usize]));
		}
		if let Some(max_results) = max_results {
			slots.truncate(max_results);
		}

		let ids: Vec<String> =
			slots.iter().map(|&slot| items[slot as usize].id().to_string()).collect();
		let elapsed = started.elapsed();

		tracing::debug!(
			strategy = %strategy,
			filter = ?filter,
			candidates = ids.len(),
			scanned,
			elapsed_ms = elapsed.as_secs_f64() * 1_000.0,
			"Retrieval completed."
		);

		SearchResult { ids, strategy, scanned, elapsed }
	}

	fn item(&self, slot: u32) -> &Item {
		&self.catalog.as_slice()[slot as usize]
	}

	fn linear(&self, filter: &Filter) -> Discovery {
		let slots = self
			.catalog
			.iter()
			.enumerate()
			.filter(|(_, item)| filter.matches(item))
			.map(|(slot, _)| slot as u32)
			.collect();

		Discovery { slots, scanned: self.catalog.len() }
	}

	fn breadth_first(&self, filter: &Filter) -> Discovery {
		let mut queue = VecDeque::from([NodeId::Root]);
		let mut discovery = Discovery { slots: Vec::new(), scanned: 0 };

		while let Some(node) = queue.pop_front() {
			if let NodeId::Leaf(slot) = node {
				self.visit_leaf(slot, filter, &mut discovery);

				continue;
			}

			queue.extend(
				self.tree.children(node).filter(|&child| !self.tree.is_pruned(child, filter)),
			);
		}

		discovery
	}

	fn depth_first(&self, filter: &Filter) -> Discovery {
		let mut stack = vec![NodeId::Root];
		let mut discovery = Discovery { slots: Vec::new(), scanned: 0 };

		while let Some(node) = stack.pop() {
			if let NodeId::Leaf(slot) = node {
				self.visit_leaf(slot, filter, &mut discovery);

				continue;
			}

			// Reversed so the leftmost child is popped first.
			stack.extend(
				self.tree.children(node).rev().filter(|&child| !self.tree.is_pruned(child, filter)),
			);
		}

		discovery
	}

	fn priority(&self, filter: &Filter) -> Discovery {
		let mut heap: BinaryHeap<Reverse<Queued<'_>>> = self
			.catalog
			.iter()
			.enumerate()
			.map(|(slot, item)| {
				Reverse(Queued {
					distance: self.heuristic.distance(item, filter),
					id: item.id(),
					slot: slot as u32,
				})
			})
			.collect();
		let mut discovery = Discovery { slots: Vec::new(), scanned: 0 };

		while let Some(Reverse(queued)) = heap.pop() {
			self.visit_leaf(queued.slot, filter, &mut discovery);
		}

		discovery
	}

	fn visit_leaf(&self, slot: u32, filter: &Filter, discovery: &mut Discovery) {
		discovery.scanned += 1;

		if filter.matches(self.item(slot)) {
			discovery.slots.push(slot);
		}
	}
}
