use std::collections::BTreeMap;

use epic_domain::{Catalog, Filter};

/// Arena address of a tree node. Leaf indices are catalog slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeId {
	Root,
	Category(u32),
	Store(u32),
	Leaf(u32),
}

#[derive(Clone, Debug)]
pub struct CategoryNode {
	pub key: String,
	pub label: String,
	pub stores: Vec<u32>,
}

#[derive(Clone, Debug)]
pub struct StoreNode {
	pub key: String,
	pub label: String,
	pub category: u32,
	pub leaves: Vec<u32>,
}

/// Three-level category → store → item index over one catalog snapshot.
///
/// Categories and stores are ordered by case-folded key; leaves keep catalog order. Every
/// catalog slot appears as exactly one leaf.
#[derive(Clone, Debug, Default)]
pub struct SearchTree {
	root: Vec<u32>,
	categories: Vec<CategoryNode>,
	stores: Vec<StoreNode>,
	leaf_count: usize,
}
impl SearchTree {
	pub fn build(catalog: &Catalog) -> Self {
		let mut grouped: BTreeMap<&str, (&str, BTreeMap<&str, (&str, Vec<u32>)>)> =
			BTreeMap::new();

		for (slot, item) in catalog.iter().enumerate() {
			let (_, stores) = grouped
				.entry(item.category_key())
				.or_insert_with(|| (item.category(), BTreeMap::new()));
			let (_, leaves) =
				stores.entry(item.store_key()).or_insert_with(|| (item.store(), Vec::new()));

			leaves.push(slot as u32);
		}

		let mut tree = Self { leaf_count: catalog.len(), ..Default::default() };

		for (category_key, (category_label, stores)) in grouped {
			let category = tree.categories.len() as u32;
			let mut store_ids = Vec::with_capacity(stores.len());

			for (store_key, (store_label, leaves)) in stores {
				store_ids.push(tree.stores.len() as u32);
				tree.stores.push(StoreNode {
					key: store_key.to_string(),
					label: label_or_key(store_label, store_key),
					category,
					leaves,
				});
			}

			tree.root.push(category);
			tree.categories.push(CategoryNode {
				key: category_key.to_string(),
				label: label_or_key(category_label, category_key),
				stores: store_ids,
			});
		}

		tree
	}

	pub fn categories(&self) -> &[CategoryNode] {
		&self.categories
	}

	pub fn stores(&self) -> &[StoreNode] {
		&self.stores
	}

	pub fn leaf_count(&self) -> usize {
		self.leaf_count
	}

	/// Children in left-to-right order.
	pub fn children(&self, node: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
		type Wrap = fn(u32) -> NodeId;

		let (ids, wrap): (&[u32], Wrap) = match node {
			NodeId::Root => (self.root.as_slice(), NodeId::Category as Wrap),
			NodeId::Category(index) =>
				(self.categories[index as usize].stores.as_slice(), NodeId::Store as Wrap),
			NodeId::Store(index) =>
				(self.stores[index as usize].leaves.as_slice(), NodeId::Leaf as Wrap),
			NodeId::Leaf(_) => (&[] as &[u32], NodeId::Leaf as Wrap),
		};

		ids.iter().map(move |&id| wrap(id))
	}

	/// A category or store subtree is pruned when the filter pins a different label.
	pub fn is_pruned(&self, node: NodeId, filter: &Filter) -> bool {
		match node {
			NodeId::Category(index) => filter
				.category_key()
				.is_some_and(|key| key != self.categories[index as usize].key),
			NodeId::Store(index) =>
				filter.store_key().is_some_and(|key| key != self.stores[index as usize].key),
			NodeId::Root | NodeId::Leaf(_) => false,
		}
	}
}

fn label_or_key(label: &str, key: &str) -> String {
	if label.trim().is_empty() { key.to_string() } else { label.to_string() }
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use epic_domain::{Catalog, Filter, Item};

	use crate::retrieval::tree::{NodeId, SearchTree};

	fn catalog() -> Catalog {
		Catalog::build(
			[
				("p1", "home", "StoreB"),
				("p2", "Electronics", "StoreA"),
				("p3", "home", "storeA"),
				("p4", "home", "StoreB"),
				("p5", "electronics", ""),
			]
			.into_iter()
			.map(|(id, category, store)| {
				Item::new(id, id, 1.0, category, 4.0, store).expect("Item must be valid.")
			}),
		)
	}

	#[test]
	fn every_slot_is_exactly_one_leaf() {
		let tree = SearchTree::build(&catalog());
		let mut seen = HashSet::new();

		for store in tree.stores() {
			for &leaf in &store.leaves {
				assert!(seen.insert(leaf), "Leaf {leaf} appears twice.");
			}
		}

		assert_eq!(seen.len(), tree.leaf_count());
		assert_eq!(tree.leaf_count(), 5);
	}

	#[test]
	fn levels_are_sorted_by_key_and_leaves_keep_catalog_order() {
		let tree = SearchTree::build(&catalog());
		let categories: Vec<_> = tree.categories().iter().map(|node| node.key.as_str()).collect();

		assert_eq!(categories, vec!["electronics", "home"]);

		let home_stores: Vec<_> = tree
			.children(NodeId::Category(1))
			.map(|node| match node {
				NodeId::Store(index) => tree.stores()[index as usize].key.as_str(),
				other => panic!("Unexpected child {other:?}."),
			})
			.collect();

		assert_eq!(home_stores, vec!["storea", "storeb"]);
		assert_eq!(tree.stores()[3].leaves, vec![0, 3]);
		assert_eq!(tree.stores()[1].key, "unknown");
	}

	#[test]
	fn pruning_compares_case_folded_labels() {
		let tree = SearchTree::build(&catalog());
		let filter = Filter::builder()
			.category("HOME")
			.store("storeb")
			.build()
			.expect("Filter must be valid.");

		assert!(tree.is_pruned(NodeId::Category(0), &filter));
		assert!(!tree.is_pruned(NodeId::Category(1), &filter));
		assert!(tree.is_pruned(NodeId::Store(2), &filter));
		assert!(!tree.is_pruned(NodeId::Store(3), &filter));
		assert!(!tree.is_pruned(NodeId::Leaf(0), &filter));
	}
}
