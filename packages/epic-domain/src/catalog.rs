use std::collections::{BTreeMap, HashMap};

use crate::{Error, Item, Result, match_key};

/// In-memory item collection keyed by ID.
///
/// Iteration follows first-insertion order. Re-inserting an ID replaces the stored item in
/// place (last write wins). A catalog is meant to be built, then frozen behind an `Arc`;
/// later updates go through `Arc::make_mut`, which leaves existing readers on their
/// snapshot.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
	items: Vec<Item>,
	slots: HashMap<String, usize>,
	by_category: HashMap<String, Vec<String>>,
}
impl Catalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn build<I>(items: I) -> Self
	where
		I: IntoIterator<Item = Item>,
	{
		let mut catalog = Self::new();

		for item in items {
			catalog.insert(item);
		}

		catalog
	}

	/// Returns the item this one replaced, if any.
	pub fn insert(&mut self, item: Item) -> Option<Item> {
		let Some(&slot) = self.slots.get(item.id()) else {
			self.by_category
				.entry(item.category_key().to_string())
				.or_default()
				.push(item.id().to_string());
			self.slots.insert(item.id().to_string(), self.items.len());
			self.items.push(item);

			return None;
		};
		let previous = std::mem::replace(&mut self.items[slot], item);
		let current = &self.items[slot];

		if previous.category_key() != current.category_key() {
			if let Some(ids) = self.by_category.get_mut(previous.category_key()) {
				ids.retain(|id| id != previous.id());

				if ids.is_empty() {
					self.by_category.remove(previous.category_key());
				}
			}

			self.by_category
				.entry(current.category_key().to_string())
				.or_default()
				.push(current.id().to_string());
		}

		Some(previous)
	}

	pub fn get(&self, id: &str) -> Option<&Item> {
		self.slots.get(id).map(|&slot| &self.items[slot])
	}

	/// Strict lookup.
	pub fn require(&self, id: &str) -> Result<&Item> {
		self.get(id).ok_or_else(|| Error::NotFound { id: id.to_string() })
	}

	pub fn contains(&self, id: &str) -> bool {
		self.slots.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Item> {
		self.items.iter()
	}

	/// Items in slot order. A slot is stable for the lifetime of this instance.
	pub fn as_slice(&self) -> &[Item] {
		&self.items
	}

	pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
		self.items.iter().map(Item::id)
	}

	/// Distinct categories, one label per case-folded key, sorted by key.
	pub fn categories(&self) -> Vec<String> {
		distinct_labels(self.items.iter().map(|item| (item.category_key(), item.category())))
	}

	/// Distinct stores, one label per case-folded key, sorted by key.
	pub fn stores(&self) -> Vec<String> {
		distinct_labels(self.items.iter().map(|item| (item.store_key(), item.store())))
	}

	pub fn ids_in_category(&self, category: &str) -> &[String] {
		self.by_category.get(&match_key(category)).map(Vec::as_slice).unwrap_or(&[])
	}

	/// `(category, count)` pairs, largest first, ties by category.
	pub fn category_counts(&self) -> Vec<(String, usize)> {
		let labels = self.categories();
		let mut counts: Vec<_> = labels
			.into_iter()
			.map(|label| {
				let count = self.ids_in_category(&label).len();

				(label, count)
			})
			.collect();

		counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

		counts
	}
}
impl<'a> IntoIterator for &'a Catalog {
	type IntoIter = std::slice::Iter<'a, Item>;
	type Item = &'a Item;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
impl FromIterator<Item> for Catalog {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = Item>,
	{
		Self::build(iter)
	}
}

fn distinct_labels<'a, I>(pairs: I) -> Vec<String>
where
	I: Iterator<Item = (&'a str, &'a str)>,
{
	let mut labels: BTreeMap<&str, &str> = BTreeMap::new();

	for (key, label) in pairs {
		labels.entry(key).or_insert(if label.trim().is_empty() { key } else { label });
	}

	labels.into_values().map(str::to_string).collect()
}
