use serde::{Deserialize, Serialize};

use crate::{Error, Result, UNKNOWN_STORE, match_key};

/// A validated catalog listing.
///
/// Items are immutable once built. Category and store comparisons go through the cached,
/// case-folded keys so that retrieval pruning and predicate evaluation agree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
	id: String,
	title: String,
	price: f64,
	category: String,
	rating: f64,
	store: String,
	description: Option<String>,
	tags: Vec<String>,
	image_url: Option<String>,
	rating_count: u64,
	features: Vec<String>,
	category_key: String,
	store_key: String,
}
impl Item {
	pub fn new(
		id: impl Into<String>,
		title: impl Into<String>,
		price: f64,
		category: impl Into<String>,
		rating: f64,
		store: impl Into<String>,
	) -> Result<Self> {
		Self::try_from(ItemRecord {
			id: id.into(),
			title: title.into(),
			price,
			category: category.into(),
			rating,
			store: store.into(),
			..Default::default()
		})
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	pub fn with_tags(mut self, tags: Vec<String>) -> Self {
		self.tags = tags;

		self
	}

	pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
		self.image_url = Some(image_url.into());

		self
	}

	pub fn with_rating_count(mut self, rating_count: u64) -> Self {
		self.rating_count = rating_count;

		self
	}

	pub fn with_features(mut self, features: Vec<String>) -> Self {
		self.features = features;

		self
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn price(&self) -> f64 {
		self.price
	}

	pub fn category(&self) -> &str {
		&self.category
	}

	pub fn rating(&self) -> f64 {
		self.rating
	}

	pub fn store(&self) -> &str {
		&self.store
	}

	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	pub fn tags(&self) -> &[String] {
		&self.tags
	}

	pub fn image_url(&self) -> Option<&str> {
		self.image_url.as_deref()
	}

	pub fn rating_count(&self) -> u64 {
		self.rating_count
	}

	pub fn features(&self) -> &[String] {
		&self.features
	}

	pub fn category_key(&self) -> &str {
		&self.category_key
	}

	/// Tree grouping key. Falls back to [`UNKNOWN_STORE`] when the listing has no store.
	pub fn store_key(&self) -> &str {
		&self.store_key
	}

	/// Key compared against a store filter. A listing without a store matches no store filter.
	pub fn store_match_key(&self) -> Option<&str> {
		if self.store.trim().is_empty() { None } else { Some(self.store_key.as_str()) }
	}
}

/// Wire shape of an [`Item`], validated on conversion.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemRecord {
	pub id: String,
	pub title: String,
	pub price: f64,
	pub category: String,
	pub rating: f64,
	#[serde(default)]
	pub store: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	#[serde(default)]
	pub rating_count: u64,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub features: Vec<String>,
}
impl TryFrom<ItemRecord> for Item {
	type Error = Error;

	fn try_from(record: ItemRecord) -> Result<Self> {
		if record.id.trim().is_empty() {
			return Err(Error::validation("item.id must be non-empty."));
		}
		if !record.price.is_finite() || record.price < 0.0 {
			return Err(Error::validation(format!(
				"item {:?} price must be a finite number zero or greater, got {}.",
				record.id, record.price
			)));
		}
		if !(0.0..=5.0).contains(&record.rating) {
			return Err(Error::validation(format!(
				"item {:?} rating must be in the range 0.0-5.0, got {}.",
				record.id, record.rating
			)));
		}

		let category_key = match_key(&record.category);
		let store_key = if record.store.trim().is_empty() {
			UNKNOWN_STORE.to_string()
		} else {
			match_key(&record.store)
		};

		Ok(Self {
			id: record.id,
			title: record.title,
			price: record.price,
			category: record.category,
			rating: record.rating,
			store: record.store,
			description: record.description,
			tags: record.tags,
			image_url: record.image_url,
			rating_count: record.rating_count,
			features: record.features,
			category_key,
			store_key,
		})
	}
}
impl From<Item> for ItemRecord {
	fn from(item: Item) -> Self {
		Self {
			id: item.id,
			title: item.title,
			price: item.price,
			category: item.category,
			rating: item.rating,
			store: item.store,
			description: item.description,
			tags: item.tags,
			image_url: item.image_url,
			rating_count: item.rating_count,
			features: item.features,
		}
	}
}
