use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Item, Result, match_key};

const PRICE_KEY: &str = "price";
const PRICE_BOUND_KEYS: [&str; 2] = ["min", "max"];
const CATEGORY_KEY: &str = "category";
const RATING_KEY: &str = "rating";
const RATING_ALIASES: [&str; 2] = ["seller_rating", "min_rating"];
const STORE_KEY: &str = "store";
const SORT_BY_KEY: &str = "sort_by";

/// Post-discovery ordering. Absent means discovery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
	PriceAsc,
	PriceDesc,
	RatingAsc,
	RatingDesc,
}
impl SortBy {
	pub const ALL: [Self; 4] = [Self::PriceAsc, Self::PriceDesc, Self::RatingAsc, Self::RatingDesc];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::PriceAsc => "price_asc",
			Self::PriceDesc => "price_desc",
			Self::RatingAsc => "rating_asc",
			Self::RatingDesc => "rating_desc",
		}
	}

	pub fn compare(self, a: &Item, b: &Item) -> Ordering {
		match self {
			Self::PriceAsc => a.price().total_cmp(&b.price()),
			Self::PriceDesc => b.price().total_cmp(&a.price()),
			Self::RatingAsc => a.rating().total_cmp(&b.rating()),
			Self::RatingDesc => b.rating().total_cmp(&a.rating()),
		}
	}
}
impl Display for SortBy {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for SortBy {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		Self::ALL.into_iter().find(|sort_by| sort_by.as_str() == raw).ok_or_else(|| {
			Error::validation(format!(
				"filter.sort_by must be one of price_asc, price_desc, rating_asc, or rating_desc, got {raw:?}."
			))
		})
	}
}

/// Hard retrieval constraints. Every field is optional; an empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
	price_min: Option<f64>,
	price_max: Option<f64>,
	category: Option<String>,
	min_rating: Option<f64>,
	store: Option<String>,
	sort_by: Option<SortBy>,
	category_key: Option<String>,
	store_key: Option<String>,
}
impl Filter {
	pub fn builder() -> FilterBuilder {
		FilterBuilder::default()
	}

	/// Parses a loosely-typed filter map, as received from request parameters.
	pub fn validate(raw: &Map<String, Value>) -> Result<Self> {
		Self::from_map(raw)
	}

	/// Accepted keys:
	///
	/// - `price`: `[min, max]` (either side may be null) or `{ "min": x, "max": y }`
	/// - `category`, `store`: strings
	/// - `rating` (aliases `seller_rating`, `min_rating`): `">=X"`, `"≥X"`, or a number
	/// - `sort_by`: one of the [`SortBy`] names
	///
	/// Null values count as absent. At most one rating key may be set.
	pub fn from_map(raw: &Map<String, Value>) -> Result<Self> {
		let mut builder = Self::builder();
		let mut rating_key: Option<&str> = None;

		for (key, value) in raw {
			if value.is_null() {
				continue;
			}

			match key.as_str() {
				PRICE_KEY => {
					let (min, max) = parse_price(value)?;

					builder.price_min = min;
					builder.price_max = max;
				},
				CATEGORY_KEY => builder.category = Some(parse_string(key, value)?),
				STORE_KEY => builder.store = Some(parse_string(key, value)?),
				SORT_BY_KEY => builder.sort_by = Some(parse_string(key, value)?.parse()?),
				key if key == RATING_KEY || RATING_ALIASES.contains(&key) => {
					if let Some(previous) = rating_key {
						return Err(Error::validation(format!(
							"filter.{key} conflicts with filter.{previous}; set one rating threshold."
						)));
					}

					rating_key = Some(key);
					builder.min_rating = Some(parse_rating(key, value)?);
				},
				_ => {
					return Err(Error::validation(format!(
						"filter.{key} is not a recognized filter field."
					)));
				},
			}
		}

		builder.build()
	}

	/// Inverse of [`Filter::from_map`]. Price is written as a `[min, max]` pair and the rating
	/// threshold as a `">=X"` comparator.
	pub fn to_map(&self) -> Map<String, Value> {
		let mut map = Map::new();

		if self.price_min.is_some() || self.price_max.is_some() {
			map.insert(
				PRICE_KEY.to_string(),
				Value::Array(vec![number_or_null(self.price_min), number_or_null(self.price_max)]),
			);
		}
		if let Some(category) = &self.category {
			map.insert(CATEGORY_KEY.to_string(), Value::String(category.clone()));
		}
		if let Some(min_rating) = self.min_rating {
			map.insert(RATING_KEY.to_string(), Value::String(format!(">={min_rating}")));
		}
		if let Some(store) = &self.store {
			map.insert(STORE_KEY.to_string(), Value::String(store.clone()));
		}
		if let Some(sort_by) = self.sort_by {
			map.insert(SORT_BY_KEY.to_string(), Value::String(sort_by.as_str().to_string()));
		}

		map
	}

	pub fn price_min(&self) -> Option<f64> {
		self.price_min
	}

	pub fn price_max(&self) -> Option<f64> {
		self.price_max
	}

	pub fn category(&self) -> Option<&str> {
		self.category.as_deref()
	}

	pub fn min_rating(&self) -> Option<f64> {
		self.min_rating
	}

	pub fn store(&self) -> Option<&str> {
		self.store.as_deref()
	}

	pub fn sort_by(&self) -> Option<SortBy> {
		self.sort_by
	}

	pub fn category_key(&self) -> Option<&str> {
		self.category_key.as_deref()
	}

	pub fn store_key(&self) -> Option<&str> {
		self.store_key.as_deref()
	}

	/// True when the item satisfies every constraint. Bounds are inclusive.
	pub fn matches(&self, item: &Item) -> bool {
		if let Some(min) = self.price_min
			&& item.price() < min
		{
			return false;
		}
		if let Some(max) = self.price_max
			&& item.price() > max
		{
			return false;
		}
		if let Some(key) = &self.category_key
			&& item.category_key() != key
		{
			return false;
		}
		if let Some(min_rating) = self.min_rating
			&& item.rating() < min_rating
		{
			return false;
		}
		if let Some(key) = &self.store_key
			&& item.store_match_key() != Some(key.as_str())
		{
			return false;
		}

		true
	}
}

#[derive(Clone, Debug, Default)]
pub struct FilterBuilder {
	price_min: Option<f64>,
	price_max: Option<f64>,
	category: Option<String>,
	min_rating: Option<f64>,
	store: Option<String>,
	sort_by: Option<SortBy>,
}
impl FilterBuilder {
	pub fn price_min(mut self, price_min: f64) -> Self {
		self.price_min = Some(price_min);

		self
	}

	pub fn price_max(mut self, price_max: f64) -> Self {
		self.price_max = Some(price_max);

		self
	}

	pub fn category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());

		self
	}

	pub fn min_rating(mut self, min_rating: f64) -> Self {
		self.min_rating = Some(min_rating);

		self
	}

	pub fn store(mut self, store: impl Into<String>) -> Self {
		self.store = Some(store.into());

		self
	}

	pub fn sort_by(mut self, sort_by: SortBy) -> Self {
		self.sort_by = Some(sort_by);

		self
	}

	pub fn build(self) -> Result<Filter> {
		for (label, value) in
			[("filter.price_min", self.price_min), ("filter.price_max", self.price_max)]
		{
			if let Some(value) = value
				&& (!value.is_finite() || value < 0.0)
			{
				return Err(Error::validation(format!(
					"{label} must be a finite number zero or greater, got {value}."
				)));
			}
		}

		if let (Some(min), Some(max)) = (self.price_min, self.price_max)
			&& min > max
		{
			return Err(Error::validation(format!(
				"filter.price_min must not exceed filter.price_max, got {min} > {max}."
			)));
		}
		if let Some(min_rating) = self.min_rating
			&& !(0.0..=5.0).contains(&min_rating)
		{
			return Err(Error::validation(format!(
				"filter.min_rating must be in the range 0.0-5.0, got {min_rating}."
			)));
		}

		for (label, value) in [("filter.category", &self.category), ("filter.store", &self.store)] {
			if value.as_deref().map(|value| value.trim().is_empty()).unwrap_or(false) {
				return Err(Error::validation(format!("{label} must be non-empty when set.")));
			}
		}

		let category_key = self.category.as_deref().map(match_key);
		let store_key = self.store.as_deref().map(match_key);

		Ok(Filter {
			price_min: self.price_min,
			price_max: self.price_max,
			category: self.category,
			min_rating: self.min_rating,
			store: self.store,
			sort_by: self.sort_by,
			category_key,
			store_key,
		})
	}
}

fn parse_price(value: &Value) -> Result<(Option<f64>, Option<f64>)> {
	match value {
		Value::Array(bounds) if bounds.len() == 2 => Ok((
			parse_bound("filter.price[0]", &bounds[0])?,
			parse_bound("filter.price[1]", &bounds[1])?,
		)),
		Value::Object(bounds) => {
			if let Some(key) = bounds.keys().find(|key| !PRICE_BOUND_KEYS.contains(&key.as_str())) {
				return Err(Error::validation(format!(
					"filter.price.{key} is not a recognized price bound; use min or max."
				)));
			}

			Ok((
				parse_bound("filter.price.min", bounds.get("min").unwrap_or(&Value::Null))?,
				parse_bound("filter.price.max", bounds.get("max").unwrap_or(&Value::Null))?,
			))
		},
		_ => Err(Error::validation(
			"filter.price must be a [min, max] pair or an object with min and max.",
		)),
	}
}

fn parse_bound(path: &str, value: &Value) -> Result<Option<f64>> {
	match value {
		Value::Null => Ok(None),
		Value::Number(number) => number
			.as_f64()
			.map(Some)
			.ok_or_else(|| Error::validation(format!("{path} must be a number."))),
		_ => Err(Error::validation(format!("{path} must be a number or null."))),
	}
}

fn parse_rating(key: &str, value: &Value) -> Result<f64> {
	let invalid =
		|| Error::validation(format!("filter.{key} must be a \">=X\" comparator or a number."));

	match value {
		Value::Number(number) => number.as_f64().ok_or_else(invalid),
		Value::String(raw) => {
			let raw = raw.trim();
			let threshold = raw
				.strip_prefix(">=")
				.or_else(|| raw.strip_prefix('≥'))
				.unwrap_or(raw)
				.trim();

			threshold.parse::<f64>().map_err(|_| invalid())
		},
		_ => Err(invalid()),
	}
}

fn parse_string(key: &str, value: &Value) -> Result<String> {
	value
		.as_str()
		.map(str::to_string)
		.ok_or_else(|| Error::validation(format!("filter.{key} must be a string.")))
}

fn number_or_null(value: Option<f64>) -> Value {
	value.map(Value::from).unwrap_or(Value::Null)
}
