use serde::Serialize;

use crate::{Error, Result};
use epic_domain::{Item, match_key};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoringWeights {
	pub price: f64,
	pub rating: f64,
	pub popularity: f64,
	pub category_match: f64,
	pub richness: f64,
}
impl ScoringWeights {
	pub fn from_config(cfg: &epic_config::ScoringWeights) -> Self {
		Self {
			price: cfg.price,
			rating: cfg.rating,
			popularity: cfg.popularity,
			category_match: cfg.category_match,
			richness: cfg.richness,
		}
	}

	pub fn total(&self) -> f64 {
		self.price + self.rating + self.popularity + self.category_match + self.richness
	}

	fn labeled(&self) -> [(&'static str, f64); 5] {
		[
			("price", self.price),
			("rating", self.rating),
			("popularity", self.popularity),
			("category_match", self.category_match),
			("richness", self.richness),
		]
	}
}
impl Default for ScoringWeights {
	fn default() -> Self {
		Self::from_config(&epic_config::ScoringWeights::default())
	}
}

/// Listing completeness blend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RichnessParams {
	pub description_weight: f64,
	pub feature_weight: f64,
	/// Description length, in characters, that earns the full description share.
	pub description_cap: f64,
	pub feature_cap: f64,
}
impl RichnessParams {
	pub fn from_config(cfg: &epic_config::ScoringRichness) -> Self {
		Self {
			description_weight: cfg.description_weight,
			feature_weight: cfg.feature_weight,
			description_cap: cfg.description_cap,
			feature_cap: cfg.feature_cap,
		}
	}
}
impl Default for RichnessParams {
	fn default() -> Self {
		Self::from_config(&epic_config::ScoringRichness::default())
	}
}

/// Validated scoring weights. Weights are non-negative, finite, and not all zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoringConfig {
	weights: ScoringWeights,
	richness: RichnessParams,
}
impl ScoringConfig {
	pub fn new(weights: ScoringWeights) -> Result<Self> {
		Self::with_richness(weights, RichnessParams::default())
	}

	pub fn with_richness(weights: ScoringWeights, richness: RichnessParams) -> Result<Self> {
		for (label, value) in weights.labeled() {
			if !value.is_finite() || value < 0.0 {
				return Err(Error::Validation {
					message: format!(
						"scoring weight {label} must be a finite number zero or greater, got {value}."
					),
				});
			}
		}

		if weights.total() <= 0.0 {
			return Err(Error::Validation {
				message: "scoring weights must not all be zero.".to_string(),
			});
		}

		for (label, value) in [
			("description_weight", richness.description_weight),
			("feature_weight", richness.feature_weight),
		] {
			if !value.is_finite() || value < 0.0 {
				return Err(Error::Validation {
					message: format!("richness {label} must be a finite number zero or greater."),
				});
			}
		}
		for (label, value) in
			[("description_cap", richness.description_cap), ("feature_cap", richness.feature_cap)]
		{
			if !value.is_finite() || value <= 0.0 {
				return Err(Error::Validation {
					message: format!("richness {label} must be a finite number greater than zero."),
				});
			}
		}

		Ok(Self { weights, richness })
	}

	pub fn from_config(cfg: &epic_config::Scoring) -> Result<Self> {
		Self::with_richness(
			ScoringWeights::from_config(&cfg.weights),
			RichnessParams::from_config(&cfg.richness),
		)
	}

	pub fn weights(&self) -> &ScoringWeights {
		&self.weights
	}

	pub fn richness(&self) -> &RichnessParams {
		&self.richness
	}

	/// Weights rescaled to sum to 1.
	pub fn normalized(&self) -> ScoringWeights {
		let total = self.weights.total();

		ScoringWeights {
			price: self.weights.price / total,
			rating: self.weights.rating / total,
			popularity: self.weights.popularity / total,
			category_match: self.weights.category_match / total,
			richness: self.weights.richness / total,
		}
	}
}
impl Default for ScoringConfig {
	fn default() -> Self {
		Self { weights: ScoringWeights::default(), richness: RichnessParams::default() }
	}
}

/// Candidate-set ranges used to normalize price and popularity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FeatureRanges {
	pub price: (f64, f64),
	/// Range of `ln(1 + rating_count)`.
	pub popularity: (f64, f64),
}
impl FeatureRanges {
	/// Empty input yields `(0, 0)` ranges.
	pub fn from_items<'a, I>(items: I) -> Self
	where
		I: IntoIterator<Item = &'a Item>,
	{
		let mut ranges: Option<Self> = None;

		for item in items {
			let price = item.price();
			let popularity = popularity(item);
			let ranges = ranges.get_or_insert(Self {
				price: (price, price),
				popularity: (popularity, popularity),
			});

			ranges.price = (ranges.price.0.min(price), ranges.price.1.max(price));
			ranges.popularity =
				(ranges.popularity.0.min(popularity), ranges.popularity.1.max(popularity));
		}

		ranges.unwrap_or_default()
	}
}

/// Per-component scores, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreComponents {
	pub price: f64,
	pub rating: f64,
	pub popularity: f64,
	pub category_match: f64,
	pub richness: f64,
}
impl ScoreComponents {
	pub fn compute(
		item: &Item,
		config: &ScoringConfig,
		ranges: &FeatureRanges,
		target_category: Option<&str>,
	) -> Self {
		let category_match = match target_category {
			None => 0.5,
			Some(target) if match_key(target) == item.category_key() => 1.0,
			Some(_) => 0.0,
		};

		Self {
			price: 1.0 - normalize(item.price(), ranges.price),
			rating: (item.rating() / 5.0).clamp(0.0, 1.0),
			popularity: normalize(popularity(item), ranges.popularity),
			category_match,
			richness: richness(item, config.richness()),
		}
	}

	pub fn weighted(&self, weights: &ScoringWeights) -> f64 {
		let score = weights.price * self.price
			+ weights.rating * self.rating
			+ weights.popularity * self.popularity
			+ weights.category_match * self.category_match
			+ weights.richness * self.richness;

		score.clamp(0.0, 1.0)
	}
}

/// Min-max normalization clamped to `[0, 1]`; a degenerate range maps to 0.5.
pub fn normalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
	if hi <= lo {
		return 0.5;
	}

	((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

pub fn popularity(item: &Item) -> f64 {
	(item.rating_count() as f64).ln_1p()
}

pub fn richness(item: &Item, params: &RichnessParams) -> f64 {
	let description_len = item.description().map(|text| text.chars().count()).unwrap_or(0);
	let description = (description_len as f64 / params.description_cap).min(1.0);
	let features = (item.features().len() as f64 / params.feature_cap).min(1.0);

	(params.description_weight * description + params.feature_weight * features).clamp(0.0, 1.0)
}

/// Relevance in `[0, 1]`. Without a target category the category component is neutral.
pub fn compute_score(
	item: &Item,
	config: &ScoringConfig,
	ranges: &FeatureRanges,
	target_category: Option<&str>,
) -> f64 {
	ScoreComponents::compute(item, config, ranges, target_category).weighted(&config.normalized())
}
