use epic_domain::{Filter, Item};

/// Distance-to-match estimate used to order the priority scan.
///
/// Each violated constraint adds its own penalty: price deficit or excess in price units, a
/// fixed penalty for a category or store mismatch, and a scaled rating deficit. The estimate
/// only orders discovery and never prunes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriorityHeuristic {
	pub category_penalty: f64,
	pub store_penalty: f64,
	pub rating_penalty_factor: f64,
}
impl PriorityHeuristic {
	pub fn from_config(cfg: &epic_config::Retrieval) -> Self {
		Self {
			category_penalty: cfg.category_penalty,
			store_penalty: cfg.store_penalty,
			rating_penalty_factor: cfg.rating_penalty_factor,
		}
	}

	pub fn distance(&self, item: &Item, filter: &Filter) -> f64 {
		let mut distance = 0.0;

		if let Some(min) = filter.price_min()
			&& item.price() < min
		{
			distance += min - item.price();
		}
		if let Some(max) = filter.price_max()
			&& item.price() > max
		{
			distance += item.price() - max;
		}
		if filter.category_key().is_some_and(|key| key != item.category_key()) {
			distance += self.category_penalty;
		}
		if let Some(min_rating) = filter.min_rating()
			&& item.rating() < min_rating
		{
			distance += (min_rating - item.rating()) * self.rating_penalty_factor;
		}
		if filter.store_key().is_some_and(|key| item.store_match_key() != Some(key)) {
			distance += self.store_penalty;
		}

		distance
	}
}
impl Default for PriorityHeuristic {
	fn default() -> Self {
		Self::from_config(&epic_config::Retrieval::default())
	}
}
