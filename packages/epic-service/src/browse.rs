use serde::{Deserialize, Serialize};

use crate::{EpicService, Error, Result};
use epic_domain::Item;

const DEFAULT_LIST_LIMIT: u32 = 20;
const MAX_LIST_LIMIT: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
	pub name: String,
	pub count: usize,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListRequest {
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListResponse {
	pub items: Vec<Item>,
	pub total: usize,
}

impl EpicService {
	/// Categories by item count, largest first.
	pub fn categories(&self) -> Vec<CategoryCount> {
		self.catalog
			.category_counts()
			.into_iter()
			.map(|(name, count)| CategoryCount { name, count })
			.collect()
	}

	pub fn item(&self, id: &str) -> Result<Item> {
		Ok(self.catalog.require(id)?.clone())
	}

	/// One page of the catalog in insertion order.
	pub fn list_items(&self, req: ListRequest) -> Result<ListResponse> {
		let limit = req.limit.unwrap_or(DEFAULT_LIST_LIMIT);

		if !(1..=MAX_LIST_LIMIT).contains(&limit) {
			return Err(Error::Validation {
				message: format!("limit must be in the range 1-{MAX_LIST_LIMIT}, got {limit}."),
			});
		}

		let items = self
			.catalog
			.iter()
			.skip(req.offset.unwrap_or(0) as usize)
			.take(limit as usize)
			.cloned()
			.collect();

		Ok(ListResponse { items, total: self.catalog.len() })
	}
}
