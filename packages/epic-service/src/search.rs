use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{EpicService, Error, Result, SearchStrategy, resolve_max_results};
use epic_domain::{Filter, Item};

const DEFAULT_PAGE_SIZE: u32 = 24;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchRequest {
	/// Loose filter map; see [`Filter::from_map`].
	#[serde(default)]
	pub filter: Map<String, Value>,
	/// Falls back to `retrieval.default_strategy`.
	pub strategy: Option<String>,
	pub max_results: Option<i64>,
	/// 1-based.
	pub page: Option<u32>,
	pub page_size: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchMetadata {
	pub strategy: SearchStrategy,
	pub scanned: usize,
	#[serde(rename = "elapsed_ms", with = "crate::duration_ms")]
	pub elapsed: Duration,
	/// Items on this page.
	pub count: usize,
	/// Matches across all pages.
	pub total: usize,
	pub page: u32,
	pub page_size: u32,
	pub total_pages: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub items: Vec<Item>,
	pub metadata: SearchMetadata,
}

impl EpicService {
	pub fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let strategy: SearchStrategy = match req.strategy.as_deref() {
			Some(raw) => raw.trim().to_ascii_lowercase().parse()?,
			None => self.default_retrieval,
		};
		let filter = Filter::from_map(&req.filter)?;
		let max_results = resolve_max_results(req.max_results)?;
		let page = req.page.unwrap_or(1);
		let page_size = req.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

		if page == 0 {
			return Err(Error::Validation { message: "page must be 1 or greater.".to_string() });
		}
		if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
			return Err(Error::Validation {
				message: format!(
					"page_size must be in the range 1-{MAX_PAGE_SIZE}, got {page_size}."
				),
			});
		}

		let result = self.retrieval.search(&filter, strategy, max_results);
		let total = result.count();
		let total_pages = total.div_ceil(page_size as usize).max(1);
		let items = result
			.ids
			.iter()
			.skip((page as usize - 1) * page_size as usize)
			.take(page_size as usize)
			.map(|id| self.catalog.require(id).cloned())
			.collect::<std::result::Result<Vec<_>, _>>()?;

		Ok(SearchResponse {
			metadata: SearchMetadata {
				strategy: result.strategy,
				scanned: result.scanned,
				elapsed: result.elapsed,
				count: items.len(),
				total,
				page,
				page_size,
				total_pages,
			},
			items,
		})
	}
}
