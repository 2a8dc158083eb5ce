pub mod catalog;
pub mod filter;
pub mod item;

mod error;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use filter::{Filter, FilterBuilder, SortBy};
pub use item::Item;

/// Store key assigned to items listed without a store.
pub const UNKNOWN_STORE: &str = "unknown";

/// Case-folded key used for every category and store comparison.
pub fn match_key(label: &str) -> String {
	label.to_lowercase()
}
