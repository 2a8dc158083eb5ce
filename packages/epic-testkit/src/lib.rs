//! Shared catalogs for integration tests.

mod error;

pub use error::{Error, Result};

use epic_domain::{Catalog, Item};

/// Item with the required fields only.
pub fn item(id: &str, price: f64, category: &str, rating: f64, store: &str) -> Result<Item> {
	Ok(Item::new(id, id, price, category, rating, store)?)
}

/// Ten items over `home` and `electronics`, spread across StoreA, StoreB, and StoreC.
///
/// | id  | price | category    | rating | store  |
/// | --- | ----- | ----------- | ------ | ------ |
/// | p1  | 18    | home        | 4.8    | StoreA |
/// | p2  | 35    | home        | 4.5    | StoreA |
/// | p3  | 45    | home        | 4.2    | StoreB |
/// | p4  | 60    | home        | 4.9    | StoreA |
/// | p5  | 15    | electronics | 4.0    | StoreC |
/// | p6  | 8     | electronics | 3.8    | StoreA |
/// | p7  | 50    | electronics | 4.7    | StoreB |
/// | p8  | 22    | home        | 4.6    | StoreA |
/// | p9  | 28    | home        | 4.4    | StoreC |
/// | p10 | 12    | home        | 4.1    | StoreA |
pub fn marketplace() -> Result<Catalog> {
	let rows = [
		("p1", "Ceramic Mug", 18.0, "home", 4.8, "StoreA"),
		("p2", "Glass Vase", 35.0, "home", 4.5, "StoreA"),
		("p3", "Wooden Bowl", 45.0, "home", 4.2, "StoreB"),
		("p4", "Metal Lamp", 60.0, "home", 4.9, "StoreA"),
		("p5", "Phone Case", 15.0, "electronics", 4.0, "StoreC"),
		("p6", "USB Cable", 8.0, "electronics", 3.8, "StoreA"),
		("p7", "Headphones", 50.0, "electronics", 4.7, "StoreB"),
		("p8", "Plant Pot", 22.0, "home", 4.6, "StoreA"),
		("p9", "Candle Set", 28.0, "home", 4.4, "StoreC"),
		("p10", "Picture Frame", 12.0, "home", 4.1, "StoreA"),
	];
	let items = rows
		.into_iter()
		.map(|(id, title, price, category, rating, store)| {
			Item::new(id, title, price, category, rating, store)
		})
		.collect::<epic_domain::Result<Vec<_>>>()?;

	Ok(Catalog::build(items))
}

/// Five `Books` items priced 55, 38, 48, 35, 42 (deliberately unsorted).
pub fn books() -> Result<Catalog> {
	let items = [("b1", 55.0), ("b2", 38.0), ("b3", 48.0), ("b4", 35.0), ("b5", 42.0)]
		.into_iter()
		.map(|(id, price)| item(id, price, "Books", 4.0, "Paper Trail"))
		.collect::<Result<Vec<_>>>()?;

	Ok(Catalog::build(items))
}

/// Twelve items over three categories with varied richness and popularity.
///
/// `identical-1` shares price, store, and category with `home-mid` so score ties occur.
pub fn ranking() -> Result<Catalog> {
	let mut items = Vec::with_capacity(12);

	items.push(
		item("cheap-good", 10.0, "electronics", 4.8, "ValueShop")?
			.with_description("An affordable product with great reviews.")
			.with_rating_count(5_000)
			.with_features(["fast", "reliable"].map(String::from).to_vec()),
	);
	items.push(
		item("expensive-great", 99.0, "electronics", 5.0, "LuxuryTech")?
			.with_description("Top-of-the-line product with every feature you need. ".repeat(3))
			.with_rating_count(12_000)
			.with_features(["premium", "warranty", "fast", "durable"].map(String::from).to_vec()),
	);
	items.push(
		item("mid-ok", 45.0, "electronics", 3.5, "ValueShop")?
			.with_description("Gets the job done.")
			.with_rating_count(200),
	);
	items.push(item("cheap-bad", 5.0, "electronics", 2.0, "CheapCo")?.with_rating_count(10));
	items.push(
		item("home-star", 30.0, "home", 4.9, "HomeHaven")?
			.with_description("Ultra-soft blanket, perfect for winter evenings.")
			.with_rating_count(8_000)
			.with_features(["soft", "warm", "washable"].map(String::from).to_vec()),
	);
	items.push(
		item("home-mid", 25.0, "home", 4.2, "HomeHaven")?
			.with_description("LED desk lamp with adjustable brightness.")
			.with_rating_count(3_000)
			.with_features(["LED", "dimmable"].map(String::from).to_vec()),
	);
	items.push(item("home-cheap", 3.0, "home", 3.0, "CheapCo")?.with_rating_count(50));
	items.push(
		item("book-best", 55.0, "books", 4.7, "BookWorld")?
			.with_description("Comprehensive guide to artificial intelligence. ".repeat(4))
			.with_rating_count(1_500)
			.with_features(["hardcover", "index", "exercises"].map(String::from).to_vec()),
	);
	items.push(
		item("book-ok", 20.0, "books", 4.0, "BookWorld")?
			.with_description("Beginner-friendly Python tutorial.")
			.with_rating_count(900),
	);
	items.push(
		item("no-reviews", 40.0, "electronics", 3.0, "ValueShop")?
			.with_description("Brand new product, no reviews yet."),
	);
	items.push(item("no-desc", 15.0, "electronics", 4.0, "ValueShop")?.with_rating_count(500));
	items.push(
		item("identical-1", 25.0, "home", 4.0, "HomeHaven")?
			.with_description("Standard product.")
			.with_rating_count(1_000),
	);

	Ok(Catalog::build(items))
}

/// Prices of `ids` looked up in `catalog`, in order.
pub fn prices(catalog: &Catalog, ids: &[String]) -> Result<Vec<f64>> {
	ids.iter()
		.map(|id| {
			catalog
				.get(id)
				.map(Item::price)
				.ok_or_else(|| Error::Message(format!("Item {id:?} is not in the catalog.")))
		})
		.collect()
}
