pub mod catalog;
pub mod error;
pub mod geo;
pub mod grid;
pub mod query;
pub mod records;
pub mod search;

pub use catalog::{Catalog, Shop};
pub use error::CatalogError;
pub use grid::{Grid, ProductEntry};
pub use query::{RawQuery, SearchQuery};
pub use search::{search, SearchHit, ShopView};
