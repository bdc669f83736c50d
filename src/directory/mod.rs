pub mod models;
pub mod search;

pub use models::{AnnotatedPoint, CollectionPoint, PointCategory, SearchQuery};
pub use search::{search, CategoryCounts, CollectionPointDirectory};
