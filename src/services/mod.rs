pub mod catalog;
pub mod catalog_cache;
pub mod embedding;
pub mod metadata;
pub mod scan;
pub mod similarity;

pub use catalog::build_catalog;
pub use catalog_cache::CatalogCache;
pub use embedding::{EmbeddingProvider, FastEmbedProvider};
pub use metadata::{MetadataProvider, OmdbProvider};
