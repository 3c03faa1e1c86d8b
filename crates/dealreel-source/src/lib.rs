pub mod cards;
pub mod catalog;
pub mod error;
pub mod file;
mod http;
pub mod page;
pub mod sample;

pub use cards::parse_cards;
pub use catalog::{CatalogClient, SearchResponse};
pub use error::SourceError;
pub use file::load_raw_records;
pub use page::PageClient;
pub use sample::{sample_records, SAMPLE_CAPACITY};
