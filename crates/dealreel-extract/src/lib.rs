pub mod collect;
pub mod error;
pub mod extract;
pub mod price;
pub mod record;
pub mod types;
pub mod url;

pub use collect::{collect, collect_categories, CategoryBatch, CategoryCollector, RunStats};
pub use error::{CollectError, Rejection};
pub use extract::{extract, Derivation, ExtractConfig, ExtractionPolicy};
pub use record::{get_path, Field, Lookup, RawRecord};
pub use types::{ApiItem, CardImage, ScrapedCard};
