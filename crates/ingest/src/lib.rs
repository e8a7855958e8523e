//! Source ingestion: reads the three marketing feeds and the business feed,
//! reconciles their column naming, and produces typed record tables.

#![warn(clippy::unwrap_used)]

pub mod dates;
pub mod loader;
pub mod normalize;
pub mod table;

pub use loader::{
    normalize_business, union_marketing, BusinessTable, Dataset, Ingestor, MarketingTable, Source,
    SourceBundle,
};
pub use normalize::{normalize_column_name, normalize_columns, tag_channel};
pub use table::RawTable;
