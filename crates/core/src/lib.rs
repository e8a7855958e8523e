pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{PulseError, PulseResult};
pub use types::{BusinessRecord, Channel, DateRange, MarketingRecord};
