//! Marketing performance reporting: per-record ratio metrics, date-range
//! filtering, KPI totals, the daily time series, channel and campaign
//! rollups, and their text/CSV/JSON renderings.

pub mod dashboard;
pub mod export;
pub mod filter;
pub mod format;
pub mod kpi;
pub mod metrics;
pub mod render;
pub mod rollup;
pub mod series;

pub use dashboard::{Dashboard, DashboardEngine, DashboardQuery};
pub use export::View;
pub use kpi::KpiSet;
pub use metrics::RecordMetrics;
pub use rollup::{CampaignRollup, ChannelRollup};
pub use series::DailyPoint;
