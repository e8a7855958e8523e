//! Marketing performance dashboard: recomputes every view from the ingested
//! dataset for a given date range.

use crate::filter::filter_by_range;
use crate::kpi::{compute_kpis, KpiSet};
use crate::metrics::{derive_metrics, RecordMetrics};
use crate::rollup::{campaign_rollup, channel_rollup, CampaignRollup, ChannelRollup};
use crate::series::{daily_series, DailyPoint};
use chrono::{DateTime, Utc};
use pulse_core::config::OrdersScope;
use pulse_core::{DateRange, MarketingRecord};
use pulse_ingest::Dataset;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters of one dashboard computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardQuery {
    /// Defaults to the full span of marketing dates.
    pub range: Option<DateRange>,
    pub orders_scope: OrdersScope,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// `[min, max]` marketing date; the bounds a range selector offers.
    pub available_range: Option<DateRange>,
    /// Range the views were computed over.
    pub active_range: Option<DateRange>,
    pub orders_scope: OrdersScope,
    pub filtered_records: usize,
    pub kpis: KpiSet,
    pub daily: Vec<DailyPoint>,
    pub channels: Vec<ChannelRollup>,
    pub campaigns: Vec<CampaignRollup>,
    pub generated_at: DateTime<Utc>,
}

impl Dashboard {
    /// Leaderboard rows for display, capped at `limit` when given.
    pub fn leaderboard(&self, limit: Option<usize>) -> &[CampaignRollup] {
        let n = limit.map_or(self.campaigns.len(), |l| l.min(self.campaigns.len()));
        &self.campaigns[..n]
    }
}

pub struct DashboardEngine<'a> {
    dataset: &'a Dataset,
}

impl<'a> DashboardEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn available_range(&self) -> Option<DateRange> {
        self.dataset.marketing.date_bounds()
    }

    /// The query's range, or the full marketing span when none was given.
    pub fn resolve_range(&self, query: &DashboardQuery) -> Option<DateRange> {
        query.range.or_else(|| self.available_range())
    }

    pub fn filtered(&self, query: &DashboardQuery) -> Vec<&'a MarketingRecord> {
        let range = self.resolve_range(query);
        filter_by_range(self.dataset.marketing.records(), range.as_ref())
    }

    /// Compute all four views. Never fails: an empty selection yields zero
    /// totals, an undefined mean ROAS, and empty tables.
    pub fn build(&self, query: &DashboardQuery) -> Dashboard {
        let active_range = self.resolve_range(query);
        let filtered = self.filtered(query);

        let orders_range = match query.orders_scope {
            OrdersScope::AllTime => None,
            OrdersScope::DateRange => active_range,
        };
        let kpis = compute_kpis(&filtered, self.dataset.business.records(), orders_range.as_ref());

        debug!(
            range = ?active_range,
            records = filtered.len(),
            "Dashboard recomputed"
        );

        Dashboard {
            available_range: self.available_range(),
            active_range,
            orders_scope: query.orders_scope,
            filtered_records: filtered.len(),
            kpis,
            daily: daily_series(&filtered),
            channels: channel_rollup(&filtered),
            campaigns: campaign_rollup(&filtered),
            generated_at: Utc::now(),
        }
    }

    /// Per-record ratios over the query's range.
    pub fn record_metrics(&self, query: &DashboardQuery) -> Vec<RecordMetrics> {
        derive_metrics(self.filtered(query))
    }
}
