//! Headline KPI totals.

use crate::metrics::mean_defined;
use pulse_core::{BusinessRecord, DateRange, MarketingRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSet {
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_orders: u64,
    /// Mean of per-record ROAS over records with non-zero spend.
    pub mean_roas: Option<f64>,
}

/// KPIs over the already-filtered marketing records. Orders come from the
/// business rows inside `orders_range`, or from every row when it is `None`.
pub fn compute_kpis(
    filtered: &[&MarketingRecord],
    business: &[BusinessRecord],
    orders_range: Option<&DateRange>,
) -> KpiSet {
    KpiSet {
        total_spend: filtered.iter().filter_map(|r| r.spend).sum(),
        total_revenue: filtered.iter().filter_map(|r| r.attributed_revenue).sum(),
        total_orders: total_orders(business, orders_range),
        mean_roas: mean_defined(filtered.iter().map(|r| r.roas())),
    }
}

pub fn total_orders(business: &[BusinessRecord], range: Option<&DateRange>) -> u64 {
    business
        .iter()
        .filter(|b| range.is_none_or(|range| range.contains(b.date)))
        .filter_map(|b| b.orders_count)
        .sum()
}
