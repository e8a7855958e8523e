//! Daily spend vs attributed revenue.

use chrono::NaiveDate;
use pulse_core::MarketingRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub spend: f64,
    pub revenue: f64,
}

/// One point per distinct date, ascending.
pub fn daily_series(filtered: &[&MarketingRecord]) -> Vec<DailyPoint> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for r in filtered {
        let totals = by_date.entry(r.date).or_default();
        totals.0 += r.spend.unwrap_or_default();
        totals.1 += r.attributed_revenue.unwrap_or_default();
    }
    by_date
        .into_iter()
        .map(|(date, (spend, revenue))| DailyPoint {
            date,
            spend,
            revenue,
        })
        .collect()
}
