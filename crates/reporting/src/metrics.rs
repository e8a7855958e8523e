//! Per-record ratio metrics.

use chrono::NaiveDate;
use pulse_core::{Channel, MarketingRecord};
use serde::Serialize;

/// A marketing record with its derived ratios. Ratios are `None` where the
/// denominator is zero or absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordMetrics {
    pub date: NaiveDate,
    pub channel: Channel,
    pub campaign: String,
    pub impressions: Option<u64>,
    pub clicks: Option<u64>,
    pub spend: Option<f64>,
    pub attributed_revenue: Option<f64>,
    pub ctr: Option<f64>,
    pub cpc: Option<f64>,
    pub roas: Option<f64>,
}

impl From<&MarketingRecord> for RecordMetrics {
    fn from(r: &MarketingRecord) -> Self {
        Self {
            date: r.date,
            channel: r.channel,
            campaign: r.campaign.clone(),
            impressions: r.impressions,
            clicks: r.clicks,
            spend: r.spend,
            attributed_revenue: r.attributed_revenue,
            ctr: r.ctr(),
            cpc: r.cpc(),
            roas: r.roas(),
        }
    }
}

pub fn derive_metrics<'a>(records: impl IntoIterator<Item = &'a MarketingRecord>) -> Vec<RecordMetrics> {
    records.into_iter().map(RecordMetrics::from).collect()
}

/// Arithmetic mean of the defined values. Undefined values count in
/// neither the numerator nor the denominator; no defined values gives `None`.
pub fn mean_defined(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}
