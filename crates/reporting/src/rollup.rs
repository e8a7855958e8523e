//! Channel and campaign rollups.
//!
//! ROAS is recomputed from the summed revenue and spend of each group, never
//! averaged from per-record ROAS.

use pulse_core::types::safe_ratio;
use pulse_core::{Channel, MarketingRecord};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRollup {
    pub channel: Channel,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub clicks: u64,
    pub impressions: u64,
    pub roas: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRollup {
    pub campaign: String,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub clicks: u64,
    pub impressions: u64,
    pub roas: Option<f64>,
}

#[derive(Debug, Default)]
struct Totals {
    spend: f64,
    attributed_revenue: f64,
    clicks: u64,
    impressions: u64,
}

impl Totals {
    fn add(&mut self, r: &MarketingRecord) {
        self.spend += r.spend.unwrap_or_default();
        self.attributed_revenue += r.attributed_revenue.unwrap_or_default();
        self.clicks += r.clicks.unwrap_or_default();
        self.impressions += r.impressions.unwrap_or_default();
    }

    fn roas(&self) -> Option<f64> {
        safe_ratio(Some(self.attributed_revenue), Some(self.spend))
    }
}

/// Groups in ascending key order.
fn group_by<K, F>(filtered: &[&MarketingRecord], key: F) -> BTreeMap<K, Totals>
where
    K: Ord,
    F: Fn(&MarketingRecord) -> K,
{
    let mut groups: BTreeMap<K, Totals> = BTreeMap::new();
    for r in filtered {
        groups.entry(key(r)).or_default().add(r);
    }
    groups
}

/// One row per channel present, ordered by channel name.
pub fn channel_rollup(filtered: &[&MarketingRecord]) -> Vec<ChannelRollup> {
    group_by(filtered, |r| (r.channel.as_str(), r.channel))
        .into_iter()
        .map(|((_, channel), t)| ChannelRollup {
            channel,
            roas: t.roas(),
            spend: t.spend,
            attributed_revenue: t.attributed_revenue,
            clicks: t.clicks,
            impressions: t.impressions,
        })
        .collect()
}

/// One row per campaign, best ROAS first. Undefined ROAS sorts last; ties
/// keep ascending campaign-name order.
pub fn campaign_rollup(filtered: &[&MarketingRecord]) -> Vec<CampaignRollup> {
    let mut rows: Vec<CampaignRollup> = group_by(filtered, |r| r.campaign.clone())
        .into_iter()
        .map(|(campaign, t)| CampaignRollup {
            campaign,
            roas: t.roas(),
            spend: t.spend,
            attributed_revenue: t.attributed_revenue,
            clicks: t.clicks,
            impressions: t.impressions,
        })
        .collect();
    rows.sort_by(|a, b| roas_descending(a.roas, b.roas));
    rows
}

fn roas_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
