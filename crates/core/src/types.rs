use crate::error::{PulseError, PulseResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Marketing source a record was ingested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Google,
    Facebook,
    Tiktok,
}

impl Channel {
    /// Source order used for the marketing union.
    pub const ALL: [Channel; 3] = [Channel::Google, Channel::Facebook, Channel::Tiktok];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Google => "google",
            Channel::Facebook => "facebook",
            Channel::Tiktok => "tiktok",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Channel::Google),
            "facebook" => Ok(Channel::Facebook),
            "tiktok" => Ok(Channel::Tiktok),
            other => Err(PulseError::Config(format!("unknown channel '{other}'"))),
        }
    }
}

/// Divides `numerator` by `denominator`, yielding `None` when either operand
/// is absent or the denominator is zero.
pub fn safe_ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// One (channel, campaign, date) observation from a marketing feed.
///
/// Numeric fields are `None` when the source cell was blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub date: NaiveDate,
    pub channel: Channel,
    pub campaign: String,
    pub impressions: Option<u64>,
    pub clicks: Option<u64>,
    pub spend: Option<f64>,
    pub attributed_revenue: Option<f64>,
}

impl MarketingRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        channel: Channel,
        campaign: impl Into<String>,
        impressions: u64,
        clicks: u64,
        spend: f64,
        attributed_revenue: f64,
    ) -> Self {
        Self {
            date,
            channel,
            campaign: campaign.into(),
            impressions: Some(impressions),
            clicks: Some(clicks),
            spend: Some(spend),
            attributed_revenue: Some(attributed_revenue),
        }
    }

    /// Click-through rate: `clicks / impressions`.
    pub fn ctr(&self) -> Option<f64> {
        safe_ratio(
            self.clicks.map(|c| c as f64),
            self.impressions.map(|i| i as f64),
        )
    }

    /// Cost per click: `spend / clicks`.
    pub fn cpc(&self) -> Option<f64> {
        safe_ratio(self.spend, self.clicks.map(|c| c as f64))
    }

    /// Return on ad spend: `attributed_revenue / spend`.
    pub fn roas(&self) -> Option<f64> {
        safe_ratio(self.attributed_revenue, self.spend)
    }
}

/// One dated row of business outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub date: NaiveDate,
    pub orders_count: Option<u64>,
    /// Remaining columns keyed by their normalized names, values verbatim.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl BusinessRecord {
    pub fn new(date: NaiveDate, orders_count: u64) -> Self {
        Self {
            date,
            orders_count: Some(orders_count),
            extra: BTreeMap::new(),
        }
    }
}

/// Closed calendar-date interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> PulseResult<Self> {
        if start > end {
            return Err(PulseError::Config(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Smallest range covering every date yielded, or `None` for no dates.
    pub fn spanning(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        dates.into_iter().fold(None, |acc, d| match acc {
            None => Some(Self { start: d, end: d }),
            Some(r) => Some(Self {
                start: r.start.min(d),
                end: r.end.max(d),
            }),
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}
