//! CSV and JSON exports of dashboard views. Undefined ratios are written as
//! empty CSV cells and JSON `null`.

use crate::dashboard::Dashboard;
use crate::metrics::RecordMetrics;
use pulse_core::{PulseError, PulseResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    All,
    Kpis,
    Daily,
    Channels,
    Campaigns,
    Records,
}

impl View {
    /// Views that make up the dashboard proper, in display order.
    pub const SECTIONS: [View; 4] = [View::Kpis, View::Daily, View::Channels, View::Campaigns];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::All => "all",
            View::Kpis => "kpis",
            View::Daily => "daily",
            View::Channels => "channels",
            View::Campaigns => "campaigns",
            View::Records => "records",
        }
    }
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(View::All),
            "kpis" | "kpi" => Ok(View::Kpis),
            "daily" | "series" => Ok(View::Daily),
            "channels" | "channel" => Ok(View::Channels),
            "campaigns" | "campaign" | "leaderboard" => Ok(View::Campaigns),
            "records" => Ok(View::Records),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> PulseResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Header row plus one line per item. An empty slice yields an empty string.
pub fn to_csv<T: Serialize>(rows: &[T]) -> PulseResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PulseError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| PulseError::Internal(anyhow::Error::from(e)))
}

/// JSON for one view, or the whole dashboard for [`View::All`].
/// [`View::Records`] needs the per-record rows supplied separately.
pub fn view_json(
    dashboard: &Dashboard,
    view: View,
    records: &[RecordMetrics],
    leaderboard_limit: Option<usize>,
) -> PulseResult<String> {
    match view {
        View::All => to_json(dashboard),
        View::Kpis => to_json(&dashboard.kpis),
        View::Daily => to_json(&dashboard.daily),
        View::Channels => to_json(&dashboard.channels),
        View::Campaigns => to_json(dashboard.leaderboard(leaderboard_limit)),
        View::Records => to_json(records),
    }
}

/// CSV for one view. [`View::All`] writes each dashboard section in turn,
/// each preceded by a `# <name>` line and followed by a blank line.
pub fn view_csv(
    dashboard: &Dashboard,
    view: View,
    records: &[RecordMetrics],
    leaderboard_limit: Option<usize>,
) -> PulseResult<String> {
    match view {
        View::All => {
            let mut out = String::new();
            for section in View::SECTIONS {
                out.push_str(&format!("# {}\n", section.as_str()));
                out.push_str(&view_csv(dashboard, section, records, leaderboard_limit)?);
                out.push('\n');
            }
            Ok(out)
        }
        View::Kpis => to_csv(std::slice::from_ref(&dashboard.kpis)),
        View::Daily => to_csv(&dashboard.daily),
        View::Channels => to_csv(&dashboard.channels),
        View::Campaigns => to_csv(dashboard.leaderboard(leaderboard_limit)),
        View::Records => to_csv(records),
    }
}
