//! Plain-text dashboard rendering for terminals.

use crate::dashboard::Dashboard;
use crate::export::View;
use crate::format;
use crate::metrics::RecordMetrics;

pub const AWAITING_INPUT_PROMPT: &str =
    "Please supply all four CSV files (google, facebook, tiktok, business) to view the dashboard.";

/// Neutral prompt shown until every source has been supplied.
pub fn render_awaiting_input(missing: &[String]) -> String {
    format!("{AWAITING_INPUT_PROMPT}\nStill missing: {}\n", missing.join(", "))
}

/// Left-aligns the first column and right-aligns the rest.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let mut joined = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i == 0 {
                    format!("{cell:<w$}")
                } else {
                    format!("{cell:>w$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string();
        joined.push('\n');
        joined
    };

    let mut out = line(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    if rows.is_empty() {
        out.push_str("(no rows in selected range)\n");
    }
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

fn header(dashboard: &Dashboard) -> String {
    let range = match (&dashboard.active_range, &dashboard.available_range) {
        (Some(active), Some(available)) => format!("{active} (data covers {available})"),
        (Some(active), None) => format!("{active} (no marketing data)"),
        _ => "(no marketing data)".to_string(),
    };
    format!(
        "Marketing & Business Performance Dashboard\nDate range: {range}\nRecords in range: {}\n",
        dashboard.filtered_records
    )
}

pub fn render_kpis(dashboard: &Dashboard) -> String {
    let kpis = &dashboard.kpis;
    table(
        &["Total Spend", "Total Revenue", "Orders", "ROAS"],
        &[vec![
            format::currency(kpis.total_spend),
            format::currency(kpis.total_revenue),
            format::count(kpis.total_orders),
            format::roas(kpis.mean_roas),
        ]],
    )
}

pub fn render_daily(dashboard: &Dashboard) -> String {
    let rows: Vec<Vec<String>> = dashboard
        .daily
        .iter()
        .map(|p| {
            vec![
                p.date.to_string(),
                format::currency_cents(p.spend),
                format::currency_cents(p.revenue),
            ]
        })
        .collect();
    let mut out = String::from("Spend vs Attributed Revenue Over Time\n");
    out.push_str(&table(&["date", "spend", "attributed_revenue"], &rows));
    out
}

pub fn render_channels(dashboard: &Dashboard) -> String {
    let rows: Vec<Vec<String>> = dashboard
        .channels
        .iter()
        .map(|c| {
            vec![
                c.channel.to_string(),
                format::currency_cents(c.spend),
                format::currency_cents(c.attributed_revenue),
                format::count(c.clicks),
                format::count(c.impressions),
                format::roas(c.roas),
            ]
        })
        .collect();
    let mut out = String::from("Channel Performance\n");
    out.push_str(&table(
        &["channel", "spend", "attributed_revenue", "clicks", "impressions", "roas"],
        &rows,
    ));
    out
}

/// The campaign leaderboard, capped at `limit` rows when given.
pub fn render_campaigns(dashboard: &Dashboard, limit: Option<usize>) -> String {
    let shown = dashboard.leaderboard(limit);
    let rows: Vec<Vec<String>> = shown
        .iter()
        .map(|c| {
            vec![
                c.campaign.clone(),
                format::currency_cents(c.spend),
                format::currency_cents(c.attributed_revenue),
                format::count(c.clicks),
                format::count(c.impressions),
                format::roas(c.roas),
            ]
        })
        .collect();
    let mut out = String::from("Campaign Leaderboard\n");
    out.push_str(&table(
        &["campaign", "spend", "attributed_revenue", "clicks", "impressions", "roas"],
        &rows,
    ));
    if shown.len() < dashboard.campaigns.len() {
        out.push_str(&format!(
            "({} of {} campaigns shown)\n",
            shown.len(),
            dashboard.campaigns.len()
        ));
    }
    out
}

pub fn render_dashboard(dashboard: &Dashboard, leaderboard_limit: Option<usize>) -> String {
    let mut out = header(dashboard);
    for section in View::SECTIONS {
        out.push('\n');
        out.push_str(&render_view(dashboard, section, &[], leaderboard_limit));
    }
    out
}

/// Text for one view; [`View::All`] is the whole dashboard. [`View::Records`]
/// needs the per-record rows supplied separately.
pub fn render_view(
    dashboard: &Dashboard,
    view: View,
    records: &[RecordMetrics],
    leaderboard_limit: Option<usize>,
) -> String {
    match view {
        View::All => render_dashboard(dashboard, leaderboard_limit),
        View::Kpis => render_kpis(dashboard),
        View::Daily => render_daily(dashboard),
        View::Channels => render_channels(dashboard),
        View::Campaigns => render_campaigns(dashboard, leaderboard_limit),
        View::Records => render_records(records),
    }
}

pub fn render_records(records: &[RecordMetrics]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                r.channel.to_string(),
                r.campaign.clone(),
                format::optional_count(r.impressions),
                format::optional_count(r.clicks),
                format::optional_cents(r.spend),
                format::optional_cents(r.attributed_revenue),
                format::percent(r.ctr),
                format::optional_cents(r.cpc),
                format::roas(r.roas),
            ]
        })
        .collect();
    table(
        &[
            "date",
            "channel",
            "campaign",
            "impressions",
            "clicks",
            "spend",
            "attributed_revenue",
            "ctr",
            "cpc",
            "roas",
        ],
        &rows,
    )
}
