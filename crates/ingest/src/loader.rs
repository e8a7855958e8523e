//! Typed extraction and the full ingestion flow: tag, normalize, validate,
//! union, and convert the four sources into record tables.

use crate::dates::parse_day_first;
use crate::normalize::{normalize_columns, tag_channel, CHANNEL_COLUMN};
use crate::table::{RawRow, RawTable};
use pulse_core::config::BusinessConfig;
use pulse_core::{BusinessRecord, Channel, DateRange, MarketingRecord, PulseError, PulseResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Columns every marketing source must carry after normalization.
pub const MARKETING_COLUMNS: [&str; 6] = [
    "date",
    "campaign",
    "impressions",
    "clicks",
    "spend",
    "attributed_revenue",
];

pub const DATE_COLUMN: &str = "date";

pub const BUSINESS_SOURCE: &str = "business";

// ─── Sources ────────────────────────────────────────────────────────────────

/// Raw bytes of one input, with a label describing where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub origin: String,
    pub bytes: Vec<u8>,
}

impl Source {
    pub fn from_bytes(origin: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            origin: origin.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> PulseResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(path.display().to_string(), bytes))
    }
}

/// The four inputs. Any may be absent until the caller has acquired it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBundle {
    pub google: Option<Source>,
    pub facebook: Option<Source>,
    pub tiktok: Option<Source>,
    pub business: Option<Source>,
}

impl SourceBundle {
    /// Sources in union order, each with its name.
    pub fn named(&self) -> [(&'static str, Option<&Source>); 4] {
        [
            (Channel::Google.as_str(), self.google.as_ref()),
            (Channel::Facebook.as_str(), self.facebook.as_ref()),
            (Channel::Tiktok.as_str(), self.tiktok.as_ref()),
            (BUSINESS_SOURCE, self.business.as_ref()),
        ]
    }

    pub fn missing(&self) -> Vec<String> {
        self.named()
            .iter()
            .filter(|(_, source)| source.is_none())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    fn marketing(&self, channel: Channel) -> Option<&Source> {
        match channel {
            Channel::Google => self.google.as_ref(),
            Channel::Facebook => self.facebook.as_ref(),
            Channel::Tiktok => self.tiktok.as_ref(),
        }
    }
}

// ─── Tables ─────────────────────────────────────────────────────────────────

/// Unified marketing records in union order (google, facebook, tiktok).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketingTable {
    records: Vec<MarketingRecord>,
}

impl MarketingTable {
    /// Convert a normalized, channel-tagged table into typed records.
    /// Errors name the row's source channel (falling back to the table
    /// name) and its line.
    pub fn from_raw(table: &RawTable) -> PulseResult<Self> {
        let channel_idx = table.require_column(CHANNEL_COLUMN)?;
        let date_idx = table.require_column("date")?;
        let campaign_idx = table.require_column("campaign")?;
        let impressions_idx = table.require_column("impressions")?;
        let clicks_idx = table.require_column("clicks")?;
        let spend_idx = table.require_column("spend")?;
        let revenue_idx = table.require_column("attributed_revenue")?;

        let mut records = Vec::with_capacity(table.len());
        for row in table.rows() {
            let channel: Channel = row
                .cell(channel_idx)
                .parse()
                .map_err(|_| invalid(table.name(), row, CHANNEL_COLUMN, channel_idx))?;
            let source = channel.as_str();
            let cells = RowReader { source, row };

            records.push(MarketingRecord {
                date: cells.date(date_idx)?,
                channel,
                campaign: row.cell(campaign_idx).to_string(),
                impressions: cells.count(impressions_idx, "impressions")?,
                clicks: cells.count(clicks_idx, "clicks")?,
                spend: cells.amount(spend_idx, "spend")?,
                attributed_revenue: cells.amount(revenue_idx, "attributed_revenue")?,
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[MarketingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `[min(date), max(date)]` over every record.
    pub fn date_bounds(&self) -> Option<DateRange> {
        DateRange::spanning(self.records.iter().map(|r| r.date))
    }
}

impl From<Vec<MarketingRecord>> for MarketingTable {
    fn from(records: Vec<MarketingRecord>) -> Self {
        Self { records }
    }
}

/// Business outcomes with normalized column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessTable {
    columns: Vec<String>,
    orders_column: String,
    records: Vec<BusinessRecord>,
}

impl BusinessTable {
    pub fn records(&self) -> &[BusinessRecord] {
        &self.records
    }

    /// Normalized column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Name of the column `orders_count` was read from.
    pub fn orders_column(&self) -> &str {
        &self.orders_column
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<BusinessRecord>> for BusinessTable {
    fn from(records: Vec<BusinessRecord>) -> Self {
        Self {
            columns: vec![DATE_COLUMN.to_string(), "orders_count".to_string()],
            orders_column: "orders_count".to_string(),
            records,
        }
    }
}

/// Everything ingestion produces; immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub marketing: MarketingTable,
    pub business: BusinessTable,
}

// ─── Operations ─────────────────────────────────────────────────────────────

/// Row-wise concatenation in argument order. Columns are aligned by name;
/// a column missing from one input reads blank for that input's rows.
pub fn union_marketing(tables: [RawTable; 3]) -> RawTable {
    let mut headers: Vec<String> = Vec::new();
    for table in &tables {
        for h in table.headers() {
            if !headers.contains(h) {
                headers.push(h.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(tables.iter().map(RawTable::len).sum());
    for table in tables {
        let (_, own_headers, own_rows) = table.into_parts();
        let mapping: Vec<Option<usize>> = headers
            .iter()
            .map(|h| own_headers.iter().position(|o| o == h))
            .collect();
        for row in own_rows {
            let cells = mapping
                .iter()
                .map(|m| m.map(|i| row.cell(i).to_string()).unwrap_or_default())
                .collect();
            rows.push(RawRow {
                line: row.line,
                cells,
            });
        }
    }

    RawTable::new("marketing", headers, rows)
}

/// Normalize the business table's columns and read its records. The orders
/// column is the first of `config`'s candidates present in the table.
pub fn normalize_business(table: &RawTable, config: &BusinessConfig) -> PulseResult<BusinessTable> {
    let table = normalize_columns(table);
    let date_idx = table.require_column(DATE_COLUMN)?;
    let (orders_column, orders_idx) = config
        .orders_candidates()
        .find_map(|c| table.column_index(c).map(|i| (c.to_string(), i)))
        .ok_or_else(|| PulseError::schema(table.name(), &config.orders_column))?;

    let mut records = Vec::with_capacity(table.len());
    for row in table.rows() {
        let cells = RowReader {
            source: table.name(),
            row,
        };
        let extra: BTreeMap<String, String> = table
            .headers()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx && *i != orders_idx)
            .map(|(i, h)| (h.clone(), row.cell(i).to_string()))
            .collect();
        records.push(BusinessRecord {
            date: cells.date(date_idx)?,
            orders_count: cells.count(orders_idx, &orders_column)?,
            extra,
        });
    }

    Ok(BusinessTable {
        columns: table.headers().to_vec(),
        orders_column,
        records,
    })
}

/// Runs the ingestion flow over a [`SourceBundle`].
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    business: BusinessConfig,
}

impl Ingestor {
    pub fn new(business: BusinessConfig) -> Self {
        Self { business }
    }

    /// Token describing the settings that influence ingestion output, for
    /// use alongside source content in cache keys.
    pub fn settings_token(&self) -> String {
        self.business.orders_candidates().collect::<Vec<_>>().join("|")
    }

    /// Ingest all four sources. Any absent source yields
    /// [`PulseError::MissingInput`]; any other failure aborts the whole run.
    pub fn ingest(&self, bundle: &SourceBundle) -> PulseResult<Dataset> {
        let missing = bundle.missing();
        if !missing.is_empty() {
            return Err(PulseError::MissingInput { sources: missing });
        }

        let unioned = union_marketing([
            self.prepare_marketing(Channel::Google, bundle)?,
            self.prepare_marketing(Channel::Facebook, bundle)?,
            self.prepare_marketing(Channel::Tiktok, bundle)?,
        ]);
        let marketing = MarketingTable::from_raw(&unioned)?;

        let business_source = bundle
            .business
            .as_ref()
            .ok_or_else(|| PulseError::MissingInput {
                sources: vec![BUSINESS_SOURCE.to_string()],
            })?;
        let raw_business = RawTable::from_reader(BUSINESS_SOURCE, business_source.bytes.as_slice())?;
        let business = normalize_business(&raw_business, &self.business)?;

        info!(
            marketing_rows = marketing.len(),
            business_rows = business.len(),
            orders_column = business.orders_column(),
            "Ingestion complete"
        );

        Ok(Dataset {
            marketing,
            business,
        })
    }

    fn prepare_marketing(&self, channel: Channel, bundle: &SourceBundle) -> PulseResult<RawTable> {
        let source = bundle
            .marketing(channel)
            .ok_or_else(|| PulseError::MissingInput {
                sources: vec![channel.to_string()],
            })?;
        let raw = RawTable::from_reader(channel.as_str(), source.bytes.as_slice())?;
        let table = tag_channel(&normalize_columns(&raw), channel);
        for column in MARKETING_COLUMNS {
            table.require_column(column)?;
        }
        debug!(
            channel = %channel,
            origin = %source.origin,
            rows = table.len(),
            "Marketing source normalized"
        );
        Ok(table)
    }
}

// ─── Cell parsing ───────────────────────────────────────────────────────────

struct RowReader<'a> {
    source: &'a str,
    row: &'a RawRow,
}

impl RowReader<'_> {
    fn date(&self, index: usize) -> PulseResult<chrono::NaiveDate> {
        let value = self.row.cell(index);
        parse_day_first(value).ok_or_else(|| PulseError::DateParse {
            source_name: self.source.to_string(),
            line: self.row.line,
            value: value.to_string(),
        })
    }

    /// Non-negative integer; integral decimals such as `100.0` are accepted.
    fn count(&self, index: usize, column: &str) -> PulseResult<Option<u64>> {
        let value = self.row.cell(index);
        if value.is_empty() {
            return Ok(None);
        }
        let cleaned = strip_number(value);
        if let Ok(n) = cleaned.parse::<u64>() {
            return Ok(Some(n));
        }
        match cleaned.parse::<f64>() {
            Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => Ok(Some(f as u64)),
            _ => Err(invalid(self.source, self.row, column, index)),
        }
    }

    /// Non-negative decimal amount; `$` and thousands separators are stripped.
    fn amount(&self, index: usize, column: &str) -> PulseResult<Option<f64>> {
        let value = self.row.cell(index);
        if value.is_empty() {
            return Ok(None);
        }
        match strip_number(value).parse::<f64>() {
            Ok(f) if f.is_finite() && f >= 0.0 => Ok(Some(f)),
            _ => Err(invalid(self.source, self.row, column, index)),
        }
    }
}

fn strip_number(value: &str) -> String {
    value.chars().filter(|c| *c != ',' && *c != '$').collect()
}

fn invalid(source: &str, row: &RawRow, column: &str, index: usize) -> PulseError {
    PulseError::InvalidValue {
        source_name: source.to_string(),
        line: row.line,
        column: column.to_string(),
        value: row.cell(index).to_string(),
    }
}
