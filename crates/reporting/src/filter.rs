use pulse_core::{DateRange, MarketingRecord};

/// Records dated inside `range` (inclusive both ends), in input order.
/// No range keeps everything.
pub fn filter_by_range<'a>(
    records: &'a [MarketingRecord],
    range: Option<&DateRange>,
) -> Vec<&'a MarketingRecord> {
    records
        .iter()
        .filter(|r| range.is_none_or(|range| range.contains(r.date)))
        .collect()
}
