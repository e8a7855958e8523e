//! Day-first calendar date parsing.
//!
//! `03/04/2024` is the 3rd of April. ISO-style year-first dates are accepted
//! as-is. Any time-of-day suffix is discarded.

use chrono::NaiveDate;

const YEAR_FIRST: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const DAY_FIRST: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const DAY_FIRST_SHORT_YEAR: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

fn is_separator(c: char) -> bool {
    matches!(c, '/' | '-' | '.')
}

/// Parse a date cell under the day-first convention.
pub fn parse_day_first(value: &str) -> Option<NaiveDate> {
    let date_part = value
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or("");
    if date_part.is_empty()
        || !date_part
            .chars()
            .all(|c| c.is_ascii_digit() || is_separator(c))
    {
        return None;
    }

    let first_len = date_part.split(is_separator).next()?.len();
    let last_len = date_part.rsplit(is_separator).next()?.len();

    // %Y would happily read "24" as year 24, so the layout family is chosen
    // from segment widths before parsing.
    let layouts = if first_len == 4 {
        YEAR_FIRST
    } else if last_len == 4 {
        DAY_FIRST
    } else if last_len == 2 {
        DAY_FIRST_SHORT_YEAR
    } else {
        return None;
    };

    layouts
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(date_part, layout).ok())
}
