//! Display formatting for dashboard values. Undefined ratios always render
//! as [`UNDEFINED`], never as zero.

pub const UNDEFINED: &str = "n/a";

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn signed(negative: bool, body: String) -> String {
    if negative {
        format!("-{body}")
    } else {
        body
    }
}

/// Whole-currency amount: `$12,346`.
pub fn currency(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let negative = value < 0.0 && rounded != "0";
    signed(negative, format!("${}", group_thousands(&rounded)))
}

/// Currency with cents: `$12,345.67`.
pub fn currency_cents(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let negative = value < 0.0 && fixed != "0.00";
    signed(negative, format!("${}.{cents}", group_thousands(whole)))
}

pub fn count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// `2.35x`
pub fn roas(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.2}x"))
}

/// Fraction as a percentage: `0.1234` -> `12.34%`.
pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{:.2}%", v * 100.0))
}

pub fn optional_cents(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), currency_cents)
}

pub fn optional_count(value: Option<u64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(0.0), "$0");
        assert_eq!(currency(999.4), "$999");
        assert_eq!(currency(1234.0), "$1,234");
        assert_eq!(currency(1234567.8), "$1,234,568");
        assert_eq!(currency(-2500.0), "-$2,500");
    }

    #[test]
    fn test_currency_cents() {
        assert_eq!(currency_cents(5.0), "$5.00");
        assert_eq!(currency_cents(12345.678), "$12,345.68");
    }

    #[test]
    fn test_count() {
        assert_eq!(count(0), "0");
        assert_eq!(count(100), "100");
        assert_eq!(count(1000), "1,000");
        assert_eq!(count(9876543), "9,876,543");
    }

    #[test]
    fn test_undefined_is_never_zero() {
        assert_eq!(roas(None), "n/a");
        assert_eq!(percent(None), "n/a");
        assert_eq!(optional_cents(None), "n/a");
        assert_eq!(optional_count(None), "n/a");
        assert_eq!(roas(Some(0.0)), "0.00x");
    }

    #[test]
    fn test_ratios() {
        assert_eq!(roas(Some(2.346)), "2.35x");
        assert_eq!(percent(Some(0.1)), "10.00%");
    }
}
