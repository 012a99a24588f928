//! Currency and percentage formatting for KPI values.
//!
//! Both formatters are total over `f64`. Non-finite input (NaN, ±inf)
//! renders as [`NOT_AVAILABLE`] instead of a number.

/// Rendered in place of a number when the input is not finite.
pub const NOT_AVAILABLE: &str = "N/A";

const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurrencyStyle {
    /// en-US currency with grouping, e.g. `$1,234.50`.
    #[default]
    Full,
    /// Compact `K`/`M` notation for |value| >= 1,000.
    Abbreviated,
}

/// Formats a USD amount.
///
/// Abbreviated values keep the sign after the dollar sign (`$-2.50K`),
/// full values put it in front (`-$2,500.00`).
pub fn format_currency(value: f64, style: CurrencyStyle) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    if style == CurrencyStyle::Abbreviated {
        if value.abs() >= MILLION {
            return format!("${:.2}M", value / MILLION);
        }
        if value.abs() >= THOUSAND {
            return format!("${:.2}K", value / THOUSAND);
        }
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a percentage with an explicit `+` for non-negative values.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    // -0.0 compares >= 0 but would print its sign.
    let value = if value == 0.0 { 0.0 } else { value };
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// The pair of formatting functions a card renders with.
///
/// Hosts can swap in their own functions; the default uses this module.
#[derive(Clone, Copy, Debug)]
pub struct Formatter {
    pub currency: fn(f64, CurrencyStyle) -> String,
    pub percentage: fn(f64) -> String,
}

impl Formatter {
    pub fn currency(&self, value: f64) -> String {
        (self.currency)(value, CurrencyStyle::Full)
    }

    pub fn currency_short(&self, value: f64) -> String {
        (self.currency)(value, CurrencyStyle::Abbreviated)
    }

    pub fn percentage(&self, value: f64) -> String {
        (self.percentage)(value)
    }
}

/// Two formatters are equal when they hold the same functions.
impl PartialEq for Formatter {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::fn_addr_eq(self.currency, other.currency)
            && std::ptr::fn_addr_eq(self.percentage, other.percentage)
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            currency: format_currency,
            percentage: format_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_currency_groups_thousands() {
        assert_eq!(format_currency(1234.5, CurrencyStyle::Full), "$1,234.50");
        assert_eq!(format_currency(52500.0, CurrencyStyle::Full), "$52,500.00");
        assert_eq!(format_currency(1_234_567.891, CurrencyStyle::Full), "$1,234,567.89");
        assert_eq!(format_currency(999.0, CurrencyStyle::Full), "$999.00");
        assert_eq!(format_currency(0.0, CurrencyStyle::Full), "$0.00");
    }

    #[test]
    fn test_full_currency_negative_sign_leads() {
        assert_eq!(format_currency(-1234.5, CurrencyStyle::Full), "-$1,234.50");
        assert_eq!(format_currency(-12.0, CurrencyStyle::Full), "-$12.00");
    }

    #[test]
    fn test_abbreviated_currency_thresholds() {
        assert_eq!(format_currency(2_500_000.0, CurrencyStyle::Abbreviated), "$2.50M");
        assert_eq!(format_currency(15_000.0, CurrencyStyle::Abbreviated), "$15.00K");
        assert_eq!(format_currency(1_000.0, CurrencyStyle::Abbreviated), "$1.00K");
        assert_eq!(format_currency(1_000_000.0, CurrencyStyle::Abbreviated), "$1.00M");
        assert_eq!(format_currency(-2_500.0, CurrencyStyle::Abbreviated), "$-2.50K");
    }

    #[test]
    fn test_abbreviated_below_thousand_matches_full() {
        for value in [0.0, 12.34, 999.99, -999.0, -0.5] {
            assert_eq!(
                format_currency(value, CurrencyStyle::Abbreviated),
                format_currency(value, CurrencyStyle::Full)
            );
        }
    }

    #[test]
    fn test_abbreviated_suffix_by_magnitude() {
        for value in [1_000.0, 54_321.0, 999_999.0, -7_500.0] {
            let rendered = format_currency(value, CurrencyStyle::Abbreviated);
            assert!(rendered.starts_with('$') && rendered.ends_with('K'), "{rendered}");
        }
        for value in [1_000_000.0, 3.3e9, -2e6] {
            let rendered = format_currency(value, CurrencyStyle::Abbreviated);
            assert!(rendered.starts_with('$') && rendered.ends_with('M'), "{rendered}");
        }
    }

    #[test]
    fn test_percentage_sign() {
        assert_eq!(format_percentage(5.26), "+5.26%");
        assert_eq!(format_percentage(-3.1), "-3.10%");
        assert_eq!(format_percentage(0.0), "+0.00%");
        assert_eq!(format_percentage(-0.0), "+0.00%");
        assert_eq!(format_percentage(125.0), "+125.00%");
    }

    #[test]
    fn test_percentage_plus_iff_non_negative() {
        for value in [-100.0, -0.25, 0.0, 0.004, 3.5, 1e6] {
            let rendered = format_percentage(value);
            assert_eq!(rendered.starts_with('+'), value >= 0.0, "{rendered}");
            assert!(rendered.ends_with('%'));
            let numeral = rendered.trim_end_matches('%');
            let decimals = numeral.split_once('.').map(|(_, d)| d.len());
            assert_eq!(decimals, Some(2), "{rendered}");
        }
    }

    #[test]
    fn test_non_finite_is_marked() {
        assert_eq!(format_currency(f64::NAN, CurrencyStyle::Full), NOT_AVAILABLE);
        assert_eq!(format_currency(f64::INFINITY, CurrencyStyle::Abbreviated), NOT_AVAILABLE);
        assert_eq!(format_percentage(f64::NEG_INFINITY), NOT_AVAILABLE);
    }

    #[test]
    fn test_formatter_delegates() {
        let formatter = Formatter::default();
        assert_eq!(formatter.currency(52500.0), "$52,500.00");
        assert_eq!(formatter.currency_short(52500.0), "$52.50K");
        assert_eq!(formatter.percentage(4.17), "+4.17%");
    }

    fn bare_percentage(value: f64) -> String {
        format!("{value:.2}%")
    }

    #[test]
    fn test_formatter_equality_follows_functions() {
        assert_eq!(Formatter::default(), Formatter::default());

        let custom = Formatter {
            percentage: bare_percentage,
            ..Formatter::default()
        };
        assert_ne!(custom, Formatter::default());
        assert_eq!(custom, custom);
        assert_eq!(custom.percentage(4.17), "4.17%");
    }
}
