//! Data-to-display mapping for the four KPI cards.
//!
//! Everything here is pure: a [`KpiView`] says what text goes where and
//! which tone it carries. Painting is left to the UI layer.

use time::{macros::format_description, Date};

use super::format::{Formatter, NOT_AVAILABLE};
use super::kpi::{DailyPnLData, DrawdownData, EquityData, KpiData, KpiVariant, PeriodPnLData};

/// Recovery at or above this percentage counts as healthy.
pub const RECOVERY_THRESHOLD: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Warning,
    Neutral,
}

impl Tone {
    /// Green for non-negative values, red otherwise.
    pub fn from_sign(value: f64) -> Self {
        if value >= 0.0 {
            Tone::Positive
        } else {
            Tone::Negative
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn from_sign(value: f64) -> Self {
        if value >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Period-over-period change shown next to an indicator arrow.
#[derive(Clone, Debug, PartialEq)]
pub struct Change {
    pub text: String,
    pub tone: Tone,
    pub direction: Direction,
    pub context: &'static str,
}

impl Change {
    fn signed(text: String, driver: f64, context: &'static str) -> Self {
        Self {
            text,
            tone: Tone::from_sign(driver),
            direction: Direction::from_sign(driver),
            context,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
    pub delta: Option<Change>,
    pub caption: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    pub label: &'static str,
    pub value: String,
    /// Bar width in percent, clamped to [0, 100].
    pub width_pct: f64,
    pub tone: Tone,
    pub caption: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DetailSection {
    Rows(Vec<Row>),
    Tiles(Vec<Tile>),
    /// Sample trend strip; bars come from a `TrendSource`.
    Trend { caption: &'static str },
    Progress(Progress),
    Note {
        label: &'static str,
        value: String,
        text: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct KpiView {
    pub eyebrow: Option<&'static str>,
    pub primary: String,
    pub primary_tone: Tone,
    pub primary_hint: Option<String>,
    pub change: Change,
    pub note: Option<&'static str>,
    pub details: Vec<DetailSection>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CardBody {
    Loading,
    Ready(KpiView),
}

/// Picks what a card shows.
///
/// Loading, missing data, or data of another variant all yield
/// [`CardBody::Loading`].
pub fn card_body(
    variant: KpiVariant,
    data: Option<&KpiData>,
    loading: bool,
    formatter: &Formatter,
    today: Date,
) -> CardBody {
    if loading {
        return CardBody::Loading;
    }
    let Some(data) = data.filter(|data| data.variant() == variant) else {
        return CardBody::Loading;
    };

    let view = match data {
        KpiData::Equity(equity) => equity_view(equity, formatter),
        KpiData::Daily(daily) => daily_view(daily, formatter, today),
        KpiData::Period(period) => period_view(period, formatter),
        KpiData::Drawdown(drawdown) => drawdown_view(drawdown, formatter),
    };
    CardBody::Ready(view)
}

fn approx(formatter: &Formatter, value: f64) -> Option<String> {
    Some(format!("≈ {}", formatter.currency_short(value)))
}

fn equity_view(data: &EquityData, fmt: &Formatter) -> KpiView {
    KpiView {
        eyebrow: None,
        primary: fmt.currency(data.total_equity),
        primary_tone: Tone::Neutral,
        primary_hint: approx(fmt, data.total_equity),
        change: Change::signed(
            fmt.percentage(data.change_percent),
            data.change_percent,
            KpiVariant::Equity.context_label(),
        ),
        note: None,
        details: vec![
            DetailSection::Rows(vec![
                Row {
                    label: "Balance:",
                    value: fmt.currency(data.balance),
                    tone: Tone::Neutral,
                },
                Row {
                    label: "Unrealized P&L:",
                    value: fmt.currency(data.unrealized_pnl),
                    tone: Tone::from_sign(data.unrealized_pnl),
                },
            ]),
            DetailSection::Note {
                label: "Exchange:",
                value: "Pending configuration".to_string(),
                text: "Connect your exchange account to see live data".to_string(),
            },
        ],
    }
}

fn daily_view(data: &DailyPnLData, fmt: &Formatter, today: Date) -> KpiView {
    let date = today
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| today.to_string());

    KpiView {
        eyebrow: None,
        primary: fmt.currency(data.total),
        primary_tone: Tone::from_sign(data.total),
        primary_hint: approx(fmt, data.total),
        change: Change::signed(
            fmt.percentage(data.change_percent),
            data.change_percent,
            KpiVariant::Daily.context_label(),
        ),
        note: None,
        details: vec![
            DetailSection::Rows(vec![
                Row {
                    label: "Realized P&L:",
                    value: fmt.currency(data.realized),
                    tone: Tone::from_sign(data.realized),
                },
                Row {
                    label: "Unrealized P&L:",
                    value: fmt.currency(data.unrealized),
                    tone: Tone::from_sign(data.unrealized),
                },
            ]),
            DetailSection::Note {
                label: "Period:",
                value: "Last 24 hours".to_string(),
                text: format!("P&L calculated since {date} 00:00"),
            },
        ],
    }
}

fn period_tile(label: &'static str, value: f64, delta: f64, caption: &str, fmt: &Formatter) -> Tile {
    Tile {
        label,
        value: fmt.currency_short(value),
        tone: Tone::from_sign(value),
        delta: Some(Change::signed(fmt.currency_short(delta), delta, "")),
        caption: caption.to_string(),
    }
}

fn period_view(data: &PeriodPnLData, fmt: &Formatter) -> KpiView {
    KpiView {
        eyebrow: Some("Today's P&L"),
        primary: fmt.currency(data.today),
        primary_tone: Tone::from_sign(data.today),
        primary_hint: None,
        change: Change::signed(
            fmt.percentage(data.today_change_percent),
            data.today_change_percent,
            "vs yesterday",
        ),
        note: Some("(open + closed gains)"),
        details: vec![
            DetailSection::Trend {
                caption: "Last 30 days trend (sample data)",
            },
            DetailSection::Tiles(vec![
                period_tile("This month (MTD)", data.mtd, data.mtd_delta, "vs last month", fmt),
                period_tile("This year (YTD)", data.ytd, data.ytd_delta, "vs last year", fmt),
            ]),
        ],
    }
}

fn drawdown_view(data: &DrawdownData, fmt: &Formatter) -> KpiView {
    KpiView {
        eyebrow: Some("Risk KPI"),
        primary: format_ratio(data.drawdown_ratio),
        primary_tone: Tone::Warning,
        primary_hint: Some("Current drawdown / historical max".to_string()),
        change: Change {
            text: fmt.percentage(data.current_drawdown_percent),
            tone: Tone::Warning,
            direction: Direction::Down,
            context: KpiVariant::Drawdown.context_label(),
        },
        note: None,
        details: vec![
            DetailSection::Tiles(vec![
                Tile {
                    label: "Current drawdown",
                    value: fmt.percentage(data.current_drawdown_percent),
                    tone: Tone::Warning,
                    delta: None,
                    caption: fmt.currency(data.current_drawdown),
                },
                Tile {
                    label: "Historical max",
                    value: fmt.percentage(data.max_drawdown_percent),
                    tone: Tone::Negative,
                    delta: None,
                    caption: fmt.currency(data.max_drawdown),
                },
            ]),
            DetailSection::Rows(vec![
                Row {
                    label: "Peak equity:",
                    value: fmt.currency(data.peak_equity),
                    tone: Tone::Neutral,
                },
                Row {
                    label: "Current equity:",
                    value: fmt.currency(data.current_equity),
                    tone: Tone::Neutral,
                },
            ]),
            DetailSection::Progress(Progress {
                label: "Recovery:",
                value: fmt.percentage(data.recovery_percent),
                width_pct: recovery_width(data.recovery_percent),
                tone: recovery_tone(data.recovery_percent),
                caption: "Progress toward recovering the max drawdown",
            }),
        ],
    }
}

/// Drawdown ratio as a one-decimal percentage, `0.40` -> `40.0%`.
pub fn format_ratio(ratio: f64) -> String {
    if !ratio.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.1}%", ratio * 100.0)
}

pub fn recovery_width(recovery_percent: f64) -> f64 {
    if recovery_percent.is_nan() {
        return 0.0;
    }
    recovery_percent.clamp(0.0, 100.0)
}

pub fn recovery_tone(recovery_percent: f64) -> Tone {
    if recovery_percent >= RECOVERY_THRESHOLD {
        Tone::Positive
    } else {
        Tone::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2024 - 05 - 01);

    fn ready(variant: KpiVariant, data: KpiData) -> KpiView {
        match card_body(variant, Some(&data), false, &Formatter::default(), TODAY) {
            CardBody::Ready(view) => view,
            CardBody::Loading => panic!("expected content for {variant:?}"),
        }
    }

    fn progress(view: &KpiView) -> &Progress {
        view.details
            .iter()
            .find_map(|section| match section {
                DetailSection::Progress(progress) => Some(progress),
                _ => None,
            })
            .expect("drawdown view has a progress bar")
    }

    #[test]
    fn test_loading_or_missing_data_shows_loading() {
        let formatter = Formatter::default();
        for variant in KpiVariant::ALL {
            assert_eq!(card_body(variant, None, false, &formatter, TODAY), CardBody::Loading);
        }
        let equity = KpiData::Equity(EquityData::sample());
        assert_eq!(
            card_body(KpiVariant::Equity, Some(&equity), true, &formatter, TODAY),
            CardBody::Loading
        );
        assert_eq!(
            card_body(KpiVariant::Drawdown, Some(&equity), false, &formatter, TODAY),
            CardBody::Loading
        );
    }

    #[test]
    fn test_equity_view() {
        let view = ready(KpiVariant::Equity, KpiData::Equity(EquityData::sample()));
        assert_eq!(view.primary, "$52,500.00");
        assert_eq!(view.primary_hint.as_deref(), Some("≈ $52.50K"));
        assert_eq!(view.change.text, "+5.26%");
        assert_eq!(view.change.tone, Tone::Positive);
        assert_eq!(view.change.direction, Direction::Up);
        assert_eq!(view.change.context, "from last month");
    }

    #[test]
    fn test_negative_change_flips_indicator() {
        let mut daily = DailyPnLData::sample();
        daily.total = -350.0;
        daily.change_percent = -1.5;
        daily.realized = -500.0;
        let view = ready(KpiVariant::Daily, KpiData::Daily(daily));
        assert_eq!(view.primary, "-$350.00");
        assert_eq!(view.primary_tone, Tone::Negative);
        assert_eq!(view.change.text, "-1.50%");
        assert_eq!(view.change.tone, Tone::Negative);
        assert_eq!(view.change.direction, Direction::Down);

        let DetailSection::Rows(rows) = &view.details[0] else {
            panic!("daily details start with rows");
        };
        assert_eq!(rows[0].tone, Tone::Negative);
        assert_eq!(rows[1].tone, Tone::Positive);
    }

    #[test]
    fn test_daily_note_carries_date() {
        let view = ready(KpiVariant::Daily, KpiData::Daily(DailyPnLData::sample()));
        let has_date = view.details.iter().any(|section| {
            matches!(section, DetailSection::Note { text, .. } if text.contains("2024-05-01 00:00"))
        });
        assert!(has_date);
    }

    #[test]
    fn test_period_tiles_signed_independently() {
        let mut period = PeriodPnLData::sample();
        period.mtd_delta = -1_200.0;
        let view = ready(KpiVariant::Period, KpiData::Period(period));
        assert_eq!(view.primary, "$2,000.00");
        assert!(matches!(view.details[0], DetailSection::Trend { .. }));

        let DetailSection::Tiles(tiles) = &view.details[1] else {
            panic!("period details have tiles");
        };
        assert_eq!(tiles[0].value, "$15.00K");
        assert_eq!(tiles[0].tone, Tone::Positive);
        let mtd_delta = tiles[0].delta.as_ref().unwrap();
        assert_eq!(mtd_delta.text, "$-1.20K");
        assert_eq!(mtd_delta.tone, Tone::Negative);
        assert_eq!(mtd_delta.direction, Direction::Down);

        assert_eq!(tiles[1].value, "$45.00K");
        assert_eq!(tiles[1].delta.as_ref().unwrap().tone, Tone::Positive);
    }

    #[test]
    fn test_drawdown_primary_is_ratio() {
        let view = ready(KpiVariant::Drawdown, KpiData::Drawdown(DrawdownData::sample()));
        assert_eq!(view.primary, "40.0%");
        assert_eq!(view.primary_tone, Tone::Warning);
        assert_eq!(view.change.tone, Tone::Warning);
        assert_eq!(view.change.text, "+3.81%");
        assert_eq!(format_ratio(f64::NAN), NOT_AVAILABLE);
    }

    #[test]
    fn test_drawdown_tone_is_not_sign_driven() {
        let mut drawdown = DrawdownData::sample();
        drawdown.current_drawdown_percent = -3.0;
        let view = ready(KpiVariant::Drawdown, KpiData::Drawdown(drawdown));
        assert_eq!(view.change.tone, Tone::Warning);
        assert_eq!(view.change.direction, Direction::Down);
    }

    #[test]
    fn test_recovery_width_clamped() {
        assert_eq!(recovery_width(125.0), 100.0);
        assert_eq!(recovery_width(60.0), 60.0);
        assert_eq!(recovery_width(-5.0), 0.0);

        let mut drawdown = DrawdownData::sample();
        drawdown.recovery_percent = 125.0;
        let view = ready(KpiVariant::Drawdown, KpiData::Drawdown(drawdown));
        assert_eq!(progress(&view).width_pct, 100.0);
        assert_eq!(progress(&view).value, "+125.00%");
    }

    #[test]
    fn test_recovery_threshold() {
        assert_eq!(recovery_tone(49.9), Tone::Warning);
        assert_eq!(recovery_tone(50.0), Tone::Positive);

        let mut drawdown = DrawdownData::sample();
        drawdown.recovery_percent = 49.9;
        let view = ready(KpiVariant::Drawdown, KpiData::Drawdown(drawdown));
        assert_eq!(progress(&view).tone, Tone::Warning);
    }
}
