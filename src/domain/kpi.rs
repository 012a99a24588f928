use serde::{Deserialize, Serialize};
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    OffsetDateTime, PrimitiveDateTime,
};

/// Naive ISO-8601 timestamp as emitted by the KPI service (UTC, optional
/// fractional seconds).
const NAIVE_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityData {
    pub balance: f64,
    #[serde(rename = "unrealizedPnL")]
    pub unrealized_pnl: f64,
    pub total_equity: f64,
    pub change_percent: f64,
    pub change_amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPnLData {
    pub realized: f64,
    pub unrealized: f64,
    pub total: f64,
    pub change_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPnLData {
    pub today: f64,
    pub today_change_percent: f64,
    pub mtd: f64,
    pub mtd_delta: f64,
    pub mtd_change_percent: f64,
    pub ytd: f64,
    pub ytd_delta: f64,
    pub ytd_change_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownData {
    /// Absolute decline from the last equity peak.
    pub current_drawdown: f64,
    /// Largest historical decline.
    pub max_drawdown: f64,
    /// `current_drawdown / max_drawdown`, expected in [0, 1].
    pub drawdown_ratio: f64,
    pub current_drawdown_percent: f64,
    pub max_drawdown_percent: f64,
    pub peak_equity: f64,
    pub current_equity: f64,
    pub recovery_percent: f64,
}

impl EquityData {
    pub fn sample() -> Self {
        Self {
            balance: 50_000.0,
            unrealized_pnl: 2_500.0,
            total_equity: 52_500.0,
            change_percent: 5.26,
            change_amount: 2_500.0,
        }
    }
}

impl DailyPnLData {
    pub fn sample() -> Self {
        Self {
            realized: 1_200.0,
            unrealized: 800.0,
            total: 2_000.0,
            change_percent: 4.17,
        }
    }
}

impl PeriodPnLData {
    pub fn sample() -> Self {
        Self {
            today: 2_000.0,
            today_change_percent: 4.17,
            mtd: 15_000.0,
            mtd_delta: 3_000.0,
            mtd_change_percent: 25.0,
            ytd: 45_000.0,
            ytd_delta: 12_000.0,
            ytd_change_percent: 36.36,
        }
    }
}

impl DrawdownData {
    pub fn sample() -> Self {
        Self {
            current_drawdown: 2_000.0,
            max_drawdown: 5_000.0,
            drawdown_ratio: 0.40,
            current_drawdown_percent: 3.81,
            max_drawdown_percent: 9.09,
            peak_equity: 55_000.0,
            current_equity: 52_500.0,
            recovery_percent: 60.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KpiVariant {
    Equity,
    Daily,
    Period,
    Drawdown,
}

impl KpiVariant {
    pub const ALL: [KpiVariant; 4] = [
        KpiVariant::Equity,
        KpiVariant::Daily,
        KpiVariant::Period,
        KpiVariant::Drawdown,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            KpiVariant::Equity => "Current Net Value",
            KpiVariant::Daily => "Today's P&L",
            KpiVariant::Period => "Performance Summary (P&L)",
            KpiVariant::Drawdown => "Drawdown Analysis",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            KpiVariant::Equity => "💲",
            KpiVariant::Daily => "📈",
            KpiVariant::Period => "📊",
            KpiVariant::Drawdown => "📉",
        }
    }

    pub fn context_label(&self) -> &'static str {
        match self {
            KpiVariant::Equity => "from last month",
            KpiVariant::Daily => "vs yesterday",
            KpiVariant::Period => "",
            KpiVariant::Drawdown => "risk metric",
        }
    }

    /// Resource path below `/api/v1/kpis/`.
    pub fn resource(&self) -> &'static str {
        match self {
            KpiVariant::Equity => "equity",
            KpiVariant::Daily => "daily",
            KpiVariant::Period => "period",
            KpiVariant::Drawdown => "drawdown",
        }
    }
}

/// One card's payload, tagged by variant.
#[derive(Clone, Debug, PartialEq)]
pub enum KpiData {
    Equity(EquityData),
    Daily(DailyPnLData),
    Period(PeriodPnLData),
    Drawdown(DrawdownData),
}

impl KpiData {
    pub fn variant(&self) -> KpiVariant {
        match self {
            KpiData::Equity(_) => KpiVariant::Equity,
            KpiData::Daily(_) => KpiVariant::Daily,
            KpiData::Period(_) => KpiVariant::Period,
            KpiData::Drawdown(_) => KpiVariant::Drawdown,
        }
    }
}

/// All four records as returned by the aggregate endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub equity: EquityData,
    pub daily: DailyPnLData,
    pub period: PeriodPnLData,
    pub drawdown: DrawdownData,
    pub timestamp: String,
}

impl KpiSnapshot {
    pub fn sample() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            equity: EquityData::sample(),
            daily: DailyPnLData::sample(),
            period: PeriodPnLData::sample(),
            drawdown: DrawdownData::sample(),
            timestamp: now
                .format(&Rfc3339)
                .unwrap_or_else(|_| now.unix_timestamp().to_string()),
        }
    }

    pub fn get(&self, variant: KpiVariant) -> KpiData {
        match variant {
            KpiVariant::Equity => KpiData::Equity(self.equity.clone()),
            KpiVariant::Daily => KpiData::Daily(self.daily.clone()),
            KpiVariant::Period => KpiData::Period(self.period.clone()),
            KpiVariant::Drawdown => KpiData::Drawdown(self.drawdown.clone()),
        }
    }

    /// Parsed `timestamp`, treating naive values as UTC.
    pub fn fetched_at(&self) -> Option<OffsetDateTime> {
        parse_service_timestamp(&self.timestamp)
    }
}

pub fn parse_service_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    OffsetDateTime::parse(raw, &Rfc3339).ok().or_else(|| {
        PrimitiveDateTime::parse(raw, NAIVE_TIMESTAMP)
            .ok()
            .map(PrimitiveDateTime::assume_utc)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equity_uses_wire_names() {
        let json = r#"{
            "balance": 50000.0,
            "unrealizedPnL": 2500.0,
            "totalEquity": 52500.0,
            "changePercent": 5.26,
            "changeAmount": 2500.0
        }"#;
        let equity: EquityData = serde_json::from_str(json).unwrap();
        assert_eq!(equity, EquityData::sample());

        let value = serde_json::to_value(&equity).unwrap();
        assert!(value.get("unrealizedPnL").is_some());
        assert!(value.get("totalEquity").is_some());
    }

    #[test]
    fn test_snapshot_from_service_payload() {
        let json = r#"{
            "equity": {"balance": 50000.0, "unrealizedPnL": 2500.0, "totalEquity": 52500.0, "changePercent": 5.26, "changeAmount": 2500.0},
            "daily": {"realized": 1200.0, "unrealized": 800.0, "total": 2000.0, "changePercent": 4.17},
            "period": {"today": 2000.0, "todayChangePercent": 4.17, "mtd": 15000.0, "mtdDelta": 3000.0, "mtdChangePercent": 25.0, "ytd": 45000.0, "ytdDelta": 12000.0, "ytdChangePercent": 36.36},
            "drawdown": {"currentDrawdown": 2000.0, "maxDrawdown": 5000.0, "drawdownRatio": 0.4, "currentDrawdownPercent": 3.81, "maxDrawdownPercent": 9.09, "peakEquity": 55000.0, "currentEquity": 52500.0, "recoveryPercent": 60.0},
            "timestamp": "2024-05-01T12:30:00.123456"
        }"#;
        let snapshot: KpiSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.period, PeriodPnLData::sample());
        assert_eq!(snapshot.drawdown, DrawdownData::sample());

        let at = snapshot.fetched_at().unwrap();
        assert_eq!(at.year(), 2024);
        assert_eq!(at.hour(), 12);
        assert_eq!(at.minute(), 30);
        assert_eq!(at.offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn test_timestamp_variants() {
        assert!(parse_service_timestamp("2024-05-01T12:30:00").is_some());
        assert!(parse_service_timestamp("2024-05-01T12:30:00Z").is_some());
        assert!(parse_service_timestamp("2024-05-01T12:30:00.5+02:00").is_some());
        assert!(parse_service_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_snapshot_dispatch_matches_variant() {
        let snapshot = KpiSnapshot::sample();
        for variant in KpiVariant::ALL {
            assert_eq!(snapshot.get(variant).variant(), variant);
        }
        assert!(snapshot.fetched_at().is_some());
    }
}
