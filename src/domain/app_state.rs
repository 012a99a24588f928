use time::OffsetDateTime;

use super::kpi::{KpiData, KpiSnapshot, KpiVariant};

/// Dashboard-wide display state held by the host page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    /// Latest snapshot, replaced wholesale on each successful refresh.
    pub snapshot: Option<KpiSnapshot>,
    pub refreshing: bool,
    pub last_updated: Option<OffsetDateTime>,
    pub last_error: Option<String>,
}

impl DashboardState {
    pub fn begin_refresh(&mut self) {
        self.refreshing = true;
    }

    pub fn apply_snapshot(&mut self, snapshot: KpiSnapshot) {
        self.last_updated = Some(
            snapshot
                .fetched_at()
                .unwrap_or_else(OffsetDateTime::now_utc),
        );
        self.snapshot = Some(snapshot);
        self.refreshing = false;
        self.last_error = None;
    }

    /// Keeps whatever snapshot was already on screen.
    pub fn fail_refresh(&mut self, message: impl Into<String>) {
        self.refreshing = false;
        self.last_error = Some(message.into());
    }

    /// Cards show the loading indicator only until the first snapshot lands.
    pub fn is_loading(&self) -> bool {
        self.refreshing && self.snapshot.is_none()
    }

    pub fn card_data(&self, variant: KpiVariant) -> Option<KpiData> {
        self.snapshot.as_ref().map(|snapshot| snapshot.get(variant))
    }
}

/// Monotonic counter; bumping it asks the host to refetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshCounter(u64);

impl RefreshCounter {
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kpi::EquityData;

    #[test]
    fn test_first_load_is_loading() {
        let mut state = DashboardState::default();
        assert!(!state.is_loading());
        assert_eq!(state.card_data(KpiVariant::Equity), None);

        state.begin_refresh();
        assert!(state.is_loading());

        state.apply_snapshot(KpiSnapshot::sample());
        assert!(!state.is_loading());
        assert!(state.last_updated.is_some());
        assert_eq!(
            state.card_data(KpiVariant::Equity),
            Some(KpiData::Equity(EquityData::sample()))
        );
    }

    #[test]
    fn test_later_refresh_keeps_cards_visible() {
        let mut state = DashboardState::default();
        state.apply_snapshot(KpiSnapshot::sample());
        state.begin_refresh();
        assert!(!state.is_loading());

        state.fail_refresh("connection refused");
        assert!(!state.refreshing);
        assert!(state.snapshot.is_some());
        assert_eq!(state.last_error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_failed_first_load_leaves_no_data() {
        let mut state = DashboardState::default();
        state.begin_refresh();
        state.fail_refresh("timeout");
        assert_eq!(state.card_data(KpiVariant::Drawdown), None);
    }

    #[test]
    fn test_refresh_counter() {
        let mut counter = RefreshCounter::default();
        counter.bump();
        counter.bump();
        assert_eq!(counter.value(), 2);
    }
}
