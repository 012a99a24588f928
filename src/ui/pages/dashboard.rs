use dioxus::prelude::*;
use time::{macros::format_description, OffsetDateTime};

use crate::domain::{DashboardSettings, DashboardState, KpiVariant, RefreshCounter};
use crate::ui::components::KpiCard;

#[component]
pub fn DashboardPage() -> Element {
    let state = use_context::<Signal<DashboardState>>();
    let settings = use_context::<Signal<DashboardSettings>>();
    let mut refresh = use_context::<Signal<RefreshCounter>>();

    let (source, default_expanded) = settings.with(|s| (s.data_source, s.default_expanded));
    let (loading, refreshing, updated, last_error) = state.with(|st| {
        (
            st.is_loading(),
            st.refreshing,
            st.last_updated.map(updated_label),
            st.last_error.clone(),
        )
    });

    rsx! {
        div { class: "dashboard-header",
            h1 { class: "dashboard-title", "KPIs Dashboard" }
            div { class: "dashboard-meta",
                span { class: "chip", "{source.label()}" }
                if let Some(updated) = updated {
                    span { class: "text-muted", "Updated {updated}" }
                }
                button {
                    class: "nav-button",
                    disabled: refreshing,
                    onclick: move |_| refresh.with_mut(RefreshCounter::bump),
                    if refreshing { "Refreshing..." } else { "Refresh" }
                }
            }
        }
        if let Some(error) = last_error {
            p { class: "kpi-note text-negative", "Last refresh failed: {error}" }
        }
        div { class: "kpi-grid",
            for variant in KpiVariant::ALL {
                KpiCard {
                    key: "{variant.resource()}",
                    variant,
                    data: state.with(|st| st.card_data(variant)),
                    loading,
                    default_expanded,
                }
            }
        }
    }
}

fn updated_label(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour]:[minute]:[second] UTC"))
        .unwrap_or_else(|_| at.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_updated_label() {
        assert_eq!(updated_label(datetime!(2024-05-01 09:05:03 UTC)), "09:05:03 UTC");
    }
}
