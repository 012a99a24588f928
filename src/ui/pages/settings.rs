use dioxus::prelude::*;
use tracing::{info, warn};
use url::Url;

use crate::{
    domain::{settings::API_BASE_URL_ENV, DashboardSettings, DataSource, RefreshCounter},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::persistence::save_settings,
};

#[component]
pub fn SettingsPage() -> Element {
    let mut settings = use_context::<Signal<DashboardSettings>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut refresh = use_context::<Signal<RefreshCounter>>();

    let initial = settings();
    let mut base_url_input = use_signal(|| initial.api_base_url.clone());
    let mut interval_input = use_signal(|| initial.refresh_interval_secs.to_string());
    let mut source = use_signal(|| initial.data_source);
    let mut default_expanded = use_signal(|| initial.default_expanded);

    let on_apply = move |_| {
        let parsed = parse_settings(
            &base_url_input(),
            source(),
            &interval_input(),
            default_expanded(),
        );

        match parsed {
            Ok(next) => {
                info!(source = ?next.data_source, base_url = %next.api_base_url, "Applying dashboard settings");
                settings.set(next.clone());
                refresh.with_mut(RefreshCounter::bump);
                match save_settings(&next) {
                    Ok(()) => push_toast(toasts, ToastKind::Success, "Settings saved."),
                    Err(err) => {
                        warn!(error = %err, "Failed to persist settings");
                        push_toast(
                            toasts,
                            ToastKind::Error,
                            format!("Settings applied but not saved: {err}"),
                        );
                    }
                }
            }
            Err(message) => push_toast(toasts, ToastKind::Error, message),
        }
    };

    let on_reset = move |_| {
        let defaults = DashboardSettings::default().with_process_env();
        base_url_input.set(defaults.api_base_url.clone());
        interval_input.set(defaults.refresh_interval_secs.to_string());
        source.set(defaults.data_source);
        default_expanded.set(defaults.default_expanded);
        push_toast(toasts, ToastKind::Info, "Restored defaults. Apply to keep them.");
    };

    let current_source = source();

    rsx! {
        div { class: "settings-panel",
            h2 { class: "dashboard-title", "Settings" }

            div { class: "settings-field",
                span { class: "settings-label", "Data source" }
                div { class: "settings-row",
                    for option in [DataSource::Sample, DataSource::Service] {
                        button {
                            class: "{theme::toggle_button(current_source == option)}",
                            onclick: move |_| source.set(option),
                            "{option.label()}"
                        }
                    }
                }
            }

            label { class: "settings-field",
                span { class: "settings-label", "KPI service URL" }
                input {
                    class: "settings-input",
                    value: base_url_input(),
                    oninput: move |evt| base_url_input.set(evt.value()),
                }
                span { class: "kpi-note", "{API_BASE_URL_ENV} overrides this at startup." }
            }

            label { class: "settings-field",
                span { class: "settings-label", "Auto-refresh (seconds, 0 = off)" }
                input {
                    class: "settings-input",
                    r#type: "number",
                    min: "0",
                    value: interval_input(),
                    oninput: move |evt| interval_input.set(evt.value()),
                }
            }

            label { class: "settings-field settings-row",
                input {
                    r#type: "checkbox",
                    checked: default_expanded(),
                    onchange: move |evt| default_expanded.set(evt.checked()),
                }
                span { class: "settings-label", "Open cards expanded before the first measurement" }
            }

            div { class: "settings-row",
                button { class: "nav-button nav-button-active", onclick: on_apply, "Apply" }
                button { class: "nav-button", onclick: on_reset, "Reset" }
            }
        }
    }
}

fn parse_settings(
    base_url: &str,
    data_source: DataSource,
    interval: &str,
    default_expanded: bool,
) -> Result<DashboardSettings, String> {
    let base_url = base_url.trim();
    Url::parse(base_url).map_err(|err| format!("Invalid service URL '{base_url}': {err}"))?;
    let refresh_interval_secs = interval
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("Refresh interval must be a whole number of seconds, got '{interval}'"))?;

    Ok(DashboardSettings {
        api_base_url: base_url.to_string(),
        data_source,
        refresh_interval_secs,
        default_expanded,
    })
}
