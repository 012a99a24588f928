use std::time::Duration;

use dioxus::{prelude::*, signals::Signal};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::{
    domain::{DashboardSettings, DashboardState, RefreshCounter},
    infra::kpi_client::ClientCache,
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{DashboardPage, SettingsPage},
        shell::Shell,
    },
    util::{assets, persistence::load_settings},
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Dashboard {},
    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    let settings = use_signal(load_settings);
    use_context_provider(|| settings);

    let state = use_signal(DashboardState::default);
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    // Bumped by the refresh button, the settings page and the auto-refresh loop.
    let mut refresh = use_signal(RefreshCounter::default);
    use_context_provider(|| refresh);

    let clients = use_signal(ClientCache::default);

    let _kpis = use_resource(move || async move {
        let settings = settings();
        let tick = refresh();
        debug!(tick = tick.value(), "KPI refresh requested");
        fetch_kpis(settings, clients, state, toasts).await
    });

    let _auto_refresh = use_resource(move || async move {
        let interval = settings().refresh_interval_secs;
        if interval == 0 {
            return;
        }
        loop {
            tokio::time::sleep(Duration::from_secs(interval)).await;
            refresh.with_mut(RefreshCounter::bump);
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

async fn fetch_kpis(
    settings: DashboardSettings,
    mut clients: Signal<ClientCache>,
    mut state: Signal<DashboardState>,
    toasts: Signal<Vec<ToastMessage>>,
) -> Option<OffsetDateTime> {
    state.with_mut(DashboardState::begin_refresh);
    info!(
        source = ?settings.data_source,
        base_url = %settings.api_base_url,
        "Refreshing KPIs"
    );

    let result = match clients.with_mut(|cache| cache.source_for(&settings)) {
        Ok(source) => source.load().await,
        Err(err) => Err(err),
    };
    match result {
        Ok(snapshot) => {
            let fetched_at = snapshot.fetched_at();
            if fetched_at.is_none() {
                warn!(timestamp = %snapshot.timestamp, "Unparsable snapshot timestamp");
            }
            state.with_mut(|st| st.apply_snapshot(snapshot));
            fetched_at
        }
        Err(err) => {
            warn!(error = %err, "Failed to load KPIs");
            state.with_mut(|st| st.fail_refresh(err.to_string()));
            push_toast(toasts, ToastKind::Error, format!("Failed to load KPIs: {err}"));
            None
        }
    }
}

#[component]
pub fn Dashboard() -> Element {
    rsx! { Shell { DashboardPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
