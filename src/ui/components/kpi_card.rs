use std::rc::Rc;

use dioxus::dioxus_core::Task;
use dioxus::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::domain::presentation::{card_body, CardBody, Change, DetailSection, KpiView, Progress, Tile};
use crate::domain::{CardState, Formatter, KpiData, KpiVariant, MeasureTrigger};
use crate::ui::components::trend_strip::TrendStrip;
use crate::ui::theme;

/// One KPI card: always-visible summary plus an expandable detail panel.
///
/// Whenever the data or variant changes the card re-measures its natural
/// height and collapses; toggling is the only other state change.
#[component]
pub fn KpiCard(
    variant: KpiVariant,
    #[props(!optional)] data: Option<KpiData>,
    #[props(default)] loading: bool,
    #[props(default)] formatter: Formatter,
    #[props(default)] default_expanded: bool,
) -> Element {
    let mut card = use_signal(|| CardState::new(default_expanded));
    let mut trigger = use_signal(MeasureTrigger::default);
    let mut container = use_signal(|| None::<Rc<MountedData>>);
    let mut measurement = use_signal(|| None::<(u64, Task)>);

    use_effect(use_reactive((&data, &variant, &loading), move |(data, variant, loading)| {
        if trigger.with_mut(|t| t.observe(variant, data.as_ref(), loading)) {
            let generation = card.with_mut(CardState::begin_measure);
            debug!(?variant, generation, "Measuring card height");
        }
    }));

    // Effects run once the render is applied, so an unconstrained pending
    // measurement is already laid out at natural height here.
    use_effect(move || {
        let Some(generation) = card().pending_measurement() else {
            return;
        };
        let Some(node) = container() else {
            return;
        };
        if matches!(*measurement.peek(), Some((running, _)) if running == generation) {
            return;
        }
        if let Some((_, stale)) = measurement.write().take() {
            stale.cancel();
        }

        let task = spawn(async move {
            match node.get_scroll_size().await {
                Ok(size) => {
                    debug!(?variant, height = size.height, "Measured card height");
                    card.with_mut(|state| state.finish_measure(generation, size.height));
                }
                Err(err) => {
                    warn!(?variant, error = ?err, "Card height measurement failed");
                    card.with_mut(|state| state.abort_measure(generation));
                }
            }
            measurement.with_mut(|current| {
                if matches!(current, Some((running, _)) if *running == generation) {
                    *current = None;
                }
            });
        });
        measurement.set(Some((generation, task)));
    });

    let state = card();
    let today = OffsetDateTime::now_utc().date();
    let body = card_body(variant, data.as_ref(), loading, &formatter, today);
    let (toggle_label, chevron) = if state.is_expanded() {
        ("Collapse", "▴")
    } else {
        ("Expand", "▾")
    };

    rsx! {
        div {
            class: "kpi-card",
            style: "{state.container_style()}",
            onmounted: move |evt| container.set(Some(evt.data())),
            div { class: "kpi-card-header",
                h3 { class: "kpi-card-title", "{variant.title()}" }
                div { class: "kpi-card-actions",
                    span { class: "kpi-card-icon", "{variant.icon()}" }
                    button {
                        class: "kpi-card-toggle",
                        aria_label: "{toggle_label}",
                        onclick: move |_| {
                            card.with_mut(CardState::toggle);
                            let current = card.peek();
                            debug!(
                                ?variant,
                                expanded = current.is_expanded(),
                                height = current.measured_height(),
                                "Toggled card"
                            );
                        },
                        "{chevron}"
                    }
                }
            }
            match body {
                CardBody::Loading => rsx! { LoadingIndicator {} },
                CardBody::Ready(view) => rsx! {
                    KpiContent { view, detail_visible: state.detail_visible() }
                },
            }
        }
    }
}

#[component]
fn LoadingIndicator() -> Element {
    rsx! {
        div { class: "kpi-loading",
            div { class: "kpi-spinner" }
            p { class: "text-muted", "Loading data..." }
        }
    }
}

#[component]
fn KpiContent(view: KpiView, detail_visible: bool) -> Element {
    let KpiView {
        eyebrow,
        primary,
        primary_tone,
        primary_hint,
        change,
        note,
        details,
    } = view;
    let detail_class = if detail_visible {
        "kpi-detail kpi-detail-open"
    } else {
        "kpi-detail"
    };

    rsx! {
        div { class: "kpi-summary",
            if let Some(eyebrow) = eyebrow {
                div { class: "kpi-eyebrow", "{eyebrow}" }
            }
            div { class: "kpi-primary {theme::tone_text(primary_tone)}", "{primary}" }
            if let Some(hint) = primary_hint {
                div { class: "kpi-hint", "{hint}" }
            }
            ChangeBadge { change }
            if let Some(note) = note {
                p { class: "kpi-note", "{note}" }
            }
        }
        div { class: "{detail_class}",
            for (idx, section) in details.into_iter().enumerate() {
                DetailBlock { key: "{idx}", section }
            }
        }
    }
}

#[component]
fn ChangeBadge(change: Change) -> Element {
    rsx! {
        div { class: "kpi-change",
            span { class: "kpi-change-value {theme::tone_text(change.tone)}",
                span { class: "{theme::indicator_class(change.direction)}", "▲" }
                span { "{change.text}" }
            }
            if !change.context.is_empty() {
                span { class: "text-muted", "{change.context}" }
            }
        }
    }
}

#[component]
fn DetailBlock(section: DetailSection) -> Element {
    match section {
        DetailSection::Rows(rows) => rsx! {
            div { class: "kpi-section",
                for row in rows {
                    div { class: "kpi-row",
                        span { class: "text-muted", "{row.label}" }
                        span { class: "kpi-row-value {theme::tone_text(row.tone)}", "{row.value}" }
                    }
                }
            }
        },
        DetailSection::Tiles(tiles) => rsx! {
            div { class: "kpi-section kpi-tiles",
                for tile in tiles {
                    TileView { tile }
                }
            }
        },
        DetailSection::Trend { caption } => rsx! {
            div { class: "kpi-section", TrendStrip { caption } }
        },
        DetailSection::Progress(progress) => rsx! { ProgressBar { progress } },
        DetailSection::Note { label, value, text } => rsx! {
            div { class: "kpi-section",
                div { class: "kpi-row",
                    span { class: "text-muted", "{label}" }
                    span { class: "text-soft", "{value}" }
                }
                p { class: "kpi-note", "{text}" }
            }
        },
    }
}

#[component]
fn TileView(tile: Tile) -> Element {
    rsx! {
        div { class: "kpi-tile",
            div { class: "kpi-eyebrow", "{tile.label}" }
            div { class: "kpi-tile-value {theme::tone_text(tile.tone)}", "{tile.value}" }
            if let Some(delta) = tile.delta {
                div { class: "kpi-change-value {theme::tone_text(delta.tone)}",
                    span { class: "{theme::indicator_class(delta.direction)}", "▲" }
                    span { "{delta.text}" }
                }
            }
            p { class: "kpi-note", "{tile.caption}" }
        }
    }
}

#[component]
fn ProgressBar(progress: Progress) -> Element {
    rsx! {
        div { class: "kpi-section",
            div { class: "kpi-row",
                span { class: "text-muted", "{progress.label}" }
                span { class: "kpi-row-value {theme::tone_text(progress.tone)}", "{progress.value}" }
            }
            div { class: "progress-track",
                div {
                    class: "progress-fill {theme::tone_fill(progress.tone)}",
                    style: "width: {progress.width_pct}%",
                }
            }
            p { class: "kpi-note", "{progress.caption}" }
        }
    }
}
