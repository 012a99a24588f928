use dioxus::prelude::*;

use crate::domain::trend::{RandomTrend, TrendSource};
use crate::ui::theme;

/// Thirty-bar trend strip. Bars are sample data drawn once per mount.
#[component]
pub fn TrendStrip(caption: &'static str) -> Element {
    let bars = use_hook(|| RandomTrend.bars());

    rsx! {
        div { class: "trend-strip",
            for (idx, bar) in bars.into_iter().enumerate() {
                div {
                    key: "{idx}",
                    class: "{theme::trend_bar(bar.positive)}",
                    style: format!("height: {:.1}%", bar.height_pct),
                }
            }
        }
        p { class: "kpi-note text-center", "{caption}" }
    }
}
