//! Class helpers mapping presentation tones onto `assets/main.css`.

use crate::domain::presentation::{Direction, Tone};

pub fn tone_text(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "text-positive",
        Tone::Negative => "text-negative",
        Tone::Warning => "text-warning",
        Tone::Neutral => "text-strong",
    }
}

pub fn tone_fill(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "fill-positive",
        Tone::Negative => "fill-negative",
        Tone::Warning => "fill-warning",
        Tone::Neutral => "fill-neutral",
    }
}

/// The indicator glyph points up; negative changes flip it.
pub fn indicator_class(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "kpi-indicator",
        Direction::Down => "kpi-indicator kpi-indicator-flipped",
    }
}

pub fn trend_bar(positive: bool) -> &'static str {
    if positive {
        "trend-bar trend-bar-up"
    } else {
        "trend-bar trend-bar-down"
    }
}

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-button nav-button-active"
    } else {
        "nav-button"
    }
}

pub fn toggle_button(active: bool) -> &'static str {
    if active {
        "chip chip-active"
    } else {
        "chip"
    }
}
