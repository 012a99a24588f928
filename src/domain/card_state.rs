//! Expand/collapse state of a single KPI card.
//!
//! The detail panel's height depends on its data, so the expanded height is
//! measured at runtime: the height constraint is lifted, the card renders at
//! natural size, its scroll height is read and cached, and the card
//! collapses again. The container's max-height then animates between
//! [`COLLAPSED_HEIGHT`] and the cached value.

use super::kpi::{KpiData, KpiVariant};

/// Max-height of a collapsed card, in CSS pixels.
pub const COLLAPSED_HEIGHT: f64 = 145.0;
/// Expanded height used until the first measurement lands.
pub const DEFAULT_EXPANDED_HEIGHT: f64 = 350.0;
/// Duration of the max-height transition.
pub const TRANSITION_MS: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardState {
    expanded: bool,
    measured_height: f64,
    measuring: bool,
    generation: u64,
}

/// Max-height constraint applied to the card container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaxHeight {
    Unconstrained,
    Pixels(f64),
}

impl CardState {
    pub fn new(default_expanded: bool) -> Self {
        Self {
            expanded: default_expanded,
            measured_height: DEFAULT_EXPANDED_HEIGHT,
            measuring: false,
            generation: 0,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn measured_height(&self) -> f64 {
        self.measured_height
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Lifts the height constraint so the next render lays out at natural size.
    ///
    /// Returns the generation the eventual reading must be reported under.
    /// Starting a new measurement invalidates any reading still in flight.
    pub fn begin_measure(&mut self) -> u64 {
        self.generation += 1;
        self.measuring = true;
        self.generation
    }

    /// Generation of the measurement waiting for a reading, if any.
    pub fn pending_measurement(&self) -> Option<u64> {
        self.measuring.then_some(self.generation)
    }

    /// Stores the measured height, restores the constraint and collapses.
    ///
    /// Readings from a superseded generation are dropped and `false` is
    /// returned. Non-finite or non-positive readings keep the previous height.
    pub fn finish_measure(&mut self, generation: u64, scroll_height: f64) -> bool {
        if !self.measuring || generation != self.generation {
            return false;
        }
        if scroll_height.is_finite() && scroll_height > 0.0 {
            self.measured_height = scroll_height;
        }
        self.measuring = false;
        self.expanded = false;
        true
    }

    /// Ends a measurement that produced no reading.
    pub fn abort_measure(&mut self, generation: u64) -> bool {
        self.finish_measure(generation, f64::NAN)
    }

    /// The detail panel is laid out while expanded and while measuring.
    pub fn detail_visible(&self) -> bool {
        self.expanded || self.measuring
    }

    pub fn max_height(&self) -> MaxHeight {
        if self.measuring {
            MaxHeight::Unconstrained
        } else if self.expanded {
            MaxHeight::Pixels(self.measured_height)
        } else {
            MaxHeight::Pixels(COLLAPSED_HEIGHT)
        }
    }

    /// Inline style for the card container.
    pub fn container_style(&self) -> String {
        let max_height = match self.max_height() {
            MaxHeight::Unconstrained => "none".to_string(),
            MaxHeight::Pixels(px) => format!("{px:.0}px"),
        };
        format!(
            "max-height: {max_height}; transition: max-height {TRANSITION_MS}ms ease-in-out;"
        )
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Decides when a card's content changed enough to need a new measurement.
///
/// Loading passes are ignored so a refresh that returns identical data does
/// not collapse an open card.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasureTrigger {
    last: Option<(KpiVariant, KpiData)>,
}

impl MeasureTrigger {
    /// Records the card's current inputs and returns `true` when a
    /// measurement should start.
    pub fn observe(&mut self, variant: KpiVariant, data: Option<&KpiData>, loading: bool) -> bool {
        if loading {
            return false;
        }
        let Some(data) = data else {
            self.last = None;
            return false;
        };
        if self
            .last
            .as_ref()
            .is_some_and(|(seen_variant, seen)| *seen_variant == variant && seen == data)
        {
            return false;
        }
        self.last = Some((variant, data.clone()));
        true
    }
}
