//! Placeholder trend strip for the period card.
//!
//! The bars are random sample data, not analytics. Swap the
//! [`TrendSource`] for a real time series without touching the card.

use rand::Rng;

pub const TREND_BARS: usize = 30;
const POSITIVE_PROBABILITY: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendBar {
    /// Bar height as a percentage of the strip, in [0, 100).
    pub height_pct: f64,
    pub positive: bool,
}

pub trait TrendSource {
    fn bars(&self) -> Vec<TrendBar>;
}

/// Random sample bars, regenerated on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomTrend;

impl TrendSource for RandomTrend {
    fn bars(&self) -> Vec<TrendBar> {
        sample_bars(&mut rand::thread_rng(), TREND_BARS)
    }
}

pub fn sample_bars<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<TrendBar> {
    (0..count)
        .map(|_| TrendBar {
            height_pct: rng.gen_range(0.0..100.0),
            positive: rng.gen_bool(POSITIVE_PROBABILITY),
        })
        .collect()
}
