//! Core indicator traits and types.

use folio_core::{Bar, Ohlcv};
use serde::{Deserialize, Serialize};

/// Trait for indicator configuration.
pub trait IndicatorConfig: Clone + Default {}

/// Which price to use for indicator calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
    /// (High + Low) / 2
    HL2,
    /// (High + Low + Close) / 3
    HLC3,
    /// (Open + High + Low + Close) / 4
    OHLC4,
}

impl PriceSource {
    /// Extract the price from a bar based on this source.
    ///
    /// High and low are the corrected extremes, never the raw fields.
    pub fn extract(&self, bar: &Bar) -> f64 {
        match self {
            PriceSource::Open => bar.open(),
            PriceSource::High => bar.high(),
            PriceSource::Low => bar.low(),
            PriceSource::Close => bar.close(),
            PriceSource::HL2 => (bar.high() + bar.low()) / 2.0,
            PriceSource::HLC3 => (bar.high() + bar.low() + bar.close()) / 3.0,
            PriceSource::OHLC4 => (bar.open() + bar.high() + bar.low() + bar.close()) / 4.0,
        }
    }

    /// Extract this price for every bar.
    pub fn series(&self, bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| self.extract(b)).collect()
    }
}

/// Trait for technical indicators.
pub trait Indicator {
    /// The configuration type for this indicator.
    type Config: IndicatorConfig;
    /// Structured, bar-aligned output.
    type Output;

    /// Create a new indicator with the given configuration.
    fn new(config: Self::Config) -> Self;

    /// Calculate the indicator values for the given bars.
    fn calculate(&self, bars: &[Bar]) -> Self::Output;

    /// Minimum number of bars required before the indicator produces valid output.
    fn min_periods(&self) -> usize;

    /// Whether this indicator should be overlaid on the price chart (true)
    /// or displayed in a separate panel (false).
    fn is_overlay(&self) -> bool;

    /// Human-readable name of the indicator.
    fn name(&self) -> &str;
}
