//! MACD (Moving Average Convergence Divergence) indicator.

use folio_core::{Bar, TimeSeries};
use serde::{Deserialize, Serialize};

use crate::indicator::{Indicator, IndicatorConfig, PriceSource};
use crate::moving_average::ema;

/// MACD indicator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    /// Fast EMA period (default: 12).
    pub fast_period: usize,
    /// Slow EMA period (default: 26).
    pub slow_period: usize,
    /// Signal line EMA period (default: 9).
    pub signal_period: usize,
    /// Price source for calculation.
    pub price_source: PriceSource,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            price_source: PriceSource::Close,
        }
    }
}

impl IndicatorConfig for MacdConfig {}

/// MACD indicator output, one slot per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    /// DIF line (fast EMA - slow EMA).
    pub dif: TimeSeries<f64>,
    /// DEA line (EMA of DIF).
    pub dea: TimeSeries<f64>,
    /// Histogram, `(DIF - DEA) * 2`.
    pub macd: TimeSeries<f64>,
}

/// MACD indicator.
pub struct Macd {
    config: MacdConfig,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, bars: &[Bar]) -> MacdOutput {
        let prices = self.config.price_source.series(bars);
        self.calculate_from(&prices)
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn is_overlay(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

impl Macd {
    /// Calculate MACD over a dense price slice.
    pub fn calculate_from(&self, prices: &[f64]) -> MacdOutput {
        let fast = ema(prices, self.config.fast_period);
        let slow = ema(prices, self.config.slow_period);
        let dif = fast.zip_with(&slow, |f, s| f - s);

        // DEA smooths DIF with gaps read as zero.
        let dif_zeroed: Vec<f64> = dif.values().iter().map(|v| v.unwrap_or(0.0)).collect();
        let dea = ema(&dif_zeroed, self.config.signal_period);

        let macd = dif.zip_with(&dea, |d, e| (d - e) * 2.0);

        MacdOutput { dif, dea, macd }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MacdConfig {
        &self.config
    }
}

/// MACD(12, 26, 9) over closing prices.
pub fn compute_macd(closes: &[f64]) -> MacdOutput {
    Macd::new(MacdConfig::default()).calculate_from(closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::new(format!("2024{:04}", 101 + i), close, close).with_range(close + 1.0, close - 1.0)
            })
            .collect()
    }

    #[test]
    fn test_macd_constant_is_zero() {
        let out = compute_macd(&[10.0; 50]);
        assert_eq!(out.dif.len(), 50);
        for i in 0..50 {
            assert_eq!(out.dif.value(i), Some(0.0));
            assert_eq!(out.dea.value(i), Some(0.0));
            assert_eq!(out.macd.value(i), Some(0.0));
        }
    }

    #[test]
    fn test_macd_first_slot() {
        let out = compute_macd(&[1.0, 2.0]);
        // Both EMAs seed at the first close.
        assert_eq!(out.dif.value(0), Some(0.0));
        // k12 = 2/13, k26 = 2/27
        let expected = (1.0 + 2.0 / 13.0) - (1.0 + 2.0 / 27.0);
        assert!((out.dif.value(1).unwrap() - expected).abs() < 1e-12);
        let dea1 = 0.2 * expected;
        assert!((out.dea.value(1).unwrap() - dea1).abs() < 1e-12);
        assert!((out.macd.value(1).unwrap() - (expected - dea1) * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_macd_rising_series_positive() {
        let closes: Vec<f64> = (1..=60).map(|i| 100.0 + i as f64).collect();
        let macd = Macd::new(MacdConfig::default());
        let out = macd.calculate(&make_bars(&closes));
        assert!(out.dif.value(59).unwrap() > 0.0);
        assert!(out.dea.value(59).unwrap() > 0.0);
        assert_eq!(macd.name(), "MACD");
        assert!(!macd.is_overlay());
    }

    #[test]
    fn test_macd_gap_zeroed_for_dea() {
        let macd = Macd::new(MacdConfig::default());
        let out = macd.calculate_from(&[f64::NAN, 4.0, 6.0]);
        // First slot has no EMA at all, so DIF is a gap and DEA starts from zero.
        assert_eq!(out.dif.value(0), None);
        assert_eq!(out.dea.value(0), Some(0.0));
        assert_eq!(out.macd.value(0), None);
        assert_eq!(out.dif.value(1), Some(0.0));
    }

    #[test]
    fn test_macd_empty() {
        let out = compute_macd(&[]);
        assert!(out.dif.is_empty());
        assert!(out.dea.is_empty());
        assert!(out.macd.is_empty());
    }
}
