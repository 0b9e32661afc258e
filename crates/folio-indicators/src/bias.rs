//! BIAS deviation oscillator.

use folio_core::{Bar, TimeSeries};
use serde::{Deserialize, Serialize};

use crate::indicator::{Indicator, IndicatorConfig, PriceSource};
use crate::moving_average::sma;

/// BIAS indicator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasConfig {
    /// Moving average periods, one line each (default: 20, 30, 60).
    pub periods: Vec<usize>,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            periods: vec![20, 30, 60],
        }
    }
}

impl IndicatorConfig for BiasConfig {}

/// One BIAS line.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasLine {
    pub period: usize,
    pub values: TimeSeries<f64>,
}

impl BiasLine {
    /// Series name, e.g. `BIAS20`.
    pub fn name(&self) -> String {
        format!("BIAS{}", self.period)
    }
}

/// BIAS indicator.
pub struct Bias {
    config: BiasConfig,
}

impl Indicator for Bias {
    type Config = BiasConfig;
    type Output = Vec<BiasLine>;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, bars: &[Bar]) -> Vec<BiasLine> {
        compute_bias(&PriceSource::Close.series(bars), &self.config.periods)
    }

    fn min_periods(&self) -> usize {
        self.config.periods.iter().copied().min().unwrap_or(1)
    }

    fn is_overlay(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "BIAS"
    }
}

/// Percentage deviation of the close from its SMA, one line per period.
///
/// Slots where the SMA is missing or zero are `None`.
pub fn compute_bias(closes: &[f64], periods: &[usize]) -> Vec<BiasLine> {
    periods
        .iter()
        .map(|&period| {
            let ma = sma(closes, period);
            let values = closes
                .iter()
                .enumerate()
                .map(|(i, &close)| {
                    let avg = ma.value(i).filter(|a| *a != 0.0)?;
                    let bias = (close - avg) / avg * 100.0;
                    bias.is_finite().then_some(bias)
                })
                .collect();
            BiasLine {
                period,
                values: TimeSeries::from_options(values),
            }
        })
        .collect()
}
