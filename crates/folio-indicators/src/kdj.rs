//! KDJ stochastic oscillator.

use folio_core::{Bar, Ohlcv, TimeSeries};
use serde::{Deserialize, Serialize};

use crate::indicator::{Indicator, IndicatorConfig};

/// Seed for K and D on the first bar.
const KDJ_SEED: f64 = 50.0;

/// KDJ indicator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdjConfig {
    /// RSV lookback window (default: 9).
    pub period: usize,
}

impl Default for KdjConfig {
    fn default() -> Self {
        Self { period: 9 }
    }
}

impl IndicatorConfig for KdjConfig {}

/// K, D and J lines, one slot per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct KdjOutput {
    pub k: TimeSeries<f64>,
    pub d: TimeSeries<f64>,
    pub j: TimeSeries<f64>,
}

/// KDJ indicator.
pub struct Kdj {
    config: KdjConfig,
}

impl Indicator for Kdj {
    type Config = KdjConfig;
    type Output = KdjOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, bars: &[Bar]) -> KdjOutput {
        let highs: Vec<f64> = bars.iter().map(|b| b.high()).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low()).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close()).collect();
        compute_kdj(&highs, &lows, &closes, self.config.period)
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn is_overlay(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "KDJ"
    }
}

/// Computes KDJ over aligned high/low/close slices.
///
/// The RSV window shrinks at the start of the series instead of producing
/// gaps. A flat window yields RSV 0. Bars without a usable close hold the
/// previous K and D.
pub fn compute_kdj(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> KdjOutput {
    let n = closes.len().min(highs.len()).min(lows.len());
    if period == 0 || n == 0 {
        return KdjOutput {
            k: TimeSeries::empty(n),
            d: TimeSeries::empty(n),
            j: TimeSeries::empty(n),
        };
    }

    let mut k_values = Vec::with_capacity(n);
    let mut d_values = Vec::with_capacity(n);
    let mut j_values = Vec::with_capacity(n);

    let mut prev_k = KDJ_SEED;
    let mut prev_d = KDJ_SEED;

    for i in 0..n {
        let (k, d) = if i == 0 {
            (KDJ_SEED, KDJ_SEED)
        } else {
            match rsv(highs, lows, closes[i], i, period) {
                Some(rsv) => {
                    let k = 2.0 / 3.0 * prev_k + rsv / 3.0;
                    let d = 2.0 / 3.0 * prev_d + k / 3.0;
                    (k, d)
                }
                None => (prev_k, prev_d),
            }
        };

        prev_k = k;
        prev_d = d;
        k_values.push(Some(k));
        d_values.push(Some(d));
        j_values.push(Some(3.0 * k - 2.0 * d));
    }

    KdjOutput {
        k: TimeSeries::from_options(k_values),
        d: TimeSeries::from_options(d_values),
        j: TimeSeries::from_options(j_values),
    }
}

/// Raw stochastic value for bar `i` over its trailing window.
fn rsv(highs: &[f64], lows: &[f64], close: f64, i: usize, period: usize) -> Option<f64> {
    if !close.is_finite() {
        return None;
    }
    let start = (i + 1).saturating_sub(period);

    let highest = highs[start..=i]
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let lowest = lows[start..=i]
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::INFINITY, f64::min);

    if !highest.is_finite() || !lowest.is_finite() {
        return None;
    }

    let span = highest - lowest;
    if span == 0.0 {
        return Some(0.0);
    }
    Some((close - lowest) / span * 100.0)
}
