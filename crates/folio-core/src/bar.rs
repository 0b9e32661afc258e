//! Daily bar data structures for OHLCV data.

use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data as delivered by the API.
///
/// `high` and `low` are optional and are not guaranteed to be ordered, so all
/// consumers go through [`Bar::range`] (or the [`Ohlcv`] trait) instead of
/// reading the raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date as `YYYYMMDD`.
    #[serde(deserialize_with = "crate::date::deserialize_date")]
    pub date: String,
    pub open: f64,
    pub close: f64,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(date: impl Into<String>, open: f64, close: f64) -> Self {
        Self {
            date: date.into(),
            open,
            close,
            high: None,
            low: None,
            volume: None,
        }
    }

    /// Sets the raw high/low pair (in any order).
    pub fn with_range(mut self, high: f64, low: f64) -> Self {
        self.high = Some(high);
        self.low = Some(low);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Returns the corrected `(low, high)` pair.
    ///
    /// Missing or non-finite extremes fall back to the body of the candle, and
    /// an inverted pair is swapped.
    pub fn range(&self) -> (f64, f64) {
        let body_high = self.open.max(self.close);
        let body_low = self.open.min(self.close);
        let high = self.high.filter(|v| v.is_finite()).unwrap_or(body_high);
        let low = self.low.filter(|v| v.is_finite()).unwrap_or(body_low);
        (low.min(high), low.max(high))
    }

    /// True when the bar closed at or above its open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Trait for types that provide corrected OHLCV data.
pub trait Ohlcv {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> Option<f64>;
}

impl Ohlcv for Bar {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.range().1
    }

    fn low(&self) -> f64 {
        self.range().0
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> Option<f64> {
        self.volume.filter(|v| v.is_finite())
    }
}

/// Result of resolving a date against an ascending bar list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLookup {
    /// Index of the resolved bar.
    pub index: usize,
    /// Whether the bar's date equals the requested date.
    pub exact: bool,
}

/// Finds the bar on `date`, or the nearest earlier bar.
///
/// Returns `None` when `date` precedes every bar (or the list is empty).
/// Dates are `YYYYMMDD`, so lexicographic order is chronological order.
pub fn locate_bar(bars: &[Bar], date: &str) -> Option<BarLookup> {
    let after = bars.partition_point(|b| b.date.as_str() <= date);
    if after == 0 {
        return None;
    }
    let index = after - 1;
    Some(BarLookup {
        index,
        exact: bars[index].date == date,
    })
}
