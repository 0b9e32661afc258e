//! Volume bars tagged with the direction of their candle.

use folio_core::{Bar, Ohlcv};
use serde::Serialize;

/// A volume value and the color of its bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePoint {
    pub value: Option<f64>,
    pub color: String,
}

/// Maps each bar to its volume, colored up (close >= open) or down.
pub fn map_volumes(bars: &[Bar], up_color: &str, down_color: &str) -> Vec<VolumePoint> {
    bars.iter()
        .map(|bar| VolumePoint {
            value: bar.volume(),
            color: if bar.is_up() { up_color } else { down_color }.to_string(),
        })
        .collect()
}
