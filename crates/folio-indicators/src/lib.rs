//! Indicator framework for technical analysis over daily bars.
//!
//! Every function here is pure and total: empty, short or malformed input
//! yields bar-aligned `None` slots instead of panicking.

pub mod bias;
pub mod indicator;
pub mod kdj;
pub mod macd;
pub mod moving_average;
pub mod volume;

pub use bias::{compute_bias, Bias, BiasConfig, BiasLine};
pub use indicator::{Indicator, IndicatorConfig, PriceSource};
pub use kdj::{compute_kdj, Kdj, KdjConfig, KdjOutput};
pub use macd::{compute_macd, Macd, MacdConfig, MacdOutput};
pub use moving_average::{ema, moving_averages, sma};
pub use volume::{map_volumes, VolumePoint};
