//! Series pipelines, one per panel, plus the price-panel annotator.

pub mod annotation;
pub mod candle;
pub mod indicator;
pub mod traits;
pub mod volume;

pub use annotation::{Annotations, Annotator, PriceEnvelope, ResolvedSignal, ResolvedTrade};
pub use candle::{candle_values, parse_ma_periods, sanitize_ma_periods, CandlePipeline};
pub use indicator::{BiasPipeline, KdjPipeline, MacdPipeline};
pub use traits::{PanelContext, PanelPipeline};
pub use volume::VolumePipeline;
