//! Chart composition for the portfolio dashboard.
//!
//! Turns daily bars, trades and signals into a declarative multi-panel chart
//! description plus a pixel height. Rendering is left to the consumer.

pub mod composer;
pub mod layout;
pub mod pipeline;
pub mod spec;
pub mod tooltip;

pub use composer::{compose, ChartInput, ComposedChart, MaPeriodsInput};
pub use layout::{active_panels, plan_layout, ChartLayout, Panel, PanelKey, Viewport};
pub use pipeline::{
    candle_values, parse_ma_periods, Annotations, Annotator, BiasPipeline, CandlePipeline, KdjPipeline,
    MacdPipeline, PanelContext, PanelPipeline, PriceEnvelope, ResolvedSignal, ResolvedTrade, VolumePipeline,
};
pub use spec::{
    AxisSpec, ChartSpec, DataZoomSpec, GridSpec, LegendSpec, MarkerDatum, SeriesCategory, SeriesData,
    SeriesKind, SeriesSpec,
};
pub use tooltip::{HoverItem, Tooltip, TooltipFormatter};
