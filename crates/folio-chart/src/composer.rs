//! Chart composition: layout, panel pipelines, annotations and tooltip.

use folio_config::Config;
use folio_core::{normalize_date, Bar, ReferenceLines, SecurityType, Signal, TradeEvent};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::layout::{plan_layout, ChartLayout, PanelKey, Viewport};
use crate::pipeline::{
    parse_ma_periods, sanitize_ma_periods, Annotations, Annotator, BiasPipeline, CandlePipeline,
    KdjPipeline, MacdPipeline, PanelContext, PanelPipeline, VolumePipeline,
};
use crate::spec::{
    AxisLink, AxisPointerSpec, AxisSpec, ChartSpec, DataZoomKind, DataZoomSpec, GridSpec, LegendSpec,
    SeriesSpec, TooltipSpec,
};
use crate::tooltip::{HoverItem, Tooltip, TooltipFormatter};

/// Moving average periods as typed by the user or as a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MaPeriodsInput {
    Text(String),
    /// Raw numbers; anything that is not a whole period in range is dropped.
    List(Vec<f64>),
}

impl MaPeriodsInput {
    pub fn periods(&self) -> Vec<usize> {
        match self {
            MaPeriodsInput::Text(text) => parse_ma_periods(text),
            MaPeriodsInput::List(list) => sanitize_ma_periods(
                list.iter()
                    .filter(|v| v.is_finite() && v.fract() == 0.0 && **v >= 1.0)
                    .map(|v| *v as usize),
            ),
        }
    }
}

/// Everything one render needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChartInput {
    pub bars: Vec<Bar>,
    pub trades: Vec<TradeEvent>,
    pub signals: Vec<Signal>,
    pub reference: Option<ReferenceLines>,
    #[serde(alias = "securityType", alias = "secType")]
    pub security_type: SecurityType,
    pub viewport: Viewport,
    /// Falls back to the configured periods when absent.
    #[serde(alias = "maPeriods", alias = "maList")]
    pub ma_periods: Option<MaPeriodsInput>,
}

/// Output of [`compose`].
#[derive(Debug, Clone)]
pub struct ComposedChart {
    pub spec: ChartSpec,
    pub total_height: u32,
    pub layout: ChartLayout,
    pub tooltip: TooltipFormatter,
}

impl ComposedChart {
    /// Tooltip for a date, using every series value the chart holds there.
    pub fn hover_at(&self, axis_date: &str) -> Tooltip {
        let hovered: Vec<HoverItem> = match self.tooltip.bar_index(axis_date) {
            Some(index) => self
                .spec
                .series
                .iter()
                .filter_map(|s| s.value_at(index).map(|v| HoverItem::new(s.name.clone(), Some(v))))
                .collect(),
            None => Vec::new(),
        };
        self.tooltip.format(axis_date, &hovered)
    }

    /// `{ "height": .., "option": .. }` for the renderer.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        Ok(json!({
            "height": self.total_height,
            "option": serde_json::to_value(&self.spec)?,
        }))
    }
}

/// Builds the full chart description for one render.
pub fn compose(input: &ChartInput, config: &Config) -> ComposedChart {
    let bars = ordered_bars(&input.bars);
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let dates: Vec<String> = bars.iter().map(|b| b.date.clone()).collect();

    let layout = plan_layout(&input.security_type, input.viewport, &config.layout);
    let ma_periods = match &input.ma_periods {
        Some(requested) => requested.periods(),
        None => sanitize_ma_periods(config.indicators.ma_periods.iter().copied()),
    };
    let candle = CandlePipeline::new(ma_periods, input.reference.clone().unwrap_or_default());

    let mut spec = ChartSpec {
        animation: false,
        tooltip: TooltipSpec::default(),
        ..ChartSpec::default()
    };
    let mut annotations = Annotations::default();
    let last_panel = layout.panels.len().saturating_sub(1);

    for (index, panel) in layout.panels.iter().enumerate() {
        let pipeline: &dyn PanelPipeline = match panel.key {
            PanelKey::Price => &candle,
            PanelKey::Vol => &VolumePipeline,
            PanelKey::Macd => &MacdPipeline,
            PanelKey::Kdj => &KdjPipeline,
            PanelKey::Bias => &BiasPipeline,
        };
        let ctx = PanelContext::new(&bars, &closes, index, config);
        let mut series = pipeline.build(&ctx);

        if pipeline.key() == PanelKey::Price {
            annotations = Annotator::new(&bars, config, index).annotate(&input.trades, &input.signals);
            series.append(&mut annotations.series);
        }
        debug!("Panel {} built {} series", panel.key.as_str(), series.len());

        spec.grid.push(GridSpec {
            top: panel.top,
            height: panel.height,
            left: config.layout.grid_left,
            right: config.layout.grid_right,
        });
        spec.x_axis.push(AxisSpec::category(index, dates.clone(), index == last_panel));
        spec.y_axis.push(AxisSpec::value(index, pipeline.split_number()));
        spec.series.extend(series);
        let legend = legend_entries(spec.series_on(index));
        spec.legend.push(LegendSpec {
            top: panel.top.saturating_sub(config.layout.legend_height),
            left: config.layout.grid_left,
            data: legend,
        });
    }

    spec.data_zoom = data_zoom(layout.panels.len(), bars.len(), config);
    spec.axis_pointer = AxisPointerSpec {
        link: vec![AxisLink {
            x_axis_index: "all".to_string(),
        }],
    };

    info!(
        "Composed {} chart: {} bars, {} panels, {} series, height {}",
        input.security_type,
        bars.len(),
        layout.panels.len(),
        spec.series.len(),
        layout.total_height
    );

    let tooltip = TooltipFormatter::new(
        bars,
        &spec,
        annotations.trades,
        annotations.signals,
        config.annotations.clone(),
    );

    ComposedChart {
        total_height: layout.total_height,
        spec,
        layout,
        tooltip,
    }
}

/// Bars with normalized dates in ascending order, duplicate dates removed
/// (last wins). Bars whose date cannot be read are dropped.
fn ordered_bars(bars: &[Bar]) -> Vec<Bar> {
    let mut normalized: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match normalize_date(&bar.date) {
            Some(date) => normalized.push(Bar {
                date,
                ..bar.clone()
            }),
            None => warn!("Dropping bar with unreadable date {:?}", bar.date),
        }
    }
    if normalized.windows(2).all(|w| w[0].date < w[1].date) {
        return normalized;
    }
    warn!("Bars are not strictly ascending by date; sorting and dropping duplicates");
    normalized.sort_by(|a, b| a.date.cmp(&b.date));
    let mut ordered: Vec<Bar> = Vec::with_capacity(normalized.len());
    for bar in normalized {
        match ordered.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => ordered.push(bar),
        }
    }
    ordered
}

fn legend_entries<'a>(series: impl Iterator<Item = &'a SeriesSpec>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for s in series.filter(|s| s.in_legend) {
        if !names.contains(&s.name) {
            names.push(s.name.clone());
        }
    }
    names
}

/// Inside + slider zoom over every x axis, opened on the most recent bars.
fn data_zoom(panels: usize, bars: usize, config: &Config) -> Vec<DataZoomSpec> {
    let axes: Vec<usize> = (0..panels).collect();
    let visible = config.layout.default_visible_bars;
    let start = if visible > 0 && bars > visible {
        100.0 - visible as f64 / bars as f64 * 100.0
    } else {
        0.0
    };

    vec![
        DataZoomSpec {
            kind: DataZoomKind::Inside,
            x_axis_index: axes.clone(),
            start,
            end: 100.0,
            bottom: None,
            height: None,
        },
        DataZoomSpec {
            kind: DataZoomKind::Slider,
            x_axis_index: axes,
            start,
            end: 100.0,
            bottom: Some(8),
            height: Some(config.layout.slider_height.saturating_sub(32).max(12)),
        },
    ]
}
