//! Declarative chart description handed to the renderer.
//!
//! The structures serialize to the camelCase option layout the front-end
//! charting component consumes. Nothing here knows how to draw.

use folio_core::TimeSeries;
use serde::Serialize;

/// Complete chart description for one render.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub animation: bool,
    pub legend: Vec<LegendSpec>,
    pub grid: Vec<GridSpec>,
    pub x_axis: Vec<AxisSpec>,
    pub y_axis: Vec<AxisSpec>,
    pub data_zoom: Vec<DataZoomSpec>,
    pub axis_pointer: AxisPointerSpec,
    pub tooltip: TooltipSpec,
    pub series: Vec<SeriesSpec>,
}

impl ChartSpec {
    /// Series bound to the grid at `index`.
    pub fn series_on(&self, index: usize) -> impl Iterator<Item = &SeriesSpec> {
        self.series.iter().filter(move |s| s.x_axis_index == index)
    }

    /// First series with the given name.
    pub fn find_series(&self, name: &str) -> Option<&SeriesSpec> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Placement of one panel's plotting area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub top: u32,
    pub height: u32,
    pub left: u32,
    pub right: u32,
}

/// One legend row, drawn just above its panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendSpec {
    pub top: u32,
    pub left: u32,
    pub data: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Category,
    Value,
}

/// An x or y axis bound to one grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub grid_index: usize,
    /// Category labels (x axes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
    /// Auto-scale to the visible data instead of including zero.
    pub scale: bool,
    pub show_labels: bool,
    pub split_number: u32,
}

impl AxisSpec {
    /// Category x axis over the bar dates.
    pub fn category(grid_index: usize, dates: Vec<String>, show_labels: bool) -> Self {
        Self {
            kind: AxisKind::Category,
            grid_index,
            data: Some(dates),
            scale: true,
            show_labels,
            split_number: 5,
        }
    }

    /// Auto-scaled value y axis.
    pub fn value(grid_index: usize, split_number: u32) -> Self {
        Self {
            kind: AxisKind::Value,
            grid_index,
            data: None,
            scale: true,
            show_labels: true,
            split_number,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataZoomKind {
    Inside,
    Slider,
}

/// Zoom/pan control shared by every x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataZoomSpec {
    #[serde(rename = "type")]
    pub kind: DataZoomKind,
    pub x_axis_index: Vec<usize>,
    /// Window start in percent.
    pub start: f64,
    pub end: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Links the crosshair across panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisPointerSpec {
    pub link: Vec<AxisLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLink {
    pub x_axis_index: String,
}

/// Hover behavior; the formatting itself is done by `TooltipFormatter`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipSpec {
    pub trigger: String,
    pub axis_pointer: String,
    /// Name of the formatter callback the renderer must bind.
    pub formatter: String,
}

impl Default for TooltipSpec {
    fn default() -> Self {
        Self {
            trigger: "axis".to_string(),
            axis_pointer: "cross".to_string(),
            formatter: "hover".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Candlestick,
    Line,
    Bar,
    Scatter,
}

/// Semantic group of a series, used to section the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesCategory {
    #[default]
    Price,
    Volume,
    /// Moving averages.
    Trend,
    /// Cost and target reference lines.
    Position,
    /// MACD, KDJ and BIAS.
    Oscillator,
    Trade,
    Signal,
    Countdown,
}

/// One drawable series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    pub x_axis_index: usize,
    pub y_axis_index: usize,
    pub data: SeriesData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_rotate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_symbol: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelSpec>,
    pub z: u32,
    /// Whether the series gets a legend entry.
    #[serde(skip)]
    pub in_legend: bool,
    #[serde(skip)]
    pub category: SeriesCategory,
}

impl SeriesSpec {
    pub fn new(
        name: impl Into<String>,
        kind: SeriesKind,
        axis_index: usize,
        data: SeriesData,
        category: SeriesCategory,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            x_axis_index: axis_index,
            y_axis_index: axis_index,
            data,
            color: None,
            item_style: None,
            line_style: None,
            symbol: None,
            symbol_size: None,
            symbol_rotate: None,
            show_symbol: None,
            label: None,
            z: 2,
            in_legend: true,
            category,
        }
    }

    /// Plain line series without point symbols.
    pub fn line(
        name: impl Into<String>,
        axis_index: usize,
        values: TimeSeries<f64>,
        color: &str,
        category: SeriesCategory,
    ) -> Self {
        let mut series = Self::new(name, SeriesKind::Line, axis_index, SeriesData::Values(values), category);
        series.color = Some(color.to_string());
        series.show_symbol = Some(false);
        series.line_style = Some(LineStyle::solid(1.0));
        series
    }

    /// Numeric value of the series at a bar index, if it has one.
    ///
    /// Marker series are sparse and answer `None`.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        match &self.data {
            SeriesData::Values(values) => values.value(index),
            SeriesData::Bars(bars) => bars.get(index).and_then(|b| b.value),
            SeriesData::Candles(candles) => candles.get(index).map(|c| c[1]),
            SeriesData::Markers(_) => None,
        }
    }

    /// Number of data items.
    pub fn data_len(&self) -> usize {
        match &self.data {
            SeriesData::Values(values) => values.len(),
            SeriesData::Bars(bars) => bars.len(),
            SeriesData::Candles(candles) => candles.len(),
            SeriesData::Markers(markers) => markers.len(),
        }
    }
}

/// Series payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    /// `[open, close, low, high]` per bar.
    Candles(Vec<[f64; 4]>),
    /// One optional value per bar.
    Values(TimeSeries<f64>),
    /// One individually colored bar per bar.
    Bars(Vec<BarDatum>),
    /// Sparse positioned markers.
    Markers(Vec<MarkerDatum>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDatum {
    pub value: Option<f64>,
    pub item_style: ItemStyle,
}

/// A marker at `(date, y)`; `price` is the anchor price shown on hover.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDatum {
    pub value: (String, f64),
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelSpec>,
}

impl MarkerDatum {
    pub fn date(&self) -> &str {
        &self.value.0
    }

    pub fn y(&self) -> f64 {
        self.value.1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Candlestick fill for falling bars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color0: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color0: Option<String>,
}

impl ItemStyle {
    pub fn colored(color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub width: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl LineStyle {
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            kind: "solid".to_string(),
        }
    }

    pub fn dashed(width: f64) -> Self {
        Self {
            width,
            kind: "dashed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSpec {
    pub show: bool,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
}

impl LabelSpec {
    pub fn text(text: impl Into<String>, position: &str, color: &str) -> Self {
        Self {
            show: true,
            position: position.to_string(),
            color: Some(color.to_string()),
            formatter: Some(text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_serializes_camel_case() {
        let series = SeriesSpec::line(
            "MA5",
            1,
            TimeSeries::from_options(vec![None, Some(2.0)]),
            "#fff",
            SeriesCategory::Trend,
        );
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["xAxisIndex"], 1);
        assert_eq!(json["showSymbol"], false);
        assert_eq!(json["data"], serde_json::json!([null, 2.0]));
        assert!(json.get("category").is_none());
        assert!(json.get("label").is_none());
    }

    #[test]
    fn test_marker_serializes_as_coordinate() {
        let datum = MarkerDatum {
            value: ("20240102".to_string(), 9.5),
            price: 10.0,
            label: None,
        };
        let json = serde_json::to_value(&datum).unwrap();
        assert_eq!(json["value"], serde_json::json!(["20240102", 9.5]));
        assert_eq!(datum.date(), "20240102");
        assert_eq!(datum.y(), 9.5);
    }

    #[test]
    fn test_value_at() {
        let bars = SeriesSpec::new(
            "Volume",
            SeriesKind::Bar,
            1,
            SeriesData::Bars(vec![BarDatum {
                value: Some(3.0),
                item_style: ItemStyle::colored("#f00"),
            }]),
            SeriesCategory::Volume,
        );
        assert_eq!(bars.value_at(0), Some(3.0));
        assert_eq!(bars.value_at(1), None);
        assert_eq!(bars.data_len(), 1);
    }
}
