//! Price panel pipeline: candles, moving averages and position reference lines.

use folio_core::{Bar, ReferenceLines, TimeSeries};
use folio_indicators::moving_averages;

use super::traits::{PanelContext, PanelPipeline};
use crate::layout::PanelKey;
use crate::spec::{ItemStyle, LineStyle, SeriesCategory, SeriesData, SeriesKind, SeriesSpec};

/// Longest moving average a user may request.
pub const MAX_MA_PERIOD: usize = 365;

pub const CANDLE_SERIES: &str = "Price";
pub const COST_SERIES: &str = "Cost";
pub const STOP_GAIN_SERIES: &str = "Stop Gain";
pub const STOP_LOSS_SERIES: &str = "Stop Loss";

/// Pipeline for the price panel.
#[derive(Debug, Clone, Default)]
pub struct CandlePipeline {
    pub ma_periods: Vec<usize>,
    pub reference: ReferenceLines,
}

impl CandlePipeline {
    pub fn new(ma_periods: Vec<usize>, reference: ReferenceLines) -> Self {
        Self {
            ma_periods,
            reference,
        }
    }

    fn candles(&self, ctx: &PanelContext<'_>) -> SeriesSpec {
        let palette = &ctx.config.palette;
        let data = ctx.bars.iter().map(candle_values).collect();
        let mut series = SeriesSpec::new(
            CANDLE_SERIES,
            SeriesKind::Candlestick,
            ctx.axis_index,
            SeriesData::Candles(data),
            SeriesCategory::Price,
        );
        series.item_style = Some(ItemStyle {
            color: Some(palette.up_color.clone()),
            color0: Some(palette.down_color.clone()),
            border_color: Some(palette.up_color.clone()),
            border_color0: Some(palette.down_color.clone()),
        });
        series
    }

    fn moving_average_lines(&self, ctx: &PanelContext<'_>) -> Vec<SeriesSpec> {
        moving_averages(ctx.closes, &self.ma_periods)
            .into_iter()
            .enumerate()
            .map(|(i, (period, values))| {
                SeriesSpec::line(
                    format!("MA{period}"),
                    ctx.axis_index,
                    values,
                    ctx.config.palette.ma_color(i),
                    SeriesCategory::Trend,
                )
            })
            .collect()
    }

    /// Cost line plus whichever target line matches the current P&L state.
    fn reference_lines(&self, ctx: &PanelContext<'_>) -> Vec<SeriesSpec> {
        let Some(cost) = self.reference.cost() else {
            return Vec::new();
        };
        let palette = &ctx.config.palette;
        let len = ctx.bars.len();

        let mut lines = vec![flat_line(COST_SERIES, cost, len, &palette.cost_color, ctx.axis_index)];

        let Some(latest) = ctx.latest_close() else {
            return lines;
        };
        if latest > cost {
            if let Some(target) = self.reference.stop_gain_target() {
                lines.push(flat_line(STOP_GAIN_SERIES, target, len, &palette.stop_gain_color, ctx.axis_index));
            }
        } else if let Some(target) = self.reference.stop_loss_target() {
            lines.push(flat_line(STOP_LOSS_SERIES, target, len, &palette.stop_loss_color, ctx.axis_index));
        }
        lines
    }
}

impl PanelPipeline for CandlePipeline {
    fn key(&self) -> PanelKey {
        PanelKey::Price
    }

    fn build(&self, ctx: &PanelContext<'_>) -> Vec<SeriesSpec> {
        let mut series = vec![self.candles(ctx)];
        series.extend(self.moving_average_lines(ctx));
        series.extend(self.reference_lines(ctx));
        series
    }

    fn split_number(&self) -> u32 {
        5
    }
}

/// `[open, close, low, high]` with the range corrected.
pub fn candle_values(bar: &Bar) -> [f64; 4] {
    let (low, high) = bar.range();
    [bar.open, bar.close, low, high]
}

fn flat_line(name: &str, value: f64, len: usize, color: &str, axis_index: usize) -> SeriesSpec {
    let mut series = SeriesSpec::line(
        name,
        axis_index,
        TimeSeries::from_values(&vec![value; len]),
        color,
        SeriesCategory::Position,
    );
    series.line_style = Some(LineStyle::dashed(1.0));
    series.z = 1;
    series
}

/// Parses a user-entered moving average list such as `"5, 10，20"`.
///
/// ASCII and full-width commas both separate entries. Entries that do not
/// parse or fall outside `1..=365` are dropped, as are repeats.
pub fn parse_ma_periods(text: &str) -> Vec<usize> {
    sanitize_ma_periods(
        text.split([',', '，'])
            .filter_map(|token| token.trim().parse::<usize>().ok()),
    )
}

/// Applies the range and de-duplication rules to an already numeric list.
pub fn sanitize_ma_periods(periods: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut kept = Vec::new();
    for period in periods {
        if (1..=MAX_MA_PERIOD).contains(&period) && !kept.contains(&period) {
            kept.push(period);
        }
    }
    kept
}
