//! Oscillator panel pipelines: MACD, KDJ and BIAS.

use folio_indicators::{Bias, BiasConfig, Indicator, Kdj, KdjConfig, Macd, MacdConfig, PriceSource};

use super::traits::{PanelContext, PanelPipeline};
use crate::layout::PanelKey;
use crate::spec::{BarDatum, ItemStyle, SeriesCategory, SeriesData, SeriesKind, SeriesSpec};

pub const MACD_HISTOGRAM_SERIES: &str = "MACD";
pub const DIF_SERIES: &str = "DIF";
pub const DEA_SERIES: &str = "DEA";

/// MACD histogram plus DIF/DEA lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacdPipeline;

impl PanelPipeline for MacdPipeline {
    fn key(&self) -> PanelKey {
        PanelKey::Macd
    }

    fn build(&self, ctx: &PanelContext<'_>) -> Vec<SeriesSpec> {
        let params = &ctx.config.indicators;
        let palette = &ctx.config.palette;
        let macd = Macd::new(MacdConfig {
            fast_period: params.macd_fast,
            slow_period: params.macd_slow,
            signal_period: params.macd_signal,
            price_source: PriceSource::Close,
        })
        .calculate_from(ctx.closes);

        let histogram = macd
            .macd
            .values()
            .iter()
            .map(|&value| {
                let rising = value.is_none_or(|v| v >= 0.0);
                let color = if rising { &palette.up_color } else { &palette.down_color };
                BarDatum {
                    value,
                    item_style: ItemStyle::colored(color),
                }
            })
            .collect();

        vec![
            SeriesSpec::new(
                MACD_HISTOGRAM_SERIES,
                SeriesKind::Bar,
                ctx.axis_index,
                SeriesData::Bars(histogram),
                SeriesCategory::Oscillator,
            ),
            SeriesSpec::line(DIF_SERIES, ctx.axis_index, macd.dif, &palette.dif_color, SeriesCategory::Oscillator),
            SeriesSpec::line(DEA_SERIES, ctx.axis_index, macd.dea, &palette.dea_color, SeriesCategory::Oscillator),
        ]
    }
}

/// K, D and J lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct KdjPipeline;

impl PanelPipeline for KdjPipeline {
    fn key(&self) -> PanelKey {
        PanelKey::Kdj
    }

    fn build(&self, ctx: &PanelContext<'_>) -> Vec<SeriesSpec> {
        let palette = &ctx.config.palette;
        let kdj = Kdj::new(KdjConfig {
            period: ctx.config.indicators.kdj_period,
        })
        .calculate(ctx.bars);

        vec![
            SeriesSpec::line("K", ctx.axis_index, kdj.k, &palette.k_color, SeriesCategory::Oscillator),
            SeriesSpec::line("D", ctx.axis_index, kdj.d, &palette.d_color, SeriesCategory::Oscillator),
            SeriesSpec::line("J", ctx.axis_index, kdj.j, &palette.j_color, SeriesCategory::Oscillator),
        ]
    }
}

/// One BIAS line per configured period.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiasPipeline;

impl PanelPipeline for BiasPipeline {
    fn key(&self) -> PanelKey {
        PanelKey::Bias
    }

    fn build(&self, ctx: &PanelContext<'_>) -> Vec<SeriesSpec> {
        let palette = &ctx.config.palette;
        Bias::new(BiasConfig {
            periods: ctx.config.indicators.bias_periods.clone(),
        })
        .calculate(ctx.bars)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            SeriesSpec::line(line.name(), ctx.axis_index, line.values, palette.bias_color(i), SeriesCategory::Oscillator)
        })
        .collect()
    }
}
