//! Volume panel pipeline.

use folio_indicators::map_volumes;

use super::traits::{PanelContext, PanelPipeline};
use crate::layout::PanelKey;
use crate::spec::{BarDatum, ItemStyle, SeriesCategory, SeriesData, SeriesKind, SeriesSpec};

pub const VOLUME_SERIES: &str = "Volume";

/// Pipeline for volume bars, colored by candle direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumePipeline;

impl PanelPipeline for VolumePipeline {
    fn key(&self) -> PanelKey {
        PanelKey::Vol
    }

    fn build(&self, ctx: &PanelContext<'_>) -> Vec<SeriesSpec> {
        let palette = &ctx.config.palette;
        let data = map_volumes(ctx.bars, &palette.up_color, &palette.down_color)
            .into_iter()
            .map(|point| BarDatum {
                value: point.value,
                item_style: ItemStyle::colored(&point.color),
            })
            .collect();

        vec![SeriesSpec::new(
            VOLUME_SERIES,
            SeriesKind::Bar,
            ctx.axis_index,
            SeriesData::Bars(data),
            SeriesCategory::Volume,
        )]
    }

    fn split_number(&self) -> u32 {
        2
    }
}
