//! Traits for panel series pipelines.
//!
//! This module defines the [`PanelPipeline`] trait which provides a common
//! interface for every builder that turns bars into the series of one panel.

use folio_config::Config;
use folio_core::Bar;

use crate::layout::PanelKey;
use crate::spec::SeriesSpec;

/// Inputs shared by every panel pipeline during one render.
#[derive(Debug, Clone, Copy)]
pub struct PanelContext<'a> {
    pub bars: &'a [Bar],
    /// Closing prices, aligned with `bars`.
    pub closes: &'a [f64],
    /// Grid / axis index the series bind to.
    pub axis_index: usize,
    pub config: &'a Config,
}

impl<'a> PanelContext<'a> {
    pub fn new(bars: &'a [Bar], closes: &'a [f64], axis_index: usize, config: &'a Config) -> Self {
        Self {
            bars,
            closes,
            axis_index,
            config,
        }
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.closes.last().copied().filter(|c| c.is_finite())
    }
}

/// A builder for the series of one panel.
///
/// Pipelines are stateless between renders: all request data arrives through
/// the [`PanelContext`], and the returned series are bound to
/// `ctx.axis_index`.
pub trait PanelPipeline {
    /// Panel this pipeline fills.
    fn key(&self) -> PanelKey;

    /// Builds the panel's series in display order.
    fn build(&self, ctx: &PanelContext<'_>) -> Vec<SeriesSpec>;

    /// Y-axis split count for this panel.
    fn split_number(&self) -> u32 {
        3
    }
}
