//! Panel layout planning.
//!
//! Decides which panels a security gets and how tall each one is. The planner
//! is a pure function of security type, viewport and [`LayoutConfig`]; callers
//! re-run it whenever any of those change.

use folio_config::LayoutConfig;
use folio_core::SecurityType;
use serde::{Deserialize, Serialize};

/// Stacked chart regions, in their fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKey {
    Price,
    Vol,
    Macd,
    Kdj,
    Bias,
}

impl PanelKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PanelKey::Price => "price",
            PanelKey::Vol => "vol",
            PanelKey::Macd => "macd",
            PanelKey::Kdj => "kdj",
            PanelKey::Bias => "bias",
        }
    }

    /// Fixed (non-fullscreen) height of this panel.
    fn fixed_height(self, config: &LayoutConfig) -> u32 {
        match self {
            PanelKey::Price => config.price_height,
            PanelKey::Vol => config.volume_height,
            PanelKey::Macd | PanelKey::Kdj | PanelKey::Bias => config.oscillator_height,
        }
    }
}

/// Which security types get a panel.
#[derive(Debug, Clone, Copy)]
enum Inclusion {
    Always,
    Except(&'static [&'static str]),
    Only(&'static [&'static str]),
}

impl Inclusion {
    fn admits(self, security: &SecurityType) -> bool {
        match self {
            Inclusion::Always => true,
            Inclusion::Except(types) => !types.iter().any(|t| security.is(t)),
            Inclusion::Only(types) => types.iter().any(|t| security.is(t)),
        }
    }
}

struct PanelRule {
    key: PanelKey,
    inclusion: Inclusion,
}

/// Panel membership rules, in display order.
const PANEL_RULES: [PanelRule; 5] = [
    PanelRule {
        key: PanelKey::Price,
        inclusion: Inclusion::Always,
    },
    PanelRule {
        key: PanelKey::Vol,
        inclusion: Inclusion::Except(&[SecurityType::FUND, SecurityType::CASH]),
    },
    PanelRule {
        key: PanelKey::Macd,
        inclusion: Inclusion::Except(&[SecurityType::CASH]),
    },
    PanelRule {
        key: PanelKey::Kdj,
        inclusion: Inclusion::Except(&[SecurityType::CASH]),
    },
    PanelRule {
        key: PanelKey::Bias,
        inclusion: Inclusion::Only(&[SecurityType::ETF, SecurityType::FUND]),
    },
];

/// Viewport metrics of the hosting page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Viewport height in pixels.
    pub height: u32,
    pub fullscreen: bool,
}

impl Viewport {
    pub fn windowed(height: u32) -> Self {
        Self {
            height,
            fullscreen: false,
        }
    }

    pub fn fullscreen(height: u32) -> Self {
        Self {
            height,
            fullscreen: true,
        }
    }
}

/// Geometry of one panel. `top` is the plotting area's offset from the top of
/// the chart; its legend row sits directly above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub key: PanelKey,
    pub height: u32,
    pub top: u32,
}

/// Planned panels plus the overall chart height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartLayout {
    pub panels: Vec<Panel>,
    pub total_height: u32,
}

impl ChartLayout {
    /// Index and geometry of a panel, if present.
    pub fn panel(&self, key: PanelKey) -> Option<(usize, &Panel)> {
        self.panels.iter().enumerate().find(|(_, p)| p.key == key)
    }

    pub fn keys(&self) -> Vec<PanelKey> {
        self.panels.iter().map(|p| p.key).collect()
    }

    pub fn contains(&self, key: PanelKey) -> bool {
        self.panels.iter().any(|p| p.key == key)
    }
}

/// Panels shown for a security type, in display order.
pub fn active_panels(security: &SecurityType) -> Vec<PanelKey> {
    PANEL_RULES
        .iter()
        .filter(|rule| rule.inclusion.admits(security))
        .map(|rule| rule.key)
        .collect()
}

/// Plans the vertical stacking of panels.
pub fn plan_layout(
    security: &SecurityType,
    viewport: Viewport,
    config: &LayoutConfig,
) -> ChartLayout {
    let keys = active_panels(security);
    if viewport.fullscreen {
        plan_fullscreen(&keys, viewport.height, config)
    } else {
        plan_fixed(&keys, config)
    }
}

fn plan_fixed(keys: &[PanelKey], config: &LayoutConfig) -> ChartLayout {
    let heights: Vec<u32> = keys.iter().map(|k| k.fixed_height(config)).collect();
    let panels = stack(keys, &heights, 0, config);

    let stacked: u32 = heights
        .iter()
        .map(|h| config.legend_height + h + config.panel_gap)
        .sum();
    let total_height = stacked.saturating_sub(config.panel_gap) + config.slider_height;

    ChartLayout {
        panels,
        total_height,
    }
}

fn plan_fullscreen(keys: &[PanelKey], viewport_height: u32, config: &LayoutConfig) -> ChartLayout {
    let available = viewport_height
        .saturating_sub(config.fullscreen_chrome)
        .max(config.fullscreen_min_height);

    let count = keys.len() as u32;
    let chrome = config.fullscreen_padding_top
        + config.slider_height
        + count * config.legend_height
        + count.saturating_sub(1) * config.panel_gap;
    let usable = available.saturating_sub(chrome);

    let mut heights = Vec::with_capacity(keys.len());
    if count <= 1 {
        heights.push(usable);
    } else {
        let price = (f64::from(usable) * config.fullscreen_price_ratio).floor() as u32;
        let price = price.min(usable);
        let rest = usable - price;
        let secondary = count - 1;
        let each = rest / secondary;
        heights.push(price);
        for i in 0..secondary {
            if i + 1 == secondary {
                // Last panel absorbs the rounding remainder.
                heights.push(rest - each * (secondary - 1));
            } else {
                heights.push(each);
            }
        }
    }

    let panels = stack(keys, &heights, config.fullscreen_padding_top, config);
    ChartLayout {
        panels,
        total_height: available,
    }
}

fn stack(keys: &[PanelKey], heights: &[u32], start: u32, config: &LayoutConfig) -> Vec<Panel> {
    let mut cursor = start;
    keys.iter()
        .zip(heights)
        .map(|(&key, &height)| {
            let top = cursor + config.legend_height;
            cursor = top + height + config.panel_gap;
            Panel { key, height, top }
        })
        .collect()
}
