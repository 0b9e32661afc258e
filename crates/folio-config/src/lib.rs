//! Configuration management for the portfolio chart engine.
//!
//! Loads configuration from TOML files. Every section has defaults, so a file
//! only needs to name what it overrides. Signal styles from a file are merged
//! over the built-in table instead of replacing it.

pub mod style;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use style::{
    default_level_colors, default_signal_styles, default_trade_styles, MarkerPlacement,
    MarkerPosition, MarkerStyle,
};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub palette: PaletteConfig,
    pub indicators: IndicatorsConfig,
    pub annotations: AnnotationConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.annotations.fill_defaults();
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./chart.toml`
    /// 2. `~/.config/folio/chart.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        match Self::load(Self::default_path()) {
            Ok(config) => return config,
            Err(ConfigError::ReadError(_)) => {}
            Err(e) => log::warn!("Ignoring ./chart.toml: {e}"),
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("folio").join("chart.toml");
            match Self::load(&config_path) {
                Ok(config) => return config,
                Err(ConfigError::ReadError(_)) => {}
                Err(e) => log::warn!("Ignoring {}: {e}", config_path.display()),
            }
        }

        log::debug!("No chart config found, using defaults");
        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("chart.toml")
    }
}

/// Panel geometry in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub price_height: u32,
    pub volume_height: u32,
    /// Height of the MACD, KDJ and BIAS panels.
    pub oscillator_height: u32,
    /// Legend row reserved above each panel.
    pub legend_height: u32,
    /// Gap between two stacked panels.
    pub panel_gap: u32,
    /// Space reserved below the last panel for the range slider.
    pub slider_height: u32,
    /// Fullscreen: lower bound of the available height.
    pub fullscreen_min_height: u32,
    /// Fullscreen: viewport pixels taken by the surrounding page.
    pub fullscreen_chrome: u32,
    /// Fullscreen: padding above the first legend row.
    pub fullscreen_padding_top: u32,
    /// Fullscreen: share of the panel space given to the price panel.
    pub fullscreen_price_ratio: f64,
    /// Horizontal grid margins.
    pub grid_left: u32,
    pub grid_right: u32,
    /// Bars visible in the initial zoom window.
    pub default_visible_bars: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            price_height: 280,
            volume_height: 160,
            oscillator_height: 180,
            legend_height: 28,
            panel_gap: 20,
            slider_height: 56,
            fullscreen_min_height: 520,
            fullscreen_chrome: 108,
            fullscreen_padding_top: 12,
            fullscreen_price_ratio: 0.3,
            grid_left: 64,
            grid_right: 48,
            default_visible_bars: 120,
        }
    }
}

/// Colors for series and reference lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub up_color: String,
    pub down_color: String,
    /// Moving average colors, cycled by index.
    pub ma_colors: Vec<String>,
    pub dif_color: String,
    pub dea_color: String,
    pub k_color: String,
    pub d_color: String,
    pub j_color: String,
    /// BIAS line colors, cycled by index.
    pub bias_colors: Vec<String>,
    pub cost_color: String,
    pub stop_gain_color: String,
    pub stop_loss_color: String,
    pub countdown_color: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            up_color: "#ec0000".to_string(),
            down_color: "#00da3c".to_string(),
            ma_colors: ["#f5a623", "#4a90e2", "#bd10e0", "#7ed321", "#50e3c2", "#9013fe"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            dif_color: "#2f80ed".to_string(),
            dea_color: "#f2994a".to_string(),
            k_color: "#f2c94c".to_string(),
            d_color: "#56ccf2".to_string(),
            j_color: "#bb6bd9".to_string(),
            bias_colors: ["#f2994a", "#2f80ed", "#9b51e0"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            cost_color: "#607d8b".to_string(),
            stop_gain_color: "#e53935".to_string(),
            stop_loss_color: "#43a047".to_string(),
            countdown_color: "#8d6e63".to_string(),
        }
    }
}

impl PaletteConfig {
    /// Color for the `index`-th moving average.
    pub fn ma_color(&self, index: usize) -> &str {
        cycle(&self.ma_colors, index).unwrap_or("#999999")
    }

    /// Color for the `index`-th BIAS line.
    pub fn bias_color(&self, index: usize) -> &str {
        cycle(&self.bias_colors, index).unwrap_or("#999999")
    }
}

fn cycle(colors: &[String], index: usize) -> Option<&str> {
    if colors.is_empty() {
        return None;
    }
    Some(colors[index % colors.len()].as_str())
}

/// Indicator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorsConfig {
    /// Moving averages drawn when the caller passes none.
    pub ma_periods: Vec<usize>,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub kdj_period: usize,
    pub bias_periods: Vec<usize>,
}

impl Default for IndicatorsConfig {
    fn default() -> Self {
        Self {
            ma_periods: vec![5, 10, 20, 60],
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            kdj_period: 9,
            bias_periods: vec![20, 30, 60],
        }
    }
}

/// Trade and signal annotation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Marker gap as a fraction of the anchor bar's close.
    pub marker_gap_ratio: f64,
    /// Fixed-elevation buffer as a fraction of the price's order of magnitude.
    pub elevation_buffer_ratio: f64,
    /// Badge color for levels missing from `level_colors`.
    pub default_level_color: String,
    /// Styles keyed by upper-case signal type.
    pub signal_styles: HashMap<String, MarkerStyle>,
    /// Style for signal types missing from `signal_styles`.
    pub default_signal_style: MarkerStyle,
    /// Styles keyed by `BUY` / `SELL`.
    pub trade_styles: HashMap<String, MarkerStyle>,
    /// Badge colors keyed by upper-case signal level.
    pub level_colors: HashMap<String, String>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            marker_gap_ratio: 0.015,
            elevation_buffer_ratio: 0.05,
            default_level_color: "#757575".to_string(),
            signal_styles: default_signal_styles(),
            default_signal_style: MarkerStyle::default(),
            trade_styles: default_trade_styles(),
            level_colors: default_level_colors(),
        }
    }
}

impl AnnotationConfig {
    /// Style for a signal type; unknown types get the default style.
    pub fn signal_style(&self, key: &str) -> &MarkerStyle {
        self.signal_styles
            .get(key)
            .unwrap_or(&self.default_signal_style)
    }

    /// Style for a trade action key (`BUY` / `SELL`).
    pub fn trade_style(&self, key: &str) -> &MarkerStyle {
        self.trade_styles.get(key).unwrap_or(&self.default_signal_style)
    }

    /// Badge color for a signal level.
    pub fn level_color(&self, level: &str) -> &str {
        self.level_colors
            .get(&level.trim().to_ascii_uppercase())
            .map(String::as_str)
            .unwrap_or(self.default_level_color.as_str())
    }

    /// Re-adds built-in entries a file did not mention and upper-cases keys.
    fn fill_defaults(&mut self) {
        self.signal_styles = normalize_keys(std::mem::take(&mut self.signal_styles));
        self.trade_styles = normalize_keys(std::mem::take(&mut self.trade_styles));
        self.level_colors = normalize_keys(std::mem::take(&mut self.level_colors));

        for (key, style) in default_signal_styles() {
            self.signal_styles.entry(key).or_insert(style);
        }
        for (key, style) in default_trade_styles() {
            self.trade_styles.entry(key).or_insert(style);
        }
        for (key, color) in default_level_colors() {
            self.level_colors.entry(key).or_insert(color);
        }
    }
}

fn normalize_keys<V>(map: HashMap<String, V>) -> HashMap<String, V> {
    map.into_iter()
        .map(|(k, v)| (k.trim().to_ascii_uppercase(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layout.price_height, 280);
        assert_eq!(config.layout.volume_height, 160);
        assert_eq!(config.indicators.bias_periods, vec![20, 30, 60]);
        assert_eq!(config.annotations.signal_style("BUY").label, "Buy signal");
    }

    #[test]
    fn test_unknown_signal_falls_back() {
        let config = Config::default();
        let style = config.annotations.signal_style("MOON_PHASE");
        assert_eq!(style.symbol, "circle");
        assert_eq!(style.color, "#1e88e5");
        assert_eq!(style.position, MarkerPosition::Top);
    }

    #[test]
    fn test_level_color_lookup() {
        let config = Config::default();
        assert_eq!(config.annotations.level_color("high"), "#d32f2f");
        assert_eq!(config.annotations.level_color("extreme"), "#757575");
    }

    #[test]
    fn test_palette_cycles() {
        let palette = PaletteConfig::default();
        assert_eq!(palette.ma_color(0), palette.ma_color(6));
        let empty = PaletteConfig {
            ma_colors: Vec::new(),
            ..PaletteConfig::default()
        };
        assert_eq!(empty.ma_color(3), "#999999");
    }

    #[test]
    fn test_parse_toml_merges_styles() {
        let toml = r##"
[layout]
price_height = 300

[indicators]
ma_periods = [7, 14]

[annotations.signal_styles.golden_cross]
label = "Golden cross"
color = "#ffd700"
position = "bottom"
placement = "fixed_elevation"
"##;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.layout.price_height, 300);
        assert_eq!(config.layout.volume_height, 160);
        assert_eq!(config.indicators.ma_periods, vec![7, 14]);

        let cross = config.annotations.signal_style("GOLDEN_CROSS");
        assert_eq!(cross.label, "Golden cross");
        assert_eq!(cross.position, MarkerPosition::Bottom);
        assert_eq!(cross.placement, MarkerPlacement::FixedElevation);
        assert_eq!(cross.symbol, "circle");

        // Built-ins survive a partial table.
        assert_eq!(config.annotations.signal_style("SELL").label, "Sell signal");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.toml");
        let mut config = Config::default();
        config.layout.slider_height = 40;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.layout.slider_height, 40);
        assert_eq!(loaded.annotations, config.annotations);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here/chart.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }
}
