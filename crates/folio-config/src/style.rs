//! Marker style tables for trades and signals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which side of the candle a marker sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerPosition {
    #[default]
    Top,
    Bottom,
}

/// How a marker's vertical position is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPlacement {
    /// Just outside the anchor bar's high or low.
    #[default]
    Bar,
    /// Just outside the whole visible price range.
    FixedElevation,
}

/// Visual style of one marker type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Legend and tooltip label.
    pub label: String,
    pub color: String,
    /// Renderer symbol name (`arrow`, `triangle`, `pin`, `circle`, `diamond`, `rect`).
    pub symbol: String,
    pub symbol_size: f64,
    /// Symbol rotation in degrees.
    pub rotate: f64,
    /// Scales the gap between the marker and its anchor.
    pub offset_multiplier: f64,
    pub position: MarkerPosition,
    pub placement: MarkerPlacement,
    /// Emit a 1..9 countdown over the preceding bars.
    pub countdown: bool,
    /// Emoji prefix used in tooltips.
    pub emoji: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            label: String::new(),
            color: "#1e88e5".to_string(),
            symbol: "circle".to_string(),
            symbol_size: 10.0,
            rotate: 0.0,
            offset_multiplier: 1.0,
            position: MarkerPosition::Top,
            placement: MarkerPlacement::Bar,
            countdown: false,
            emoji: "🔵".to_string(),
        }
    }
}

impl MarkerStyle {
    fn new(label: &str, color: &str, symbol: &str, position: MarkerPosition) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
            symbol: symbol.to_string(),
            position,
            rotate: match position {
                MarkerPosition::Top => 180.0,
                MarkerPosition::Bottom => 0.0,
            },
            ..Self::default()
        }
    }

    fn offset(mut self, multiplier: f64) -> Self {
        self.offset_multiplier = multiplier;
        self
    }

    fn fixed(mut self) -> Self {
        self.placement = MarkerPlacement::FixedElevation;
        self
    }

    fn countdown(mut self) -> Self {
        self.countdown = true;
        self
    }

    fn emoji(mut self, emoji: &str) -> Self {
        self.emoji = emoji.to_string();
        self
    }

    fn upright(mut self) -> Self {
        self.rotate = 0.0;
        self
    }
}

/// Built-in signal styles keyed by upper-case signal type.
pub fn default_signal_styles() -> HashMap<String, MarkerStyle> {
    use MarkerPosition::{Bottom, Top};

    let mut styles = HashMap::new();
    styles.insert(
        "BUY".to_string(),
        MarkerStyle::new("Buy signal", "#e53935", "arrow", Bottom).offset(1.0).emoji("📈"),
    );
    styles.insert(
        "SELL".to_string(),
        MarkerStyle::new("Sell signal", "#43a047", "arrow", Top).offset(1.0).emoji("📉"),
    );
    styles.insert(
        "STRUCTURE_BUY".to_string(),
        MarkerStyle::new("Structure buy", "#d81b60", "triangle", Bottom)
            .offset(1.1)
            .countdown()
            .emoji("🔺"),
    );
    styles.insert(
        "STRUCTURE_SELL".to_string(),
        MarkerStyle::new("Structure sell", "#00897b", "triangle", Top)
            .offset(1.1)
            .countdown()
            .emoji("🔻"),
    );
    styles.insert(
        "ZIG_BUY".to_string(),
        MarkerStyle::new("Zig entry", "#fb8c00", "pin", Bottom).offset(1.0).fixed().emoji("🟠"),
    );
    styles.insert(
        "ZIG_SELL".to_string(),
        MarkerStyle::new("Zig exit", "#8e24aa", "pin", Top).offset(1.0).fixed().emoji("🟣"),
    );
    styles.insert(
        "SENTIMENT_HIGH".to_string(),
        MarkerStyle::new("Sentiment high", "#f4511e", "diamond", Top)
            .offset(2.0)
            .fixed()
            .upright()
            .emoji("🔥"),
    );
    styles.insert(
        "SENTIMENT_LOW".to_string(),
        MarkerStyle::new("Sentiment low", "#3949ab", "diamond", Bottom)
            .offset(2.0)
            .fixed()
            .emoji("🧊"),
    );
    styles.insert(
        "RISK_ALERT".to_string(),
        MarkerStyle::new("Risk alert", "#ff6f00", "triangle", Top)
            .offset(0.8)
            .upright()
            .emoji("⚠️"),
    );
    styles
}

/// Built-in trade styles keyed by `BUY` / `SELL`.
pub fn default_trade_styles() -> HashMap<String, MarkerStyle> {
    let mut styles = HashMap::new();
    styles.insert(
        "BUY".to_string(),
        MarkerStyle::new("Bought", "#c62828", "pin", MarkerPosition::Bottom)
            .offset(0.9)
            .upright()
            .emoji("🟥"),
    );
    styles.insert(
        "SELL".to_string(),
        MarkerStyle::new("Sold", "#2e7d32", "pin", MarkerPosition::Top)
            .offset(0.9)
            .emoji("🟩"),
    );
    styles
}

/// Badge colors for signal levels.
pub fn default_level_colors() -> HashMap<String, String> {
    [("HIGH", "#d32f2f"), ("MEDIUM", "#f57c00"), ("LOW", "#388e3c")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
