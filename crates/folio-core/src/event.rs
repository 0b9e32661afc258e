//! Trade executions and advisory signals.

use serde::{Deserialize, Serialize};

/// Side of a recorded execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    #[serde(alias = "buy", alias = "Buy")]
    Buy,
    #[serde(alias = "sell", alias = "Sell")]
    Sell,
}

impl TradeAction {
    /// Upper-case key used by the trade style table.
    pub fn key(self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }
}

/// An actual BUY/SELL execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    #[serde(deserialize_with = "crate::date::deserialize_date_lenient")]
    pub date: String,
    pub action: TradeAction,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
}

impl TradeEvent {
    pub fn new(date: impl Into<String>, action: TradeAction, price: Option<f64>) -> Self {
        Self {
            date: date.into(),
            action,
            price,
            quantity: None,
        }
    }
}

/// A typed, dated advisory annotation.
///
/// `kind` is an open vocabulary: unknown values are rendered with a default
/// style rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(deserialize_with = "crate::date::deserialize_date_lenient")]
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub level: Option<String>,
}

impl Signal {
    pub fn new(date: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            kind: kind.into(),
            price: None,
            message: String::new(),
            level: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Normalized lookup key for the style table.
    pub fn type_key(&self) -> String {
        self.kind.trim().to_ascii_uppercase()
    }
}
