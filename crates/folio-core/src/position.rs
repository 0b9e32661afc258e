//! Position-derived reference prices.

use serde::{Deserialize, Serialize};

/// Cost basis and target prices of a held position.
///
/// Thresholds are percentages (`20.0` means 20%). Explicit prices win over
/// thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceLines {
    pub avg_cost: Option<f64>,
    pub stop_gain_threshold: Option<f64>,
    pub stop_loss_threshold: Option<f64>,
    pub stop_gain_price: Option<f64>,
    pub stop_loss_price: Option<f64>,
}

impl ReferenceLines {
    pub fn with_cost(avg_cost: f64) -> Self {
        Self {
            avg_cost: Some(avg_cost),
            ..Self::default()
        }
    }

    /// Average cost, if present and usable.
    pub fn cost(&self) -> Option<f64> {
        self.avg_cost.filter(|c| c.is_finite() && *c > 0.0)
    }

    /// Target price on the gain side.
    pub fn stop_gain_target(&self) -> Option<f64> {
        finite(self.stop_gain_price).or_else(|| {
            let pct = finite(self.stop_gain_threshold)?;
            Some(self.cost()? * (1.0 + pct / 100.0))
        })
    }

    /// Target price on the loss side.
    pub fn stop_loss_target(&self) -> Option<f64> {
        finite(self.stop_loss_price).or_else(|| {
            let pct = finite(self.stop_loss_threshold)?;
            Some(self.cost()? * (1.0 - pct / 100.0))
        })
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}
