//! Trade and signal markers on the price panel.
//!
//! Every item is anchored to a bar: the bar on its date, or the nearest
//! earlier bar when the date is not a trading day. Items dated before the
//! first bar have no anchor and are dropped. Anchored items are re-stamped
//! with their bar's date so the tooltip can index them by axis value.

use std::collections::BTreeMap;

use folio_config::{Config, MarkerPlacement, MarkerPosition, MarkerStyle};
use folio_core::{locate_bar, normalize_date, Bar, Ohlcv, Signal, TradeEvent};
use log::debug;

use crate::spec::{ItemStyle, LabelSpec, MarkerDatum, SeriesCategory, SeriesData, SeriesKind, SeriesSpec};

/// Bars before a countdown signal that carry labels 1 through 8.
pub const COUNTDOWN_LEAD: usize = 8;

/// A trade anchored to a bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrade {
    /// The trade, with its date re-stamped to the anchor bar.
    pub event: TradeEvent,
    pub index: usize,
    /// Recorded price, or the bar's close when none was recorded.
    pub price: f64,
    /// Marker height.
    pub y: f64,
}

/// A signal anchored to a bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSignal {
    /// The signal, with its date re-stamped to the anchor bar.
    pub signal: Signal,
    /// Upper-case type key.
    pub key: String,
    pub index: usize,
    pub price: f64,
    pub y: f64,
}

/// Marker series plus the anchored items behind them.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    pub series: Vec<SeriesSpec>,
    pub trades: Vec<ResolvedTrade>,
    pub signals: Vec<ResolvedSignal>,
}

/// Visible price extremes, derived from all bars on every render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceEnvelope {
    pub min_low: f64,
    pub max_high: f64,
    /// Clearance for fixed-elevation markers, scaled to the price magnitude.
    pub buffer: f64,
}

impl PriceEnvelope {
    pub fn from_bars(bars: &[Bar], buffer_ratio: f64) -> Option<Self> {
        let (min_low, max_high) = bars
            .iter()
            .map(|b| b.range())
            .filter(|(low, high)| low.is_finite() && high.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, (low, high)| match acc {
                Some((lo, hi)) => Some((lo.min(low), hi.max(high))),
                None => Some((low, high)),
            })?;

        let magnitude = if max_high.abs() > 0.0 {
            10f64.powf(max_high.abs().log10().floor())
        } else {
            1.0
        };

        Some(Self {
            min_low,
            max_high,
            buffer: magnitude * buffer_ratio,
        })
    }
}

/// Positions markers for one render.
pub struct Annotator<'a> {
    bars: &'a [Bar],
    config: &'a Config,
    envelope: Option<PriceEnvelope>,
    axis_index: usize,
}

impl<'a> Annotator<'a> {
    pub fn new(bars: &'a [Bar], config: &'a Config, axis_index: usize) -> Self {
        Self {
            bars,
            config,
            envelope: PriceEnvelope::from_bars(bars, config.annotations.elevation_buffer_ratio),
            axis_index,
        }
    }

    pub fn envelope(&self) -> Option<PriceEnvelope> {
        self.envelope
    }

    /// Anchors every item and builds the marker series.
    ///
    /// Trade series come first (BUY, SELL), then one series per signal type in
    /// key order, then countdown label series.
    pub fn annotate(&self, trades: &[TradeEvent], signals: &[Signal]) -> Annotations {
        let resolved_trades = self.resolve_trades(trades);
        let resolved_signals = self.resolve_signals(signals);

        let mut series = Vec::new();

        let mut trade_groups: BTreeMap<&str, Vec<&ResolvedTrade>> = BTreeMap::new();
        for trade in &resolved_trades {
            trade_groups.entry(trade.event.action.key()).or_default().push(trade);
        }
        for (key, group) in trade_groups {
            let style = self.config.annotations.trade_style(key);
            let data = group
                .iter()
                .map(|t| marker(&t.event.date, t.y, t.price))
                .collect();
            series.push(self.marker_series(display_name(style, key), style, data, SeriesCategory::Trade));
        }

        let mut signal_groups: BTreeMap<&str, Vec<&ResolvedSignal>> = BTreeMap::new();
        for signal in &resolved_signals {
            signal_groups.entry(signal.key.as_str()).or_default().push(signal);
        }
        let mut countdowns = Vec::new();
        for (key, group) in &signal_groups {
            let style = self.config.annotations.signal_style(key);
            let data = group
                .iter()
                .map(|s| marker(&s.signal.date, s.y, s.price))
                .collect();
            let name = display_name(style, key);
            if style.countdown
                && let Some(labels) = self.countdown_series(&name, style, group)
            {
                countdowns.push(labels);
            }
            series.push(self.marker_series(name, style, data, SeriesCategory::Signal));
        }
        series.extend(countdowns);

        debug!(
            "Annotated {} trades and {} signals into {} series",
            resolved_trades.len(),
            resolved_signals.len(),
            series.len()
        );

        Annotations {
            series,
            trades: resolved_trades,
            signals: resolved_signals,
        }
    }

    pub fn resolve_trades(&self, trades: &[TradeEvent]) -> Vec<ResolvedTrade> {
        trades
            .iter()
            .filter_map(|trade| {
                let Some(date) = normalize_date(&trade.date) else {
                    debug!("Dropping {} trade: unreadable date {:?}", trade.action.key(), trade.date);
                    return None;
                };
                let Some((index, price)) = self.anchor(&date, trade.price) else {
                    debug!("Dropping {} trade on {}: no bar on or before it", trade.action.key(), trade.date);
                    return None;
                };
                let style = self.config.annotations.trade_style(trade.action.key());
                let mut event = trade.clone();
                event.date = self.bars[index].date.clone();
                Some(ResolvedTrade {
                    event,
                    index,
                    price,
                    y: self.marker_y(index, style),
                })
            })
            .collect()
    }

    pub fn resolve_signals(&self, signals: &[Signal]) -> Vec<ResolvedSignal> {
        signals
            .iter()
            .filter_map(|signal| {
                let Some(date) = normalize_date(&signal.date) else {
                    debug!("Dropping {} signal: unreadable date {:?}", signal.kind, signal.date);
                    return None;
                };
                let Some((index, price)) = self.anchor(&date, signal.price) else {
                    debug!("Dropping {} signal on {}: no bar on or before it", signal.kind, signal.date);
                    return None;
                };
                let key = signal.type_key();
                let style = self.config.annotations.signal_style(&key);
                let mut signal = signal.clone();
                signal.date = self.bars[index].date.clone();
                Some(ResolvedSignal {
                    signal,
                    key,
                    index,
                    price,
                    y: self.marker_y(index, style),
                })
            })
            .collect()
    }

    /// Anchor bar index and price for an item dated `YYYYMMDD`.
    fn anchor(&self, date: &str, price: Option<f64>) -> Option<(usize, f64)> {
        let lookup = locate_bar(self.bars, date)?;
        let close = self.bars[lookup.index].close;
        let price = price.filter(|p| p.is_finite()).unwrap_or(close);
        Some((lookup.index, price))
    }

    /// Marker height for a style anchored at bar `index`.
    pub fn marker_y(&self, index: usize, style: &MarkerStyle) -> f64 {
        match (style.placement, self.envelope) {
            (MarkerPlacement::FixedElevation, Some(envelope)) => {
                let offset = envelope.buffer * style.offset_multiplier;
                match style.position {
                    MarkerPosition::Top => envelope.max_high + offset,
                    MarkerPosition::Bottom => envelope.min_low - offset,
                }
            }
            _ => self.bar_offset_y(index, style),
        }
    }

    /// Just outside the bar's high or low.
    fn bar_offset_y(&self, index: usize, style: &MarkerStyle) -> f64 {
        let bar = &self.bars[index];
        let gap = bar.close.abs() * self.config.annotations.marker_gap_ratio;
        let offset = gap * style.offset_multiplier;
        match style.position {
            MarkerPosition::Top => bar.high() + offset,
            MarkerPosition::Bottom => bar.low() - offset,
        }
    }

    fn marker_series(
        &self,
        name: String,
        style: &MarkerStyle,
        data: Vec<MarkerDatum>,
        category: SeriesCategory,
    ) -> SeriesSpec {
        let mut series = SeriesSpec::new(name, SeriesKind::Scatter, self.axis_index, SeriesData::Markers(data), category);
        series.color = Some(style.color.clone());
        series.item_style = Some(ItemStyle::colored(&style.color));
        series.symbol = Some(style.symbol.clone());
        series.symbol_size = Some(style.symbol_size);
        series.symbol_rotate = Some(style.rotate);
        series.z = 5;
        series
    }

    /// Labels 1..8 on the bars before each signal and 9 on the signal bar.
    ///
    /// Signals with fewer than eight loaded bars before them get no countdown.
    fn countdown_series(&self, name: &str, style: &MarkerStyle, group: &[&ResolvedSignal]) -> Option<SeriesSpec> {
        let color = &self.config.palette.countdown_color;
        let label_position = match style.position {
            MarkerPosition::Top => "top",
            MarkerPosition::Bottom => "bottom",
        };

        let mut data = Vec::new();
        for signal in group {
            if signal.index < COUNTDOWN_LEAD {
                debug!("Skipping countdown for {} on {}: not enough history", signal.key, signal.signal.date);
                continue;
            }
            let first = signal.index - COUNTDOWN_LEAD;
            for (step, index) in (first..=signal.index).enumerate() {
                let bar = &self.bars[index];
                let mut datum = marker(&bar.date, self.bar_offset_y(index, style), bar.close);
                datum.label = Some(LabelSpec::text((step + 1).to_string(), label_position, color));
                data.push(datum);
            }
        }
        if data.is_empty() {
            return None;
        }

        let mut series = SeriesSpec::new(
            format!("{name} countdown"),
            SeriesKind::Scatter,
            self.axis_index,
            SeriesData::Markers(data),
            SeriesCategory::Countdown,
        );
        series.symbol = Some("none".to_string());
        series.symbol_size = Some(0.0);
        series.color = Some(color.clone());
        series.in_legend = false;
        series.z = 6;
        Some(series)
    }
}

fn marker(date: &str, y: f64, price: f64) -> MarkerDatum {
    MarkerDatum {
        value: (date.to_string(), y),
        price,
        label: None,
    }
}

/// Legend name: the style label, or the raw key for unlabeled styles.
fn display_name(style: &MarkerStyle, key: &str) -> String {
    if style.label.is_empty() {
        key.to_string()
    } else {
        style.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::TradeAction;

    fn bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 20.0 + i as f64;
                Bar::new(format!("202403{:02}", i + 1), close - 0.5, close).with_range(close + 0.5, close - 1.0)
            })
            .collect()
    }

    fn markers(series: &SeriesSpec) -> &[MarkerDatum] {
        match &series.data {
            SeriesData::Markers(m) => m,
            _ => panic!("expected marker data"),
        }
    }

    #[test]
    fn test_exact_anchor_uses_recorded_price() {
        let data = bars(5);
        let config = Config::default();
        let annotator = Annotator::new(&data, &config, 0);
        let trades = vec![TradeEvent::new("20240302", TradeAction::Buy, Some(20.7))];
        let resolved = annotator.resolve_trades(&trades);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].index, 1);
        assert_eq!(resolved[0].price, 20.7);
    }

    #[test]
    fn test_fallback_anchor_restamps_date() {
        let data = bars(5);
        let config = Config::default();
        let annotator = Annotator::new(&data, &config, 0);
        let signals = vec![Signal::new("20240306", "BUY"), Signal::new("20240229", "BUY")];
        let resolved = annotator.resolve_signals(&signals);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].signal.date, "20240305");
        assert_eq!(resolved[0].index, 4);
        assert_eq!(resolved[0].price, 24.0);
    }

    #[test]
    fn test_dashed_dates_anchor_like_compact_ones() {
        let data = bars(5);
        let config = Config::default();
        let annotator = Annotator::new(&data, &config, 0);
        let resolved = annotator.resolve_signals(&[Signal::new("2024-03-05", "BUY")]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].index, 4);
        assert_eq!(resolved[0].signal.date, "20240305");

        let trades = annotator.resolve_trades(&[TradeEvent::new("2024-03-02 10:15:00", TradeAction::Sell, None)]);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].index, 1);
    }

    #[test]
    fn test_unreadable_dates_are_dropped() {
        let data = bars(5);
        let config = Config::default();
        let annotator = Annotator::new(&data, &config, 0);
        assert!(annotator.resolve_signals(&[Signal::new("n/a", "SELL")]).is_empty());
        assert!(annotator.resolve_trades(&[TradeEvent::new("", TradeAction::Buy, None)]).is_empty());
    }

    #[test]
    fn test_bottom_marker_below_low() {
        let data = bars(5);
        let config = Config::default();
        let annotator = Annotator::new(&data, &config, 0);
        let style = config.annotations.signal_style("BUY");
        let resolved = annotator.resolve_signals(&[Signal::new("20240303", "buy")]);

        let bar = &data[2];
        let gap = bar.close * config.annotations.marker_gap_ratio;
        let expected = bar.low() - gap * style.offset_multiplier;
        assert!((resolved[0].y - expected).abs() < 1e-12);
        assert!(resolved[0].y < bar.low());
    }

    #[test]
    fn test_top_marker_above_high() {
        let data = bars(5);
        let config = Config::default();
        let annotator = Annotator::new(&data, &config, 0);
        let resolved = annotator.resolve_signals(&[Signal::new("20240303", "RISK_ALERT")]);
        assert!(resolved[0].y > data[2].high());
    }

    #[test]
    fn test_fixed_elevation_uses_envelope() {
        let data = bars(10);
        let config = Config::default();
        let annotator = Annotator::new(&data, &config, 0);
        let envelope = annotator.envelope().unwrap();
        assert_eq!(envelope.max_high, 29.5);
        assert_eq!(envelope.min_low, 19.0);
        assert!((envelope.buffer - 0.5).abs() < 1e-12);

        let signals = vec![Signal::new("20240302", "ZIG_SELL"), Signal::new("20240309", "SENTIMENT_LOW")];
        let resolved = annotator.resolve_signals(&signals);
        assert!((resolved[0].y - 30.0).abs() < 1e-12);
        assert!((resolved[1].y - (19.0 - 0.5 * 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_type_gets_default_style() {
        let data = bars(3);
        let config = Config::default();
        let annotations = Annotator::new(&data, &config, 0).annotate(&[], &[Signal::new("20240302", "mystery")]);

        assert_eq!(annotations.series.len(), 1);
        let series = &annotations.series[0];
        assert_eq!(series.name, "MYSTERY");
        assert_eq!(series.symbol.as_deref(), Some("circle"));
        assert_eq!(series.color.as_deref(), Some("#1e88e5"));
        assert!(markers(series)[0].y() > data[1].high());
    }

    #[test]
    fn test_signals_grouped_by_type() {
        let data = bars(5);
        let config = Config::default();
        let signals = vec![
            Signal::new("20240302", "SELL"),
            Signal::new("20240303", "BUY"),
            Signal::new("20240304", "SELL"),
        ];
        let trades = vec![TradeEvent::new("20240301", TradeAction::Sell, None)];
        let annotations = Annotator::new(&data, &config, 0).annotate(&trades, &signals);

        let names: Vec<&str> = annotations.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Sold", "Buy signal", "Sell signal"]);
        assert_eq!(markers(&annotations.series[2]).len(), 2);
        assert_eq!(annotations.trades[0].price, 20.0);
        assert!(annotations.series.iter().all(|s| s.category != SeriesCategory::Countdown));
    }

    #[test]
    fn test_countdown_needs_eight_prior_bars() {
        let data = bars(12);
        let config = Config::default();
        let annotator = Annotator::new(&data, &config, 0);

        let short = annotator.annotate(&[], &[Signal::new("20240308", "STRUCTURE_BUY")]);
        assert!(short.series.iter().all(|s| s.category != SeriesCategory::Countdown));

        let full = annotator.annotate(&[], &[Signal::new("20240310", "structure_buy")]);
        let countdown = full
            .series
            .iter()
            .find(|s| s.category == SeriesCategory::Countdown)
            .unwrap();
        assert!(!countdown.in_legend);

        let labels: Vec<&str> = markers(countdown)
            .iter()
            .map(|m| m.label.as_ref().and_then(|l| l.formatter.as_deref()).unwrap())
            .collect();
        assert_eq!(labels, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        assert_eq!(markers(countdown)[0].date(), "20240302");
        assert_eq!(markers(countdown)[8].date(), "20240310");
        assert!(markers(countdown).iter().zip(&data[1..10]).all(|(m, b)| m.y() < b.low()));
    }

    #[test]
    fn test_empty_bars_drop_everything() {
        let config = Config::default();
        let annotator = Annotator::new(&[], &config, 0);
        assert!(annotator.envelope().is_none());
        let annotations = annotator.annotate(
            &[TradeEvent::new("20240101", TradeAction::Buy, Some(1.0))],
            &[Signal::new("20240101", "BUY")],
        );
        assert!(annotations.series.is_empty());
        assert!(annotations.trades.is_empty());
        assert!(annotations.signals.is_empty());
    }
}
