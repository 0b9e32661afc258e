//! Hover summary for one axis position.
//!
//! The renderer hands back the hovered date and the values it is showing; the
//! formatter rebuilds the OHLC block from its own copy of the bars, so the
//! summary never depends on the renderer's series order.

use std::collections::HashMap;
use std::fmt::Write;

use folio_config::AnnotationConfig;
use folio_core::{format_date, normalize_date, weekday_label, Bar, Ohlcv, TradeAction};
use serde::{Deserialize, Serialize};

use crate::pipeline::{ResolvedSignal, ResolvedTrade};
use crate::spec::{ChartSpec, SeriesCategory};

/// One value the renderer reports under the crosshair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverItem {
    pub series_name: String,
    pub value: Option<f64>,
}

impl HoverItem {
    pub fn new(series_name: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            series_name: series_name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcBlock {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Change against the previous bar's close.
    pub change: Option<f64>,
    /// Change in percent.
    pub change_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipLine {
    pub label: String,
    pub color: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipGroup {
    pub title: &'static str,
    pub lines: Vec<TooltipLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeEntry {
    pub emoji: String,
    pub label: String,
    pub color: String,
    pub action: TradeAction,
    pub price: f64,
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelBadge {
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalEntry {
    pub emoji: String,
    pub label: String,
    pub color: String,
    pub price: f64,
    pub message: String,
    pub level: Option<LevelBadge>,
}

/// Structured hover summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub weekday: Option<String>,
    pub ohlc: Option<OhlcBlock>,
    pub volume: Option<f64>,
    /// Non-empty groups in Trend, Position, Technical order.
    pub groups: Vec<TooltipGroup>,
    pub trades: Vec<TradeEntry>,
    pub signals: Vec<SignalEntry>,
}

#[derive(Debug, Clone)]
struct SeriesMeta {
    category: SeriesCategory,
    color: String,
}

const GROUPS: [(SeriesCategory, &str); 3] = [
    (SeriesCategory::Trend, "Trend"),
    (SeriesCategory::Position, "Position"),
    (SeriesCategory::Oscillator, "Technical"),
];

fn grouped(category: SeriesCategory) -> bool {
    GROUPS.iter().any(|(c, _)| *c == category)
}

/// Formats hover summaries for one composed chart.
///
/// Owns copies of everything it needs, so it can outlive the request that
/// built it.
#[derive(Debug, Clone)]
pub struct TooltipFormatter {
    bars: Vec<Bar>,
    by_date: HashMap<String, usize>,
    series: HashMap<String, SeriesMeta>,
    trades: HashMap<String, Vec<ResolvedTrade>>,
    signals: HashMap<String, Vec<ResolvedSignal>>,
    annotations: AnnotationConfig,
}

impl TooltipFormatter {
    pub fn new(
        bars: Vec<Bar>,
        spec: &ChartSpec,
        trades: Vec<ResolvedTrade>,
        signals: Vec<ResolvedSignal>,
        annotations: AnnotationConfig,
    ) -> Self {
        let by_date = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date.clone(), i))
            .collect();

        // Only grouped series are looked up by name; marker series may reuse
        // a line's name and must not shadow it.
        let mut series: HashMap<String, SeriesMeta> = HashMap::new();
        for s in spec.series.iter().filter(|s| grouped(s.category)) {
            let color = s
                .color
                .clone()
                .or_else(|| s.item_style.as_ref().and_then(|i| i.color.clone()))
                .unwrap_or_default();
            series.entry(s.name.clone()).or_insert(SeriesMeta {
                category: s.category,
                color,
            });
        }

        let mut trades_by_date: HashMap<String, Vec<ResolvedTrade>> = HashMap::new();
        for trade in trades {
            trades_by_date.entry(trade.event.date.clone()).or_default().push(trade);
        }
        let mut signals_by_date: HashMap<String, Vec<ResolvedSignal>> = HashMap::new();
        for signal in signals {
            signals_by_date.entry(signal.signal.date.clone()).or_default().push(signal);
        }

        Self {
            bars,
            by_date,
            series,
            trades: trades_by_date,
            signals: signals_by_date,
            annotations,
        }
    }

    /// Bar index for an axis date in any accepted date format.
    pub fn bar_index(&self, axis_date: &str) -> Option<usize> {
        let date = normalize_date(axis_date)?;
        self.by_date.get(&date).copied()
    }

    /// Builds the summary for the hovered date.
    ///
    /// Hovered items naming unknown series, or carrying no value, are skipped.
    pub fn format(&self, axis_date: &str, hovered: &[HoverItem]) -> Tooltip {
        let date = normalize_date(axis_date).unwrap_or_else(|| axis_date.trim().to_string());
        let index = self.by_date.get(&date).copied();

        let ohlc = index.map(|i| self.ohlc(i));
        let volume = index.and_then(|i| self.bars[i].volume());

        Tooltip {
            date: format_date(&date),
            weekday: weekday_label(&date),
            ohlc,
            volume,
            groups: self.groups(hovered),
            trades: self.trade_entries(&date),
            signals: self.signal_entries(&date),
        }
    }

    fn ohlc(&self, index: usize) -> OhlcBlock {
        let bar = &self.bars[index];
        let previous = index
            .checked_sub(1)
            .map(|i| self.bars[i].close)
            .filter(|c| c.is_finite());
        let change = previous.map(|p| bar.close - p);
        let change_pct = previous
            .filter(|p| *p != 0.0)
            .map(|p| (bar.close - p) / p * 100.0);

        OhlcBlock {
            open: bar.open,
            high: bar.high(),
            low: bar.low(),
            close: bar.close,
            change,
            change_pct,
        }
    }

    fn groups(&self, hovered: &[HoverItem]) -> Vec<TooltipGroup> {
        GROUPS
            .iter()
            .filter_map(|&(category, title)| {
                let lines: Vec<TooltipLine> = hovered
                    .iter()
                    .filter_map(|item| {
                        let meta = self.series.get(&item.series_name)?;
                        let value = item.value.filter(|v| v.is_finite())?;
                        (meta.category == category).then(|| TooltipLine {
                            label: item.series_name.clone(),
                            color: meta.color.clone(),
                            value,
                        })
                    })
                    .collect();
                (!lines.is_empty()).then_some(TooltipGroup { title, lines })
            })
            .collect()
    }

    fn trade_entries(&self, date: &str) -> Vec<TradeEntry> {
        self.trades
            .get(date)
            .map(|trades| {
                trades
                    .iter()
                    .map(|t| {
                        let style = self.annotations.trade_style(t.event.action.key());
                        TradeEntry {
                            emoji: style.emoji.clone(),
                            label: style.label.clone(),
                            color: style.color.clone(),
                            action: t.event.action,
                            price: t.price,
                            quantity: t.event.quantity.filter(|q| q.is_finite()),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn signal_entries(&self, date: &str) -> Vec<SignalEntry> {
        self.signals
            .get(date)
            .map(|signals| {
                signals
                    .iter()
                    .map(|s| {
                        let style = self.annotations.signal_style(&s.key);
                        let label = if style.label.is_empty() {
                            s.key.clone()
                        } else {
                            style.label.clone()
                        };
                        let level = s
                            .signal
                            .level
                            .as_deref()
                            .map(str::trim)
                            .filter(|l| !l.is_empty())
                            .map(|l| LevelBadge {
                                text: l.to_ascii_uppercase(),
                                color: self.annotations.level_color(l).to_string(),
                            });
                        SignalEntry {
                            emoji: style.emoji.clone(),
                            label,
                            color: style.color.clone(),
                            price: s.price,
                            message: s.signal.message.clone(),
                            level,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Tooltip {
    /// Renders the summary as the HTML fragment the renderer displays.
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        let _ = write!(html, "<div class=\"tt-date\"><b>{}</b>", escape(&self.date));
        if let Some(weekday) = &self.weekday {
            let _ = write!(html, " {}", escape(weekday));
        }
        html.push_str("</div>");

        if let Some(ohlc) = &self.ohlc {
            let _ = write!(
                html,
                "<div class=\"tt-ohlc\">O {} H {} L {} C {}</div>",
                price(ohlc.open),
                price(ohlc.high),
                price(ohlc.low),
                price(ohlc.close)
            );
            if let Some(change) = ohlc.change {
                let pct = ohlc
                    .change_pct
                    .map(|p| format!(" ({p:+.2}%)"))
                    .unwrap_or_default();
                let _ = write!(html, "<div class=\"tt-change\">{change:+.2}{pct}</div>");
            }
        }

        if let Some(volume) = self.volume {
            let _ = write!(html, "<div class=\"tt-volume\">Vol {}</div>", compact_volume(volume));
        }

        for group in &self.groups {
            let _ = write!(html, "<div class=\"tt-group\"><span class=\"tt-title\">{}</span>", group.title);
            for line in &group.lines {
                let _ = write!(
                    html,
                    " <span style=\"color:{}\">{} {}</span>",
                    escape(&line.color),
                    escape(&line.label),
                    price(line.value)
                );
            }
            html.push_str("</div>");
        }

        for trade in &self.trades {
            let _ = write!(
                html,
                "<div class=\"tt-trade\" style=\"color:{}\">{} {} {}",
                escape(&trade.color),
                escape(&trade.emoji),
                escape(&trade.label),
                price(trade.price)
            );
            if let Some(quantity) = trade.quantity {
                let _ = write!(html, " x {quantity}");
            }
            html.push_str("</div>");
        }

        for signal in &self.signals {
            let _ = write!(
                html,
                "<div class=\"tt-signal\"><span style=\"color:{}\">{} {}</span> {}",
                escape(&signal.color),
                escape(&signal.emoji),
                escape(&signal.label),
                price(signal.price)
            );
            if !signal.message.is_empty() {
                let _ = write!(html, " {}", escape(&signal.message));
            }
            if let Some(badge) = &signal.level {
                let _ = write!(
                    html,
                    " <span class=\"tt-badge\" style=\"background:{}\">{}</span>",
                    escape(&badge.color),
                    escape(&badge.text)
                );
            }
            html.push_str("</div>");
        }

        html
    }
}

fn price(value: f64) -> String {
    format!("{value:.2}")
}

fn compact_volume(volume: f64) -> String {
    let abs = volume.abs();
    if abs >= 1e9 {
        format!("{:.2}B", volume / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", volume / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", volume / 1e3)
    } else {
        format!("{volume:.0}")
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
