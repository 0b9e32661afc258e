//! End-to-end composition scenarios.

use chrono::{Days, NaiveDate};
use folio_chart::{compose, ChartInput, MaPeriodsInput, MarkerDatum, PanelKey, SeriesCategory, SeriesData, Viewport};
use folio_config::Config;
use folio_core::{Bar, ReferenceLines, SecurityType, Signal, TradeAction, TradeEvent};

fn day(offset: u64) -> String {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (start + Days::new(offset)).format("%Y%m%d").to_string()
}

/// 30 closes rising linearly from 100 to 130.
fn trending_bars() -> Vec<Bar> {
    (0..30)
        .map(|i| {
            let close = 100.0 + i as f64 * 30.0 / 29.0;
            Bar::new(day(i), close - 0.5, close)
                .with_range(close + 1.0, close - 1.0)
                .with_volume(1000.0 + i as f64)
        })
        .collect()
}

fn markers<'a>(chart: &'a folio_chart::ComposedChart, name: &str) -> &'a [MarkerDatum] {
    match &chart.spec.find_series(name).unwrap().data {
        SeriesData::Markers(m) => m,
        other => panic!("{name} is not a marker series: {other:?}"),
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_trending_scenario() {
    let bars = trending_bars();
    let input = ChartInput {
        bars: bars.clone(),
        signals: vec![Signal::new(day(15), "BUY")],
        ma_periods: Some(MaPeriodsInput::List(vec![5.0, 10.0])),
        ..ChartInput::default()
    };
    let config = Config::default();
    let chart = compose(&input, &config);

    let ma5 = chart.spec.find_series("MA5").unwrap();
    let expected = bars[25..].iter().map(|b| b.close).sum::<f64>() / 5.0;
    assert!(approx(ma5.value_at(29).unwrap(), expected));
    assert!(approx(expected, 100.0 + 27.0 * 30.0 / 29.0));
    assert_eq!(ma5.value_at(3), None);
    assert!(chart.spec.find_series("MA10").is_some());
    assert!(chart.spec.find_series("MA20").is_none());

    let buy = markers(&chart, "Buy signal");
    assert_eq!(buy.len(), 1);
    let bar = &bars[15];
    let style = config.annotations.signal_style("BUY");
    let gap = bar.close * config.annotations.marker_gap_ratio;
    assert_eq!(buy[0].date(), bar.date);
    assert!(approx(buy[0].y(), bar.close - 1.0 - gap * style.offset_multiplier));
}

#[test]
fn test_signal_after_last_bar_and_before_first() {
    let bars = trending_bars();
    let last = bars.last().unwrap().clone();
    let input = ChartInput {
        bars,
        signals: vec![
            Signal::new(day(30), "SELL").with_message("late"),
            Signal::new("20231231", "SELL").with_message("early"),
        ],
        ..ChartInput::default()
    };
    let chart = compose(&input, &Config::default());

    let sells = markers(&chart, "Sell signal");
    assert_eq!(sells.len(), 1);
    assert_eq!(sells[0].date(), last.date);
    assert!(approx(sells[0].price, last.close));

    let tooltip = chart.hover_at(&last.date);
    assert_eq!(tooltip.signals.len(), 1);
    assert_eq!(tooltip.signals[0].message, "late");
}

#[test]
fn test_reference_line_exclusivity() {
    let reference = ReferenceLines {
        stop_gain_threshold: Some(30.0),
        stop_loss_threshold: Some(10.0),
        ..ReferenceLines::with_cost(10.0)
    };
    let config = Config::default();

    let profit = compose(
        &ChartInput {
            bars: vec![Bar::new("20240102", 11.0, 12.0)],
            reference: Some(reference.clone()),
            ..ChartInput::default()
        },
        &config,
    );
    assert!(profit.spec.find_series("Cost").is_some());
    assert!(profit.spec.find_series("Stop Gain").is_some());
    assert!(profit.spec.find_series("Stop Loss").is_none());

    let loss = compose(
        &ChartInput {
            bars: vec![Bar::new("20240102", 9.0, 8.0)],
            reference: Some(reference),
            ..ChartInput::default()
        },
        &config,
    );
    assert!(loss.spec.find_series("Stop Gain").is_none());
    assert!(loss.spec.find_series("Stop Loss").is_some());
}

#[test]
fn test_panels_by_security_type() {
    let config = Config::default();
    let compose_for = |security: &str| {
        compose(
            &ChartInput {
                bars: trending_bars(),
                security_type: SecurityType::from(security),
                ..ChartInput::default()
            },
            &config,
        )
    };

    let cash = compose_for("CASH");
    assert_eq!(cash.layout.keys(), vec![PanelKey::Price]);
    assert_eq!(cash.spec.grid.len(), 1);
    assert!(cash.spec.find_series("Volume").is_none());
    assert!(cash.spec.find_series("DIF").is_none());

    let fund = compose_for("FUND");
    assert_eq!(
        fund.layout.keys(),
        vec![PanelKey::Price, PanelKey::Macd, PanelKey::Kdj, PanelKey::Bias]
    );
    assert!(fund.spec.find_series("Volume").is_none());
    assert_eq!(fund.spec.find_series("BIAS20").unwrap().x_axis_index, 3);
    assert_eq!(fund.spec.find_series("K").unwrap().x_axis_index, 2);

    let stock = compose_for("stock");
    assert_eq!(stock.spec.find_series("Volume").unwrap().x_axis_index, 1);
    assert!(stock.spec.find_series("BIAS20").is_none());
}

#[test]
fn test_axes_share_dates() {
    let chart = compose(
        &ChartInput {
            bars: trending_bars(),
            security_type: SecurityType::from("ETF"),
            ..ChartInput::default()
        },
        &Config::default(),
    );

    let dates = chart.spec.x_axis[0].data.clone().unwrap();
    assert_eq!(dates.len(), 30);
    assert_eq!(chart.spec.x_axis.len(), 5);
    assert!(chart.spec.x_axis.iter().all(|axis| axis.data.as_ref() == Some(&dates)));

    let labelled: Vec<bool> = chart.spec.x_axis.iter().map(|a| a.show_labels).collect();
    assert_eq!(labelled, vec![false, false, false, false, true]);

    for zoom in &chart.spec.data_zoom {
        assert_eq!(zoom.x_axis_index, vec![0, 1, 2, 3, 4]);
    }
    assert!(chart.spec.series.iter().all(|s| s.x_axis_index == s.y_axis_index));
}

#[test]
fn test_candle_range_corrected() {
    let chart = compose(
        &ChartInput {
            bars: vec![Bar::new("20240102", 7.0, 8.0).with_range(5.0, 10.0)],
            ..ChartInput::default()
        },
        &Config::default(),
    );
    let SeriesData::Candles(candles) = &chart.spec.find_series("Price").unwrap().data else {
        panic!("price series should hold candles");
    };
    assert_eq!(candles[0], [7.0, 8.0, 5.0, 10.0]);
}

#[test]
fn test_unknown_signal_uses_default_style() {
    let chart = compose(
        &ChartInput {
            bars: trending_bars(),
            signals: vec![Signal::new(day(3), "gap_fill")],
            ..ChartInput::default()
        },
        &Config::default(),
    );
    let series = chart.spec.find_series("GAP_FILL").unwrap();
    assert_eq!(series.symbol.as_deref(), Some("circle"));
    assert_eq!(series.category, SeriesCategory::Signal);
    assert_eq!(chart.spec.legend[0].data.last().map(String::as_str), Some("GAP_FILL"));
}

#[test]
fn test_signal_named_like_a_line_keeps_tooltip_group() {
    let chart = compose(
        &ChartInput {
            bars: trending_bars(),
            signals: vec![Signal::new(day(12), "ma5")],
            ..ChartInput::default()
        },
        &Config::default(),
    );
    let names: Vec<&str> = chart.spec.series_on(0).map(|s| s.name.as_str()).collect();
    assert_eq!(names.iter().filter(|n| **n == "MA5").count(), 2);
    assert_eq!(chart.spec.legend[0].data.iter().filter(|n| *n == "MA5").count(), 1);

    let tooltip = chart.hover_at(&day(12));
    let trend = tooltip.groups.iter().find(|g| g.title == "Trend").unwrap();
    assert!(trend.lines.iter().any(|l| l.label == "MA5"));
    assert_eq!(tooltip.signals.len(), 1);
}

#[test]
fn test_countdown_kept_out_of_legend() {
    let chart = compose(
        &ChartInput {
            bars: trending_bars(),
            signals: vec![Signal::new(day(20), "STRUCTURE_SELL")],
            ..ChartInput::default()
        },
        &Config::default(),
    );
    let countdown = chart
        .spec
        .series
        .iter()
        .find(|s| s.category == SeriesCategory::Countdown)
        .unwrap();
    assert_eq!(countdown.data_len(), 9);
    assert!(!chart.spec.legend[0].data.contains(&countdown.name));
    assert!(chart.spec.legend[0].data.iter().any(|n| n == "Structure sell"));
}

#[test]
fn test_trades_in_tooltip() {
    let bars = trending_bars();
    let mut trade = TradeEvent::new(day(10), TradeAction::Buy, None);
    trade.quantity = Some(200.0);
    let chart = compose(
        &ChartInput {
            bars: bars.clone(),
            trades: vec![trade],
            ..ChartInput::default()
        },
        &Config::default(),
    );

    let tooltip = chart.hover_at(&day(10));
    assert_eq!(tooltip.trades.len(), 1);
    assert!(approx(tooltip.trades[0].price, bars[10].close));
    assert_eq!(tooltip.trades[0].quantity, Some(200.0));

    let titles: Vec<&str> = tooltip.groups.iter().map(|g| g.title).collect();
    assert_eq!(titles, vec!["Trend", "Technical"]);
    assert_eq!(tooltip.volume, Some(1010.0));
    assert!(tooltip.to_html().contains("Bought"));
}

#[test]
fn test_fullscreen_height() {
    let chart = compose(
        &ChartInput {
            bars: trending_bars(),
            viewport: Viewport::fullscreen(1000),
            ..ChartInput::default()
        },
        &Config::default(),
    );
    assert_eq!(chart.total_height, 892);
    let json = chart.to_json().unwrap();
    assert_eq!(json["height"], 892);
    assert_eq!(json["option"]["grid"][0]["height"], 195);
}

#[test]
fn test_empty_bars_yield_valid_spec() {
    let chart = compose(
        &ChartInput {
            signals: vec![Signal::new("20240102", "BUY")],
            trades: vec![TradeEvent::new("20240102", TradeAction::Sell, Some(1.0))],
            reference: Some(ReferenceLines::with_cost(10.0)),
            ..ChartInput::default()
        },
        &Config::default(),
    );

    assert_eq!(chart.spec.grid.len(), 4);
    assert!(chart.spec.series.iter().all(|s| s.data_len() == 0));
    assert!(chart.spec.series.iter().all(|s| s.category != SeriesCategory::Signal));
    assert!(chart.to_json().is_ok());

    let tooltip = chart.hover_at("20240102");
    assert!(tooltip.ohlc.is_none());
    assert!(tooltip.signals.is_empty());
}
