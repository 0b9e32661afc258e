//! Core types for the portfolio chart engine.
//!
//! This crate provides the request-scoped data model shared by every stage of
//! the chart pipeline:
//! - `Bar` - one day of OHLCV data with high/low correction
//! - `TimeSeries` - bar-aligned indicator output with gaps
//! - `TradeEvent` / `Signal` - dated annotations placed on the price panel
//! - `ReferenceLines` - cost basis and target prices of a held position
//! - `SecurityType` - open vocabulary of security kinds

pub mod bar;
pub mod date;
pub mod event;
pub mod position;
pub mod security;
pub mod series;

pub use bar::{locate_bar, Bar, BarLookup, Ohlcv};
pub use date::{format_date, normalize_date, weekday_label};
pub use event::{Signal, TradeAction, TradeEvent};
pub use position::ReferenceLines;
pub use security::SecurityType;
pub use series::TimeSeries;
