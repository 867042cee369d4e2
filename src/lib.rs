#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
/// Dashboard settings and sheet sources
pub mod config;
/// The load cycle tying fetching, parsing, aggregation and the chart together
pub mod dashboard;
/// Error handling and custom [`Error`](std::error::Error) types
pub mod errors;
/// Fetching sheet text from Google Sheets or disk
pub mod fetch;
/// Functions for writing dashboard loads
pub mod io;
/// Aggregation of production records
pub mod ops;
/// CSV tokenizing, column resolution and record parsing
pub mod parse;
/// Display values and chart state
pub mod present;
/// Data types used throughout the dashboard
pub mod types;
