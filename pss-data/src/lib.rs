//! Data processing for salmon return and station observations.
//!
//! This crate turns catalog entries, return estimates and station
//! readings into the numbers the dashboard displays:
//! - `returns`: the memoized return-series provider
//! - `aggregation`: per-year sums, trend and percent change
//! - `stations`: bounding-box filtering and median temperature
//! - `health`: percent-of-target buckets and regional summary

pub mod aggregation;
pub mod health;
pub mod returns;
pub mod stations;
