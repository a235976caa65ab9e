//! Dashboard state for the Puget Sound salmon health view.
//!
//! This crate provides:
//! - `selection`: the single source of truth for the watershed/species filters
//! - `fetch`: request tickets that let late responses be discarded
//! - `session`: owner of catalogs, caches, live snapshots and the selection
//! - `view`: the labels, series and metric cards a renderer draws

pub mod fetch;
pub mod selection;
pub mod session;
pub mod view;
