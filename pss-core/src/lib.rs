#[cfg(feature = "api")]
pub mod api;
pub mod barrier;
pub mod error;
pub mod geo;
mod payload;
pub mod returns;
pub mod selection;
pub mod species;
pub mod station;
pub mod watershed;
