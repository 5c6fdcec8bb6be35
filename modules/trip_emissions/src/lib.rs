//! Trip CO2 estimation: route resolution, emission arithmetic, an
//! id-keyed calculation store and PDF receipt rendering.

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
