//! Data-file loading for Gearplan.
//!
//! Progression tables can live in JSON, RON, or TOML data files instead of
//! code. This crate deserializes them into [`schema`] structs and resolves
//! those into validated [`gearplan_core::table::ProgressionTable`]s.

pub mod loader;
pub mod schema;
