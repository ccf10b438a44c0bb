//! # geoaxe-cli
//!
//! Décodage des géométries exportées de la base vers GeoJSON, WKT ou EWKB.
//!
//! ## Features
//!
//! - Classification des lignes d'entrée (`sniff`)
//! - Décodage parallèle ligne à ligne (`points`)
//! - Assemblage des segments par axe (`axes`)
//! - Rapport de décodage (console et JSON)
//!
//! ## Usage CLI
//!
//! ```bash
//! geoaxe sniff --input rows.json
//! geoaxe points --input rows.json --output gares.geojson
//! geoaxe axes --input arcs.json --output axes.wkt --format wkt --config strict --report report.json
//! ```

pub mod cli;
pub mod config;
pub mod export;
pub mod input;
pub mod report;

pub use config::Config;
pub use report::{DecodeReport, DecodeStatus};
