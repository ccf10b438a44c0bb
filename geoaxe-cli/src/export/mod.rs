//! Export des géométries décodées (GeoJSON, WKT, EWKB)

pub mod geojson;
pub mod lines;

use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use geo::{Coord, Geometry, LineString, Point};
use serde_json::{Map, Value};

/// Format de sortie
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// FeatureCollection GeoJSON
    Geojson,
    /// Une ligne `id<TAB>WKT` par entité
    Wkt,
    /// Une ligne `id<TAB>EWKB hexadécimal` par entité (SRID 4326)
    Ewkb,
}

/// Entité à exporter, en WGS84
#[derive(Debug, Clone)]
pub struct ExportFeature {
    pub id: String,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

/// Écrit les entités dans le format demandé
pub fn write_features(features: &[ExportFeature], format: OutputFormat, output: &Path) -> Result<()> {
    match format {
        OutputFormat::Geojson => geojson::export_to_geojson(features, output),
        OutputFormat::Wkt => lines::export_to_wkt(features, output),
        OutputFormat::Ewkb => lines::export_to_ewkb(features, output),
    }
}

/// Arrondit les coordonnées d'une géométrie à la précision spécifiée
pub fn round_geometry(geom: &Geometry, decimals: u8) -> Geometry {
    let factor = 10_f64.powi(decimals as i32);

    let round_coord = |c: &Coord| -> Coord {
        Coord {
            x: (c.x * factor).round() / factor,
            y: (c.y * factor).round() / factor,
        }
    };

    match geom {
        Geometry::Point(p) => Geometry::Point(Point::from(round_coord(&p.0))),
        Geometry::LineString(ls) => {
            Geometry::LineString(LineString::new(ls.0.iter().map(round_coord).collect()))
        }
        // Le moteur ne produit que des points et des lignes
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_point() {
        let rounded = round_geometry(&Geometry::Point(Point::new(-7.123456789, 33.987654321)), 4);
        assert_eq!(rounded, Geometry::Point(Point::new(-7.1235, 33.9877)));
    }

    #[test]
    fn test_round_linestring() {
        let line = LineString::from(vec![(-7.15, 33.15), (-6.04, 34.06)]);
        match round_geometry(&Geometry::LineString(line), 1) {
            Geometry::LineString(ls) => {
                assert_eq!(ls.0.len(), 2);
                assert!((ls.0[1].x - (-6.0)).abs() < 1e-12, "x={}", ls.0[1].x);
                assert!((ls.0[1].y - 34.1).abs() < 1e-12, "y={}", ls.0[1].y);
            }
            other => panic!("Expected LineString, got {:?}", other),
        }
    }
}
