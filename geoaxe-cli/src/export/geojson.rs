//! Export vers GeoJSON avec geozero (streaming)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;

use super::ExportFeature;

const COLLECTION_HEADER: &str = r#"{"type":"FeatureCollection","crs":{"type":"name","properties":{"name":"urn:ogc:def:crs:EPSG::4326"}},"features":["#;

/// Exporte des entités en FeatureCollection GeoJSON (WGS84)
pub fn export_to_geojson(features: &[ExportFeature], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    writer.write_all(COLLECTION_HEADER.as_bytes())?;
    let mut features = features.iter();
    if let Some(first) = features.next() {
        write_feature(&mut writer, first)?;
    }
    for feature in features {
        writer.write_all(b",")?;
        write_feature(&mut writer, feature)?;
    }
    writer.write_all(b"]}")?;
    writer.flush()?;

    Ok(())
}

/// Écrit une entité GeoJSON ; la géométrie passe par geozero, l'identifiant
/// et les propriétés par serde_json
fn write_feature<W: Write>(writer: &mut W, feature: &ExportFeature) -> Result<()> {
    write!(writer, r#"{{"type":"Feature","id":"#)?;
    serde_json::to_writer(&mut *writer, &feature.id)?;

    write!(writer, r#","geometry":"#)?;
    let mut geom_buf = Vec::new();
    feature
        .geometry
        .process_geom(&mut GeoJsonWriter::new(&mut geom_buf))?;
    writer.write_all(&geom_buf)?;

    write!(writer, r#","properties":"#)?;
    serde_json::to_writer(&mut *writer, &feature.properties)?;
    write!(writer, "}}")?;

    Ok(())
}
