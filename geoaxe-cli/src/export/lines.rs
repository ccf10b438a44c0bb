//! Export texte ligne à ligne : `id<TAB>WKT` ou `id<TAB>EWKB`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geo::Geometry;
use geoaxe::wkb::{encode_linestring_hex, encode_point_hex};
use geoaxe::ByteOrder;
use geozero::wkt::WktWriter;
use geozero::GeozeroGeometry;

use super::ExportFeature;

const WGS84_SRID: u32 = 4326;

fn export_lines<F>(features: &[ExportFeature], output_path: &Path, mut encode: F) -> Result<()>
where
    F: FnMut(&Geometry) -> Result<String>,
{
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    for feature in features {
        let encoded = encode(&feature.geometry)
            .with_context(|| format!("Failed to encode feature {}", feature.id))?;
        writeln!(writer, "{}\t{}", feature.id, encoded)?;
    }

    writer.flush()?;
    Ok(())
}

/// Géométrie en WKT (geozero)
pub fn to_wkt(geometry: &Geometry) -> Result<String> {
    let mut wkt_buf = Vec::new();
    let mut writer = WktWriter::new(&mut wkt_buf);
    geometry.process_geom(&mut writer)?;
    Ok(String::from_utf8(wkt_buf)?)
}

/// Géométrie en EWKB hexadécimal little-endian, SRID 4326
pub fn to_ewkb(geometry: &Geometry) -> Result<String> {
    match geometry {
        Geometry::Point(p) => Ok(encode_point_hex(p.x(), p.y(), ByteOrder::Little, WGS84_SRID)),
        Geometry::LineString(ls) => {
            let coords: Vec<(f64, f64)> = ls.0.iter().map(|c| (c.x, c.y)).collect();
            Ok(encode_linestring_hex(&coords, ByteOrder::Little, WGS84_SRID))
        }
        _ => anyhow::bail!("Only Point and LineString can be written as EWKB"),
    }
}

pub fn export_to_wkt(features: &[ExportFeature], output_path: &Path) -> Result<()> {
    export_lines(features, output_path, to_wkt)
}

pub fn export_to_ewkb(features: &[ExportFeature], output_path: &Path) -> Result<()> {
    export_lines(features, output_path, to_ewkb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Point, Polygon};
    use geoaxe::wkb::decode_wkb_linestring;
    use geoaxe::{classify, GeometryKind};

    #[test]
    fn test_to_wkt() {
        let wkt = to_wkt(&Geometry::Point(Point::new(-7.6, 33.59))).unwrap();
        assert!(wkt.starts_with("POINT"), "{}", wkt);
        assert!(wkt.contains("-7.6 33.59"), "{}", wkt);
    }

    #[test]
    fn test_to_ewkb_layout() {
        let hex = to_ewkb(&Geometry::LineString(LineString::from(vec![
            (-7.6, 33.59),
            (-6.85, 34.02),
        ])))
        .unwrap();
        assert!(matches!(
            classify(&hex),
            GeometryKind::WkbLineString {
                order: ByteOrder::Little,
                srid: Some(4326)
            }
        ));

        let points = decode_wkb_linestring(&hex, ByteOrder::Little).unwrap();
        let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(-7.6, 33.59), (-6.85, 34.02)]);
    }

    #[test]
    fn test_to_ewkb_rejects_polygons() {
        let polygon = Polygon::new(LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]), vec![]);
        assert!(to_ewkb(&Geometry::Polygon(polygon)).is_err());
    }

    #[test]
    fn test_export_to_wkt_file() {
        let features = vec![ExportFeature {
            id: "7".to_string(),
            geometry: Geometry::Point(Point::new(-6.85, 34.02)),
            properties: Default::default(),
        }];
        let output_path = std::env::temp_dir().join("geoaxe_test_export.wkt");
        export_to_wkt(&features, &output_path).unwrap();

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.starts_with("7\tPOINT"), "{}", content);
        assert!(content.ends_with("34.02)\n"), "{}", content);

        std::fs::remove_file(output_path).ok();
    }
}
