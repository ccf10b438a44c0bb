//! Décodage complet : géométrie brute → points WGS84
//!
//! Enchaîne détection du format, extraction des coordonnées (WKT ou WKB),
//! choix de la chaîne de repli et reprojection.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::reproject::{chain_for, reproject_line, reproject_point, DEFAULT_WKT_SRID};
use crate::sniff::{classify_raw, GeometryKind};
use crate::types::{ByteOrder, DecodedPoint, GeoPoint, Polyline, RawGeometry};
use crate::{wkb, wkt, DecodeError};

/// Options du décodeur
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// SRID supposé pour le WKT sans préfixe `SRID=`
    pub wkt_default_srid: u32,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            wkt_default_srid: DEFAULT_WKT_SRID,
        }
    }
}

/// Décodeur sans état, partageable entre threads
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecoderOptions,
}

fn kind_name(kind: &GeometryKind) -> &'static str {
    if kind.is_point() {
        "Point"
    } else if kind.is_linestring() {
        "LineString"
    } else {
        "unrecognized"
    }
}

impl Decoder {
    pub fn new(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn classify(&self, raw: &RawGeometry) -> GeometryKind {
        classify_raw(raw)
    }

    /// Coordonnées brutes, dans les unités du CRS source
    fn raw_coordinates(
        &self,
        text: &str,
        kind: &GeometryKind,
    ) -> Result<Vec<DecodedPoint>, DecodeError> {
        match *kind {
            GeometryKind::WktPoint { .. } => wkt::parse_point(text).map(|(p, _)| vec![p]),
            GeometryKind::WktLineString { .. } => wkt::parse_linestring(text).map(|(pts, _)| pts),
            GeometryKind::WkbPoint { order, .. } => {
                wkb::decode_wkb_point(text, order).map(|p| vec![p])
            }
            GeometryKind::WkbLocalMetersPoint => {
                wkb::decode_wkb_point(text, ByteOrder::Little).map(|p| vec![p])
            }
            GeometryKind::WkbLineString { order, .. } => wkb::decode_wkb_linestring(text, order),
            GeometryKind::Unrecognized => Err(DecodeError::UnrecognizedFormat),
        }
    }

    /// Décode une géométrie Point
    pub fn decode_point(&self, raw: &RawGeometry) -> Result<GeoPoint, DecodeError> {
        let text = raw.as_text();
        let kind = classify_raw(raw);
        if kind == GeometryKind::Unrecognized {
            return Err(DecodeError::UnrecognizedFormat);
        }
        if !kind.is_point() {
            return Err(DecodeError::UnexpectedKind {
                expected: "Point",
                found: kind_name(&kind),
            });
        }

        let chain = chain_for(&kind, self.options.wkt_default_srid)?;
        let coords = self.raw_coordinates(&text, &kind)?;
        let point = coords
            .first()
            .copied()
            .ok_or_else(|| DecodeError::malformed_binary("point without coordinates"))?;

        let decoded = reproject_point(point, &chain)?;
        debug!(kind = kind.label(), origin = decoded.origin().label(), "Point decoded");
        Ok(decoded)
    }

    /// Décode un Point ou une LineString en suite de points, sans minimum
    pub fn decode_points(&self, raw: &RawGeometry) -> Result<Vec<GeoPoint>, DecodeError> {
        let text = raw.as_text();
        let kind = classify_raw(raw);
        let chain = chain_for(&kind, self.options.wkt_default_srid)?;
        let coords = self.raw_coordinates(&text, &kind)?;

        if kind.is_point() {
            let point = coords
                .first()
                .copied()
                .ok_or_else(|| DecodeError::malformed_binary("point without coordinates"))?;
            return reproject_point(point, &chain).map(|p| vec![p]);
        }
        reproject_line(&coords, &chain)
    }

    /// Décode une géométrie LineString en polyligne d'au moins 2 points
    pub fn decode_linestring(&self, raw: &RawGeometry) -> Result<Polyline, DecodeError> {
        let kind = classify_raw(raw);
        if kind == GeometryKind::Unrecognized {
            return Err(DecodeError::UnrecognizedFormat);
        }
        if !kind.is_linestring() {
            return Err(DecodeError::UnexpectedKind {
                expected: "LineString",
                found: kind_name(&kind),
            });
        }
        Polyline::new(self.decode_points(raw)?)
    }

    /// Point décodé, ou sentinelle si la valeur stockée est abîmée
    ///
    /// Les autres échecs (format inconnu, SRID non supporté, aucun candidat
    /// plausible) renvoient `None` : l'entité est alors affichée sans géométrie.
    pub fn point_or_sentinel(&self, raw: &RawGeometry) -> Option<GeoPoint> {
        match self.decode_point(raw) {
            Ok(point) => Some(point),
            Err(e) if e.is_malformed() => {
                warn!(error = %e, "Malformed point geometry, using sentinel");
                Some(GeoPoint::sentinel())
            }
            Err(e) => {
                debug!(error = %e, "Point geometry not decoded");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::types::{PointOrigin, SENTINEL_LAT, SENTINEL_LON};
    use crate::wkb::{encode_linestring_hex, encode_point_hex};

    #[test]
    fn test_decode_wkt_point_default_srid() {
        let decoder = Decoder::default();
        let p = decoder
            .decode_point(&RawGeometry::from("POINT(-846028.13 3973881.01)"))
            .unwrap();
        assert_eq!(p.origin(), PointOrigin::Validated(Crs::WebMercator));
        assert!((p.lon() - (-7.6)).abs() < 1e-6, "lon={}", p.lon());
    }

    #[test]
    fn test_decode_wkt_point_configured_srid() {
        let decoder = Decoder::new(DecoderOptions {
            wkt_default_srid: 4326,
        });
        let p = decoder.decode_point(&RawGeometry::from("POINT(-7.6 33.59)")).unwrap();
        assert_eq!(p.origin(), PointOrigin::Validated(Crs::Wgs84));
        assert_eq!((p.lon(), p.lat()), (-7.6, 33.59));
    }

    #[test]
    fn test_decode_wkb_point_utm() {
        let hex = encode_point_hex(315355.2, 3767286.3, ByteOrder::Big, 0);
        let p = Decoder::default().decode_point(&RawGeometry::from(hex)).unwrap();
        assert_eq!(p.origin(), PointOrigin::Validated(Crs::Utm30N));
    }

    #[test]
    fn test_wkb_header_srid_keeps_the_utm_chain() {
        let decoder = Decoder::default();

        // Étiqueté 32629 mais situé à l'est : 30N par repli
        let hex = encode_point_hex(315355.2, 3767286.3, ByteOrder::Little, 32629);
        let p = decoder.decode_point(&RawGeometry::from(hex)).unwrap();
        assert_eq!(p.origin(), PointOrigin::Validated(Crs::Utm30N));
        assert!((p.lon() - (-5.0)).abs() < 1e-5, "lon={}", p.lon());

        // Étiqueté 3857 en big-endian : toujours UTM
        let hex = encode_point_hex(630868.0, 3715370.6, ByteOrder::Big, 3857);
        let p = decoder.decode_point(&RawGeometry::from(hex)).unwrap();
        assert_eq!(p.origin(), PointOrigin::Validated(Crs::Utm29N));
        assert!((p.lon() - (-7.59)).abs() < 1e-5, "lon={}", p.lon());
        assert!((p.lat() - 33.57).abs() < 1e-5, "lat={}", p.lat());
    }

    #[test]
    fn test_local_meters_marker_on_linestring_uses_utm_chain() {
        let hex = encode_linestring_hex(
            &[(630868.0, 3715370.6), (315355.2, 3767286.3)],
            ByteOrder::Little,
            0x0F11,
        );
        assert!(hex.starts_with("0102000020110F"), "{}", hex);

        let line = Decoder::default()
            .decode_linestring(&RawGeometry::from(hex))
            .unwrap();
        assert!(line
            .points()
            .iter()
            .all(|p| p.origin() == PointOrigin::Validated(Crs::Utm30N)));
    }

    #[test]
    fn test_decode_binary_payload() {
        let hex = encode_point_hex(630868.0, 3715370.6, ByteOrder::Little, 0);
        let bytes = hex::decode(hex).unwrap();
        let p = Decoder::default().decode_point(&RawGeometry::Binary(bytes)).unwrap();
        assert_eq!(p.origin(), PointOrigin::Validated(Crs::Utm29N));
        assert!((p.lon() - (-7.59)).abs() < 1e-5, "lon={}", p.lon());
    }

    #[test]
    fn test_decode_linestring_wkt() {
        let raw = RawGeometry::from(
            "SRID=3857;LINESTRING (-846028.13 3973881.01, -846028.13 3973881.01, -762538.51 4031487.85)",
        );
        let line = Decoder::default().decode_linestring(&raw).unwrap();
        assert_eq!(line.len(), 2);
        assert!(line.is_validated());
    }

    #[test]
    fn test_decode_linestring_wkb() {
        let hex = encode_linestring_hex(
            &[(630868.0, 3715370.6), (315355.2, 3767286.3)],
            ByteOrder::Little,
            0,
        );
        let line = Decoder::default()
            .decode_linestring(&RawGeometry::from(hex))
            .unwrap();
        assert!(line
            .points()
            .iter()
            .all(|p| p.origin() == PointOrigin::Validated(Crs::Utm30N)));
    }

    #[test]
    fn test_kind_mismatch() {
        let decoder = Decoder::default();
        assert_eq!(
            decoder.decode_linestring(&RawGeometry::from("POINT(1 2)")),
            Err(DecodeError::UnexpectedKind {
                expected: "LineString",
                found: "Point"
            })
        );
        assert!(matches!(
            decoder.decode_point(&RawGeometry::from("LINESTRING(1 2, 3 4)")),
            Err(DecodeError::UnexpectedKind { .. })
        ));
    }

    #[test]
    fn test_single_point_line_is_insufficient() {
        let raw = RawGeometry::from("SRID=3857;LINESTRING (-846028.13 3973881.01)");
        assert_eq!(
            Decoder::default().decode_linestring(&raw),
            Err(DecodeError::InsufficientPoints { found: 1 })
        );
    }

    #[test]
    fn test_point_or_sentinel() {
        let decoder = Decoder::default();

        // Charge tronquée → sentinelle
        let sentinel = decoder
            .point_or_sentinel(&RawGeometry::from("0101000020757F00000000"))
            .unwrap();
        assert_eq!(sentinel.origin(), PointOrigin::Sentinel);
        assert_eq!((sentinel.lon(), sentinel.lat()), (SENTINEL_LON, SENTINEL_LAT));

        // Format inconnu → rien
        assert!(decoder.point_or_sentinel(&RawGeometry::from("hello")).is_none());

        // Hors zone sans repli → rien
        assert!(decoder
            .point_or_sentinel(&RawGeometry::from("SRID=3857;POINT(0 0)"))
            .is_none());
    }
}
