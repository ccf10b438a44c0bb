//! Détection du format d'une géométrie stockée
//!
//! La colonne géométrique n'est pas étiquetée de façon fiable : le format est
//! reconnu uniquement à partir du préfixe de la valeur. Règles, dans l'ordre :
//!
//! 1. `POINT(` / `SRID=n;POINT (` → [`GeometryKind::WktPoint`]
//! 2. `LINESTRING(` / `SRID=n;LINESTRING (` → [`GeometryKind::WktLineString`]
//! 3. hex `0101000020110F...` → [`GeometryKind::WkbLocalMetersPoint`],
//!    hex `0101000020...` → [`GeometryKind::WkbPoint`] little-endian
//! 4. hex `0001000020...` ou `0020000001...` → [`GeometryKind::WkbPoint`] big-endian
//! 5. hex `0102000020...` / `0002000020...` / `0020000002...` → [`GeometryKind::WkbLineString`]
//! 6. sinon → [`GeometryKind::Unrecognized`]

use serde::Serialize;

use crate::types::{ByteOrder, RawGeometry};
use crate::wkt::{self, strip_prefix_ci, WktType};

/// Marqueur du système métrique local (SRID 0x0F11 en little-endian)
const LOCAL_METERS_PREFIX: &str = "0101000020110F";

/// En-têtes EWKB reconnus : (préfixe, ordre des octets, est un Point)
const WKB_HEADERS: &[(&str, ByteOrder, bool)] = &[
    ("0101000020", ByteOrder::Little, true),
    ("0001000020", ByteOrder::Big, true),
    ("0020000001", ByteOrder::Big, true),
    ("0102000020", ByteOrder::Little, false),
    ("0002000020", ByteOrder::Big, false),
    ("0020000002", ByteOrder::Big, false),
];

/// Type de géométrie reconnu par le sniffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GeometryKind {
    WktPoint { srid: Option<u32> },
    WktLineString { srid: Option<u32> },
    WkbPoint { order: ByteOrder, srid: Option<u32> },
    /// Point en mètres d'un système local non standard (marqueur `110F`)
    WkbLocalMetersPoint,
    WkbLineString { order: ByteOrder, srid: Option<u32> },
    Unrecognized,
}

impl GeometryKind {
    /// Nom court, utilisé dans les rapports et les logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::WktPoint { .. } => "wkt_point",
            Self::WktLineString { .. } => "wkt_linestring",
            Self::WkbPoint {
                order: ByteOrder::Little,
                ..
            } => "wkb_point_le",
            Self::WkbPoint {
                order: ByteOrder::Big,
                ..
            } => "wkb_point_be",
            Self::WkbLocalMetersPoint => "wkb_point_local_meters",
            Self::WkbLineString {
                order: ByteOrder::Little,
                ..
            } => "wkb_linestring_le",
            Self::WkbLineString {
                order: ByteOrder::Big,
                ..
            } => "wkb_linestring_be",
            Self::Unrecognized => "unrecognized",
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(
            self,
            Self::WktPoint { .. } | Self::WkbPoint { .. } | Self::WkbLocalMetersPoint
        )
    }

    pub fn is_linestring(&self) -> bool {
        matches!(self, Self::WktLineString { .. } | Self::WkbLineString { .. })
    }

    /// SRID déclaré par la géométrie
    pub fn srid(&self) -> Option<u32> {
        match *self {
            Self::WktPoint { srid }
            | Self::WktLineString { srid }
            | Self::WkbPoint { srid, .. }
            | Self::WkbLineString { srid, .. } => srid,
            Self::WkbLocalMetersPoint => Some(0x0F11),
            Self::Unrecognized => None,
        }
    }
}

/// Classe une géométrie brute (les octets sont passés en hexadécimal)
pub fn classify_raw(raw: &RawGeometry) -> GeometryKind {
    classify(&raw.as_text())
}

/// Classe une géométrie texte (WKT ou WKB hexadécimal)
pub fn classify(raw: &str) -> GeometryKind {
    if let Some(header) = wkt::parse_header(raw) {
        return match header.geometry {
            WktType::Point => GeometryKind::WktPoint { srid: header.srid },
            WktType::LineString => GeometryKind::WktLineString { srid: header.srid },
        };
    }

    let hex = strip_hex_prefix(raw.trim());
    if hex.is_empty() || hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return GeometryKind::Unrecognized;
    }

    if strip_prefix_ci(hex, LOCAL_METERS_PREFIX).is_some() {
        return GeometryKind::WkbLocalMetersPoint;
    }

    for &(prefix, order, is_point) in WKB_HEADERS {
        if strip_prefix_ci(hex, prefix).is_some() {
            let srid = header_srid(hex, order);
            return if is_point {
                GeometryKind::WkbPoint { order, srid }
            } else {
                GeometryKind::WkbLineString { order, srid }
            };
        }
    }

    GeometryKind::Unrecognized
}

/// Retire le préfixe `\x` de la sortie texte d'un `bytea` PostgreSQL
pub(crate) fn strip_hex_prefix(hex: &str) -> &str {
    hex.strip_prefix("\\x").unwrap_or(hex)
}

/// SRID de l'en-tête EWKB (octets 5 à 8)
fn header_srid(hex: &str, order: ByteOrder) -> Option<u32> {
    let digits = hex.get(10..18)?;
    let mut bytes = [0u8; 4];
    hex::decode_to_slice(digits, &mut bytes).ok()?;
    Some(match order {
        ByteOrder::Little => u32::from_le_bytes(bytes),
        ByteOrder::Big => u32::from_be_bytes(bytes),
    })
}
