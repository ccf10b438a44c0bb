//! Types de données pour le crate geoaxe

use std::borrow::Cow;

use geo::{Coord, LineString, Point};
use serde::Serialize;

use crate::crs::Crs;
use crate::validate;
use crate::DecodeError;

/// Centre approximatif de la zone d'exploitation, utilisé comme point sentinelle
pub const SENTINEL_LON: f64 = -7.0926;
pub const SENTINEL_LAT: f64 = 31.7917;

/// Géométrie telle que renvoyée par la couche de stockage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawGeometry {
    /// WKT ou WKB hexadécimal
    Text(String),
    /// WKB brut (bytea)
    Binary(Vec<u8>),
}

impl RawGeometry {
    /// Représentation texte : les octets bruts sont encodés en hexadécimal
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Binary(bytes) => Cow::Owned(hex::encode_upper(bytes)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Binary(bytes) => bytes.is_empty(),
        }
    }
}

impl From<String> for RawGeometry {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RawGeometry {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for RawGeometry {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

/// Ordre des octets d'une charge WKB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Couple de coordonnées brutes, dans les unités du CRS source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedPoint {
    pub x: f64,
    pub y: f64,
}

impl DecodedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Provenance d'un point WGS84
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointOrigin {
    /// Reprojeté et validé par la boîte englobante
    Validated(Crs),
    /// Aucun candidat n'a validé : meilleur effort, à ne pas croire aveuglément
    BestEffort(Crs),
    /// Point de repli au centre de la zone
    Sentinel,
}

impl PointOrigin {
    /// CRS source retenu, s'il y en a un
    pub fn crs(self) -> Option<Crs> {
        match self {
            Self::Validated(crs) | Self::BestEffort(crs) => Some(crs),
            Self::Sentinel => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Validated(_) => "validated",
            Self::BestEffort(_) => "best_effort",
            Self::Sentinel => "sentinel",
        }
    }
}

/// Point WGS84 (degrés décimaux) avec sa provenance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lon: f64,
    lat: f64,
    origin: PointOrigin,
}

impl GeoPoint {
    /// Point validé : `None` si hors de la boîte englobante
    pub fn validated(lon: f64, lat: f64, crs: Crs) -> Option<Self> {
        validate::is_plausible(lon, lat).then_some(Self {
            lon,
            lat,
            origin: PointOrigin::Validated(crs),
        })
    }

    /// Point non validé, retourné faute de mieux
    pub fn best_effort(lon: f64, lat: f64, crs: Crs) -> Self {
        Self {
            lon,
            lat,
            origin: PointOrigin::BestEffort(crs),
        }
    }

    /// Point sentinelle au centre de la zone
    pub fn sentinel() -> Self {
        Self {
            lon: SENTINEL_LON,
            lat: SENTINEL_LAT,
            origin: PointOrigin::Sentinel,
        }
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn origin(&self) -> PointOrigin {
        self.origin
    }

    pub fn is_validated(&self) -> bool {
        matches!(self.origin, PointOrigin::Validated(_))
    }

    /// Égalité bit à bit des coordonnées (la provenance est ignorée)
    pub fn same_position(&self, other: &GeoPoint) -> bool {
        self.lon.to_bits() == other.lon.to_bits() && self.lat.to_bits() == other.lat.to_bits()
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

/// Supprime les points consécutifs identiques (bit à bit)
pub fn collapse_duplicates(points: &mut Vec<GeoPoint>) {
    points.dedup_by(|current, previous| current.same_position(previous));
}

/// Polyligne WGS84 d'au moins 2 points, sans doublons consécutifs
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    /// Construit une polyligne après suppression des doublons consécutifs
    pub fn new(mut points: Vec<GeoPoint>) -> Result<Self, DecodeError> {
        collapse_duplicates(&mut points);
        if points.len() < 2 {
            return Err(DecodeError::InsufficientPoints {
                found: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Toujours faux : une polyligne a au moins 2 points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vrai si tous les sommets ont été validés
    pub fn is_validated(&self) -> bool {
        self.points.iter().all(GeoPoint::is_validated)
    }

    /// Couples (lon, lat)
    pub fn coords(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.lon, p.lat)).collect()
    }

    pub fn to_line_string(&self) -> LineString {
        LineString::new(
            self.points
                .iter()
                .map(|p| Coord { x: p.lon, y: p.lat })
                .collect(),
        )
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }
}

/// Segment d'axe tel que lu en base
#[derive(Debug, Clone)]
pub struct AxisSegment {
    /// Nom de l'axe propriétaire (comparaison exacte)
    pub axis: String,
    /// Position de début le long de l'axe (PK)
    pub reference_start: Option<f64>,
    /// Position de fin le long de l'axe (PK)
    pub reference_end: Option<f64>,
    /// Géométrie stockée
    pub geometry: RawGeometry,
}

impl AxisSegment {
    pub fn new(
        axis: impl Into<String>,
        reference_start: Option<f64>,
        geometry: impl Into<RawGeometry>,
    ) -> Self {
        Self {
            axis: axis.into(),
            reference_start,
            reference_end: None,
            geometry: geometry.into(),
        }
    }

    pub fn with_reference_end(mut self, reference_end: Option<f64>) -> Self {
        self.reference_end = reference_end;
        self
    }

    /// Clé de tri : une référence absente vaut 0
    pub fn sort_key(&self) -> f64 {
        // -0.0 + 0.0 == +0.0 : -0.0 et une référence absente restent ex aequo
        self.reference_start.unwrap_or(0.0) + 0.0
    }
}

/// Parse une position le long de l'axe ("12.5", " 12,5 ")
pub fn parse_reference(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized: Cow<'_, str> = if trimmed.contains(',') {
        Cow::Owned(trimmed.replace(',', "."))
    } else {
        Cow::Borrowed(trimmed)
    };
    fast_float::parse::<f64, _>(&*normalized)
        .ok()
        .filter(|v| v.is_finite())
}
