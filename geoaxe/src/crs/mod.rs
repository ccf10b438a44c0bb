//! Systèmes de coordonnées sources et leurs transformations vers WGS84
//!
//! Reprojection en Rust pur, sans PROJ :
//! - Web Mercator (EPSG:3857)
//! - UTM 29N / 30N (EPSG:32629, EPSG:32630)
//! - Merchich Lambert Nord / Sud / Sahara (EPSG:26191, 26192, 26193)
//! - Système métrique local (marqueur `110F`, conversion empirique)
//!
//! La table [`CRS_TABLE`] est constante : elle associe chaque [`Crs`] à sa
//! fonction de transformation et n'est jamais modifiée à l'exécution.

mod datum;
mod ellipsoid;
mod empirical;
mod lambert;
mod mercator;
mod utm;

pub use ellipsoid::{Clarke1880Ign, WGS84};
pub use mercator::geographic_to_web_mercator;

use serde::Serialize;
use thiserror::Error;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }
}

/// Échec d'une transformation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Résultat NaN ou infini
    #[error("{crs}: transformation produced a non-finite coordinate")]
    NonFinite { crs: &'static str },

    /// Coordonnée hors du domaine de la projection
    #[error("{crs}: {reason}")]
    OutOfDomain { crs: &'static str, reason: String },
}

/// CRS source connus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Crs {
    Wgs84,
    WebMercator,
    Utm29N,
    Utm30N,
    MerchichNord,
    MerchichSud,
    MerchichSahara,
    LocalMeters,
}

/// Entrée de la table des CRS
pub struct CrsDefinition {
    pub crs: Crs,
    pub epsg: Option<u32>,
    pub name: &'static str,
    /// Transformation vers WGS84 (radians)
    pub transform: fn(f64, f64) -> Result<Geographic, ProjectionError>,
}

/// Table constante des CRS, dans l'ordre de déclaration de [`Crs`]
pub const CRS_TABLE: &[CrsDefinition] = &[
    CrsDefinition {
        crs: Crs::Wgs84,
        epsg: Some(4326),
        name: "WGS 84",
        transform: wgs84,
    },
    CrsDefinition {
        crs: Crs::WebMercator,
        epsg: Some(3857),
        name: "WGS 84 / Pseudo-Mercator",
        transform: web_mercator,
    },
    CrsDefinition {
        crs: Crs::Utm29N,
        epsg: Some(32629),
        name: "WGS 84 / UTM zone 29N",
        transform: utm_29n,
    },
    CrsDefinition {
        crs: Crs::Utm30N,
        epsg: Some(32630),
        name: "WGS 84 / UTM zone 30N",
        transform: utm_30n,
    },
    CrsDefinition {
        crs: Crs::MerchichNord,
        epsg: Some(26191),
        name: lambert::NORD_MAROC.name,
        transform: merchich_nord,
    },
    CrsDefinition {
        crs: Crs::MerchichSud,
        epsg: Some(26192),
        name: lambert::SUD_MAROC.name,
        transform: merchich_sud,
    },
    CrsDefinition {
        crs: Crs::MerchichSahara,
        epsg: Some(26193),
        name: lambert::SAHARA.name,
        transform: merchich_sahara,
    },
    CrsDefinition {
        crs: Crs::LocalMeters,
        epsg: None,
        name: "Local meters (empirical)",
        transform: local_meters,
    },
];

fn wgs84(x: f64, y: f64) -> Result<Geographic, ProjectionError> {
    Ok(Geographic::from_degrees(x, y))
}

fn web_mercator(x: f64, y: f64) -> Result<Geographic, ProjectionError> {
    Ok(mercator::web_mercator_to_geographic(x, y))
}

fn utm_29n(x: f64, y: f64) -> Result<Geographic, ProjectionError> {
    utm::utm_to_geographic(x, y, 29, false)
}

fn utm_30n(x: f64, y: f64) -> Result<Geographic, ProjectionError> {
    utm::utm_to_geographic(x, y, 30, false)
}

fn merchich_nord(x: f64, y: f64) -> Result<Geographic, ProjectionError> {
    lambert::lambert_to_geographic(x, y, &lambert::NORD_MAROC).map(datum::merchich_to_wgs84)
}

fn merchich_sud(x: f64, y: f64) -> Result<Geographic, ProjectionError> {
    lambert::lambert_to_geographic(x, y, &lambert::SUD_MAROC).map(datum::merchich_to_wgs84)
}

fn merchich_sahara(x: f64, y: f64) -> Result<Geographic, ProjectionError> {
    lambert::lambert_to_geographic(x, y, &lambert::SAHARA).map(datum::merchich_to_wgs84)
}

fn local_meters(x: f64, y: f64) -> Result<Geographic, ProjectionError> {
    Ok(empirical::local_meters_to_geographic(x, y))
}

impl Crs {
    /// Définition dans la table
    pub fn definition(self) -> &'static CrsDefinition {
        &CRS_TABLE[self as usize]
    }

    pub fn epsg(self) -> Option<u32> {
        self.definition().epsg
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Recherche par code EPSG
    pub fn from_epsg(code: u32) -> Option<Crs> {
        CRS_TABLE
            .iter()
            .find(|def| def.epsg == Some(code))
            .map(|def| def.crs)
    }

    /// Transforme (x, y) vers WGS84 (lon, lat) en degrés
    pub fn to_wgs84(self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite { crs: self.name() });
        }

        // Identité exacte, sans aller-retour par les radians
        if self == Crs::Wgs84 {
            return Ok((x, y));
        }

        let (lon, lat) = (self.definition().transform)(x, y)?.to_degrees();

        if lon.is_finite() && lat.is_finite() {
            Ok((lon, lat))
        } else {
            Err(ProjectionError::NonFinite { crs: self.name() })
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.epsg() {
            Some(code) => write!(f, "EPSG:{}", code),
            None => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_enum() {
        for (i, def) in CRS_TABLE.iter().enumerate() {
            assert_eq!(def.crs as usize, i, "{}", def.name);
        }
    }

    #[test]
    fn test_from_epsg() {
        assert_eq!(Crs::from_epsg(3857), Some(Crs::WebMercator));
        assert_eq!(Crs::from_epsg(32630), Some(Crs::Utm30N));
        assert_eq!(Crs::from_epsg(26193), Some(Crs::MerchichSahara));
        assert_eq!(Crs::from_epsg(2154), None);
    }

    #[test]
    fn test_merchich_nord_to_wgs84() {
        // Rabat : -6.85°E, 34.02°N
        let (lon, lat) = Crs::MerchichNord.to_wgs84(365968.16, 381052.94).unwrap();
        assert!((lon - (-6.85)).abs() < 1e-6, "lon={}", lon);
        assert!((lat - 34.02).abs() < 1e-6, "lat={}", lat);
    }

    #[test]
    fn test_merchich_sud_to_wgs84() {
        // Marrakech : -8.0°E, 31.63°N
        let (lon, lat) = Crs::MerchichSud.to_wgs84(253161.11, 516968.47).unwrap();
        assert!((lon - (-8.0)).abs() < 1e-6, "lon={}", lon);
        assert!((lat - 31.63).abs() < 1e-6, "lat={}", lat);
    }

    #[test]
    fn test_merchich_sahara_to_wgs84() {
        let (lon, lat) = Crs::MerchichSahara.to_wgs84(427326.60, 539680.20).unwrap();
        assert!((lon - (-13.2)).abs() < 1e-6, "lon={}", lon);
        assert!((lat - 27.15).abs() < 1e-6, "lat={}", lat);
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        assert!(Crs::Utm29N.to_wgs84(f64::NAN, 0.0).is_err());
        assert!(Crs::WebMercator.to_wgs84(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Crs::Utm29N.to_string(), "EPSG:32629");
        assert_eq!(Crs::LocalMeters.to_string(), "Local meters (empirical)");
    }
}
