//! Validation de plausibilité géographique
//!
//! Une coordonnée WGS84 n'est acceptée que si elle tombe dans la boîte
//! englobante de la zone d'exploitation (bornes incluses).

use serde::Serialize;

/// Boîte englobante en degrés WGS84
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Zone d'exploitation (Maroc)
    pub const OPERATING_REGION: BoundingBox = BoundingBox {
        min_lon: -10.0,
        max_lon: -1.0,
        min_lat: 27.0,
        max_lat: 37.0,
    };

    /// Bornes incluses ; NaN n'est jamais contenu
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }
}

/// Vrai si (lon, lat) est dans la zone d'exploitation
pub fn is_plausible(lon: f64, lat: f64) -> bool {
    BoundingBox::OPERATING_REGION.contains(lon, lat)
}
