//! Projections Lambert du Maroc (datum Merchich)
//!
//! Lambert Conformal Conic à un parallèle standard (LCC 1SP) sur
//! l'ellipsoïde Clarke 1880 (IGN) :
//! - Nord Maroc (EPSG:26191)
//! - Sud Maroc (EPSG:26192)
//! - Sahara (EPSG:26193)
//!
//! Le résultat est exprimé sur l'ellipsoïde Clarke ; le passage au WGS84
//! se fait ensuite avec [`super::datum`].

use super::ellipsoid::Clarke1880Ign;
use super::{Geographic, ProjectionError};

/// Paramètres d'une zone Lambert (angles en degrés)
#[derive(Debug, Clone, Copy)]
pub struct LambertZone {
    pub name: &'static str,
    /// Longitude origine
    pub lon0: f64,
    /// Latitude origine (= parallèle standard)
    pub lat0: f64,
    /// Facteur d'échelle à l'origine
    pub k0: f64,
    /// False easting
    pub x0: f64,
    /// False northing
    pub y0: f64,
}

/// Merchich / Nord Maroc (37 gr, -6 gr)
pub const NORD_MAROC: LambertZone = LambertZone {
    name: "Merchich / Nord Maroc",
    lon0: -5.4,
    lat0: 33.3,
    k0: 0.999625769,
    x0: 500000.0,
    y0: 300000.0,
};

/// Merchich / Sud Maroc (33 gr, -6 gr)
pub const SUD_MAROC: LambertZone = LambertZone {
    name: "Merchich / Sud Maroc",
    lon0: -5.4,
    lat0: 29.7,
    k0: 0.999615596,
    x0: 500000.0,
    y0: 300000.0,
};

/// Merchich / Sahara (29 gr, -6 gr)
pub const SAHARA: LambertZone = LambertZone {
    name: "Merchich / Sahara",
    lon0: -5.4,
    lat0: 26.1,
    k0: 0.9996,
    x0: 1200000.0,
    y0: 400000.0,
};

/// Calcule la latitude isométrique
fn isometric_latitude(lat: f64, e: f64) -> f64 {
    let sin_lat = lat.sin();
    let term = ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).powf(e / 2.0);
    ((std::f64::consts::FRAC_PI_4 + lat / 2.0).tan() * term).ln()
}

/// Calcule la latitude depuis la latitude isométrique (itératif)
fn latitude_from_isometric(iso_lat: f64, e: f64) -> f64 {
    let mut lat = 2.0 * iso_lat.exp().atan() - std::f64::consts::FRAC_PI_2;

    for _ in 0..10 {
        let sin_lat = lat.sin();
        let term = ((1.0 + e * sin_lat) / (1.0 - e * sin_lat)).powf(e / 2.0);
        let new_lat = 2.0 * (iso_lat.exp() * term).atan() - std::f64::consts::FRAC_PI_2;

        if (new_lat - lat).abs() < 1e-12 {
            return new_lat;
        }
        lat = new_lat;
    }
    lat
}

/// Calcule la grande normale (rayon de courbure dans le plan vertical)
fn grande_normale(lat: f64, a: f64, e2: f64) -> f64 {
    a / (1.0 - e2 * lat.sin().powi(2)).sqrt()
}

/// Convertit des coordonnées Lambert vers géographiques (ellipsoïde Clarke 1880)
pub fn lambert_to_geographic(
    x: f64,
    y: f64,
    zone: &LambertZone,
) -> Result<Geographic, ProjectionError> {
    let e = Clarke1880Ign::E;
    let e2 = Clarke1880Ign::E2;
    let a = Clarke1880Ign::A;

    let lat0 = zone.lat0.to_radians();
    let lon0 = zone.lon0.to_radians();

    // Exposant de la projection (tangente : n = sin(lat0))
    let n = lat0.sin();

    // Rayon à l'origine et constante C
    let r0 = zone.k0 * grande_normale(lat0, a, e2) / lat0.tan();
    let c = r0 * (n * isometric_latitude(lat0, e)).exp();

    // Coordonnées centrées
    let dx = x - zone.x0;
    let dy = y - zone.y0;

    let r = (dx.powi(2) + (r0 - dy).powi(2)).sqrt();
    if r == 0.0 {
        return Err(ProjectionError::OutOfDomain {
            crs: zone.name,
            reason: "point at the apex of the cone".to_string(),
        });
    }

    let gamma = dx.atan2(r0 - dy);

    // Latitude isométrique
    let iso_lat = -(r / c).ln() / n;

    let lat = latitude_from_isometric(iso_lat, e);
    let lon = lon0 + gamma / n;

    Ok(Geographic::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_origin() {
        for zone in [NORD_MAROC, SUD_MAROC, SAHARA] {
            let (lon, lat) = lambert_to_geographic(zone.x0, zone.y0, &zone)
                .unwrap()
                .to_degrees();
            assert!((lon - zone.lon0).abs() < 1e-9, "{}: lon={}", zone.name, lon);
            assert!((lat - zone.lat0).abs() < 1e-9, "{}: lat={}", zone.name, lat);
        }
    }

    #[test]
    fn test_rabat_nord_maroc() {
        // Rabat, coordonnées Merchich (avant décalage de datum)
        // Attendu sur Clarke 1880 : -6.85161°E, 34.02263°N
        let (lon, lat) = lambert_to_geographic(365968.16, 381052.94, &NORD_MAROC)
            .unwrap()
            .to_degrees();

        assert!((lon - (-6.85161)).abs() < 1e-4, "lon={}", lon);
        assert!((lat - 34.02263).abs() < 1e-4, "lat={}", lat);
    }

    #[test]
    fn test_west_of_origin_has_smaller_longitude() {
        let (lon, _) = lambert_to_geographic(400000.0, 300000.0, &NORD_MAROC)
            .unwrap()
            .to_degrees();
        assert!(lon < NORD_MAROC.lon0, "lon={}", lon);
    }
}
