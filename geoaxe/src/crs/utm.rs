//! Projection UTM (Universal Transverse Mercator) sur l'ellipsoïde WGS84
//!
//! Zones utilisées dans la zone d'exploitation :
//! - Zone 29N (EPSG:32629) - Ouest du Maroc
//! - Zone 30N (EPSG:32630) - Est du Maroc

use super::ellipsoid::WGS84;
use super::{Geographic, ProjectionError};

/// Facteur d'échelle sur le méridien central
const K0: f64 = 0.9996;

/// False easting
const X0: f64 = 500000.0;

/// Longitude centrale d'une zone, en degrés
pub fn central_meridian(zone: u32) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// Convertit UTM vers coordonnées géographiques WGS84
pub fn utm_to_geographic(
    x: f64,
    y: f64,
    zone: u32,
    south: bool,
) -> Result<Geographic, ProjectionError> {
    if !(1..=60).contains(&zone) {
        return Err(ProjectionError::OutOfDomain {
            crs: "UTM",
            reason: format!("zone {} does not exist", zone),
        });
    }

    let a = WGS84::A;
    let e2 = WGS84::E2;
    let ep2 = WGS84::EP2;

    let y0 = if south { 10000000.0 } else { 0.0 }; // False northing
    let lon0 = central_meridian(zone).to_radians();

    // Coordonnées réduites
    let x = x - X0;
    let y = y - y0;

    // Latitude de pied (footprint latitude)
    let m = y / K0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
    let t1 = tan_phi1.powi(2);
    let c1 = ep2 * cos_phi1.powi(2);
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                    - 252.0 * ep2
                    - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    Ok(Geographic::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_meridians() {
        assert_eq!(central_meridian(29), -9.0);
        assert_eq!(central_meridian(30), -3.0);
    }

    #[test]
    fn test_casablanca_29n() {
        // Casablanca : -7.59°E, 33.57°N
        let geo = utm_to_geographic(630868.0, 3715370.6, 29, false).unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - (-7.59)).abs() < 1e-4, "lon={}", lon);
        assert!((lat - 33.57).abs() < 1e-4, "lat={}", lat);
    }

    #[test]
    fn test_fes_30n() {
        // Fès : -5.0°E, 34.03°N
        let geo = utm_to_geographic(315355.2, 3767286.3, 30, false).unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - (-5.0)).abs() < 1e-4, "lon={}", lon);
        assert!((lat - 34.03).abs() < 1e-4, "lat={}", lat);
    }

    #[test]
    fn test_same_coordinates_shift_by_one_zone() {
        let (lon29, lat29) = utm_to_geographic(315355.2, 3767286.3, 29, false)
            .unwrap()
            .to_degrees();
        let (lon30, lat30) = utm_to_geographic(315355.2, 3767286.3, 30, false)
            .unwrap()
            .to_degrees();

        assert!((lon30 - lon29 - 6.0).abs() < 1e-9);
        assert!((lat30 - lat29).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_zone() {
        assert!(utm_to_geographic(500000.0, 0.0, 0, false).is_err());
        assert!(utm_to_geographic(500000.0, 0.0, 61, false).is_err());
    }
}
