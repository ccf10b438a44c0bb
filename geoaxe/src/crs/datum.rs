//! Changement de datum par translation géocentrique (3 paramètres)

use super::ellipsoid::{Clarke1880Ign, WGS84};
use super::Geographic;

/// Translation Merchich → WGS84 en mètres
pub const MERCHICH_TO_WGS84: (f64, f64, f64) = (31.0, 146.0, 47.0);

/// Géographique (hauteur nulle) vers géocentrique cartésien
fn geographic_to_geocentric(geo: Geographic, a: f64, e2: f64) -> (f64, f64, f64) {
    let (sin_lat, cos_lat) = geo.lat.sin_cos();
    let (sin_lon, cos_lon) = geo.lon.sin_cos();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    (
        n * cos_lat * cos_lon,
        n * cos_lat * sin_lon,
        n * (1.0 - e2) * sin_lat,
    )
}

/// Géocentrique cartésien vers géographique (itératif, hauteur ignorée)
fn geocentric_to_geographic(x: f64, y: f64, z: f64, a: f64, e2: f64) -> Geographic {
    let lon = y.atan2(x);
    let p = x.hypot(y);
    let mut lat = z.atan2(p * (1.0 - e2));

    for _ in 0..10 {
        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let new_lat = (z + e2 * n * sin_lat).atan2(p);

        if (new_lat - lat).abs() < 1e-12 {
            lat = new_lat;
            break;
        }
        lat = new_lat;
    }

    Geographic::new(lon, lat)
}

/// Convertit une position Merchich (Clarke 1880) en WGS84
pub fn merchich_to_wgs84(geo: Geographic) -> Geographic {
    let (x, y, z) = geographic_to_geocentric(geo, Clarke1880Ign::A, Clarke1880Ign::E2);
    let (dx, dy, dz) = MERCHICH_TO_WGS84;
    geocentric_to_geographic(x + dx, y + dy, z + dz, WGS84::A, WGS84::E2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocentric_roundtrip() {
        let geo = Geographic::from_degrees(-6.85, 34.02);
        let (x, y, z) = geographic_to_geocentric(geo, WGS84::A, WGS84::E2);
        let back = geocentric_to_geographic(x, y, z, WGS84::A, WGS84::E2);
        let (lon, lat) = back.to_degrees();

        assert!((lon - (-6.85)).abs() < 1e-9, "lon={}", lon);
        assert!((lat - 34.02).abs() < 1e-9, "lat={}", lat);
    }

    #[test]
    fn test_merchich_shift_magnitude() {
        // Rabat : le décalage Merchich → WGS84 est d'environ +0.0016° en longitude
        // et -0.0026° en latitude
        let geo = Geographic::from_degrees(-6.8516095, 34.0226350);
        let (lon, lat) = merchich_to_wgs84(geo).to_degrees();

        assert!((lon - (-6.85)).abs() < 1e-5, "lon={}", lon);
        assert!((lat - 34.02).abs() < 1e-5, "lat={}", lat);
    }
}
