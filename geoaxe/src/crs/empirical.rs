//! Conversion empirique du système métrique local (SRID marqué `110F`)
//!
//! Certains enregistrements portent des coordonnées planes en mètres dans un
//! système non standard. Une mise à l'échelle linéaire, corrigée par bande de
//! latitude, donne une position approchée.

use super::Geographic;

/// Mètres par degré de longitude
pub const METERS_PER_DEGREE_LON: f64 = 112202.79;

/// Mètres par degré de latitude
pub const METERS_PER_DEGREE_LAT: f64 = 118170.71;

/// Facteur de correction de la latitude selon la bande
fn latitude_correction(lat_base: f64) -> f64 {
    if lat_base > 36.0 {
        0.98
    } else if lat_base > 35.5 {
        0.99
    } else {
        1.0
    }
}

/// Convertit des mètres locaux en degrés (lon, lat)
pub fn local_meters_to_degrees(x: f64, y: f64) -> (f64, f64) {
    let lon = x / METERS_PER_DEGREE_LON;
    let lat_base = y / METERS_PER_DEGREE_LAT;
    (lon, lat_base * latitude_correction(lat_base))
}

/// Convertit des mètres locaux en coordonnées géographiques
pub fn local_meters_to_geographic(x: f64, y: f64) -> Geographic {
    let (lon, lat) = local_meters_to_degrees(x, y);
    Geographic::from_degrees(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale_below_bands() {
        let (lon, lat) = local_meters_to_degrees(-846028.13, 3973881.01);
        assert!((lon - (-7.540170)).abs() < 1e-6, "lon={}", lon);
        assert!((lat - 33.628308).abs() < 1e-6, "lat={}", lat);
    }

    #[test]
    fn test_latitude_bands() {
        // Bande 35.5..36 : facteur 0.99
        let (_, lat) = local_meters_to_degrees(0.0, 4220000.0);
        assert!((lat - 35.353938).abs() < 1e-6, "lat={}", lat);

        // Au-delà de 36 : facteur 0.98
        let (_, lat) = local_meters_to_degrees(0.0, 4300000.0);
        assert!((lat - 35.660275).abs() < 1e-6, "lat={}", lat);
    }

    #[test]
    fn test_band_limits_are_exclusive() {
        assert_eq!(latitude_correction(35.5), 1.0);
        assert_eq!(latitude_correction(36.0), 0.99);
        assert_eq!(latitude_correction(36.000001), 0.98);
    }
}
