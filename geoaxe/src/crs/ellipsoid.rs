//! Définitions des ellipsoïdes

/// Ellipsoïde WGS84
pub struct WGS84;

impl WGS84 {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub const A: f64 = 6378137.0;

    /// Aplatissement
    pub const F: f64 = 1.0 / 298.257223563;

    /// Première excentricité au carré
    pub const E2: f64 = 2.0 * Self::F - Self::F * Self::F;

    /// Première excentricité
    pub const E: f64 = 0.0818191908426215; // sqrt(E2)

    /// Deuxième excentricité au carré
    pub const EP2: f64 = Self::E2 / (1.0 - Self::E2);
}

/// Ellipsoïde Clarke 1880 (IGN), support du datum Merchich
pub struct Clarke1880Ign;

impl Clarke1880Ign {
    /// Demi-grand axe en mètres
    pub const A: f64 = 6378249.2;

    /// Demi-petit axe en mètres
    pub const B: f64 = 6356515.0;

    /// Aplatissement
    pub const F: f64 = (Self::A - Self::B) / Self::A;

    /// Première excentricité au carré
    pub const E2: f64 = 2.0 * Self::F - Self::F * Self::F;

    /// Première excentricité
    pub const E: f64 = 0.08248325676341796; // sqrt(E2)
}
