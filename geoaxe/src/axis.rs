//! Métadonnées d'axe : catégorie, couleur d'affichage, étendue kilométrique

use serde::Serialize;

use crate::types::AxisSegment;

/// Catégorie d'un axe, déduite de son nom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// Ligne à grande vitesse
    HighSpeed,
    /// Raccordement ou triangle de retournement
    Junction,
    /// Desserte urbaine
    Urban,
    Conventional,
}

impl AxisKind {
    /// Classe un nom d'axe (sensible à la casse)
    pub fn classify(name: &str) -> AxisKind {
        if name.contains("LGV") {
            AxisKind::HighSpeed
        } else if name.contains("RAC") || name.contains("TRIANGLE") {
            AxisKind::Junction
        } else if name.contains('U') {
            AxisKind::Urban
        } else {
            AxisKind::Conventional
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AxisKind::HighSpeed => "high_speed",
            AxisKind::Junction => "junction",
            AxisKind::Urban => "urban",
            AxisKind::Conventional => "conventional",
        }
    }
}

/// Couleur `#rrggbb` stable dérivée du nom de l'axe
pub fn axis_color(name: &str) -> String {
    let hash = blake3::hash(name.as_bytes());
    format!("#{}", &hash.to_hex()[..6])
}

/// Résumé d'un axe pour l'affichage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSummary {
    pub name: String,
    pub kind: AxisKind,
    pub color: String,
    pub segment_count: usize,
    /// Plus petite position de début
    pub reference_start: Option<f64>,
    /// Plus grande position de fin
    pub reference_end: Option<f64>,
}

impl AxisSummary {
    /// Résume les segments d'un axe (tous supposés porter le même nom)
    pub fn from_segments(name: &str, segments: &[AxisSegment]) -> Self {
        let reference_start = segments
            .iter()
            .filter_map(|s| s.reference_start)
            .min_by(f64::total_cmp);
        let reference_end = segments
            .iter()
            .filter_map(|s| s.reference_end)
            .max_by(f64::total_cmp);

        Self {
            name: name.to_string(),
            kind: AxisKind::classify(name),
            color: axis_color(name),
            segment_count: segments.len(),
            reference_start,
            reference_end,
        }
    }

    /// Longueur couverte en unités de référence (PK)
    pub fn reference_span(&self) -> Option<f64> {
        match (self.reference_start, self.reference_end) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }
}
