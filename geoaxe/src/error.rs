//! Types d'erreurs pour le crate geoaxe

use thiserror::Error;

/// Erreurs pouvant survenir lors du décodage d'une géométrie
///
/// Toutes ces erreurs sont locales à la géométrie traitée : elles ne doivent
/// jamais interrompre le traitement des lignes voisines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Le sniffer n'a reconnu aucun format
    #[error("Unrecognized geometry format")]
    UnrecognizedFormat,

    /// Hexadécimal invalide ou longueur incohérente avec le type déclaré
    #[error("Malformed WKB: {0}")]
    MalformedBinary(String),

    /// Texte WKT illisible
    #[error("Malformed WKT: {0}")]
    MalformedText(String),

    /// SRID sans transformation connue
    #[error("Unsupported SRID: {0}")]
    UnsupportedSrid(u32),

    /// Aucun candidat de la chaîne n'a produit de coordonnée plausible
    #[error("No CRS candidate of chain '{chain}' produced a plausible coordinate")]
    ReprojectionExhausted { chain: &'static str },

    /// Ligne avec moins de 2 points après filtrage
    #[error("Line has {found} distinct point(s), at least 2 are required")]
    InsufficientPoints { found: usize },

    /// Type de géométrie inattendu (ex: LineString demandée, Point reçu)
    #[error("Expected {expected}, found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },
}

impl DecodeError {
    /// Crée une erreur WKB avec contexte
    pub fn malformed_binary(reason: impl Into<String>) -> Self {
        Self::MalformedBinary(reason.into())
    }

    /// Crée une erreur WKT avec contexte
    pub fn malformed_text(reason: impl Into<String>) -> Self {
        Self::MalformedText(reason.into())
    }

    /// Vrai si le contenu stocké est abîmé (par opposition à inconnu ou hors zone)
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedBinary(_) | Self::MalformedText(_))
    }
}

/// Erreurs d'assemblage d'un axe
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    /// L'axe n'a pas assez de points pour former une polyligne
    #[error("Axis '{axis}' has {points} point(s) after assembly ({failed_segments} segment(s) failed to decode)")]
    InsufficientPoints {
        axis: String,
        points: usize,
        failed_segments: usize,
    },

    /// Segments appartenant à plusieurs axes passés à un assemblage mono-axe
    #[error("Segment of axis '{found}' mixed into axis '{expected}'")]
    MixedAxes { expected: String, found: String },
}

impl AssemblyError {
    /// Nom de l'axe concerné
    pub fn axis(&self) -> &str {
        match self {
            Self::InsufficientPoints { axis, .. } => axis,
            Self::MixedAxes { expected, .. } => expected,
        }
    }
}
