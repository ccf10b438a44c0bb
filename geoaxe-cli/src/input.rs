//! Lecture des lignes exportées de la base (tableau JSON)
//!
//! Chaque ligne porte une géométrie brute et, pour les arcs, le nom de l'axe
//! et les positions kilométriques de début et de fin :
//!
//! ```json
//! [{"id": 12, "geometry": "0102000020...", "nom_axe": "CASA-RABAT", "pk_debut": "12,5", "pk_fin": 18}]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use geoaxe::{parse_reference, AxisSegment, RawGeometry};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Ligne d'entrée
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputRow {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub id: Option<String>,

    #[serde(default)]
    pub geometry: Option<String>,

    #[serde(default, alias = "nom_axe")]
    pub axis: Option<String>,

    #[serde(default, alias = "pk_debut", deserialize_with = "reference")]
    pub reference_start: Option<f64>,

    #[serde(default, alias = "pk_fin", deserialize_with = "reference")]
    pub reference_end: Option<f64>,
}

impl InputRow {
    /// Identifiant affiché : `id` ou `#index`
    pub fn label(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| format!("#{}", index))
    }

    pub fn raw_geometry(&self) -> Option<RawGeometry> {
        self.geometry
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .map(RawGeometry::from)
    }

    /// Segment d'axe ; `None` si la ligne n'a pas d'axe
    pub fn to_segment(&self) -> Option<AxisSegment> {
        let axis = self.axis.as_deref()?;
        Some(
            AxisSegment::new(
                axis,
                self.reference_start,
                self.geometry.clone().unwrap_or_default(),
            )
            .with_reference_end(self.reference_end),
        )
    }
}

/// Accepte un identifiant numérique ou texte
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Position kilométrique : nombre, ou texte ("12.5", "12,5") ; illisible → None
fn reference<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => parse_reference(&s),
        _ => None,
    })
}

/// Charge un fichier de lignes
pub fn load_rows(path: &Path) -> Result<Vec<InputRow>> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read input file: {}", path.display()))?;
    parse_rows(&content).context(format!("Failed to parse input rows: {}", path.display()))
}

pub fn parse_rows(json: &str) -> Result<Vec<InputRow>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_with_aliases() {
        let rows = parse_rows(
            r#"[
                {"id": 12, "geometry": "POINT(1 2)", "nom_axe": "A", "pk_debut": "12,5", "pk_fin": 18},
                {"id": "x", "geometry": null, "axis": "B", "reference_start": 3},
                {"geometry": "", "pk_debut": "n/a"}
            ]"#,
        )
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id.as_deref(), Some("12"));
        assert_eq!(rows[0].axis.as_deref(), Some("A"));
        assert_eq!(rows[0].reference_start, Some(12.5));
        assert_eq!(rows[0].reference_end, Some(18.0));

        assert_eq!(rows[1].id.as_deref(), Some("x"));
        assert!(rows[1].raw_geometry().is_none());
        assert_eq!(rows[1].reference_start, Some(3.0));

        assert_eq!(rows[2].label(2), "#2");
        assert!(rows[2].raw_geometry().is_none());
        assert_eq!(rows[2].reference_start, None);
        assert!(rows[2].to_segment().is_none());
    }

    #[test]
    fn test_to_segment() {
        let row = InputRow {
            axis: Some("LGV".to_string()),
            reference_start: Some(1.0),
            reference_end: Some(2.0),
            geometry: Some("LINESTRING(1 2, 3 4)".to_string()),
            ..Default::default()
        };
        let segment = row.to_segment().unwrap();
        assert_eq!(segment.axis, "LGV");
        assert_eq!(segment.reference_end, Some(2.0));
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_rows("{not json").is_err());
    }
}
