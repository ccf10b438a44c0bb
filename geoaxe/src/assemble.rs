//! Assemblage des segments d'un axe ferroviaire en une polyligne
//!
//! Les segments d'un même axe sont stockés indépendamment. Ils sont triés par
//! position de début (tri stable), décodés, concaténés, puis les points
//! répétés aux jonctions sont fusionnés.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decode::Decoder;
use crate::types::{collapse_duplicates, AxisSegment, GeoPoint, Polyline, RawGeometry};
use crate::validate::is_plausible;
use crate::{AssemblyError, DecodeError};

/// Décodage d'un segment en suite de points
pub trait SegmentDecoder {
    fn decode_segment(&self, geometry: &RawGeometry) -> Result<Vec<GeoPoint>, DecodeError>;
}

impl SegmentDecoder for Decoder {
    fn decode_segment(&self, geometry: &RawGeometry) -> Result<Vec<GeoPoint>, DecodeError> {
        self.decode_points(geometry)
    }
}

impl<F> SegmentDecoder for F
where
    F: Fn(&RawGeometry) -> Result<Vec<GeoPoint>, DecodeError>,
{
    fn decode_segment(&self, geometry: &RawGeometry) -> Result<Vec<GeoPoint>, DecodeError> {
        self(geometry)
    }
}

/// Options de l'assembleur
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerOptions {
    /// Retire les points non validés situés hors de la zone d'exploitation
    pub drop_implausible: bool,
}

/// Résultat de l'assemblage d'un axe
#[derive(Debug, Clone, PartialEq)]
pub struct AxisAssembly {
    pub axis: String,
    pub segment_count: usize,
    pub failed_segments: usize,
    pub result: Result<Polyline, AssemblyError>,
}

impl AxisAssembly {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Assembleur de segments
pub struct Assembler<D> {
    decoder: D,
    options: AssemblerOptions,
}

impl<D: SegmentDecoder> Assembler<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            options: AssemblerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AssemblerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Assemble les segments d'un seul axe
    ///
    /// Les segments qui échouent au décodage sont ignorés et comptés ; une
    /// polyligne de moins de 2 points est une erreur.
    pub fn assemble(&self, segments: Vec<AxisSegment>) -> Result<Polyline, AssemblyError> {
        let axis = match segments.first() {
            Some(first) => first.axis.clone(),
            None => {
                return Err(AssemblyError::InsufficientPoints {
                    axis: String::new(),
                    points: 0,
                    failed_segments: 0,
                })
            }
        };

        if let Some(other) = segments.iter().find(|s| s.axis != axis) {
            return Err(AssemblyError::MixedAxes {
                expected: axis,
                found: other.axis.clone(),
            });
        }

        self.assemble_group(axis, segments).0
    }

    /// Assemble un groupe homogène ; renvoie aussi le nombre de segments en échec
    fn assemble_group(
        &self,
        axis: String,
        mut segments: Vec<AxisSegment>,
    ) -> (Result<Polyline, AssemblyError>, usize) {
        // sort_by est stable : les ex aequo gardent l'ordre d'entrée
        segments.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));

        let mut points = Vec::new();
        let mut failed_segments = 0;

        for segment in &segments {
            match self.decoder.decode_segment(&segment.geometry) {
                Ok(decoded) => points.extend(decoded),
                Err(e) => {
                    failed_segments += 1;
                    warn!(
                        axis = %axis,
                        reference_start = ?segment.reference_start,
                        error = %e,
                        "Segment skipped"
                    );
                }
            }
        }

        if self.options.drop_implausible {
            let before = points.len();
            points.retain(|p| p.is_validated() || is_plausible(p.lon(), p.lat()));
            if points.len() < before {
                debug!(axis = %axis, dropped = before - points.len(), "Implausible points dropped");
            }
        }

        collapse_duplicates(&mut points);

        let point_count = points.len();
        let result = Polyline::new(points).map_err(|_| AssemblyError::InsufficientPoints {
            axis,
            points: point_count,
            failed_segments,
        });
        (result, failed_segments)
    }

    /// Assemble un groupe déjà formé (voir [`group_by_axis`])
    ///
    /// Les segments sont rattachés à `axis` sans contrôle de leur propre nom.
    pub fn assemble_axis(
        &self,
        axis: impl Into<String>,
        segments: Vec<AxisSegment>,
    ) -> AxisAssembly {
        let axis = axis.into();
        let segment_count = segments.len();
        let (result, failed_segments) = self.assemble_group(axis.clone(), segments);
        AxisAssembly {
            axis,
            segment_count,
            failed_segments,
            result,
        }
    }

    /// Regroupe les segments par axe (ordre de première apparition) et les assemble
    pub fn assemble_all(&self, segments: Vec<AxisSegment>) -> Vec<AxisAssembly> {
        group_by_axis(segments)
            .into_iter()
            .map(|(axis, group)| self.assemble_axis(axis, group))
            .collect()
    }
}

/// Regroupe les segments par axe, dans l'ordre de première apparition
pub fn group_by_axis(segments: Vec<AxisSegment>) -> Vec<(String, Vec<AxisSegment>)> {
    let mut groups: Vec<(String, Vec<AxisSegment>)> = Vec::new();
    for segment in segments {
        match groups.iter_mut().find(|(name, _)| *name == segment.axis) {
            Some((_, group)) => group.push(segment),
            None => groups.push((segment.axis.clone(), vec![segment])),
        }
    }
    groups
}
