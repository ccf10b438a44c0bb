//! Définition et implémentation des commandes CLI
//!
//! - `sniff`: classe chaque ligne d'entrée
//! - `points`: décode chaque ligne en une entité (Point ou LineString)
//! - `axes`: assemble les segments par axe en une LineString par axe

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use geo::Geometry;
use geoaxe::{
    group_by_axis, Assembler, AxisAssembly, AxisSummary, Decoder, GeoPoint, GeometryKind,
    PointOrigin, Polyline,
};
use rayon::prelude::*;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::config::{Config, ExportConfig};
use crate::export::{round_geometry, write_features, ExportFeature, OutputFormat};
use crate::input::{load_rows, InputRow};
use crate::report::{DecodeIssue, DecodeReport, ErrorLevel};

#[derive(Subcommand)]
pub enum Commands {
    /// Print the detected format of each input row
    Sniff {
        /// JSON array of rows exported from the database
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Decode each row into one WGS84 feature
    Points(RunArgs),

    /// Assemble the segments of each axis into one WGS84 LineString
    Axes(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// JSON array of rows exported from the database
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "geojson")]
    pub format: OutputFormat,

    /// Config preset name (default/strict) or path to a JSON config
    #[arg(long, default_value = "default")]
    pub config: String,

    /// Write the decode report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Classe les lignes : (identifiant, format)
pub fn sniff_rows(decoder: &Decoder, rows: &[InputRow]) -> Vec<(String, GeometryKind)> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let kind = row
                .raw_geometry()
                .map(|raw| decoder.classify(&raw))
                .unwrap_or(GeometryKind::Unrecognized);
            (row.label(i), kind)
        })
        .collect()
}

pub fn cmd_sniff(input: &Path) -> Result<()> {
    let rows = load_rows(input)?;
    info!(rows = rows.len(), input = %input.display(), "Sniff");

    for (id, kind) in sniff_rows(&Decoder::default(), &rows) {
        let srid = kind
            .srid()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}\t{}\t{}", id, kind.label(), srid);
    }

    Ok(())
}

/// Dégradation d'une entité exportée
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Degradation {
    None,
    BestEffort,
    Sentinel,
}

/// Résultat du décodage d'une ligne
enum RowOutcome {
    Decoded {
        feature: ExportFeature,
        kind: &'static str,
        degradation: Degradation,
    },
    Failed {
        id: String,
        kind: &'static str,
        message: String,
    },
}

fn point_properties(kind: &GeometryKind, origin: PointOrigin) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("kind".to_string(), json!(kind.label()));
    properties.insert("origin".to_string(), json!(origin.label()));
    properties.insert("crs".to_string(), json!(origin.crs().map(|c| c.name())));
    properties
}

fn decode_row(
    decoder: &Decoder,
    export: &ExportConfig,
    row: &InputRow,
    index: usize,
) -> RowOutcome {
    let id = row.label(index);
    let Some(raw) = row.raw_geometry() else {
        return RowOutcome::Failed {
            id,
            kind: "empty",
            message: "Row has no geometry".to_string(),
        };
    };
    let kind = decoder.classify(&raw);
    let label = kind.label();

    let decoded = if kind.is_linestring() {
        decoder.decode_linestring(&raw).map(|line| line_feature(&id, &kind, &line))
    } else {
        match decoder.decode_point(&raw) {
            Err(e) if e.is_malformed() && export.sentinel => {
                debug!(row = %id, error = %e, "Sentinel substituted");
                Ok(point_feature(&id, &kind, &GeoPoint::sentinel()))
            }
            result => result.map(|point| point_feature(&id, &kind, &point)),
        }
    };

    match decoded {
        Ok((_, Degradation::BestEffort)) if !export.keep_best_effort => RowOutcome::Failed {
            id,
            kind: label,
            message: "No CRS candidate validated (best effort rejected)".to_string(),
        },
        Ok((mut feature, degradation)) => {
            feature.geometry = round_geometry(&feature.geometry, export.precision);
            RowOutcome::Decoded {
                feature,
                kind: label,
                degradation,
            }
        }
        Err(e) => RowOutcome::Failed {
            id,
            kind: label,
            message: e.to_string(),
        },
    }
}

fn point_feature(id: &str, kind: &GeometryKind, point: &GeoPoint) -> (ExportFeature, Degradation) {
    let degradation = match point.origin() {
        PointOrigin::Validated(_) => Degradation::None,
        PointOrigin::BestEffort(_) => Degradation::BestEffort,
        PointOrigin::Sentinel => Degradation::Sentinel,
    };
    let feature = ExportFeature {
        id: id.to_string(),
        geometry: Geometry::Point(point.to_point()),
        properties: point_properties(kind, point.origin()),
    };
    (feature, degradation)
}

fn line_feature(id: &str, kind: &GeometryKind, line: &Polyline) -> (ExportFeature, Degradation) {
    // Un seul CRS par ligne : la provenance du premier sommet vaut pour tous
    let first = line.points()[0].origin();
    let (origin, degradation) = if line.is_validated() {
        (first, Degradation::None)
    } else {
        match first.crs() {
            Some(crs) => (PointOrigin::BestEffort(crs), Degradation::BestEffort),
            None => (PointOrigin::Sentinel, Degradation::Sentinel),
        }
    };

    let mut properties = point_properties(kind, origin);
    properties.insert("points".to_string(), json!(line.len()));
    let feature = ExportFeature {
        id: id.to_string(),
        geometry: Geometry::LineString(line.to_line_string()),
        properties,
    };
    (feature, degradation)
}

/// Décode chaque ligne en une entité
pub fn cmd_points(args: &RunArgs) -> Result<DecodeReport> {
    let start = Instant::now();
    let config = Config::resolve(&args.config)?;
    let rows = load_rows(&args.input)?;
    let decoder = Decoder::new(config.decoder.clone());

    info!(rows = rows.len(), input = %args.input.display(), "Decoding rows");

    let mut report = DecodeReport::new("points", &args.input);
    report.rows = rows.len();

    // Lignes indépendantes : décodage parallèle, ordre d'entrée conservé
    let outcomes: Vec<RowOutcome> = rows
        .par_iter()
        .enumerate()
        .map(|(i, row)| decode_row(&decoder, &config.export, row, i))
        .collect();

    let mut features = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            RowOutcome::Decoded {
                feature,
                kind,
                degradation,
            } => {
                report.record_decoded(kind);
                match degradation {
                    Degradation::None => {}
                    Degradation::BestEffort => report.record_best_effort(DecodeIssue::row(
                        ErrorLevel::Warning,
                        &feature.id,
                        kind,
                        "Not validated by any CRS candidate, exported as best effort",
                    )),
                    Degradation::Sentinel => report.record_sentinel(DecodeIssue::row(
                        ErrorLevel::Warning,
                        &feature.id,
                        kind,
                        "Malformed geometry replaced by the sentinel point",
                    )),
                }
                features.push(feature);
            }
            RowOutcome::Failed { id, kind, message } => {
                warn!(row = %id, kind, error = %message, "Row skipped");
                report.record_error(DecodeIssue::row(ErrorLevel::Error, &id, kind, message));
            }
        }
    }

    write_features(&features, args.format, &args.output)
        .context(format!("Failed to write output: {}", args.output.display()))?;
    info!(features = features.len(), output = %args.output.display(), "Export done");

    finish_report(report, start, args.report.as_deref())
}

fn axis_feature(summary: &AxisSummary, assembly: &AxisAssembly, line: &Polyline) -> ExportFeature {
    let mut properties = Map::new();
    properties.insert("name".to_string(), json!(summary.name));
    properties.insert("kind".to_string(), json!(summary.kind.label()));
    properties.insert("color".to_string(), json!(summary.color));
    properties.insert("segment_count".to_string(), json!(assembly.segment_count));
    properties.insert("failed_segments".to_string(), json!(assembly.failed_segments));
    properties.insert("reference_start".to_string(), json!(summary.reference_start));
    properties.insert("reference_end".to_string(), json!(summary.reference_end));
    properties.insert("validated".to_string(), json!(line.is_validated()));

    ExportFeature {
        id: summary.name.clone(),
        geometry: Geometry::LineString(line.to_line_string()),
        properties,
    }
}

/// Assemble les segments de chaque axe en une entité
pub fn cmd_axes(args: &RunArgs) -> Result<DecodeReport> {
    let start = Instant::now();
    let config = Config::resolve(&args.config)?;
    let rows = load_rows(&args.input)?;
    let decoder = Decoder::new(config.decoder.clone());

    let mut report = DecodeReport::new("axes", &args.input);
    report.rows = rows.len();

    let mut segments = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        match row.to_segment() {
            Some(segment) => segments.push(segment),
            None => report.record_warning(DecodeIssue::row(
                ErrorLevel::Warning,
                &row.label(i),
                "-",
                "Row has no axis, skipped",
            )),
        }
    }

    let groups = group_by_axis(segments);
    info!(axes = groups.len(), rows = rows.len(), "Assembling axes");

    let assembler = Assembler::new(decoder).with_options(config.assembler.clone());

    // Axes indépendants : assemblage parallèle
    let assembled: Vec<(AxisSummary, AxisAssembly)> = groups
        .into_par_iter()
        .map(|(name, group)| {
            let summary = AxisSummary::from_segments(&name, &group);
            (summary, assembler.assemble_axis(name, group))
        })
        .collect();

    let mut features = Vec::with_capacity(assembled.len());
    for (summary, assembly) in &assembled {
        report.record_axis_segments(
            &assembly.axis,
            assembly.segment_count - assembly.failed_segments,
            assembly.failed_segments,
        );

        match &assembly.result {
            Ok(line) if !line.is_validated() && !config.export.keep_best_effort => {
                warn!(axis = %assembly.axis, "Axis not validated, skipped");
                report.record_axis_failure(
                    &assembly.axis,
                    "No CRS candidate validated (best effort rejected)",
                );
            }
            Ok(line) => {
                if !line.is_validated() {
                    report.record_best_effort(DecodeIssue::axis(
                        ErrorLevel::Warning,
                        &assembly.axis,
                        "Axis contains best effort points",
                    ));
                }
                report.record_axis_success();
                let mut feature = axis_feature(summary, assembly, line);
                feature.geometry = round_geometry(&feature.geometry, config.export.precision);
                features.push(feature);
            }
            Err(e) => {
                warn!(axis = %assembly.axis, error = %e, "Axis not assembled");
                report.record_axis_failure(&assembly.axis, &e.to_string());
            }
        }
    }

    write_features(&features, args.format, &args.output)
        .context(format!("Failed to write output: {}", args.output.display()))?;
    info!(axes = features.len(), output = %args.output.display(), "Export done");

    finish_report(report, start, args.report.as_deref())
}

fn finish_report(
    mut report: DecodeReport,
    start: Instant,
    report_path: Option<&Path>,
) -> Result<DecodeReport> {
    report.set_duration(start.elapsed());
    report.finalize();

    if let Some(path) = report_path {
        report
            .save_to_file(path)
            .context(format!("Failed to save report: {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    Ok(report)
}
