//! Rapport de décodage avec graceful degradation
//!
//! Les échecs sont locaux à une ligne ou à un axe : ils sont collectés ici
//! au lieu d'interrompre le traitement.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Statut global du traitement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecodeStatus {
    /// Toutes les lignes décodées
    Success,
    /// Une partie des lignes ou des axes en échec
    PartialSuccess,
    /// Rien n'a pu être décodé
    Failed,
}

/// Niveau de sévérité
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorLevel {
    /// Entité sans géométrie
    Error,
    /// Entité exportée avec dégradation (meilleur effort, sentinelle)
    Warning,
}

/// Problème rencontré sur une ligne ou un axe
#[derive(Debug, Clone, Serialize)]
pub struct DecodeIssue {
    pub level: ErrorLevel,
    /// Identifiant de la ligne (optionnel)
    pub row: Option<String>,
    /// Nom de l'axe (optionnel)
    pub axis: Option<String>,
    /// Format détecté (`GeometryKind::label`)
    pub kind: Option<String>,
    pub message: String,
}

impl DecodeIssue {
    pub fn row(level: ErrorLevel, row: &str, kind: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            row: Some(row.to_string()),
            axis: None,
            kind: Some(kind.to_string()),
            message: message.into(),
        }
    }

    pub fn axis(level: ErrorLevel, axis: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            row: None,
            axis: Some(axis.to_string()),
            kind: None,
            message: message.into(),
        }
    }

    fn location(&self) -> String {
        match (&self.axis, &self.row) {
            (Some(a), Some(r)) => format!("[{}:{}]", a, r),
            (Some(a), None) => format!("[{}]", a),
            (None, Some(r)) => format!("[{}]", r),
            _ => String::new(),
        }
    }
}

/// Statistiques par format détecté
#[derive(Debug, Clone, Default, Serialize)]
pub struct KindStats {
    pub decoded: usize,
    pub failed: usize,
}

impl KindStats {
    pub fn total(&self) -> usize {
        self.decoded + self.failed
    }
}

/// Rapport complet d'une commande
#[derive(Debug, Clone, Serialize)]
pub struct DecodeReport {
    /// Commande exécutée (`points`, `axes`)
    pub command: String,
    /// Fichier d'entrée
    pub input: String,
    pub duration_secs: f64,
    pub status: DecodeStatus,

    // Compteurs globaux
    pub rows: usize,
    pub decoded: usize,
    pub failed: usize,
    /// Géométries non validées, exportées faute de mieux
    pub best_effort: usize,
    /// Points remplacés par la sentinelle
    pub sentinel: usize,
    pub axes_assembled: usize,
    pub axes_failed: usize,

    /// Statistiques par format
    pub by_kind: HashMap<String, KindStats>,

    pub errors: Vec<DecodeIssue>,
    pub warnings: Vec<DecodeIssue>,
}

impl Default for DecodeReport {
    fn default() -> Self {
        Self {
            command: String::new(),
            input: String::new(),
            duration_secs: 0.0,
            status: DecodeStatus::Success,
            rows: 0,
            decoded: 0,
            failed: 0,
            best_effort: 0,
            sentinel: 0,
            axes_assembled: 0,
            axes_failed: 0,
            by_kind: HashMap::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl DecodeReport {
    pub fn new(command: &str, input: &Path) -> Self {
        Self {
            command: command.to_string(),
            input: input.display().to_string(),
            ..Default::default()
        }
    }

    /// Enregistre une géométrie décodée
    pub fn record_decoded(&mut self, kind: &str) {
        self.decoded += 1;
        self.by_kind.entry(kind.to_string()).or_default().decoded += 1;
    }

    /// Enregistre une géométrie exportée en meilleur effort
    pub fn record_best_effort(&mut self, warning: DecodeIssue) {
        self.best_effort += 1;
        self.warnings.push(warning);
    }

    /// Enregistre un point remplacé par la sentinelle
    pub fn record_sentinel(&mut self, warning: DecodeIssue) {
        self.sentinel += 1;
        self.warnings.push(warning);
    }

    /// Enregistre une ligne en échec
    pub fn record_error(&mut self, error: DecodeIssue) {
        self.failed += 1;
        if let Some(ref kind) = error.kind {
            self.by_kind.entry(kind.clone()).or_default().failed += 1;
        }
        self.errors.push(error);
    }

    pub fn record_warning(&mut self, warning: DecodeIssue) {
        self.warnings.push(warning);
    }

    /// Segments d'un axe : décodés ou ignorés à l'assemblage
    pub fn record_axis_segments(&mut self, axis: &str, decoded: usize, failed: usize) {
        self.decoded += decoded;
        self.failed += failed;
        if failed > 0 {
            self.warnings.push(DecodeIssue::axis(
                ErrorLevel::Warning,
                axis,
                format!("{} segment(s) skipped", failed),
            ));
        }
    }

    pub fn record_axis_success(&mut self) {
        self.axes_assembled += 1;
    }

    pub fn record_axis_failure(&mut self, axis: &str, message: &str) {
        self.axes_failed += 1;
        self.errors
            .push(DecodeIssue::axis(ErrorLevel::Error, axis, message));
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        let has_errors = !self.errors.is_empty();
        let has_success = self.decoded > 0 || self.axes_assembled > 0;

        self.status = if has_errors && has_success {
            DecodeStatus::PartialSuccess
        } else if has_errors {
            DecodeStatus::Failed
        } else {
            DecodeStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("DECODE REPORT - {} {}", self.command, self.input);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Rows: {} read, {} decoded, {} failed",
            self.rows, self.decoded, self.failed
        );
        println!(
            "Degraded: {} best effort, {} sentinel",
            self.best_effort, self.sentinel
        );
        if self.axes_assembled + self.axes_failed > 0 {
            println!(
                "Axes: {} assembled, {} failed",
                self.axes_assembled, self.axes_failed
            );
        }

        if !self.by_kind.is_empty() {
            println!("\n--- BY KIND ---");
            let mut kinds: Vec<_> = self.by_kind.iter().collect();
            kinds.sort_by_key(|(k, _)| k.as_str());
            for (kind, stats) in kinds {
                println!("  {}: {} decoded, {} failed", kind, stats.decoded, stats.failed);
            }
        }

        if !self.warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", self.warnings.len());
            for w in self.warnings.iter().take(10) {
                println!("  {} {}", w.location(), w.message);
            }
            if self.warnings.len() > 10 {
                println!("  ... and {} more", self.warnings.len() - 10);
            }
        }

        if !self.errors.is_empty() {
            println!("\n--- ERRORS ({}) ---", self.errors.len());
            for e in self.errors.iter().take(20) {
                println!("  {:?} {} {}", e.level, e.location(), e.message);
            }
            if self.errors.len() > 20 {
                println!("  ... and {} more", self.errors.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact
    pub fn summary(&self) -> String {
        format!(
            "{}: {} decoded, {} failed, {} best effort, {} sentinel",
            self.command, self.decoded, self.failed, self.best_effort, self.sentinel
        )
    }
}
