//! Lecture des géométries WKT / EWKT (`SRID=3857;POINT (x y)`)
//!
//! Seuls POINT et LINESTRING sont acceptés. Les ordonnées supplémentaires
//! (Z, M) d'un tuple sont ignorées.

use memchr::{memchr, memrchr};

use crate::types::DecodedPoint;
use crate::DecodeError;

/// Type de géométrie annoncé par le mot-clé WKT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WktType {
    Point,
    LineString,
}

/// En-tête WKT : type, SRID éventuel et position de la parenthèse ouvrante
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WktHeader {
    pub geometry: WktType,
    pub srid: Option<u32>,
    open_paren: usize,
}

/// Retire un préfixe sans tenir compte de la casse ASCII
pub(crate) fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

/// Analyse l'en-tête `[SRID=n;]POINT(` ou `[SRID=n;]LINESTRING (`
pub fn parse_header(text: &str) -> Option<WktHeader> {
    let trimmed = text.trim_start();
    let offset = text.len() - trimmed.len();

    let (srid, rest) = match strip_prefix_ci(trimmed, "SRID=") {
        Some(after) => {
            let semicolon = memchr(b';', after.as_bytes())?;
            let srid: u32 = after[..semicolon].trim().parse().ok()?;
            (Some(srid), after[semicolon + 1..].trim_start())
        }
        None => (None, trimmed),
    };

    let (geometry, after_keyword) = if let Some(after) = strip_prefix_ci(rest, "POINT") {
        (WktType::Point, after)
    } else if let Some(after) = strip_prefix_ci(rest, "LINESTRING") {
        (WktType::LineString, after)
    } else {
        return None;
    };

    let body = after_keyword.trim_start();
    if !body.starts_with('(') {
        return None;
    }

    Some(WktHeader {
        geometry,
        srid,
        open_paren: offset + (trimmed.len() - body.len()),
    })
}

/// Extrait les tuples de coordonnées entre parenthèses
fn parse_body(text: &str, header: &WktHeader) -> Result<Vec<DecodedPoint>, DecodeError> {
    let bytes = text.as_bytes();
    let close = memrchr(b')', bytes)
        .filter(|&pos| pos > header.open_paren)
        .ok_or_else(|| DecodeError::malformed_text("missing closing parenthesis"))?;

    if !text[close + 1..].trim().is_empty() {
        return Err(DecodeError::malformed_text(
            "unexpected content after closing parenthesis",
        ));
    }

    let body = &text[header.open_paren + 1..close];
    if body.trim().is_empty() {
        return Err(DecodeError::malformed_text("empty coordinate list"));
    }

    body.split(',').map(parse_tuple).collect()
}

/// Parse un tuple "x y [z [m]]"
fn parse_tuple(tuple: &str) -> Result<DecodedPoint, DecodeError> {
    let mut ordinates = tuple.split_ascii_whitespace();

    let mut next = |axis: &str| -> Result<f64, DecodeError> {
        let token = ordinates.next().ok_or_else(|| {
            DecodeError::malformed_text(format!("missing {} ordinate in '{}'", axis, tuple.trim()))
        })?;
        fast_float::parse::<f64, _>(token)
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DecodeError::malformed_text(format!("invalid number '{}'", token)))
    };

    let x = next("x")?;
    let y = next("y")?;
    Ok(DecodedPoint::new(x, y))
}

/// Parse un POINT WKT
pub fn parse_point(text: &str) -> Result<(DecodedPoint, Option<u32>), DecodeError> {
    let header = parse_header(text).ok_or(DecodeError::UnrecognizedFormat)?;
    if header.geometry != WktType::Point {
        return Err(DecodeError::UnexpectedKind {
            expected: "POINT",
            found: "LINESTRING",
        });
    }

    let mut coords = parse_body(text, &header)?;
    if coords.len() != 1 {
        return Err(DecodeError::malformed_text(format!(
            "POINT with {} coordinate tuples",
            coords.len()
        )));
    }
    Ok((coords.remove(0), header.srid))
}

/// Parse une LINESTRING WKT
pub fn parse_linestring(text: &str) -> Result<(Vec<DecodedPoint>, Option<u32>), DecodeError> {
    let header = parse_header(text).ok_or(DecodeError::UnrecognizedFormat)?;
    if header.geometry != WktType::LineString {
        return Err(DecodeError::UnexpectedKind {
            expected: "LINESTRING",
            found: "POINT",
        });
    }

    let coords = parse_body(text, &header)?;
    Ok((coords, header.srid))
}
