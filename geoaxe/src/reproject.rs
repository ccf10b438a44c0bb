//! Reprojection vers WGS84 par chaînes de repli
//!
//! Quand la géométrie ne porte pas de CRS fiable, plusieurs CRS candidats sont
//! essayés dans un ordre fixe ; le premier dont le résultat passe la
//! validation géographique ([`crate::validate`]) est retenu. Certaines chaînes
//! ont un dernier recours : si aucun candidat ne valide, le résultat de ce CRS
//! est renvoyé tel quel, marqué [`PointOrigin::BestEffort`].
//!
//! [`PointOrigin::BestEffort`]: crate::types::PointOrigin::BestEffort

use tracing::{debug, warn};

use crate::crs::Crs;
use crate::sniff::GeometryKind;
use crate::types::{DecodedPoint, GeoPoint};
use crate::DecodeError;

/// SRID par défaut de la colonne géométrique pour le WKT sans `SRID=`
pub const DEFAULT_WKT_SRID: u32 = 3857;

/// Liste ordonnée et constante de CRS candidats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackChain {
    pub name: &'static str,
    pub candidates: &'static [Crs],
    /// CRS appliqué sans validation si aucun candidat ne passe
    pub last_resort: Option<Crs>,
}

/// Géométries étiquetées 3857 : Mercator sphérique, sans repli
pub const WEB_MERCATOR: FallbackChain = FallbackChain {
    name: "web_mercator",
    candidates: &[Crs::WebMercator],
    last_resort: None,
};

/// WKB hors marqueur `110F` : UTM 29N puis 30N, 29N en dernier recours
pub const UTM_MOROCCO: FallbackChain = FallbackChain {
    name: "utm_morocco",
    candidates: &[Crs::Utm29N, Crs::Utm30N],
    last_resort: Some(Crs::Utm29N),
};

/// Point au marqueur `110F` : conversion empirique puis projections marocaines
pub const LOCAL_METERS: FallbackChain = FallbackChain {
    name: "local_meters",
    candidates: &[
        Crs::LocalMeters,
        Crs::MerchichNord,
        Crs::MerchichSud,
        Crs::MerchichSahara,
        Crs::Utm29N,
        Crs::Utm30N,
    ],
    last_resort: Some(Crs::LocalMeters),
};

impl FallbackChain {
    /// Chaîne à un seul candidat, sans dernier recours (SRID explicite)
    pub fn single(crs: Crs) -> FallbackChain {
        let candidates: &'static [Crs] = match crs {
            Crs::Wgs84 => &[Crs::Wgs84],
            Crs::WebMercator => return WEB_MERCATOR,
            Crs::Utm29N => &[Crs::Utm29N],
            Crs::Utm30N => &[Crs::Utm30N],
            Crs::MerchichNord => &[Crs::MerchichNord],
            Crs::MerchichSud => &[Crs::MerchichSud],
            Crs::MerchichSahara => &[Crs::MerchichSahara],
            Crs::LocalMeters => &[Crs::LocalMeters],
        };
        FallbackChain {
            name: crs.name(),
            candidates,
            last_resort: None,
        }
    }

    /// Premier candidat dont le résultat est plausible
    fn first_valid(&self, point: DecodedPoint) -> Option<GeoPoint> {
        self.candidates.iter().find_map(|&crs| {
            match crs.to_wgs84(point.x, point.y) {
                Ok((lon, lat)) => {
                    let validated = GeoPoint::validated(lon, lat, crs);
                    if validated.is_none() {
                        debug!(chain = self.name, %crs, lon, lat, "Candidate rejected: outside operating region");
                    }
                    validated
                }
                Err(e) => {
                    debug!(chain = self.name, %crs, error = %e, "Candidate rejected");
                    None
                }
            }
        })
    }
}

/// Choisit la chaîne de repli selon le type
///
/// - Point au marqueur `110F` → [`LOCAL_METERS`]
/// - tout autre WKB → [`UTM_MOROCCO`], quel que soit le SRID de l'en-tête
///   (il n'est pas fiable dans la colonne)
/// - WKT : 3857 → [`WEB_MERCATOR`], autre SRID connu → ce CRS seul,
///   SRID inconnu → [`DecodeError::UnsupportedSrid`]
pub fn chain_for(kind: &GeometryKind, wkt_default_srid: u32) -> Result<FallbackChain, DecodeError> {
    match *kind {
        GeometryKind::WkbLocalMetersPoint => Ok(LOCAL_METERS),
        GeometryKind::WkbPoint { .. } | GeometryKind::WkbLineString { .. } => Ok(UTM_MOROCCO),
        GeometryKind::WktPoint { srid } | GeometryKind::WktLineString { srid } => {
            let code = srid.unwrap_or(wkt_default_srid);
            Crs::from_epsg(code)
                .map(FallbackChain::single)
                .ok_or(DecodeError::UnsupportedSrid(code))
        }
        GeometryKind::Unrecognized => Err(DecodeError::UnrecognizedFormat),
    }
}

/// Reprojette un point brut selon la chaîne choisie pour `kind`
pub fn reproject(raw_xy: DecodedPoint, kind: &GeometryKind) -> Result<GeoPoint, DecodeError> {
    reproject_point(raw_xy, &chain_for(kind, DEFAULT_WKT_SRID)?)
}

/// Reprojette un point avec une chaîne donnée
pub fn reproject_point(point: DecodedPoint, chain: &FallbackChain) -> Result<GeoPoint, DecodeError> {
    if let Some(found) = chain.first_valid(point) {
        return Ok(found);
    }

    if let Some(crs) = chain.last_resort {
        match crs.to_wgs84(point.x, point.y) {
            Ok((lon, lat)) => {
                warn!(
                    chain = chain.name,
                    %crs,
                    x = point.x,
                    y = point.y,
                    lon,
                    lat,
                    "No candidate validated, returning best-effort coordinate"
                );
                return Ok(GeoPoint::best_effort(lon, lat, crs));
            }
            Err(e) => {
                warn!(chain = chain.name, %crs, error = %e, "Last resort transform failed");
            }
        }
    }

    Err(DecodeError::ReprojectionExhausted { chain: chain.name })
}

/// Reprojette les sommets d'une ligne
///
/// Un seul CRS est retenu pour toute la ligne : le premier candidat sous
/// lequel tous les sommets sont plausibles. À défaut, le dernier recours est
/// appliqué à tous les sommets. Sans dernier recours, seuls les sommets
/// validés individuellement sont conservés.
pub fn reproject_line(
    points: &[DecodedPoint],
    chain: &FallbackChain,
) -> Result<Vec<GeoPoint>, DecodeError> {
    if points.is_empty() {
        return Ok(Vec::new());
    }

    for &crs in chain.candidates {
        let projected: Option<Vec<GeoPoint>> = points
            .iter()
            .map(|p| {
                crs.to_wgs84(p.x, p.y)
                    .ok()
                    .and_then(|(lon, lat)| GeoPoint::validated(lon, lat, crs))
            })
            .collect();

        match projected {
            Some(line) => return Ok(line),
            None => debug!(chain = chain.name, %crs, "Candidate rejected for line"),
        }
    }

    if let Some(crs) = chain.last_resort {
        let projected: Result<Vec<GeoPoint>, _> = points
            .iter()
            .map(|p| {
                crs.to_wgs84(p.x, p.y)
                    .map(|(lon, lat)| GeoPoint::best_effort(lon, lat, crs))
            })
            .collect();

        match projected {
            Ok(line) => {
                warn!(
                    chain = chain.name,
                    %crs,
                    vertices = line.len(),
                    "No candidate validated the line, returning best-effort vertices"
                );
                return Ok(line);
            }
            Err(e) => {
                warn!(chain = chain.name, %crs, error = %e, "Last resort transform failed");
                return Err(DecodeError::ReprojectionExhausted { chain: chain.name });
            }
        }
    }

    let kept: Vec<GeoPoint> = points.iter().filter_map(|&p| chain.first_valid(p)).collect();
    if kept.is_empty() {
        return Err(DecodeError::ReprojectionExhausted { chain: chain.name });
    }
    if kept.len() < points.len() {
        warn!(
            chain = chain.name,
            dropped = points.len() - kept.len(),
            kept = kept.len(),
            "Dropped implausible vertices"
        );
    }
    Ok(kept)
}
