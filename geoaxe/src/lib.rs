//! # geoaxe
//!
//! Décodage et reprojection des géométries du réseau ferroviaire vers WGS84.
//!
//! ## Features
//!
//! - Détection du format par préfixe : WKT / EWKT, EWKB hexadécimal little et
//!   big-endian, marqueur `110F` du système métrique local
//! - Décodeur WKB sans allocation superflue (`hex`, `memchr`, `fast-float`)
//! - Reprojection en Rust pur (Web Mercator, UTM 29N/30N, Lambert Merchich)
//!   par chaînes de repli validées par la boîte englobante du Maroc
//! - Assemblage des segments d'un axe en polyligne ordonnée
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geoaxe::{Assembler, AxisSegment, Decoder, RawGeometry};
//!
//! let decoder = Decoder::default();
//! let gare = decoder.decode_point(&RawGeometry::from("SRID=3857;POINT(-846028.13 3973881.01)"))?;
//! println!("{} {} ({})", gare.lon(), gare.lat(), gare.origin().label());
//!
//! let axe = Assembler::new(decoder).assemble(segments)?;
//! println!("{} points", axe.len());
//! ```

pub mod assemble;
pub mod axis;
pub mod crs;
pub mod decode;
pub mod error;
pub mod reproject;
pub mod sniff;
pub mod types;
pub mod validate;
pub mod wkb;
pub mod wkt;

pub use assemble::{group_by_axis, Assembler, AssemblerOptions, AxisAssembly, SegmentDecoder};
pub use axis::{axis_color, AxisKind, AxisSummary};
pub use crs::Crs;
pub use decode::{Decoder, DecoderOptions};
pub use error::{AssemblyError, DecodeError};
pub use reproject::{reproject, FallbackChain};
pub use sniff::{classify, GeometryKind};
pub use types::{
    parse_reference, AxisSegment, ByteOrder, DecodedPoint, GeoPoint, PointOrigin, Polyline,
    RawGeometry,
};
pub use validate::{is_plausible, BoundingBox};

/// Décode un Point avec les options par défaut
pub fn decode_point(raw: impl Into<RawGeometry>) -> Result<GeoPoint, DecodeError> {
    Decoder::default().decode_point(&raw.into())
}

/// Décode une LineString avec les options par défaut
pub fn decode_linestring(raw: impl Into<RawGeometry>) -> Result<Polyline, DecodeError> {
    Decoder::default().decode_linestring(&raw.into())
}

/// Assemble les segments d'un axe avec le décodeur par défaut
pub fn assemble(segments: Vec<AxisSegment>) -> Result<Polyline, AssemblyError> {
    Assembler::new(Decoder::default()).assemble(segments)
}
