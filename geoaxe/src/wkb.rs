//! Lecture et écriture des charges EWKB hexadécimales (Point, LineString)
//!
//! Structure d'une charge :
//!
//! ```text
//! ordre (1) | type (4) | SRID (4) | [nombre de points (4)] | x y (8 + 8) ...
//! ```
//!
//! L'en-tête fait donc 9 octets (18 caractères hexadécimaux). Le décodeur ne
//! donne aucun sens aux doubles lus : l'interprétation (CRS) relève de
//! [`crate::reproject`].

use crate::sniff::strip_hex_prefix;
use crate::types::{ByteOrder, DecodedPoint};
use crate::DecodeError;

/// Taille de l'en-tête EWKB (ordre + type + SRID)
pub const HEADER_BYTES: usize = 9;
/// Taille du champ nombre de points d'une LineString
pub const COUNT_BYTES: usize = 4;
/// Taille d'un couple de doubles
pub const COORD_BYTES: usize = 16;

/// Taille exacte d'une charge Point (25 octets, 50 caractères)
pub const POINT_BYTES: usize = HEADER_BYTES + COORD_BYTES;

const POINT_HEADER_LE: [u8; 5] = [0x01, 0x01, 0x00, 0x00, 0x20];
const POINT_HEADER_BE: [u8; 5] = [0x00, 0x01, 0x00, 0x00, 0x20];
const LINESTRING_HEADER_LE: [u8; 5] = [0x01, 0x02, 0x00, 0x00, 0x20];
const LINESTRING_HEADER_BE: [u8; 5] = [0x00, 0x02, 0x00, 0x00, 0x20];

/// Décode la chaîne hexadécimale en octets
fn decode_hex(hex: &str) -> Result<Vec<u8>, DecodeError> {
    let hex = strip_hex_prefix(hex.trim());
    hex::decode(hex).map_err(|e| DecodeError::malformed_binary(format!("invalid hex: {}", e)))
}

/// Vérifie que l'octet d'ordre est cohérent avec l'ordre annoncé
fn check_order_byte(bytes: &[u8], order: ByteOrder) -> Result<(), DecodeError> {
    let expected = match order {
        ByteOrder::Little => 0x01,
        ByteOrder::Big => 0x00,
    };
    match bytes.first() {
        Some(&b) if b == expected => Ok(()),
        Some(&b) => Err(DecodeError::malformed_binary(format!(
            "byte order marker {:#04x} does not match {:?}",
            b, order
        ))),
        None => Err(DecodeError::malformed_binary("empty payload")),
    }
}

fn read_f64(bytes: &[u8], offset: usize, order: ByteOrder) -> Result<f64, DecodeError> {
    let chunk: [u8; 8] = bytes
        .get(offset..offset + 8)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| DecodeError::malformed_binary(format!("truncated double at byte {}", offset)))?;
    Ok(match order {
        ByteOrder::Little => f64::from_le_bytes(chunk),
        ByteOrder::Big => f64::from_be_bytes(chunk),
    })
}

fn read_u32(bytes: &[u8], offset: usize, order: ByteOrder) -> Result<u32, DecodeError> {
    let chunk: [u8; 4] = bytes
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| DecodeError::malformed_binary(format!("truncated u32 at byte {}", offset)))?;
    Ok(match order {
        ByteOrder::Little => u32::from_le_bytes(chunk),
        ByteOrder::Big => u32::from_be_bytes(chunk),
    })
}

fn read_coord(bytes: &[u8], offset: usize, order: ByteOrder) -> Result<DecodedPoint, DecodeError> {
    Ok(DecodedPoint::new(
        read_f64(bytes, offset, order)?,
        read_f64(bytes, offset + 8, order)?,
    ))
}

/// Décode un Point EWKB : exactement 50 caractères hexadécimaux
pub fn decode_wkb_point(hex: &str, order: ByteOrder) -> Result<DecodedPoint, DecodeError> {
    let bytes = decode_hex(hex)?;
    if bytes.len() != POINT_BYTES {
        return Err(DecodeError::malformed_binary(format!(
            "point payload is {} bytes, expected {}",
            bytes.len(),
            POINT_BYTES
        )));
    }
    check_order_byte(&bytes, order)?;
    read_coord(&bytes, HEADER_BYTES, order)
}

/// Décode une LineString EWKB ; la longueur doit correspondre au nombre de points annoncé
pub fn decode_wkb_linestring(hex: &str, order: ByteOrder) -> Result<Vec<DecodedPoint>, DecodeError> {
    let bytes = decode_hex(hex)?;
    check_order_byte(&bytes, order)?;

    let count = read_u32(&bytes, HEADER_BYTES, order)? as usize;
    let expected = count
        .checked_mul(COORD_BYTES)
        .and_then(|n| n.checked_add(HEADER_BYTES + COUNT_BYTES))
        .ok_or_else(|| DecodeError::malformed_binary(format!("point count {} overflows", count)))?;

    if bytes.len() != expected {
        return Err(DecodeError::malformed_binary(format!(
            "linestring declares {} point(s) ({} bytes) but payload is {} bytes",
            count,
            expected,
            bytes.len()
        )));
    }

    let start = HEADER_BYTES + COUNT_BYTES;
    (0..count)
        .map(|i| read_coord(&bytes, start + i * COORD_BYTES, order))
        .collect()
}

fn push_u32(buf: &mut Vec<u8>, value: u32, order: ByteOrder) {
    match order {
        ByteOrder::Little => buf.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::Big => buf.extend_from_slice(&value.to_be_bytes()),
    }
}

fn push_f64(buf: &mut Vec<u8>, value: f64, order: ByteOrder) {
    match order {
        ByteOrder::Little => buf.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::Big => buf.extend_from_slice(&value.to_be_bytes()),
    }
}

/// Encode un Point EWKB en hexadécimal majuscule
pub fn encode_point_hex(x: f64, y: f64, order: ByteOrder, srid: u32) -> String {
    let mut buf = Vec::with_capacity(POINT_BYTES);
    buf.extend_from_slice(match order {
        ByteOrder::Little => &POINT_HEADER_LE,
        ByteOrder::Big => &POINT_HEADER_BE,
    });
    push_u32(&mut buf, srid, order);
    push_f64(&mut buf, x, order);
    push_f64(&mut buf, y, order);
    hex::encode_upper(buf)
}

/// Encode une LineString EWKB en hexadécimal majuscule
pub fn encode_linestring_hex(coords: &[(f64, f64)], order: ByteOrder, srid: u32) -> String {
    let mut buf = Vec::with_capacity(HEADER_BYTES + COUNT_BYTES + coords.len() * COORD_BYTES);
    buf.extend_from_slice(match order {
        ByteOrder::Little => &LINESTRING_HEADER_LE,
        ByteOrder::Big => &LINESTRING_HEADER_BE,
    });
    push_u32(&mut buf, srid, order);
    push_u32(&mut buf, coords.len() as u32, order);
    for &(x, y) in coords {
        push_f64(&mut buf, x, order);
        push_f64(&mut buf, y, order);
    }
    hex::encode_upper(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_layout() {
        let hex = encode_point_hex(1.0, 2.0, ByteOrder::Little, 32629);
        assert_eq!(hex, "0101000020757F0000000000000000F03F0000000000000040");
        assert_eq!(hex.len(), 50);

        let hex = encode_point_hex(1.0, 2.0, ByteOrder::Big, 32629);
        assert_eq!(hex, "000100002000007F753FF00000000000004000000000000000");
    }

    #[test]
    fn test_decode_point_lowercase() {
        let p = decode_wkb_point(
            "0101000020757f0000000000000000f03f0000000000000040",
            ByteOrder::Little,
        )
        .unwrap();
        assert_eq!(p, DecodedPoint::new(1.0, 2.0));
    }

    #[test]
    fn test_point_length_is_exact() {
        let hex = encode_point_hex(1.0, 2.0, ByteOrder::Little, 3857);
        let truncated = &hex[..48];
        let extended = format!("{}00", hex);

        assert!(matches!(
            decode_wkb_point(truncated, ByteOrder::Little),
            Err(DecodeError::MalformedBinary(_))
        ));
        assert!(matches!(
            decode_wkb_point(&extended, ByteOrder::Little),
            Err(DecodeError::MalformedBinary(_))
        ));
    }

    #[test]
    fn test_invalid_hex_and_odd_length() {
        assert!(decode_wkb_point("0101000020ZZ", ByteOrder::Little).is_err());
        assert!(decode_wkb_point("0101000020757F0", ByteOrder::Little).is_err());
        assert!(decode_wkb_linestring("", ByteOrder::Little).is_err());
    }

    #[test]
    fn test_order_marker_mismatch() {
        let hex = encode_point_hex(1.0, 2.0, ByteOrder::Little, 3857);
        assert!(decode_wkb_point(&hex, ByteOrder::Big).is_err());
    }

    #[test]
    fn test_linestring_roundtrip_both_orders() {
        let coords = [(315355.2, 3767286.3), (315400.0, 3767300.5), (315480.25, 3767350.0)];
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let hex = encode_linestring_hex(&coords, order, 32630);
            assert_eq!(hex.len(), 26 + 32 * coords.len());

            let decoded = decode_wkb_linestring(&hex, order).unwrap();
            let back: Vec<(f64, f64)> = decoded.iter().map(|p| (p.x, p.y)).collect();
            assert_eq!(back, coords);
        }
    }

    #[test]
    fn test_linestring_count_mismatch() {
        let hex = encode_linestring_hex(&[(1.0, 2.0), (3.0, 4.0)], ByteOrder::Little, 3857);
        // Un point de moins que déclaré
        let short = &hex[..hex.len() - 32];
        assert!(matches!(
            decode_wkb_linestring(short, ByteOrder::Little),
            Err(DecodeError::MalformedBinary(_))
        ));
    }

    #[test]
    fn test_linestring_huge_count_does_not_allocate() {
        // Nombre de points 0xFFFFFFFF sans données
        let hex = "0102000020110F0000FFFFFFFF";
        assert!(decode_wkb_linestring(hex, ByteOrder::Little).is_err());
    }

    #[test]
    fn test_empty_linestring() {
        let hex = encode_linestring_hex(&[], ByteOrder::Little, 3857);
        assert_eq!(decode_wkb_linestring(&hex, ByteOrder::Little).unwrap(), Vec::new());
    }
}
