//! Codec for the encoded polyline format used by the directions service: every coordinate
//! is stored as a zig-zag encoded delta to its predecessor, scaled by 1e5 and split into
//! 5-bit chunks that are offset into printable ASCII.

use common::types::Coordinate;
use std::fmt;
use std::fmt::Display;

const PRECISION: f64 = 1e5;
const CHUNK_OFFSET: u8 = 63;
const CONTINUATION_BIT: u64 = 0x20;

pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let (mut lat, mut lng) = (0i64, 0i64);
    let mut coordinates = vec![];

    while index < bytes.len() {
        let position = index;
        lat = lat.checked_add(next_value(bytes, &mut index)?).ok_or(PolylineError::Overflow { position })?;
        let position = index;
        lng = lng.checked_add(next_value(bytes, &mut index)?).ok_or(PolylineError::Overflow { position })?;
        coordinates.push(Coordinate::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(coordinates)
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated);
        };
        if byte < CHUNK_OFFSET || byte > 127 {
            return Err(PolylineError::InvalidCharacter { position: *index, character: byte as char });
        }
        let chunk = (byte - CHUNK_OFFSET) as u64;
        // Only four payload bits are left at shift 60
        if shift > 60 || (shift == 60 && chunk & 0x1f > 0xf) {
            return Err(PolylineError::Overflow { position: *index });
        }
        *index += 1;

        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < CONTINUATION_BIT {
            break;
        }
    }

    let value = if result & 1 == 1 { !(result >> 1) } else { result >> 1 };
    Ok(value as i64)
}

pub fn encode(coordinates: &[Coordinate]) -> String {
    let mut encoded = String::new();
    let (mut prev_lat, mut prev_lng) = (0i64, 0i64);

    for coordinate in coordinates {
        let lat = (coordinate.lat * PRECISION).round() as i64;
        let lng = (coordinate.lng * PRECISION).round() as i64;
        push_value(&mut encoded, lat - prev_lat);
        push_value(&mut encoded, lng - prev_lng);
        (prev_lat, prev_lng) = (lat, lng);
    }

    encoded
}

fn push_value(out: &mut String, delta: i64) {
    let mut value = if delta < 0 { !((delta as u64) << 1) } else { (delta as u64) << 1 };
    while value >= CONTINUATION_BIT {
        out.push(((CONTINUATION_BIT | (value & 0x1f)) as u8 + CHUNK_OFFSET) as char);
        value >>= 5;
    }
    out.push((value as u8 + CHUNK_OFFSET) as char);
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PolylineError {
    InvalidCharacter { position: usize, character: char },
    Truncated,
    Overflow { position: usize },
}

impl Display for PolylineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolylineError::InvalidCharacter { position, character } => {
                write!(f, "Invalid character {character:?} at position {position} of encoded polyline")
            }
            PolylineError::Truncated => write!(f, "Encoded polyline ends in the middle of a value"),
            PolylineError::Overflow { position } => {
                write!(f, "Encoded polyline value at position {position} is too long")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference example of the format documentation
    const EXAMPLE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn example_coordinates() -> Vec<Coordinate> {
        vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ]
    }

    fn assert_close(expected: &[Coordinate], actual: &[Coordinate]) {
        assert_eq!(expected.len(), actual.len());
        for (e, a) in expected.iter().zip(actual) {
            assert!((e.lat - a.lat).abs() < 1e-9, "{e:?} != {a:?}");
            assert!((e.lng - a.lng).abs() < 1e-9, "{e:?} != {a:?}");
        }
    }

    #[test]
    fn test_decode_reference_example() {
        assert_close(&example_coordinates(), &decode(EXAMPLE).unwrap());
    }

    #[test]
    fn test_encode_reference_example() {
        assert_eq!(EXAMPLE, encode(&example_coordinates()));
    }

    #[test]
    fn test_empty_input() {
        assert!(decode("").unwrap().is_empty());
        assert_eq!("", encode(&[]));
    }

    #[test]
    fn test_malformed_input() {
        // Latitude without longitude
        assert_eq!(Err(PolylineError::Truncated), decode("_p~iF"));
        // Continuation chunk at the very end
        assert_eq!(Err(PolylineError::Truncated), decode("_p~iF~"));
        assert!(matches!(decode("_p~iF ps|U"), Err(PolylineError::InvalidCharacter { position: 5, .. })));
    }

    #[test]
    fn test_oversized_values() {
        // Thirteen chunks whose last one only uses the four bits left: i64::MAX, then zero
        assert_eq!(1, decode("}~~~~~~~~~~~N?").unwrap().len());
        // A fifth bit in the thirteenth chunk no longer fits into 64 bits
        assert_eq!(Err(PolylineError::Overflow { position: 12 }), decode("}~~~~~~~~~~~O?"));
        // Each value fits, the running sum does not
        assert_eq!(Err(PolylineError::Overflow { position: 26 }), decode(&"}~~~~~~~~~~~N".repeat(4)));
    }
}
