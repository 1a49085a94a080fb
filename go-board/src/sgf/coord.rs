use crate::coordinate::Coordinate;

use super::error::SgfError;

/// Conventional pass sentinel. Game layers may supply their own.
pub const PASS: Coordinate = Coordinate::new(u8::MAX, u8::MAX);

/// Two-letter coordinate codec: a=0 .. z=25, A=26 .. Z=51, column first.
///
/// The pass sentinel is owned by the caller and encodes as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordCodec {
    pass: Coordinate,
}

impl Default for CoordCodec {
    fn default() -> Self {
        CoordCodec::new(PASS)
    }
}

impl CoordCodec {
    pub fn new(pass: Coordinate) -> Self {
        CoordCodec { pass }
    }

    pub fn pass(&self) -> Coordinate {
        self.pass
    }

    pub fn is_pass(&self, point: Coordinate) -> bool {
        point == self.pass
    }

    pub fn encode(&self, point: Coordinate) -> Result<String, SgfError> {
        if self.is_pass(point) {
            return Ok(String::new());
        }
        let mut buf = String::with_capacity(2);
        buf.push(coord_to_letter(point.x).ok_or_else(|| invalid(point))?);
        buf.push(coord_to_letter(point.y).ok_or_else(|| invalid(point))?);
        Ok(buf)
    }

    /// Parse a 2-char coordinate string like "cd" → (2, 3). Empty means pass.
    pub fn decode(&self, s: &str) -> Result<Coordinate, SgfError> {
        if s.is_empty() {
            return Ok(self.pass);
        }
        let mut chars = s.chars();
        let (Some(col_ch), Some(row_ch), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SgfError::InvalidCoordinate(s.to_string()));
        };
        Ok(Coordinate::new(
            letter_to_coord(col_ch)?,
            letter_to_coord(row_ch)?,
        ))
    }
}

fn invalid(point: Coordinate) -> SgfError {
    SgfError::InvalidCoordinate(point.to_string())
}

fn coord_to_letter(c: u8) -> Option<char> {
    match c {
        0..=25 => Some((b'a' + c) as char),
        26..=51 => Some((b'A' + c - 26) as char),
        _ => None,
    }
}

fn letter_to_coord(ch: char) -> Result<u8, SgfError> {
    match ch {
        'a'..='z' => Ok(ch as u8 - b'a'),
        'A'..='Z' => Ok(ch as u8 - b'A' + 26),
        _ => Err(SgfError::InvalidCoordinate(ch.to_string())),
    }
}
