use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;
use std::ops::Neg;

/// The state of a single board cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr,
)]
#[repr(i8)]
pub enum Content {
    #[default]
    Empty = 0,
    Black = 1,
    White = -1,
}

impl Content {
    pub fn from_int(v: i8) -> Self {
        match v.signum() {
            1 => Content::Black,
            -1 => Content::White,
            _ => Content::Empty,
        }
    }

    pub fn to_int(self) -> i8 {
        self as i8
    }

    /// Layout character: 'B' and 'W' are stones, anything else is empty.
    pub fn from_char(ch: char) -> Self {
        match ch {
            'B' => Content::Black,
            'W' => Content::White,
            _ => Content::Empty,
        }
    }

    /// 2-bit code folded into the content hash.
    pub fn code(self) -> u64 {
        match self {
            Content::Empty => 0,
            Content::Black => 1,
            Content::White => 2,
        }
    }

    pub fn opp(self) -> Self {
        match self {
            Content::Black => Content::White,
            Content::White => Content::Black,
            Content::Empty => Content::Empty,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Content::Empty
    }

    pub fn is_stone(self) -> bool {
        self != Content::Empty
    }

    pub fn letter(self) -> &'static str {
        match self {
            Content::Black => "B",
            Content::White => "W",
            Content::Empty => ".",
        }
    }
}

impl Neg for Content {
    type Output = Self;

    fn neg(self) -> Self {
        self.opp()
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Black => write!(f, "Black"),
            Content::White => write!(f, "White"),
            Content::Empty => write!(f, "Empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_int_normalizes() {
        assert_eq!(Content::from_int(1), Content::Black);
        assert_eq!(Content::from_int(7), Content::Black);
        assert_eq!(Content::from_int(-1), Content::White);
        assert_eq!(Content::from_int(-100), Content::White);
        assert_eq!(Content::from_int(0), Content::Empty);
    }

    #[test]
    fn opponent() {
        assert_eq!(Content::Black.opp(), Content::White);
        assert_eq!(Content::White.opp(), Content::Black);
        assert_eq!(Content::Empty.opp(), Content::Empty);
        assert_eq!(-Content::Black, Content::White);
    }

    #[test]
    fn codes_fit_in_two_bits() {
        for c in [Content::Empty, Content::Black, Content::White] {
            assert!(c.code() < 4);
        }
        assert_ne!(Content::Black.code(), Content::White.code());
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Content::White).unwrap(), "-1");
        assert_eq!(
            serde_json::from_str::<Content>("1").unwrap(),
            Content::Black
        );
    }

    #[test]
    fn display() {
        assert_eq!(Content::Black.to_string(), "Black");
        assert_eq!(Content::Empty.to_string(), "Empty");
    }
}
