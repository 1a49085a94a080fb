//! Coordinate text encoding used by SGF game records.
//!
//! Only the coordinate codec lives here; reading and writing whole records
//! belongs to the game layer.

mod coord;
mod error;

pub use coord::{CoordCodec, PASS};
pub use error::SgfError;
