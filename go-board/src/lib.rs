pub mod board;
pub mod content;
pub mod coordinate;
pub mod error;
pub mod group;
pub mod hash;
pub mod scoring;
pub mod sgf;

pub use board::Board;
pub use content::Content;
pub use coordinate::Coordinate;
pub use error::BoardError;
pub use group::{Group, GroupId, GroupMarks};
pub use scoring::{ScoringPoint, Territory};
