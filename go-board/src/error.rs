/// Errors raised by board construction and cell access.
///
/// Queries over a well-formed board (groups, liberties, scoring) never fail
/// for in-bounds coordinates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("({x},{y}) is off a {cols}x{rows} board")]
    OutOfRange { x: u8, y: u8, cols: u8, rows: u8 },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
