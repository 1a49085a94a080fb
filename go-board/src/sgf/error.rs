#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SgfError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
}
