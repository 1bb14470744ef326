use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the configuration boundary.
///
/// Simulation invariants (store bounds, tree structure) are programming defects
/// and panic instead of surfacing here.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings file could not be read.
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for [`crate::Settings`].
    #[error("cannot parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Settings parsed but hold an unusable value.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
