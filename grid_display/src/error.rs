use conway::SessionId;
use thiserror::Error;

/// Why a size typed by the user was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SizeError {
    #[error("Input size first")]
    Empty,
    #[error("\"{0}\" is not a number")]
    NotNumeric(String),
    #[error("Input size too small (minimum {min})")]
    TooSmall { min: usize },
    #[error("Input size too big (maximum {max})")]
    TooLarge { max: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisplayError {
    #[error(transparent)]
    InvalidSize(#[from] SizeError),
    /// Notification for another board or a replaced session.
    #[error("notification for {0} is not for this board")]
    StaleSession(SessionId),
    /// Delta for a cell that is not on screen.
    #[error("no display cell at ({row}, {col})")]
    MissingDisplayTarget { row: usize, col: usize },
    #[error("snapshot for {0} is not a square grid")]
    MalformedSnapshot(SessionId),
    #[error("not allowed while the simulation is running")]
    Playing,
    #[error("no session yet")]
    NoSession,
    #[error(transparent)]
    Engine(#[from] conway::Error),
}
