use thiserror::Error;

use crate::protocol::SessionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The engine task has shut down.
    #[error("simulation engine is no longer running")]
    ChannelClosed,
    /// The addressed session was replaced or never existed.
    #[error("no live session {0}")]
    StaleSession(SessionId),
    #[error("no pattern with index {0}")]
    UnknownPattern(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
