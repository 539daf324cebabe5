//! Conway's Game of Life simulation engine.
//!
//! Sessions live inside an engine task and are driven only through
//! [`Command`]s; the engine answers with [`Notification`]s addressed by
//! [`SessionId`]. Several sessions can run side by side on one engine, each
//! with its own grid, undo snapshot and autorun timer.

pub mod autorun;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod life;
pub mod patterns;
pub mod protocol;
pub mod session;

pub use config::{EngineConfig, Reporting, SizeBounds};
pub use engine::{Engine, EngineHandle, NotificationStream, spawn};
pub use error::{Error, Result};
pub use grid::Grid;
pub use protocol::{Command, Notification, SessionId};
