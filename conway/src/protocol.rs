// protocol.rs - Messages exchanged between the engine and its displays

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Routing key for one simulation.
///
/// `slot` names a display position and is where a new session replaces an old
/// one. `serial` distinguishes successive sessions in the same slot, so that
/// messages addressed to a replaced session can be recognised and dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId {
    slot: Arc<str>,
    serial: u64,
}

impl SessionId {
    pub fn new(slot: impl Into<Arc<str>>, serial: u64) -> Self {
        Self { slot: slot.into(), serial }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Same slot, next serial.
    pub fn successor(&self) -> Self {
        Self { slot: Arc::clone(&self.slot), serial: self.serial + 1 }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.slot, self.serial)
    }
}

/// Display → engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// New all-dead session, replacing whatever lives in `id`'s slot.
    Create { id: SessionId, size: usize },
    Randomize { id: SessionId },
    Step { id: SessionId },
    /// Single-level undo of the last forward step.
    StepBack { id: SessionId },
    /// `None` runs at the engine's configured default interval.
    Start { id: SessionId, interval: Option<Duration> },
    Stop { id: SessionId },
    GetState { id: SessionId },
    Clear { id: SessionId },
    /// Index into [`crate::patterns::PATTERNS`].
    LoadPattern { id: SessionId, pattern: usize },
}

impl Command {
    pub fn id(&self) -> &SessionId {
        match self {
            Command::Create { id, .. }
            | Command::Randomize { id }
            | Command::Step { id }
            | Command::StepBack { id }
            | Command::Start { id, .. }
            | Command::Stop { id }
            | Command::GetState { id }
            | Command::Clear { id }
            | Command::LoadPattern { id, .. } => id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Randomize { .. } => "randomize",
            Command::Step { .. } => "step",
            Command::StepBack { .. } => "step_back",
            Command::Start { .. } => "start",
            Command::Stop { .. } => "stop",
            Command::GetState { .. } => "get_state",
            Command::Clear { .. } => "clear",
            Command::LoadPattern { .. } => "load_pattern",
        }
    }
}

/// Engine → display. Every variant names the session it belongs to and
/// consumers must drop those that are not theirs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// Authoritative snapshot of the whole grid.
    FullGrid { id: SessionId, generation: u64, rows: Vec<Vec<bool>> },
    /// One cell of a completed generation.
    CellChanged { id: SessionId, generation: u64, row: usize, col: usize, alive: bool },
    /// Ends the deltas of one generation, sent even if no cell changed.
    GenerationComplete { id: SessionId, generation: u64 },
    PlayStateChanged { id: SessionId, is_playing: bool },
}

impl Notification {
    pub fn id(&self) -> &SessionId {
        match self {
            Notification::FullGrid { id, .. }
            | Notification::CellChanged { id, .. }
            | Notification::GenerationComplete { id, .. }
            | Notification::PlayStateChanged { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_by_slot_and_serial() {
        let left = SessionId::new("left", 0);
        assert_eq!(left, SessionId::new("left", 0));
        assert_ne!(left, SessionId::new("right", 0));
        assert_ne!(left, left.successor());
        assert_eq!(left.successor().slot(), "left");
        assert_eq!(left.successor().serial(), 1);
        assert_eq!(left.successor().to_string(), "left#1");
    }

    #[test]
    fn every_message_exposes_its_id() {
        let id = SessionId::new("middle", 3);
        let command = Command::Start { id: id.clone(), interval: Some(Duration::from_millis(10)) };
        assert_eq!(command.id(), &id);
        assert_eq!(command.name(), "start");

        let note = Notification::CellChanged { id: id.clone(), generation: 1, row: 0, col: 0, alive: true };
        assert_eq!(note.id(), &id);
    }
}
