// controller.rs - One board's side of the engine conversation

use std::sync::Arc;
use std::time::Duration;

use conway::{EngineHandle, Notification, SessionId, SizeBounds};
use tracing::debug;

use crate::error::{DisplayError, SizeError};
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for the first snapshot of the current session.
    Idle,
    Ready,
    Playing,
}

/// Validates the raw text of the size input. Fractions are floored.
pub fn parse_size(input: &str, bounds: &SizeBounds) -> Result<usize, SizeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SizeError::Empty);
    }
    let value: f64 = input
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| SizeError::NotNumeric(input.to_owned()))?;
    let value = value.floor();
    if value < bounds.min as f64 {
        return Err(SizeError::TooSmall { min: bounds.min });
    }
    if value > bounds.max as f64 {
        return Err(SizeError::TooLarge { max: bounds.max });
    }
    Ok(value as usize)
}

/// Drives one session and mirrors it on a [`Surface`].
///
/// The controller never computes cells itself: it sends commands and applies
/// whatever notifications come back for its current session.
pub struct Controller {
    slot: Arc<str>,
    serial: u64,
    session: Option<SessionId>,
    engine: EngineHandle,
    bounds: SizeBounds,
    surface: Option<Surface>,
    is_playing: bool,
    /// Start sent, engine has not confirmed yet.
    start_pending: bool,
    /// Generation shown when the engine confirmed the start.
    played_from: Option<u64>,
    can_step_back: bool,
}

impl Controller {
    pub fn new(slot: &str, engine: EngineHandle, bounds: SizeBounds) -> Self {
        Self {
            slot: Arc::from(slot),
            serial: 0,
            session: None,
            engine,
            bounds,
            surface: None,
            is_playing: false,
            start_pending: false,
            played_from: None,
            can_step_back: false,
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Also true between sending a start and the engine confirming it.
    pub fn is_playing(&self) -> bool {
        self.is_playing || self.start_pending
    }

    pub fn can_step_back(&self) -> bool {
        self.can_step_back && self.state() == ControllerState::Ready
    }

    pub fn state(&self) -> ControllerState {
        match (&self.surface, self.is_playing()) {
            (None, _) => ControllerState::Idle,
            (Some(_), true) => ControllerState::Playing,
            (Some(_), false) => ControllerState::Ready,
        }
    }

    /// Validates `input` and replaces the session with a fresh one of that
    /// size. Refused while playing.
    pub fn resize(&mut self, input: &str) -> Result<usize, DisplayError> {
        if self.is_playing() {
            return Err(DisplayError::Playing);
        }
        let size = parse_size(input, &self.bounds)?;
        self.open(size)?;
        Ok(size)
    }

    /// Drops the current surface and session and asks for a new one. Anything
    /// still in flight for the old session is ignored from here on.
    pub fn open(&mut self, size: usize) -> Result<(), DisplayError> {
        self.serial += 1;
        let id = SessionId::new(Arc::clone(&self.slot), self.serial);
        self.surface = None;
        self.is_playing = false;
        self.start_pending = false;
        self.played_from = None;
        self.can_step_back = false;
        self.session = Some(id.clone());
        debug!(session = %id, size, "requesting new session");
        self.engine.create(id, size)?;
        Ok(())
    }

    pub fn randomize(&mut self) -> Result<(), DisplayError> {
        let id = self.idle_session()?;
        self.can_step_back = false;
        Ok(self.engine.randomize(id)?)
    }

    pub fn step(&mut self) -> Result<(), DisplayError> {
        let id = self.idle_session()?;
        self.can_step_back = true;
        Ok(self.engine.step(id)?)
    }

    pub fn step_back(&mut self) -> Result<(), DisplayError> {
        let id = self.idle_session()?;
        self.can_step_back = false;
        Ok(self.engine.step_back(id)?)
    }

    pub fn clear(&mut self) -> Result<(), DisplayError> {
        let id = self.idle_session()?;
        self.can_step_back = false;
        Ok(self.engine.clear(id)?)
    }

    pub fn load_pattern(&mut self, pattern: usize) -> Result<(), DisplayError> {
        let id = self.idle_session()?;
        self.can_step_back = false;
        Ok(self.engine.load_pattern(id, pattern)?)
    }

    /// Only from `Ready`. Manual commands are refused from here on, without
    /// waiting for the engine to confirm.
    pub fn start(&mut self, interval: Option<Duration>) -> Result<(), DisplayError> {
        let id = self.idle_session()?;
        if self.surface.is_none() {
            return Err(DisplayError::NoSession);
        }
        self.engine.start(id, interval)?;
        self.start_pending = true;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), DisplayError> {
        let id = self.session.clone().ok_or(DisplayError::NoSession)?;
        Ok(self.engine.stop(id)?)
    }

    pub fn refresh(&mut self) -> Result<(), DisplayError> {
        let id = self.session.clone().ok_or(DisplayError::NoSession)?;
        Ok(self.engine.get_state(id)?)
    }

    /// Applies a notification addressed to this board's current session.
    /// Anything else is refused as `StaleSession`.
    ///
    /// Step back enablement is never read off these; it follows the commands
    /// this controller sent and whether autorun advanced the board.
    pub fn apply(&mut self, note: Notification) -> Result<(), DisplayError> {
        if self.session.as_ref() != Some(note.id()) {
            return Err(DisplayError::StaleSession(note.id().clone()));
        }

        match note {
            Notification::FullGrid { id, generation, rows } => {
                let surface = Surface::from_rows(&rows, generation).ok_or(DisplayError::MalformedSnapshot(id))?;
                self.surface = Some(surface);
            }
            Notification::CellChanged { generation, row, col, alive, .. } => {
                let surface = self.surface.as_mut().ok_or(DisplayError::MissingDisplayTarget { row, col })?;
                if !surface.set(row, col, alive, generation) {
                    return Err(DisplayError::MissingDisplayTarget { row, col });
                }
            }
            Notification::GenerationComplete { generation, .. } => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.advance(generation);
                }
            }
            Notification::PlayStateChanged { is_playing, .. } => {
                let shown = self.surface.as_ref().map_or(0, Surface::generation);
                self.is_playing = is_playing;
                self.start_pending = false;
                if is_playing {
                    self.played_from = Some(shown);
                } else if self.played_from.take().is_some_and(|from| shown > from) {
                    // At least one tick ran, so the engine holds an undo snapshot
                    self.can_step_back = true;
                }
            }
        }
        Ok(())
    }

    fn idle_session(&self) -> Result<SessionId, DisplayError> {
        let id = self.session.clone().ok_or(DisplayError::NoSession)?;
        if self.is_playing() {
            return Err(DisplayError::Playing);
        }
        Ok(id)
    }
}
