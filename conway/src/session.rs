// session.rs - State of one running simulation

use rand::Rng;

use crate::autorun::Autorun;
use crate::grid::Grid;
use crate::life::{self, CellChange};
use crate::patterns::Pattern;
use crate::protocol::SessionId;

/// One simulation instance: its grid, undo snapshot and play state.
///
/// Sessions are never resized. A new size means a new session.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    current: Grid,
    previous: Option<Grid>,   // single-level undo
    generation: u64,
    epoch: u64,               // bumped on every stop
    autorun: Option<Autorun>,
}

impl Session {
    pub fn new(id: SessionId, size: usize) -> Self {
        Self {
            id,
            current: Grid::new(size),
            previous: None,
            generation: 0,
            epoch: 0,
            autorun: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_playing(&self) -> bool {
        self.autorun.is_some()
    }

    /// Replaces the grid with a random one and forgets the undo snapshot.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current.randomize(rng);
        self.reset_history();
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.reset_history();
    }

    pub fn load(&mut self, pattern: &Pattern) {
        pattern.place(&mut self.current);
        self.reset_history();
    }

    /// Advances one generation and returns the cells that flipped. The
    /// successor is computed in full before it replaces the current grid.
    pub fn step(&mut self) -> Vec<CellChange> {
        let next = life::step(&self.current);
        let changes = life::diff(&self.current, &next);
        self.previous = Some(std::mem::replace(&mut self.current, next));
        self.generation += 1;
        changes
    }

    /// Restores the snapshot taken by the last forward step. Returns `false`
    /// when there is nothing to restore, which is the case after a previous
    /// `step_back` with no forward step since.
    pub fn step_back(&mut self) -> bool {
        match self.previous.take() {
            Some(previous) => {
                self.current = previous;
                self.generation = self.generation.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    /// Installs a running timer. Returns `false` if one is already running, in
    /// which case `autorun` is dropped (and cancelled) unused.
    pub fn start(&mut self, autorun: Autorun) -> bool {
        if self.autorun.is_some() {
            return false;
        }
        self.autorun = Some(autorun);
        true
    }

    /// Cancels the timer and invalidates any ticks it already queued. Returns
    /// `false` if the session was not playing.
    pub fn stop(&mut self) -> bool {
        match self.autorun.take() {
            Some(_) => {
                self.epoch += 1;
                true
            }
            None => false,
        }
    }

    fn reset_history(&mut self) {
        self.previous = None;
        self.generation = 0;
    }
}
