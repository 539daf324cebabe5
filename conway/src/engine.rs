// engine.rs - Background simulation engine
//
// The engine owns every session and is driven purely by messages: commands
// arrive on one channel, autorun ticks on another, and all output leaves as
// notifications. Nothing outside this task can touch a grid.

use std::collections::HashMap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::autorun::{Autorun, Tick};
use crate::config::{EngineConfig, Reporting};
use crate::error::{Error, Result};
use crate::patterns::PATTERNS;
use crate::protocol::{Command, Notification, SessionId};
use crate::session::Session;

/// Receiving end of the engine's notifications, shared by every session.
pub type NotificationStream = UnboundedReceiver<Notification>;

pub struct Engine {
    config: EngineConfig,
    sessions: HashMap<String, Session>,   // keyed by slot
    notify: UnboundedSender<Notification>,
    ticks: UnboundedSender<Tick>,
    rng: StdRng,
}

/// Starts an engine task on the current tokio runtime.
///
/// The task runs until every [`EngineHandle`] is dropped; its sessions and
/// their timers go with it.
pub fn spawn(config: EngineConfig) -> (EngineHandle, NotificationStream, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notify_tx, notify_rx) = mpsc::unbounded_channel();
    let (engine, ticks) = Engine::new(config, notify_tx);
    let task = tokio::spawn(engine.run(command_rx, ticks));
    (EngineHandle { commands: command_tx }, notify_rx, task)
}

impl Engine {
    /// Builds an engine that reports on `notify`. The returned receiver
    /// carries the engine's own autorun ticks and must be handed to
    /// [`Engine::run`].
    pub fn new(config: EngineConfig, notify: UnboundedSender<Notification>) -> (Self, UnboundedReceiver<Tick>) {
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let engine = Self {
            config,
            sessions: HashMap::new(),
            notify,
            ticks: ticks_tx,
            rng,
        };
        (engine, ticks_rx)
    }

    pub async fn run(mut self, mut commands: UnboundedReceiver<Command>, mut ticks: UnboundedReceiver<Tick>) {
        loop {
            tokio::select! {
                // Commands first: a queued stop must win over a queued tick.
                biased;
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    let name = command.name();
                    if let Err(err) = self.handle(command) {
                        debug!(command = name, %err, "command dropped");
                    }
                }
                Some(tick) = ticks.recv() => self.on_tick(tick),
            }
        }
        info!(sessions = self.sessions.len(), "all handles dropped, engine stopping");
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id.slot()).filter(|s| s.id() == id)
    }

    pub fn handle(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Create { id, size } => {
                self.create(id, size);
                Ok(())
            }
            Command::Randomize { id } => self.randomize(&id),
            Command::Step { id } => self.step(&id),
            Command::StepBack { id } => self.step_back(&id),
            Command::Start { id, interval } => self.start(&id, interval),
            Command::Stop { id } => self.stop(&id),
            Command::GetState { id } => self.get_state(&id),
            Command::Clear { id } => self.clear(&id),
            Command::LoadPattern { id, pattern } => self.load_pattern(&id, pattern),
        }
    }

    /// Applies a timer tick, unless it belongs to a replaced session or was
    /// queued before the most recent stop.
    pub fn on_tick(&mut self, tick: Tick) {
        let current = self
            .session(&tick.id)
            .is_some_and(|s| s.is_playing() && s.epoch() == tick.epoch);
        if !current {
            trace!(session = %tick.id, epoch = tick.epoch, "stale tick dropped");
            return;
        }
        // Session was just looked up, so this cannot be stale
        let _ = self.step(&tick.id);
    }

    fn create(&mut self, id: SessionId, size: usize) {
        let bounds = self.config.bounds;
        let clamped = bounds.clamp(size);
        if clamped != size {
            warn!(session = %id, requested = size, size = clamped, "grid size clamped");
        }

        let session = Session::new(id.clone(), clamped);
        let note = snapshot(&session);
        // Dropping the replaced session cancels its timer.
        if let Some(old) = self.sessions.insert(id.slot().to_owned(), session) {
            debug!(old = %old.id(), new = %id, was_playing = old.is_playing(), "session replaced");
        }
        info!(session = %id, size = clamped, "session created");
        self.emit(note);
    }

    fn randomize(&mut self, id: &SessionId) -> Result<()> {
        let session = live(&mut self.sessions, id)?;
        session.randomize(&mut self.rng);
        let note = snapshot(session);
        self.emit(note);
        Ok(())
    }

    fn step(&mut self, id: &SessionId) -> Result<()> {
        let reporting = self.config.reporting;
        let session = live(&mut self.sessions, id)?;
        let changes = session.step();
        let generation = session.generation();

        match reporting {
            Reporting::Snapshot => {
                let note = snapshot(session);
                self.emit(note);
            }
            Reporting::Delta => {
                for change in changes {
                    self.emit(Notification::CellChanged {
                        id: id.clone(),
                        generation,
                        row: change.row,
                        col: change.col,
                        alive: change.alive,
                    });
                }
                // Closes the batch even when nothing flipped
                self.emit(Notification::GenerationComplete { id: id.clone(), generation });
            }
        }
        Ok(())
    }

    fn step_back(&mut self, id: &SessionId) -> Result<()> {
        let session = live(&mut self.sessions, id)?;
        if !session.step_back() {
            debug!(session = %id, "nothing to step back to");
            return Ok(());
        }
        let note = snapshot(session);
        self.emit(note);
        Ok(())
    }

    fn start(&mut self, id: &SessionId, interval: Option<Duration>) -> Result<()> {
        let interval = interval.unwrap_or(self.config.default_interval);
        let session = live(&mut self.sessions, id)?;
        if session.is_playing() {
            return Ok(());
        }

        let autorun = Autorun::spawn(id.clone(), session.epoch(), interval, self.ticks.clone());
        session.start(autorun);
        info!(session = %id, interval_ms = interval.as_millis() as u64, "autorun started");
        self.emit(Notification::PlayStateChanged { id: id.clone(), is_playing: true });
        Ok(())
    }

    fn stop(&mut self, id: &SessionId) -> Result<()> {
        let session = live(&mut self.sessions, id)?;
        if !session.stop() {
            return Ok(());
        }
        info!(session = %id, generation = session.generation(), "autorun stopped");
        self.emit(Notification::PlayStateChanged { id: id.clone(), is_playing: false });
        Ok(())
    }

    fn get_state(&mut self, id: &SessionId) -> Result<()> {
        let session = live(&mut self.sessions, id)?;
        let note = snapshot(session);
        self.emit(note);
        Ok(())
    }

    fn clear(&mut self, id: &SessionId) -> Result<()> {
        let session = live(&mut self.sessions, id)?;
        session.clear();
        let note = snapshot(session);
        self.emit(note);
        Ok(())
    }

    fn load_pattern(&mut self, id: &SessionId, index: usize) -> Result<()> {
        let pattern = PATTERNS.get(index).ok_or(Error::UnknownPattern(index))?;
        let session = live(&mut self.sessions, id)?;
        session.load(pattern);
        debug!(session = %id, pattern = pattern.name, "pattern loaded");
        let note = snapshot(session);
        self.emit(note);
        Ok(())
    }

    fn emit(&self, note: Notification) {
        if self.notify.send(note).is_err() {
            trace!("no notification receiver");
        }
    }
}

fn live<'a>(sessions: &'a mut HashMap<String, Session>, id: &SessionId) -> Result<&'a mut Session> {
    sessions
        .get_mut(id.slot())
        .filter(|s| s.id() == id)
        .ok_or_else(|| Error::StaleSession(id.clone()))
}

fn snapshot(session: &Session) -> Notification {
    Notification::FullGrid {
        id: session.id().clone(),
        generation: session.generation(),
        rows: session.grid().rows(),
    }
}

/// Cloneable command sender for a running engine.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    commands: UnboundedSender<Command>,
}

impl EngineHandle {
    pub fn send(&self, command: Command) -> Result<()> {
        self.commands.send(command).map_err(|_| Error::ChannelClosed)
    }

    pub fn create(&self, id: SessionId, size: usize) -> Result<()> {
        self.send(Command::Create { id, size })
    }

    pub fn randomize(&self, id: SessionId) -> Result<()> {
        self.send(Command::Randomize { id })
    }

    pub fn step(&self, id: SessionId) -> Result<()> {
        self.send(Command::Step { id })
    }

    pub fn step_back(&self, id: SessionId) -> Result<()> {
        self.send(Command::StepBack { id })
    }

    pub fn start(&self, id: SessionId, interval: Option<Duration>) -> Result<()> {
        self.send(Command::Start { id, interval })
    }

    pub fn stop(&self, id: SessionId) -> Result<()> {
        self.send(Command::Stop { id })
    }

    pub fn get_state(&self, id: SessionId) -> Result<()> {
        self.send(Command::GetState { id })
    }

    pub fn clear(&self, id: SessionId) -> Result<()> {
        self.send(Command::Clear { id })
    }

    pub fn load_pattern(&self, id: SessionId, pattern: usize) -> Result<()> {
        self.send(Command::LoadPattern { id, pattern })
    }
}
