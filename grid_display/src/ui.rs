// ui.rs - Three boards side by side, sharing one engine

use std::time::Duration;

use conway::patterns::PATTERNS;
use conway::{EngineConfig, Notification, NotificationStream};
use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, trace, warn};

use crate::controller::{Controller, ControllerState};
use crate::error::DisplayError;

const SLOTS: [&str; 3] = ["left", "middle", "right"];
const BOARD_PX: f32 = 320.0;

pub struct BoardsApp {
    boards: Vec<Controller>,
    notifications: UnboundedReceiver<Notification>,
    size_input: String,
    interval_ms: u64,
    selected_pattern: usize,
    live_color: Color32,
    dead_color: Color32,
    message: Option<String>,   // blocking error window
    _runtime: Runtime,         // engine and forwarder die with it
}

/// Moves engine notifications onto the UI side and wakes egui for each one.
async fn forward(mut notes: NotificationStream, ui: UnboundedSender<Notification>, ctx: egui::Context) {
    while let Some(note) = notes.recv().await {
        if ui.send(note).is_err() {
            break;
        }
        ctx.request_repaint();
    }
}

impl BoardsApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: Runtime, config: EngineConfig) -> Self {
        let (engine, notes) = {
            let _enter = runtime.enter();
            let (engine, notes, _task) = conway::spawn(config.clone());
            (engine, notes)
        };
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        runtime.spawn(forward(notes, ui_tx, cc.egui_ctx.clone()));

        let mut boards: Vec<Controller> = SLOTS
            .iter()
            .map(|slot| Controller::new(slot, engine.clone(), config.bounds))
            .collect();
        for board in &mut boards {
            if let Err(err) = board.open(config.default_size) {
                warn!(slot = board.slot(), %err, "could not open board");
            }
        }
        info!(size = config.default_size, boards = boards.len(), "display ready");

        Self {
            boards,
            notifications: ui_rx,
            size_input: config.default_size.to_string(),
            interval_ms: config.default_interval.as_millis() as u64,
            selected_pattern: 0,
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
            message: None,
            _runtime: runtime,
        }
    }

    /// Offers every pending notification to every board; each keeps only
    /// its own.
    fn drain_notifications(&mut self) {
        while let Ok(note) = self.notifications.try_recv() {
            let mut taken = false;
            for board in &mut self.boards {
                match board.apply(note.clone()) {
                    Ok(()) => taken = true,
                    Err(DisplayError::StaleSession(_)) => {}
                    Err(err @ DisplayError::MissingDisplayTarget { .. }) => {
                        // Surface and engine disagree; ask for a fresh snapshot
                        trace!(slot = board.slot(), %err, "resyncing board");
                        taken = true;
                        if let Err(err) = board.refresh() {
                            warn!(slot = board.slot(), %err, "resync failed");
                        }
                    }
                    Err(err) => warn!(slot = board.slot(), %err, "notification rejected"),
                }
            }
            if !taken {
                trace!(session = %note.id(), "stale notification dropped");
            }
        }
    }

    fn for_each_board(&mut self, action: impl Fn(&mut Controller) -> Result<(), DisplayError>) {
        for board in &mut self.boards {
            if let Err(err) = action(board) {
                warn!(slot = board.slot(), %err, "board command failed");
            }
        }
    }

    fn resize_all(&mut self) {
        for board in &mut self.boards {
            match board.resize(&self.size_input) {
                Ok(_) => {}
                Err(DisplayError::InvalidSize(err)) => {
                    // Same input for every board; the first refusal covers them all
                    self.message = Some(err.to_string());
                    return;
                }
                Err(err) => warn!(slot = board.slot(), %err, "resize failed"),
            }
        }
    }

    fn any_playing(&self) -> bool {
        self.boards.iter().any(Controller::is_playing)
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        let playing = self.any_playing();
        let ready = self.boards.iter().all(|b| b.state() == ControllerState::Ready);
        let interval = Some(Duration::from_millis(self.interval_ms));

        ui.horizontal(|ui| {
            ui.label("Size:");
            ui.add_enabled(!playing, egui::TextEdit::singleline(&mut self.size_input).desired_width(40.0));
            if ui.add_enabled(!playing, egui::Button::new("Generate")).clicked() {
                self.resize_all();
            }

            ui.separator();

            if ui.add_enabled(ready, egui::Button::new("🎲 Random")).clicked() {
                self.for_each_board(Controller::randomize);
            }
            if ui.add_enabled(ready, egui::Button::new("⏭ Step")).clicked() {
                self.for_each_board(Controller::step);
            }
            let can_back = ready && self.boards.iter().any(Controller::can_step_back);
            if ui.add_enabled(can_back, egui::Button::new("⏮ Step back")).clicked() {
                self.for_each_board(Controller::step_back);
            }
            if ui.add_enabled(ready, egui::Button::new("▶ Start")).clicked() {
                self.for_each_board(|b| b.start(interval));
            }
            if ui.add_enabled(playing, egui::Button::new("⏸ Stop")).clicked() {
                self.for_each_board(Controller::stop);
            }
            if ui.add_enabled(ready, egui::Button::new("⏹ Clear")).clicked() {
                self.for_each_board(Controller::clear);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Pattern:");
            egui::ComboBox::from_id_source("pattern_selector")
                .selected_text(PATTERNS[self.selected_pattern].name)
                .show_ui(ui, |ui| {
                    for (i, pattern) in PATTERNS.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                    }
                });
            if ui.add_enabled(ready, egui::Button::new("Apply Pattern")).clicked() {
                let pattern = self.selected_pattern;
                self.for_each_board(|b| b.load_pattern(pattern));
            }

            ui.separator();

            // Takes effect on the next start
            ui.label("Interval:");
            ui.add_enabled(!playing, egui::Slider::new(&mut self.interval_ms, 10..=1000).suffix(" ms"));

            ui.separator();

            ui.label("Live:");
            ui.color_edit_button_srgba(&mut self.live_color);
            ui.label("Dead:");
            ui.color_edit_button_srgba(&mut self.dead_color);
        });
    }

    fn draw_board(&self, ui: &mut egui::Ui, board: &Controller) {
        ui.vertical(|ui| {
            match board.session() {
                Some(id) => ui.label(id.to_string()),
                None => ui.label(board.slot()),
            };

            let Some(surface) = board.surface() else {
                ui.allocate_space(Vec2::splat(BOARD_PX));
                ui.label("waiting for engine…");
                return;
            };

            let size = surface.size();
            let spacing = 0.5;
            let box_size = (BOARD_PX + spacing) / size as f32 - spacing;
            let (response, painter) = ui.allocate_painter(Vec2::splat(BOARD_PX), egui::Sense::hover());
            let start_pos = response.rect.min;

            painter.rect_filled(response.rect, 0.0, Color32::BLACK);

            for row in 0..size {
                for col in 0..size {
                    let x = start_pos.x + col as f32 * (box_size + spacing);
                    let y = start_pos.y + row as f32 * (box_size + spacing);
                    let rect = Rect::from_min_size(egui::pos2(x, y), Vec2::splat(box_size));

                    let color = if surface.is_alive(row, col) { self.live_color } else { self.dead_color };
                    painter.rect_filled(rect, 1.0, color);
                    painter.rect_stroke(rect, 1.0, Stroke::new(0.2, Color32::from_gray(60)));
                }
            }

            let cells = size * size;
            let live = surface.population();
            ui.label(format!("Generation: {}", surface.generation()));
            ui.label(format!("Live cells: {} / {} ({:.1}%)", live, cells, live as f32 / cells as f32 * 100.0));
            if board.is_playing() {
                ui.label("running");
            }
        });
    }
}

impl eframe::App for BoardsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_notifications();

        if let Some(message) = self.message.clone() {
            egui::Window::new("Invalid size")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        self.message = None;
                    }
                });
        }

        let blocked = self.message.is_some();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life");

            ui.add_enabled_ui(!blocked, |ui| self.draw_controls(ui));

            ui.separator();

            ui.horizontal_top(|ui| {
                for board in &self.boards {
                    self.draw_board(ui, board);
                    ui.add_space(12.0);
                }
            });
        });
    }
}
