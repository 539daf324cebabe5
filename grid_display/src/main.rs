// main.rs - Three Game of Life boards driven by a background engine

use anyhow::anyhow;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod args;        // Command line flags
mod controller;  // Per-board command/notification handling
mod error;
mod surface;     // Visible cell state
mod ui;          // egui window

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = args::parse_args(std::env::args().skip(1))?;
    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1080.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |cc| Box::new(ui::BoardsApp::new(cc, runtime, config))),
    )
    .map_err(|err| anyhow!("event loop failed: {err}"))
}
