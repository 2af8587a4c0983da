//! Release window.

mod app;
mod worker;

pub use app::ReleaseApp;
pub use worker::Job;

use crate::error::Result;
use eframe::egui;
use std::path::PathBuf;

/// Window title
pub const WINDOW_TITLE: &str = "Flutter APK Release Tool";

/// Open the release window and block until it is closed
pub fn launch(config_path: PathBuf, api_url: String) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([800.0, 700.0])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(ReleaseApp::new(config_path, api_url)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to open the release window: {}", e))?;

    Ok(())
}
