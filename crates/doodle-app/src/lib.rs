//! Doodle Application
//!
//! A headless shell around the editor: it loads the persisted scene, replays
//! recorded input, renders every frame and autosaves as it goes.

mod app;
mod script;
mod shortcuts;

pub use app::{App, AppConfig, AppError, AppResult, SessionStats};
pub use script::{Args, Script};
pub use shortcuts::{Shortcut, ShortcutRegistry};

use doodle_core::FileStorage;
use std::sync::Arc;

/// Run the binary with parsed arguments.
pub async fn run(args: Args) -> AppResult<()> {
    if args.shortcuts {
        ShortcutRegistry::print_all();
        return Ok(());
    }

    let config = args.app_config()?;
    let storage = match &config.data_dir {
        Some(dir) => FileStorage::new(dir.clone())?,
        None => FileStorage::default_location()?,
    };
    log::info!("Using storage at {}", storage.base_path().display());

    let script = match &args.script {
        Some(path) => Script::load(path)?,
        None => Script::default(),
    };

    let mut app = App::load(Arc::new(storage), config).await;
    app.redraw()?;
    for event in script.events {
        app.handle(event).await?;
    }
    app.shutdown().await?;

    let stats = app.stats();
    log::info!(
        "Replayed {} events: {} frames, {} saves, {} elements",
        stats.events,
        stats.frames,
        stats.saves,
        app.editor().scene().len()
    );
    Ok(())
}
