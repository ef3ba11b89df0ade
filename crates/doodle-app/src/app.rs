//! Application shell: editor, renderer and autosave wired together.

use doodle_core::{
    AutoSave, Editor, EditorConfig, EditorResponse, InputEvent, Storage, StorageError,
};
use doodle_render::{
    FrameStats, RecordingSurface, RenderContext, Renderer, RendererError, SketchRenderer, Surface,
};
use kurbo::Size;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub width: f64,
    pub height: f64,
    /// Directory for the JSON store; the platform data directory when `None`.
    pub data_dir: Option<PathBuf>,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            data_dir: None,
            editor: EditorConfig::default(),
        }
    }
}

/// Totals for a replayed session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub events: usize,
    pub frames: usize,
    pub saves: usize,
}

pub struct App<S: Storage> {
    editor: Editor,
    renderer: SketchRenderer,
    autosave: AutoSave<S>,
    surface: RecordingSurface,
    stats: SessionStats,
}

impl<S: Storage> App<S> {
    /// Load the persisted scene from `storage` and size the viewport.
    pub async fn load(storage: Arc<S>, config: AppConfig) -> Self {
        let mut autosave = AutoSave::new(storage);
        autosave.set_interval(Duration::from_millis(config.editor.autosave_interval_ms));
        let state = autosave.load().await;
        log::info!(
            "Loaded {} elements (dark mode: {})",
            state.elements.len(),
            state.dark_mode
        );

        let mut editor = Editor::with_state(config.editor.clone(), state);
        editor.handle(InputEvent::Resize {
            width: config.width,
            height: config.height,
        });
        Self {
            editor,
            renderer: SketchRenderer::default(),
            autosave,
            surface: RecordingSurface::new(Size::new(config.width, config.height)),
            stats: SessionStats::default(),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Feed one event through the editor, redraw if needed and autosave.
    pub async fn handle(&mut self, event: InputEvent) -> AppResult<EditorResponse> {
        let response = self.editor.handle(event);
        self.stats.events += 1;

        if response.redraw {
            self.redraw()?;
        }
        if response.scene_changed {
            self.autosave.mark_dirty();
        }
        if self.autosave.is_dirty() {
            let state = self.editor.persisted_state();
            match self.autosave.maybe_save(&state).await {
                Ok(true) => self.stats.saves += 1,
                Ok(false) => {}
                Err(e) => log::warn!("Autosave failed: {}", e),
            }
        }
        Ok(response)
    }

    /// Render a frame onto the recording surface.
    pub fn redraw(&mut self) -> AppResult<FrameStats> {
        let size = self.editor.viewport_size();
        if size != self.surface.size() {
            self.surface.resize(size);
        }
        let ctx = render_context(&self.editor);
        let stats = self.renderer.render(&ctx, &mut self.surface)?;
        self.stats.frames += 1;
        Ok(stats)
    }

    /// Write pending changes regardless of the autosave interval.
    pub async fn shutdown(&mut self) -> AppResult<()> {
        let state = self.editor.persisted_state();
        if self.autosave.flush(&state).await? {
            self.stats.saves += 1;
        }
        Ok(())
    }
}

fn render_context(editor: &Editor) -> RenderContext<'_> {
    RenderContext::new(editor.scene())
        .with_marquee(editor.marquee())
        .with_editing_element(editor.text_edit().map(|edit| edit.element_id))
}
