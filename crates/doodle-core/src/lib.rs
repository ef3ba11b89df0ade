//! Doodle Core Library
//!
//! Platform-agnostic data model and interaction logic for the Doodle sketch
//! canvas: elements, hit-testing, the scene store with undo history, tools,
//! input dispatch and persistence. Rendering lives in `doodle-render`.

pub mod config;
pub mod editor;
pub mod element;
pub mod geometry;
pub mod history;
pub mod input;
pub mod scene;
pub mod storage;
pub mod tools;
pub mod viewport;
pub mod welcome;

pub use config::EditorConfig;
pub use editor::{Editor, EditorResponse};
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, ElementStyle, GroupId, SerializableColor,
    StylePatch, TextAlign, TextBaseline,
};
pub use geometry::{CursorIcon, ResizeHandle};
pub use history::History;
pub use input::{InputEvent, KeyCommand, Modifiers};
pub use scene::{AppState, Scene};
pub use storage::{AutoSave, FileStorage, MemoryStorage, PersistedState, Storage, StorageError};
pub use tools::{TextEditRequest, ToolKind};
pub use viewport::Viewport;
