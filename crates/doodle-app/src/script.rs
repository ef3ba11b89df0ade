//! Input scripts and command-line arguments.

use crate::app::{AppConfig, AppResult};
use clap::Parser;
use doodle_core::{EditorConfig, InputEvent};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A recorded input session: a JSON array of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub events: Vec<InputEvent>,
}

impl Script {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Replays a JSON script of input events against the persisted scene.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "doodle", version, about, long_about = None)]
pub struct Args {
    /// Input script: a JSON array of events
    pub script: Option<PathBuf>,

    /// Editor configuration (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Storage directory [default: platform data dir]
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Viewport size in pixels [default: 1280x800]
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    pub size: Option<(f64, f64)>,

    /// Print keyboard shortcuts and exit
    #[arg(long)]
    pub shortcuts: bool,
}

fn parse_size(value: &str) -> Result<(f64, f64), String> {
    let invalid = || format!("invalid size '{}', expected WxH", value);
    let (w, h) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f64 = w.trim().parse().map_err(|_| invalid())?;
    let height: f64 = h.trim().parse().map_err(|_| invalid())?;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(invalid());
    }
    Ok((width, height))
}

impl Args {
    /// Application configuration from these arguments, reading the config file if given.
    pub fn app_config(&self) -> AppResult<AppConfig> {
        let editor = match &self.config {
            Some(path) => EditorConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => EditorConfig::default(),
        };
        let defaults = AppConfig::default();
        let (width, height) = self.size.unwrap_or((defaults.width, defaults.height));
        Ok(AppConfig {
            width,
            height,
            data_dir: self.data_dir.clone(),
            editor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doodle_core::KeyCommand;
    use std::io::Write;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("doodle").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--data-dir", "store", "session.json", "--size", "640x480"]).unwrap();
        assert_eq!(parsed.script, Some(PathBuf::from("session.json")));
        assert_eq!(parsed.data_dir, Some(PathBuf::from("store")));
        assert_eq!(parsed.size, Some((640.0, 480.0)));
        assert!(!parsed.shortcuts);
    }

    #[test]
    fn test_bad_args() {
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["--config"]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
        assert!(args(&["--size", "0x10"]).is_err());
        assert!(args(&["--size", "wide"]).is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("800X600"), Ok((800.0, 600.0)));
        assert!(parse_size("800x").is_err());
        assert!(parse_size("-1x5").is_err());
    }

    #[test]
    fn test_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"autosaveIntervalMs": 250, "seedInitialContent": false}}"#).unwrap();
        let path = file.path().display().to_string();
        let parsed = args(&["--config", path.as_str()]).unwrap();
        let config = parsed.app_config().unwrap();
        assert_eq!(config.editor.autosave_interval_ms, 250);
        assert!(!config.editor.seed_initial_content);
        assert_eq!(config.width, 1280.0);
    }

    #[test]
    fn test_script_json() {
        let script = Script::from_json(
            r#"[{"type": "command", "command": "selectAll"}, {"type": "textCommitted"}]"#,
        )
        .unwrap();
        assert_eq!(script.events.len(), 2);
        assert_eq!(
            script.events[0],
            InputEvent::Command {
                command: KeyCommand::SelectAll
            }
        );
        assert!(Script::from_json("{").is_err());
    }
}
