//! Configuration loading, validation and runtime `:set` updates.
//!
//! `axiom.toml` is read once at startup. Every section and field is optional
//! and falls back to its default. A file that fails to parse, or parses but
//! holds an out-of-range value, is discarded as a whole with a warning and
//! the defaults are used instead. Unknown keys are ignored.

use anyhow::{Result, bail};
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "axiom.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    pub tab_width: usize,
    pub use_spaces_for_tabs: bool,
    pub show_line_numbers: bool,
    /// Columns reserved for line numbers when they are shown.
    pub gutter_width: usize,
    /// Accepted for compatibility; there is no undo history.
    pub max_undo_levels: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            use_spaces_for_tabs: true,
            show_line_numbers: true,
            gutter_width: 5,
            max_undo_levels: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FilesConfig {
    pub max_file_size: u64,
    pub default_encoding: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            default_encoding: "utf-8".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub case_sensitive: bool,
    pub regex: bool,
    pub wrap_around: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            regex: false,
            wrap_around: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SyntaxConfig {
    pub enabled: bool,
    pub highlight_trailing_whitespace: bool,
    pub highlight_long_lines: bool,
    pub max_line_length: usize,
    pub highlight_matching_brackets: bool,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            highlight_trailing_whitespace: true,
            highlight_long_lines: true,
            max_line_length: 120,
            highlight_matching_brackets: true,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub syntax: SyntaxConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,      // original file string (optional)
    pub source: Option<PathBuf>,  // file the values came from
    pub file: ConfigFile,         // parsed (or default) data
}

/// `./axiom.toml` when present, else the platform config dir (`<config>/axiom/axiom.toml`).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("axiom").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    let file = match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => file,
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            return Ok(Config::default());
        }
    };
    if let Err(e) = file.validate() {
        warn!(target: "config", path = %path.display(), error = %e, "config_invalid");
        return Ok(Config::default());
    }
    info!(target: "config", path = %path.display(), "config_loaded");
    Ok(Config {
        raw: Some(content),
        source: Some(path),
        file,
    })
}

/// Parse a boolean option value the way `:set` accepts it.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn check_tab_width(v: usize) -> Result<()> {
    if !(1..=16).contains(&v) {
        bail!("tab width must be between 1 and 16");
    }
    Ok(())
}

impl ConfigFile {
    /// Reject values outside their documented ranges.
    pub fn validate(&self) -> Result<()> {
        check_tab_width(self.editor.tab_width)?;
        if !(1..=10_000).contains(&self.editor.max_undo_levels) {
            bail!("max undo levels must be between 1 and 10000");
        }
        if self.files.max_file_size < 1024 {
            bail!("max file size must be at least 1KB");
        }
        if self.syntax.max_line_length == 0 {
            bail!("max line length must be at least 1");
        }
        Ok(())
    }
}

impl Config {
    /// Gutter columns in effect (0 when line numbers are hidden).
    pub fn gutter(&self) -> usize {
        if self.file.editor.show_line_numbers {
            self.file.editor.gutter_width
        } else {
            0
        }
    }

    /// Apply a runtime `:set <name> <value>` for the editor options.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        let editor = &mut self.file.editor;
        match name.to_ascii_lowercase().as_str() {
            "tabwidth" => {
                let Ok(v) = value.trim().parse::<usize>() else {
                    bail!("invalid value for tabwidth: {value}");
                };
                check_tab_width(v)?;
                editor.tab_width = v;
            }
            "linenumbers" => editor.show_line_numbers = parse_flag(value),
            "spacesfortabs" => editor.use_spaces_for_tabs = parse_flag(value),
            other => bail!("unknown option: {other}"),
        }
        info!(target: "config", option = name, value, "option_set");
        Ok(())
    }

    /// Current value of an editor option, rendered for display.
    pub fn show_option(&self, name: &str) -> Option<String> {
        let e = &self.file.editor;
        match name.to_ascii_lowercase().as_str() {
            "tabwidth" => Some(format!("Tab width: {}", e.tab_width)),
            "linenumbers" => Some(format!("Line numbers: {}", e.show_line_numbers)),
            "spacesfortabs" => Some(format!("Spaces for tabs: {}", e.use_spaces_for_tabs)),
            _ => None,
        }
    }
}
