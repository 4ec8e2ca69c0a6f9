//! User configuration (`config.toml`).
//!
//! Looked up in the platform config dir (`gridsheet/config.toml`) unless a
//! path is given explicitly. Problems with the file never stop the program:
//! they are reported as warnings and the defaults are used.

use directories::ProjectDirs;
use gridsheet_core::DocumentOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 65_536;
pub const DEFAULT_COL_WIDTH: u16 = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: Option<GridSection>,
    history: Option<HistorySection>,
    ui: Option<UiSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    cols: Option<usize>,
    rows: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HistorySection {
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct UiSection {
    col_width: Option<u16>,
}

/// Effective settings after merging the config file over the defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub document: DocumentOptions,
    pub col_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            document: DocumentOptions::default(),
            col_width: DEFAULT_COL_WIDTH,
        }
    }
}

impl Config {
    fn merge(&mut self, file: ConfigFile, warnings: &mut Vec<String>) {
        if let Some(grid) = file.grid {
            if let Some(cols) = grid.cols {
                self.document.cols = cols;
            }
            if let Some(rows) = grid.rows {
                self.document.rows = rows;
            }
        }
        if let Some(history) = file.history {
            match history.limit {
                Some(0) => warnings.push(
                    "history.limit must be at least 1; keeping unlimited undo history"
                        .to_string(),
                ),
                limit => self.document.history_limit = limit,
            }
        }
        if let Some(ui) = file.ui {
            if let Some(width) = ui.col_width {
                self.col_width = width.clamp(4, 50);
            }
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridsheet")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Load configuration from `config_file`, or the user config path.
///
/// Returns the merged config and any warnings to show the user.
pub fn load_config(config_file: Option<&Path>) -> (Config, Vec<String>) {
    let mut config = Config::default();
    let mut warnings = Vec::new();

    let path = config_file.map(Path::to_path_buf).or_else(user_config_path);
    let Some(path) = path else {
        return (config, warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (config, warnings);
    }

    match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<ConfigFile>(&content) {
                Ok(parsed) => config.merge(parsed, &mut warnings),
                Err(err) => warnings.push(format!("Failed to parse {}: {}", path.display(), err)),
            },
            Err(err) => warnings.push(format!("Failed to read {}: {}", path.display(), err)),
        },
        Err(err) => warnings.push(format!(
            "Failed to read metadata for {}: {}",
            path.display(),
            err
        )),
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_full_config_is_merged() {
        let (_dir, path) = write_config(
            "[grid]\ncols = 6\nrows = 40\n\n[history]\nlimit = 50\n\n[ui]\ncol_width = 14\n",
        );
        let (config, warnings) = load_config(Some(&path));
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.document.cols, 6);
        assert_eq!(config.document.rows, 40);
        assert_eq!(config.document.history_limit, Some(50));
        assert_eq!(config.col_width, 14);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let (_dir, path) = write_config("[grid]\nrows = 25\n");
        let (config, warnings) = load_config(Some(&path));
        assert!(warnings.is_empty());
        assert_eq!(config.document.cols, 10);
        assert_eq!(config.document.rows, 25);
        assert_eq!(config.document.history_limit, None);
        assert_eq!(config.col_width, DEFAULT_COL_WIDTH);
    }

    #[test]
    fn test_unknown_keys_warn_and_fall_back() {
        let (_dir, path) = write_config("[grid]\ncolumns = 5\n");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not found"));
    }

    #[test]
    fn test_zero_history_limit_warns() {
        let (_dir, path) = write_config("[history]\nlimit = 0\n");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config.document.history_limit, None);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("history.limit"));
    }

    #[test]
    fn test_col_width_is_clamped() {
        let (_dir, path) = write_config("[ui]\ncol_width = 500\n");
        let (config, _) = load_config(Some(&path));
        assert_eq!(config.col_width, 50);
    }
}
