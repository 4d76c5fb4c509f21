//! User configuration (`config.toml`).
//!
//! Problems with the file never stop the program: they become warnings and the
//! affected settings keep their defaults.

use directories::ProjectDirs;
use ledgergrid_core::GridOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_BATCH: usize = 1_000;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: Option<GridSection>,
    log: Option<LogSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    append_batch: Option<usize>,
    insert_batch: Option<usize>,
    min_column_width: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogSection {
    level: Option<String>,
    file: Option<PathBuf>,
}

/// Resolved settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub grid: GridOptions,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid: GridOptions::default(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Load `config.toml` from `config_file` or the user config dir.
///
/// Returns the config and any warnings to show the user.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = config_file.cloned().or_else(user_config_path);
    let mut file: Option<ConfigFile> = None;

    if let Some(path) = config_path.as_ref() {
        if path.exists() {
            file = read_config_file(path, &mut warnings);
        } else if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
    }

    let config = match file {
        Some(file) => resolve(file, &mut warnings),
        None => Config::default(),
    };
    (config, warnings)
}

fn read_config_file(path: &Path, warnings: &mut Vec<String>) -> Option<ConfigFile> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => parse_config(&content, path, warnings),
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

fn parse_config(content: &str, path: &Path, warnings: &mut Vec<String>) -> Option<ConfigFile> {
    match toml::from_str::<ConfigFile>(content) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warnings.push(format!("Failed to parse {}: {}", path.display(), err));
            None
        }
    }
}

fn resolve(file: ConfigFile, warnings: &mut Vec<String>) -> Config {
    let mut config = Config::default();
    let grid = file.grid.unwrap_or_default();

    if let Some(n) = grid.append_batch {
        config.grid.append_batch = batch("append_batch", n, warnings);
    }
    if let Some(n) = grid.insert_batch {
        config.grid.insert_batch = batch("insert_batch", n, warnings);
    }
    if let Some(width) = grid.min_column_width {
        if width == 0 {
            warnings.push("grid.min_column_width must be positive; using default".to_string());
        } else {
            config.grid.min_column_width = width;
        }
    }

    let log = file.log.unwrap_or_default();
    if let Some(level) = log.level {
        let trimmed = level.trim();
        if trimmed.is_empty() {
            warnings.push("log.level is empty; using 'info'".to_string());
        } else {
            config.log_level = trimmed.to_string();
        }
    }
    config.log_file = log.file;
    config
}

fn batch(key: &str, n: usize, warnings: &mut Vec<String>) -> usize {
    if n == 0 || n > MAX_BATCH {
        warnings.push(format!(
            "grid.{} must be between 1 and {} (got {}); using 1",
            key, MAX_BATCH, n
        ));
        1
    } else {
        n
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "ledgergrid")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (Config, Vec<String>) {
        let mut warnings = Vec::new();
        let config = match parse_config(content, Path::new("config.toml"), &mut warnings) {
            Some(file) => resolve(file, &mut warnings),
            None => Config::default(),
        };
        (config, warnings)
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let (config, warnings) = parse("");
        assert_eq!(config, Config::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_full_config() {
        let (config, warnings) = parse(
            r#"
            [grid]
            append_batch = 3
            insert_batch = 5
            min_column_width = 40

            [log]
            level = "debug"
            file = "/tmp/ledgergrid.log"
            "#,
        );
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(config.grid.append_batch, 3);
        assert_eq!(config.grid.insert_batch, 5);
        assert_eq!(config.grid.min_column_width, 40);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/ledgergrid.log")));
    }

    #[test]
    fn test_unknown_key_is_a_warning() {
        let (config, warnings) = parse("[grid]\nrows_per_page = 3\n");
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse config.toml"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = parse("[grid]\nappend_batch = 0\nmin_column_width = 0\n");
        assert_eq!(config.grid.append_batch, 1);
        assert_eq!(config.grid.min_column_width, GridOptions::default().min_column_width);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let path = PathBuf::from("/nonexistent/ledgergrid/config.toml");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert_eq!(warnings, vec![format!("Config file not found: {}", path.display())]);
    }
}
