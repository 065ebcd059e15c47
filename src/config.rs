use std::fs;
use std::path::{Path, PathBuf};

/// Settings read once at startup from the rc file.
#[derive(Debug, Default, PartialEq)]
pub struct Config {
    /// Replaces the default `user@bcsh:cwd $ ` prompt when set.
    pub prompt: Option<String>,
    /// Commands evaluated before the first prompt.
    pub startup: Vec<String>,
}

pub fn config_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/bcsh/bcshrc"))
}

/// Loads the rc file if present; a missing or unreadable file silently falls
/// back to defaults.
pub fn init() -> Config {
    match config_file_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => Config::default(),
    }
}

pub fn load_config(path: &Path) -> Config {
    let content = fs::read_to_string(path).unwrap_or_default();
    parse_config(&content)
}

// Format: `prompt = "..."` key lines, and everything after a `#startup`
// marker line runs as a startup command. Other `#` lines are comments.
fn parse_config(content: &str) -> Config {
    let mut config = Config::default();
    let mut in_startup = false;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line.strip_prefix('#') {
            Some(marker) if marker.trim().eq_ignore_ascii_case("startup") => in_startup = true,
            Some(_) => {}
            None if in_startup => config.startup.push(line.to_string()),
            None => {
                if let Some((key, value)) = line.split_once('=') {
                    if key.trim() == "prompt" {
                        config.prompt = Some(value.trim().trim_matches('"').to_string());
                    }
                }
            }
        }
    }

    config
}
