use std::path::Path;

use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Location of the user overlay, before tilde expansion.
pub const USER_CONFIG_PATH: &str = "~/.config/pipesh/config.toml";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub applications: ApplicationsConfig,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    /// Maximum nesting of backtick substitutions before resolution fails.
    #[serde(default)]
    pub max_substitution_depth: usize,
    /// Whether `*` matches dotfiles without an explicit leading dot.
    #[serde(default)]
    pub glob_hidden: bool,
    /// Whether `_name` runs `name` with its failure printed to stdout.
    #[serde(default)]
    pub unsafe_prefix: bool,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: String,
    /// Log file path; `~` is expanded, empty disables file logging.
    #[serde(default)]
    pub file: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ApplicationsConfig {
    /// Builtin application names left out of the registry.
    #[serde(default)]
    pub disabled: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
    #[serde(default)]
    applications: ApplicationsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    max_substitution_depth: Option<usize>,
    glob_hidden: Option<bool>,
    unsafe_prefix: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingOverlay {
    level: Option<String>,
    file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ApplicationsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    disabled: Vec<String>,
    #[serde(default)]
    remove_disabled: Vec<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge the overlay at `path`, or `~/.config/pipesh/config.toml` when
    ///    no path is given (a missing file is not an error)
    pub fn load(path: Option<&Path>) -> Self {
        let mut config = Self::default_config();
        let overlay = match path {
            Some(path) => Self::load_overlay(path),
            None => {
                let expanded = shellexpand::tilde(USER_CONFIG_PATH);
                Self::load_overlay(Path::new(expanded.as_ref()))
            }
        };
        if let Some(overlay) = overlay {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Render the merged configuration as TOML (for `--dump-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn load_overlay(path: &Path) -> Option<ConfigOverlay> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("pipesh: config parse error in {}: {e}", path.display());
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.max_substitution_depth {
            self.settings.max_substitution_depth = v;
        }
        if let Some(v) = s.glob_hidden {
            self.settings.glob_hidden = v;
        }
        if let Some(v) = s.unsafe_prefix {
            self.settings.unsafe_prefix = v;
        }

        let l = overlay.logging;
        if let Some(v) = l.level {
            self.logging.level = v;
        }
        if let Some(v) = l.file {
            self.logging.file = v;
        }

        let a = overlay.applications;
        merge_list(
            &mut self.applications.disabled,
            a.disabled,
            &a.remove_disabled,
            a.replace,
        );
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
