//! CLI configuration loaded from `scribble.toml` files.

use crate::{CliError, Result};
use scribble_lang::FileSystemLoader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "scribble.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Module lookup settings
    pub resolver: ResolverConfig,

    /// Interactive console settings
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Directories searched for imported modules, in order
    pub search_paths: Vec<PathBuf>,

    /// File extension of module sources, without the dot
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub prompt: String,

    /// Prompt shown while a statement is still incomplete
    pub continuation_prompt: String,

    /// Print resolver warnings such as cyclic imports
    pub show_warnings: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            console: ConsoleConfig::default(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(".")],
            extension: scribble_lang::loader::DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            continuation_prompt: ". ".to_string(),
            show_warnings: true,
        }
    }
}

impl CliConfig {
    /// Load configuration from `config_path`, or from the working directory
    /// and then the user config directory, falling back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let mut config = Self::default();
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("scribble").join("config.toml");
            if user_config.exists() {
                config = config.merge(Self::load_from_file(&user_config)?);
            }
        }
        let local_config = Path::new(CONFIG_FILE);
        if local_config.exists() {
            config = config.merge(Self::load_from_file(local_config)?);
        }
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content).map_err(|e| {
            CliError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Values from `other` win wherever they differ from the defaults.
    pub fn merge(self, other: CliConfig) -> CliConfig {
        let defaults = CliConfig::default();
        let pick = |mine: String, theirs: String, default: &str| {
            if theirs != default {
                theirs
            } else {
                mine
            }
        };
        CliConfig {
            resolver: ResolverConfig {
                search_paths: if other.resolver.search_paths != defaults.resolver.search_paths {
                    other.resolver.search_paths
                } else {
                    self.resolver.search_paths
                },
                extension: pick(
                    self.resolver.extension,
                    other.resolver.extension,
                    &defaults.resolver.extension,
                ),
            },
            console: ConsoleConfig {
                prompt: pick(
                    self.console.prompt,
                    other.console.prompt,
                    &defaults.console.prompt,
                ),
                continuation_prompt: pick(
                    self.console.continuation_prompt,
                    other.console.continuation_prompt,
                    &defaults.console.continuation_prompt,
                ),
                show_warnings: other.console.show_warnings && self.console.show_warnings,
            },
        }
    }

    /// Module loader over the configured search paths, with `extra` paths
    /// searched first.
    pub fn loader(&self, extra: &[PathBuf]) -> FileSystemLoader {
        let mut paths = extra.to_vec();
        paths.extend(self.resolver.search_paths.iter().cloned());
        FileSystemLoader::new(paths).with_extension(self.resolver.extension.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = CliConfig::parse("[console]\nprompt = \"scribble> \"\n").unwrap();
        assert_eq!(config.console.prompt, "scribble> ");
        assert_eq!(config.console.continuation_prompt, ". ");
        assert_eq!(config.resolver, ResolverConfig::default());
    }

    #[test]
    fn merge_prefers_non_default_values() {
        let base = CliConfig::parse("[resolver]\nextension = \"scr\"\n").unwrap();
        let overlay = CliConfig::parse("[resolver]\nsearch_paths = [\"lib\"]\n").unwrap();
        let merged = base.merge(overlay);
        assert_eq!(merged.resolver.extension, "scr");
        assert_eq!(merged.resolver.search_paths, vec![PathBuf::from("lib")]);
    }

    #[test]
    fn load_reads_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[console]\nshow_warnings = false").unwrap();
        let config = CliConfig::load(Some(file.path())).unwrap();
        assert!(!config.console.show_warnings);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[console\nprompt = 1").unwrap();
        let err = CliConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn loader_searches_extra_paths_first() {
        let config = CliConfig::default();
        let loader = config.loader(&[PathBuf::from("scripts")]);
        assert_eq!(
            loader.search_paths(),
            &[PathBuf::from("scripts"), PathBuf::from(".")]
        );
        assert_eq!(loader.extension(), "scribble");
    }
}
