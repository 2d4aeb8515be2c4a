// Static configuration: which OneSky projects exist, which locales each one
// ships, and how the string table is produced. Loaded once at startup and
// passed around by reference.

use crate::error::SyncError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://platform.api.onesky.io";
pub const CONFIG_FILE_NAME: &str = "onesky.toml";

/// A `language` or `language-REGION` identifier, e.g. `sv` or `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Locale(String);

impl Locale {
    pub fn parse(value: &str) -> Result<Self, SyncError> {
        let valid = !value.is_empty()
            && value
                .split('-')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
        if !valid {
            return Err(SyncError::Config(format!("invalid locale identifier {value:?}")));
        }
        Ok(Locale(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Language subtag: everything before the first hyphen.
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    pub fn has_region(&self) -> bool {
        self.0.contains('-')
    }
}

impl TryFrom<String> for Locale {
    type Error = SyncError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::parse(&value)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Directory name under `<root>/sources/`.
    pub name: String,
    /// OneSky-assigned project identifier.
    pub project_id: String,
    #[serde(default)]
    pub locales: Vec<Locale>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    /// Filename used for the extracted table, every upload and every download.
    pub canonical_file: String,
    /// Shell command run from the project root to extract strings.
    pub extract_command: String,
    /// File the extraction command writes into the project root.
    pub extract_output: String,
    pub projects: Vec<Project>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            canonical_file: "TinkLinkUI.strings".to_string(),
            extract_command: "find ./sources/TinkLinkUI -name '*.swift' -print0 | xargs -0 genstrings -s NSLocalizedString -o .".to_string(),
            extract_output: "Localizable.strings".to_string(),
            projects: vec![Project {
                name: "TinkLinkUI".to_string(),
                project_id: "170340".to_string(),
                locales: vec![Locale("en-US".to_string()), Locale("sv-SE".to_string())],
            }],
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, SyncError> {
        let config: Config =
            toml::from_str(text).map_err(|e| SyncError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, SyncError> {
        let text = std::fs::read_to_string(path)?;
        Config::from_toml(&text)
            .map_err(|e| SyncError::Config(format!("{}: {e}", path.display())))
    }

    /// Load configuration for a project root.
    ///
    /// Looks at `explicit` first, then `<root>/onesky.toml`, then the user
    /// config directory, and falls back to the built-in project list. The
    /// `ONESKY_API_URL` environment variable overrides `api_url`.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, SyncError> {
        let mut config = match explicit {
            Some(path) => Config::from_file(path)?,
            None => match candidate_files(root).into_iter().find(|p| p.is_file()) {
                Some(path) => {
                    debug!("Loading configuration from {}", path.display());
                    Config::from_file(&path)?
                }
                None => {
                    debug!("No configuration file found, using built-in project list");
                    Config::default()
                }
            },
        };
        if let Ok(url) = std::env::var("ONESKY_API_URL") {
            config.api_url = url;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), SyncError> {
        if self.projects.is_empty() {
            return Err(SyncError::Config("no projects configured".into()));
        }
        check_file_name("canonical_file", &self.canonical_file)?;
        check_file_name("extract_output", &self.extract_output)?;
        for project in &self.projects {
            if project.project_id.trim().is_empty() {
                return Err(SyncError::Config(format!(
                    "project {} has an empty project_id",
                    project.name
                )));
            }
            check_file_name("project name", &project.name)?;
        }
        Ok(())
    }
}

// Values joined onto the project root must stay a single path component.
fn check_file_name(field: &str, value: &str) -> Result<(), SyncError> {
    let plain = !value.trim().is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\']);
    if plain {
        Ok(())
    } else {
        Err(SyncError::Config(format!(
            "{field} must be a plain file name, got {value:?}"
        )))
    }
}

fn candidate_files(root: &Path) -> Vec<PathBuf> {
    let mut files = vec![root.join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("onesky-sync").join("config.toml"));
    }
    files
}
