//! Global addcal configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PRODID, DEFAULT_RELATED_LIMIT, DEFAULT_UID_PREFIX};
use crate::error::{AddCalError, AddCalResult};
use crate::ics::IcsOptions;
use crate::links::BaseUrlResolver;

static DEFAULT_BASE_URL: &str = "http://localhost";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_uid_prefix() -> String {
    DEFAULT_UID_PREFIX.to_string()
}

fn default_prodid() -> String {
    DEFAULT_PRODID.to_string()
}

fn default_related_limit() -> usize {
    DEFAULT_RELATED_LIMIT
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Settings for importing legacy inline images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_source")]
    pub source_dir: PathBuf,
    #[serde(default = "default_media_dest")]
    pub dest_dir: PathBuf,
    #[serde(default = "default_owner_id")]
    pub owner_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
}

fn default_media_source() -> PathBuf {
    PathBuf::from("~/legacy/private")
}

fn default_media_dest() -> PathBuf {
    PathBuf::from("~/legacy/public")
}

fn default_owner_id() -> u64 {
    1
}

impl Default for MediaConfig {
    fn default() -> Self {
        MediaConfig {
            source_dir: default_media_source(),
            dest_dir: default_media_dest(),
            owner_id: default_owner_id(),
            manifest: None,
        }
    }
}

impl MediaConfig {
    pub fn source_path(&self) -> PathBuf {
        expand(&self.source_dir)
    }

    pub fn dest_path(&self) -> PathBuf {
        expand(&self.dest_dir)
    }

    pub fn manifest_path(&self) -> Option<PathBuf> {
        self.manifest.as_deref().map(expand)
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Global configuration at ~/.config/addcal/config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddCalConfig {
    /// Site root used to build canonical event URLs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_uid_prefix")]
    pub uid_prefix: String,

    #[serde(default = "default_prodid")]
    pub prodid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_max_length: Option<usize>,

    #[serde(default = "default_related_limit")]
    pub related_limit: usize,

    /// IANA zone display dates are shown in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub media: MediaConfig,
}

impl Default for AddCalConfig {
    fn default() -> Self {
        AddCalConfig {
            base_url: default_base_url(),
            uid_prefix: default_uid_prefix(),
            prodid: default_prodid(),
            summary_max_length: None,
            related_limit: default_related_limit(),
            timezone: default_timezone(),
            media: MediaConfig::default(),
        }
    }
}

impl AddCalConfig {
    pub fn config_path() -> AddCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AddCalError::Config("Could not determine config directory".into()))?
            .join("addcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/addcal/config.toml, writing a commented-out default
    /// file first if there is none.
    pub fn load() -> AddCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> AddCalResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| AddCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AddCalError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AddCalResult<()> {
        let contents = format!(
            "\
# addcal configuration

# Site root for canonical event URLs:
# base_url = \"{DEFAULT_BASE_URL}\"

# Event UID prefix and calendar product id:
# uid_prefix = \"{DEFAULT_UID_PREFIX}\"
# prodid = \"{DEFAULT_PRODID}\"

# Shorten event descriptions to this many characters:
# summary_max_length = 200

# Number of related items to show:
# related_limit = {DEFAULT_RELATED_LIMIT}

# Time zone for display dates:
# timezone = \"Europe/Helsinki\"

# Legacy image migration:
# [media]
# source_dir = \"~/legacy/private\"
# dest_dir = \"~/legacy/public\"
# owner_id = 1
# manifest = \"~/legacy/media.json\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AddCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AddCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn to_toml(&self) -> AddCalResult<String> {
        toml::to_string_pretty(self).map_err(|e| AddCalError::Serialization(e.to_string()))
    }

    pub fn ics_options(&self) -> IcsOptions {
        IcsOptions {
            uid_prefix: self.uid_prefix.clone(),
            prodid: self.prodid.clone(),
            summary_max_length: self.summary_max_length,
        }
    }

    pub fn url_resolver(&self) -> AddCalResult<BaseUrlResolver> {
        BaseUrlResolver::new(&self.base_url)
    }

    pub fn tz(&self) -> AddCalResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| AddCalError::Config(format!("Invalid timezone '{}': {e}", self.timezone)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addcal/config.toml");

        AddCalConfig::create_default_config(&path).unwrap();
        let config = AddCalConfig::load_from(&path).unwrap();

        assert_eq!(config, AddCalConfig::default());
    }

    #[test]
    fn test_load_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"https://events.example.org\"\n\
             summary_max_length = 120\n\
             timezone = \"Europe/Helsinki\"\n\
             [media]\n\
             owner_id = 5\n",
        )
        .unwrap();

        let config = AddCalConfig::load_from(&path).unwrap();

        assert_eq!(config.base_url, "https://events.example.org");
        assert_eq!(config.ics_options().summary_max_length, Some(120));
        assert_eq!(config.uid_prefix, "calendar-");
        assert_eq!(config.related_limit, 3);
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Helsinki);
        assert_eq!(config.media.owner_id, 5);
        assert_eq!(config.media.source_dir, PathBuf::from("~/legacy/private"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AddCalConfig::load_from(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config, AddCalConfig::default());
    }

    #[test]
    fn test_invalid_timezone() {
        let config = AddCalConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AddCalConfig::default()
        };
        assert!(matches!(config.tz(), Err(AddCalError::Config(_))));
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = AddCalConfig {
            summary_max_length: Some(80),
            ..AddCalConfig::default()
        };
        let parsed: AddCalConfig = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
