//! Layered configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`sitehost.toml` in the working directory, or an explicit path)
//! 3. `SITEHOST_*` environment variables, `__` separating nested keys
//!    (`SITEHOST_FETCH__TIMEOUT_SECS=30`)
//! 4. `SITES_DIR` and `GITHUB_TOKEN`

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use sitehost_fetch::SnapshotOptions;
use thiserror::Error;

pub const CONFIG_FILE: &str = "sitehost.toml";
pub const ENV_PREFIX: &str = "SITEHOST_";

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Figment(Box<figment::Error>),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the on-disk layout `<sites_dir>/<owner>/<site>/`.
    pub sites_dir: PathBuf,
    /// Site metadata file. Defaults to `<sites_dir>/.sites.json`.
    pub registry_path: Option<PathBuf>,
    /// Largest accepted archive, uploaded or fetched.
    pub max_archive_bytes: u64,
    /// Largest total size an archive may inflate to.
    pub max_unpacked_bytes: u64,
    pub fetch: FetchConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sites_dir: PathBuf::from("sites"),
            registry_path: None,
            max_archive_bytes: 50 * MIB,
            max_unpacked_bytes: 512 * MIB,
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".into(),
            token: None,
            timeout_secs: 60,
            user_agent: concat!("sitehost/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchConfig")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// The provider stack without extraction, for callers that want to
    /// merge further sources on top.
    pub fn figment(file: Option<&Path>) -> Figment {
        let file = file.map_or_else(|| PathBuf::from(CONFIG_FILE), Path::to_path_buf);

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["SITES_DIR"]).map(|_| "sites_dir".into()))
            .merge(Env::raw().only(&["GITHUB_TOKEN"]).map(|_| "fetch.token".into()))
    }

    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(file))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sites_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "sites_dir",
                reason: "must not be empty".into(),
            });
        }
        if self.max_archive_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_archive_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_unpacked_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_unpacked_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "fetch.timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(|| self.sites_dir.join(".sites.json"))
    }

    pub fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions::default()
            .api_base(self.fetch.api_base.clone())
            .token(self.fetch.token.clone())
            .timeout(Duration::from_secs(self.fetch.timeout_secs))
            .max_bytes(self.max_archive_bytes)
    }

    /// Effective configuration as TOML, with the token masked.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.fetch.token.is_some() {
            shown.fetch.token = Some("<redacted>".into());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_any_source() {
        Jail::expect_with(|_jail| {
            let config = Config::load(None).unwrap();
            assert_eq!(config.sites_dir, PathBuf::from("sites"));
            assert_eq!(config.max_archive_bytes, 50 * MIB);
            assert_eq!(config.fetch.timeout_secs, 60);
            assert_eq!(config.registry_path(), Path::new("sites").join(".sites.json"));
            Ok(())
        });
    }

    #[test]
    fn file_then_env_then_legacy() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                sites_dir = "/srv/from-file"
                max_archive_bytes = 1024

                [fetch]
                timeout_secs = 5
                token = "file-token"
                "#,
            )?;
            jail.set_env("SITEHOST_MAX_ARCHIVE_BYTES", "2048");
            jail.set_env("SITEHOST_FETCH__API_BASE", "http://localhost:9000");
            jail.set_env("SITES_DIR", "/srv/legacy");
            jail.set_env("GITHUB_TOKEN", "legacy-token");

            let config = Config::load(None).unwrap();
            assert_eq!(config.sites_dir, PathBuf::from("/srv/legacy"));
            assert_eq!(config.max_archive_bytes, 2048);
            assert_eq!(config.fetch.timeout_secs, 5);
            assert_eq!(config.fetch.api_base, "http://localhost:9000");
            assert_eq!(config.fetch.token.as_deref(), Some("legacy-token"));
            Ok(())
        });
    }

    #[test]
    fn explicit_file_path() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "registry_path = \"/var/lib/sitehost/sites.json\"")?;
            let config = Config::load(Some(Path::new("custom.toml"))).unwrap();
            assert_eq!(config.registry_path(), PathBuf::from("/var/lib/sitehost/sites.json"));
            Ok(())
        });
    }

    #[test]
    fn zero_limits_are_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("SITEHOST_MAX_ARCHIVE_BYTES", "0");
            let err = Config::load(None).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "max_archive_bytes", .. }));
            Ok(())
        });
    }

    #[test]
    fn snapshot_options_follow_config() {
        let mut config = Config::default();
        config.fetch.token = Some("abc".into());
        config.max_archive_bytes = 10;

        let options = config.snapshot_options();
        assert_eq!(options.token.as_deref(), Some("abc"));
        assert_eq!(options.max_bytes, 10);
        assert_eq!(options.timeout, Duration::from_secs(60));
    }

    #[test]
    fn rendered_config_masks_token() {
        let mut config = Config::default();
        config.fetch.token = Some("super-secret".into());

        let rendered = config.to_toml().unwrap();
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("max_archive_bytes"));
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
