use std::path::PathBuf;

use anyhow::{bail, Context};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use shared::domain::SizeTag;
use url::Url;

use crate::theme::{Accent, Mode};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/prod/resize";
const LOCAL_CONFIG_FILE: &str = "thumbnailer.toml";
const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub default_size: SizeTag,
    pub accent: Accent,
    pub mode: Mode,
    pub toast_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            default_size: SizeTag::Small,
            accent: Accent::Blue,
            mode: Mode::Dark,
            toast_ttl_secs: 4,
        }
    }
}

impl Settings {
    pub fn with_overrides(mut self, endpoint: Option<String>, size: Option<SizeTag>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(size) = size {
            self.default_size = size;
        }
        self
    }

    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.endpoint.trim())
            .with_context(|| format!("invalid resize endpoint '{}'", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "resize endpoint must be http or https, got '{}'",
                url.scheme()
            );
        }
        Ok(url)
    }
}

/// Config files in increasing priority: per-user, then the working directory.
pub fn config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("thumbnailer").join("config.toml"));
    }
    files.push(PathBuf::from(LOCAL_CONFIG_FILE));
    files
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(&config_files(), None)
}

/// Layers `files` (missing ones are skipped) under `APP__*` environment variables.
///
/// `env` replaces the process environment when given.
pub fn load_settings_from(
    files: &[PathBuf],
    env: Option<config::Map<String, String>>,
) -> anyhow::Result<Settings> {
    let mut builder = Config::builder();
    for path in files {
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(false),
        );
    }
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(env),
    );

    builder
        .build()
        .context("failed to read configuration")?
        .try_deserialize()
        .context("failed to parse configuration")
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_config(contents: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("thumbnailer_config_test_{suffix}"));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("thumbnailer.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn missing_files_yield_defaults() {
        let settings =
            load_settings_from(&[PathBuf::from("/nonexistent/thumbnailer.toml")], env(&[]))
                .expect("defaults");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let path = temp_config(
            "endpoint = \"https://resize.example.com/prod/resize\"\ndefault_size = \"large\"\naccent = \"purple\"\n",
        );
        let settings = load_settings_from(&[path.clone()], env(&[])).expect("load");
        assert_eq!(settings.endpoint, "https://resize.example.com/prod/resize");
        assert_eq!(settings.default_size, SizeTag::Large);
        assert_eq!(settings.accent, Accent::Purple);
        assert_eq!(settings.mode, Mode::Dark);
        fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
    }

    #[test]
    fn environment_overrides_files() {
        let path = temp_config("default_size = \"large\"\ntoast_ttl_secs = 9\n");
        let settings = load_settings_from(
            &[path.clone()],
            env(&[
                ("APP__DEFAULT_SIZE", "medium"),
                ("APP__TOAST_TTL_SECS", "2"),
                ("APP__MODE", "light"),
            ]),
        )
        .expect("load");
        assert_eq!(settings.default_size, SizeTag::Medium);
        assert_eq!(settings.toast_ttl_secs, 2);
        assert_eq!(settings.mode, Mode::Light);
        fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
    }

    #[test]
    fn cli_overrides_win() {
        let settings = Settings::default()
            .with_overrides(Some("https://a.example/resize".into()), Some(SizeTag::Large));
        assert_eq!(settings.endpoint, "https://a.example/resize");
        assert_eq!(settings.default_size, SizeTag::Large);
    }

    #[test]
    fn endpoint_must_be_http() {
        assert!(Settings::default().endpoint_url().is_ok());
        let ftp = Settings::default().with_overrides(Some("ftp://host/resize".into()), None);
        assert!(ftp.endpoint_url().is_err());
        let junk = Settings::default().with_overrides(Some("not a url".into()), None);
        assert!(junk.endpoint_url().is_err());
    }

    #[test]
    fn settings_print_as_toml() {
        let rendered = toml::to_string_pretty(&Settings::default()).expect("toml");
        assert!(rendered.contains("default_size = \"small\""));
        assert!(rendered.contains("accent = \"blue\""));
    }
}
