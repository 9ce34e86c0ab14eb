use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use kubevis_types::{Density, PollInterval};

use crate::APP_NAME;

/// Settings read from `config.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Kubeconfig context; the current context when absent
    pub context: Option<String>,
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub bind: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardSettings {
    /// Base URL of a running `serve`; the cluster is read in-process when absent
    pub endpoint: Option<String>,
    pub poll_interval: PollInterval,
    pub density: Density,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

impl Settings {
    /// Load settings from `path`, or from the default location.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_file() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings = Self::parse(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(settings)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// `<config dir>/kubevis/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.context, None);
        assert_eq!(settings.server.bind.to_string(), "127.0.0.1:3000");
        assert_eq!(settings.dashboard.endpoint, None);
        assert_eq!(settings.dashboard.poll_interval, PollInterval::Off);
        assert_eq!(settings.dashboard.density, Density::Compact);
    }

    #[test]
    fn test_full_config() {
        let settings = Settings::parse(
            r#"
            context = "kind-dev"

            [server]
            bind = "0.0.0.0:8080"

            [dashboard]
            endpoint = "http://127.0.0.1:3000"
            poll_interval = 10
            density = "detailed"
            "#,
        )
        .unwrap();

        assert_eq!(settings.context.as_deref(), Some("kind-dev"));
        assert_eq!(settings.server.bind.port(), 8080);
        assert_eq!(
            settings.dashboard.endpoint.as_deref(),
            Some("http://127.0.0.1:3000")
        );
        assert_eq!(settings.dashboard.poll_interval, PollInterval::Every10s);
        assert_eq!(settings.dashboard.density, Density::Detailed);
    }

    #[test]
    fn test_rejects_unsupported_interval() {
        let err = Settings::parse("[dashboard]\npoll_interval = 7\n").unwrap_err();
        assert!(format!("{:#}", err).contains("7"));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(Settings::parse("[dashboard]\ninterval = 5\n").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("kubevis-test-does-not-exist.toml");
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_load_explicit_file() {
        let path = std::env::temp_dir().join(format!(
            "kubevis-test-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "context = \"prod\"\n").unwrap();
        let settings = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.context.as_deref(), Some("prod"));
    }
}
