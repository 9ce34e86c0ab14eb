use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::APP_NAME;

/// Workspace crates log at info, everything else at warn
const DASHBOARD_FILTER: &str =
    "warn,kubevis=info,kubevis_k8s=info,kubevis_view=info,kubevis_api=info";

const SERVER_FILTER: &str = "info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr. Used by `serve`, where the terminal is free.
pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(SERVER_FILTER))
        .with_writer(std::io::stderr)
        .init();
}

/// Log to a file so output does not corrupt the dashboard.
///
/// Returns a guard that flushes buffered lines when dropped; keep it alive
/// until the terminal has been restored.
pub fn init_file(path: Option<&Path>) -> Result<WorkerGuard> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_log_file(),
    };

    let (dir, file_name) = split_log_path(&path)?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(env_filter(DASHBOARD_FILTER));

    tracing_subscriber::registry().with(file_layer).init();

    Ok(guard)
}

/// `<data dir>/kubevis/logs/kubevis.log`, or `./logs` when there is no data dir
fn default_log_file() -> PathBuf {
    let mut path = match dirs::data_local_dir() {
        Some(mut dir) => {
            dir.push(APP_NAME);
            dir.push("logs");
            dir
        }
        None => PathBuf::from("logs"),
    };
    path.push(format!("{APP_NAME}.log"));
    path
}

fn split_log_path(path: &Path) -> Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("log file path {} has no file name", path.display()))?
        .to_string();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_file_name() {
        let path = default_log_file();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("kubevis.log"));
        assert!(path.parent().is_some_and(|p| p.ends_with("logs")));
    }

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/tmp/kv/dash.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/kv"));
        assert_eq!(name, "dash.log");

        let (dir, name) = split_log_path(Path::new("dash.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "dash.log");

        assert!(split_log_path(Path::new("/")).is_err());
    }
}
