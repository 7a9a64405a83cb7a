//! Runtime configuration: built-in defaults, then an optional TOML file, then
//! `MATCHDAY_*` environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub store_path:    PathBuf,
  /// Events buffered per WebSocket client before it starts lagging.
  pub feed_capacity: usize,
}

impl ServerConfig {
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8000)?
      .set_default("store_path", "matchday.db")?
      .set_default("feed_capacity", 64)?
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("MATCHDAY"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `http://` base URL for log output; `0.0.0.0` is shown as `localhost`.
  pub fn base_url(&self) -> String {
    let host = if self.host == "0.0.0.0" { "localhost" } else { self.host.as_str() };
    format!("http://{host}:{}", self.port)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join(format!("{}.toml", uuid::Uuid::new_v4()));
    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.store_path, PathBuf::from("matchday.db"));
    assert_eq!(cfg.feed_capacity, 64);
    assert_eq!(cfg.base_url(), "http://localhost:8000");
  }

  #[test]
  fn file_values_override_defaults() {
    let path = std::env::temp_dir().join(format!("{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(&path, "host = \"127.0.0.1\"\nport = 9100\n").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.address(), "127.0.0.1:9100");
    assert_eq!(cfg.base_url(), "http://127.0.0.1:9100");
    assert_eq!(cfg.feed_capacity, 64);
  }

  #[test]
  fn tilde_is_expanded_only_at_the_start() {
    assert_eq!(expand_tilde(Path::new("/data/m.db")), PathBuf::from("/data/m.db"));
    assert_eq!(expand_tilde(Path::new("a/~/b")), PathBuf::from("a/~/b"));
  }
}
