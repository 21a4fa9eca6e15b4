//! Configuration for mangashelf.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (MANGASHELF_HOME, MANGASHELF_API_URL, MANGASHELF_ASSET_HOST)
//! 2. Config file (.mangashelf/config.yaml)
//! 3. Defaults (~/.mangashelf, api.mangadex.org)
//!
//! Config file discovery:
//! - Searches current directory and parents for .mangashelf/config.yaml
//! - Paths in config file are relative to the .mangashelf directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const DEFAULT_API_URL: &str = "https://api.mangadex.org";
pub const DEFAULT_ASSET_HOST: &str = "https://uploads.mangadex.org";
pub const DEFAULT_FEED_LIMIT: u32 = 500;
pub const DEFAULT_FEED_LANGUAGE: &str = "en";

/// File name of the persisted library
pub const LIBRARY_FILE: &str = "library.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub feed: Option<FeedConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .mangashelf/)
    pub home: Option<String>,
    /// Library file (relative to .mangashelf/)
    pub library: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub api_url: Option<String>,
    pub asset_host: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub limit: Option<u32>,
    pub language: Option<String>,
}

/// Remote endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    /// Base URL of the metadata API
    pub api_url: String,
    /// Base URL cover files are served from
    pub asset_host: String,
    pub user_agent: String,
    /// Maximum chapters requested per feed
    pub feed_limit: u32,
    /// Translated language requested for the feed
    pub feed_language: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            asset_host: DEFAULT_ASSET_HOST.to_string(),
            user_agent: default_user_agent(),
            feed_limit: DEFAULT_FEED_LIMIT,
            feed_language: DEFAULT_FEED_LANGUAGE.to_string(),
        }
    }
}

fn default_user_agent() -> String {
    format!("mangashelf/{}", env!("CARGO_PKG_VERSION"))
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to mangashelf home
    pub home: PathBuf,
    /// Absolute path to the library file
    pub library: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Remote endpoints
    pub remote: RemoteSettings,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".mangashelf").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge a parsed config file over the defaults
fn resolve_file_settings(
    config: &ConfigFile,
    config_dir: &Path,
    default_home: &Path,
) -> (PathBuf, PathBuf, RemoteSettings) {
    let home = config
        .paths
        .home
        .as_deref()
        .map(|p| resolve_path(config_dir, p))
        .unwrap_or_else(|| default_home.to_path_buf());

    let library = config
        .paths
        .library
        .as_deref()
        .map(|p| resolve_path(config_dir, p))
        .unwrap_or_else(|| home.join(LIBRARY_FILE));

    let defaults = RemoteSettings::default();
    let remote = config.remote.as_ref();
    let feed = config.feed.as_ref();

    let settings = RemoteSettings {
        api_url: remote
            .and_then(|r| r.api_url.clone())
            .unwrap_or(defaults.api_url),
        asset_host: remote
            .and_then(|r| r.asset_host.clone())
            .unwrap_or(defaults.asset_host),
        user_agent: remote
            .and_then(|r| r.user_agent.clone())
            .unwrap_or(defaults.user_agent),
        feed_limit: feed.and_then(|f| f.limit).unwrap_or(defaults.feed_limit),
        feed_language: feed
            .and_then(|f| f.language.clone())
            .unwrap_or(defaults.feed_language),
    };

    (home, library, settings)
}

/// Environment variables that override the file settings
#[derive(Debug, Default)]
struct EnvOverrides {
    home: Option<String>,
    api_url: Option<String>,
    asset_host: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            home: std::env::var("MANGASHELF_HOME").ok(),
            api_url: std::env::var("MANGASHELF_API_URL").ok(),
            asset_host: std::env::var("MANGASHELF_ASSET_HOST").ok(),
        }
    }

    /// Apply over resolved settings
    ///
    /// A new home only moves the library when no library path was configured.
    fn apply(
        &self,
        home: &mut PathBuf,
        library: &mut PathBuf,
        library_configured: bool,
        remote: &mut RemoteSettings,
    ) {
        if let Some(env_home) = &self.home {
            *home = PathBuf::from(env_home);
            if !library_configured {
                *library = home.join(LIBRARY_FILE);
            }
        }
        if let Some(api_url) = &self.api_url {
            remote.api_url = api_url.clone();
        }
        if let Some(asset_host) = &self.asset_host {
            remote.asset_host = asset_host.clone();
        }
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".mangashelf");

    let config_file = find_config_file();

    let (mut home, mut library, mut remote, library_configured) =
        if let Some(ref config_path) = config_file {
            let config = load_config_file(config_path)?;
            let config_dir = config_path.parent().unwrap_or(Path::new("."));
            let (home, library, remote) =
                resolve_file_settings(&config, config_dir, &default_home);
            (home, library, remote, config.paths.library.is_some())
        } else {
            (
                default_home.clone(),
                default_home.join(LIBRARY_FILE),
                RemoteSettings::default(),
                false,
            )
        };

    EnvOverrides::from_env().apply(&mut home, &mut library, library_configured, &mut remote);

    Ok(ResolvedConfig {
        home,
        library,
        config_file,
        remote,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(".mangashelf");
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ./state
remote:
  api_url: http://localhost:8080
  user_agent: shelf-test/1
feed:
  limit: 100
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./state".to_string()));
        assert_eq!(config.paths.library, None);

        let (home, library, remote) =
            resolve_file_settings(&config, &config_dir, Path::new("/unused"));
        assert_eq!(home, config_dir.join("./state"));
        assert_eq!(library, home.join(LIBRARY_FILE));
        assert_eq!(remote.api_url, "http://localhost:8080");
        assert_eq!(remote.asset_host, DEFAULT_ASSET_HOST);
        assert_eq!(remote.user_agent, "shelf-test/1");
        assert_eq!(remote.feed_limit, 100);
        assert_eq!(remote.feed_language, DEFAULT_FEED_LANGUAGE);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ConfigFile = serde_yaml::from_str("version: \"1.0\"\n").unwrap();

        let (home, library, remote) = resolve_file_settings(
            &config,
            Path::new("/project/.mangashelf"),
            Path::new("/home/u/.mangashelf"),
        );

        assert_eq!(home, PathBuf::from("/home/u/.mangashelf"));
        assert_eq!(library, PathBuf::from("/home/u/.mangashelf/library.json"));
        assert_eq!(remote, RemoteSettings::default());
    }

    #[test]
    fn test_explicit_library_path() {
        let config: ConfigFile = serde_yaml::from_str(
            "version: \"1.0\"\npaths:\n  library: /data/shelf.json\n",
        )
        .unwrap();

        let (_, library, _) =
            resolve_file_settings(&config, Path::new("/project/.mangashelf"), Path::new("/h"));

        assert_eq!(library, PathBuf::from("/data/shelf.json"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }

    #[test]
    fn test_default_user_agent_names_crate() {
        assert!(RemoteSettings::default().user_agent.starts_with("mangashelf/"));
    }

    #[test]
    fn test_env_home_keeps_configured_library() {
        let config: ConfigFile = serde_yaml::from_str(
            "version: \"1.0\"\npaths:\n  library: /data/shelf.json\n",
        )
        .unwrap();
        let (mut home, mut library, mut remote) =
            resolve_file_settings(&config, Path::new("/project/.mangashelf"), Path::new("/h"));

        let env = EnvOverrides {
            home: Some("/env/home".to_string()),
            asset_host: Some("http://assets.local".to_string()),
            ..Default::default()
        };
        env.apply(&mut home, &mut library, config.paths.library.is_some(), &mut remote);

        assert_eq!(home, PathBuf::from("/env/home"));
        assert_eq!(library, PathBuf::from("/data/shelf.json"));
        assert_eq!(remote.asset_host, "http://assets.local");
        assert_eq!(remote.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_env_home_moves_default_library() {
        let mut home = PathBuf::from("/h");
        let mut library = home.join(LIBRARY_FILE);
        let mut remote = RemoteSettings::default();

        let env = EnvOverrides {
            home: Some("/env/home".to_string()),
            ..Default::default()
        };
        env.apply(&mut home, &mut library, false, &mut remote);

        assert_eq!(library, PathBuf::from("/env/home/library.json"));
        assert_eq!(remote, RemoteSettings::default());
    }
}
