mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./cinesync.toml",
        "~/.config/cinesync/config.toml",
        "/etc/cinesync/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Expand `~` in library and database paths.
fn expand_paths(config: &mut Config) {
    let expand = |p: &Path| -> std::path::PathBuf {
        match p.to_str() {
            Some(s) => shellexpand::tilde(s).into_owned().into(),
            None => p.to_path_buf(),
        }
    };

    config.library.paths = config.library.paths.iter().map(|p| expand(p)).collect();
    config.database.path = expand(&config.database.path);
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    for path in &config.library.paths {
        if !path.exists() {
            tracing::warn!("Library path does not exist: {:?}", path);
        }
    }

    for ext in &config.library.extensions {
        if ext.is_empty() || ext.starts_with('.') {
            anyhow::bail!("Invalid media extension {:?}: expected e.g. \"mkv\"", ext);
        }
    }

    if config.radarr.enabled {
        if config.radarr.url.is_empty() {
            anyhow::bail!("Radarr is enabled but has no URL");
        }
        if config.radarr.api_key.is_empty() {
            anyhow::bail!("Radarr is enabled but has no API key");
        }
    }

    Ok(())
}

/// Checks that only apply to library scans.
pub fn require_tmdb(config: &Config) -> Result<()> {
    if config.tmdb.api_key.is_empty() {
        anyhow::bail!("tmdb.api_key is required to scan and match files");
    }
    Ok(())
}

/// Checks that only apply to Radarr commands.
pub fn require_radarr(config: &Config) -> Result<()> {
    if !config.radarr.enabled {
        anyhow::bail!("Radarr is not enabled in the configuration");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();

        assert!(config.library.paths.is_empty());
        assert_eq!(config.database.path, Path::new("cinesync.db"));
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert!(!config.radarr.enabled);
    }

    #[test]
    fn test_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_config(&format!(
            r#"
[library]
paths = ["{}"]
extensions = ["mkv", "mp4"]

[database]
path = "/var/lib/cinesync/catalog.db"

[tmdb]
api_key = "tmdb-key"
language = "de-DE"

[radarr]
enabled = true
url = "http://radarr:7878"
api_key = "radarr-key"
"#,
            dir.path().display()
        ));

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.library.paths, vec![dir.path().to_path_buf()]);
        assert_eq!(config.library.extensions, vec!["mkv", "mp4"]);
        assert_eq!(config.tmdb.api_key, "tmdb-key");
        assert_eq!(config.tmdb.language, "de-DE");
        assert!(config.radarr.enabled);
        assert!(require_tmdb(&config).is_ok());
        assert!(require_radarr(&config).is_ok());
    }

    #[test]
    fn test_enabled_radarr_requires_key() {
        let file = write_config(
            r#"
[radarr]
enabled = true
url = "http://radarr:7878"
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_disabled_radarr_is_not_validated() {
        let file = write_config("[radarr]\nenabled = false\n");
        let config = load_config(file.path()).unwrap();
        assert!(require_radarr(&config).is_err());
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let file = write_config("[library]\nextensions = [\".mkv\"]\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_tmdb_key() {
        assert!(require_tmdb(&Config::default()).is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        let file = write_config("[database]\npath = \"~/cinesync.db\"\n");
        let config = load_config(file.path()).unwrap();
        assert!(!config.database.path.starts_with("~"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/cinesync.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
