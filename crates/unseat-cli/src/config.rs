use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Static configuration supplied by the user: the seed token pair, the secret
/// handed back via the clipboard once the workflow finishes, and an optional
/// server address override.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct CliConfig {
    pub access_token_default: String,
    pub refresh_token_default: String,
    pub secret_to_copy: String,
    #[serde(default)]
    pub addr: Option<String>,
}

fn default_config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("HOME is not set"))?;
    Ok(Path::new(&home).join(".unseat").join("config.json"))
}

pub(crate) fn resolve_config_path(arg: Option<&Path>) -> anyhow::Result<PathBuf> {
    match arg {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

pub(crate) fn load_config(path: &Path) -> anyhow::Result<CliConfig> {
    if !path.exists() {
        anyhow::bail!(
            "config not found: {} (expected access_token_default, refresh_token_default, secret_to_copy)",
            path.display()
        );
    }
    let contents = fs::read_to_string(path)?;
    let config = serde_json::from_str(&contents)?;
    Ok(config)
}

/// The refreshed token pair lives next to the config file, so both survive
/// restarts together.
pub(crate) fn token_state_path(config_path: &Path) -> PathBuf {
    config_path.with_file_name("tokens.json")
}

pub(crate) fn ensure_secure_addr(addr: &str, allow_insecure: bool) -> anyhow::Result<()> {
    if addr.starts_with("http://") && !allow_insecure {
        anyhow::bail!("refusing to use http:// without --insecure");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn load_config_reads_all_fields() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let body = json!({
            "access_token_default": "t0",
            "refresh_token_default": "r0",
            "secret_to_copy": "hunter2"
        });
        fs::write(&path, body.to_string()).expect("write");

        let config = load_config(&path).expect("load");
        assert_eq!(config.access_token_default, "t0");
        assert_eq!(config.refresh_token_default, "r0");
        assert_eq!(config.secret_to_copy, "hunter2");
        assert!(config.addr.is_none());
    }

    #[test]
    fn missing_config_is_an_error_naming_the_path() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let err = load_config(&path).expect_err("must fail");
        assert!(err.to_string().contains("config not found"));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn token_state_sits_next_to_the_config() {
        let path = token_state_path(Path::new("/home/user/.unseat/config.json"));
        assert_eq!(path, Path::new("/home/user/.unseat/tokens.json"));
    }

    #[test]
    fn plain_http_requires_insecure_flag() {
        assert!(ensure_secure_addr("http://127.0.0.1:8080", false).is_err());
        assert!(ensure_secure_addr("http://127.0.0.1:8080", true).is_ok());
        assert!(ensure_secure_addr("https://example.com", false).is_ok());
    }
}
