use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::GtoError;

pub const SETTINGS_ENV: &str = "GTO_EXTRACT_CONFIG";
pub const DEFAULT_SETTINGS_FILE: &str = "gto-extract.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub workspace_url: Url,
    pub shock_url: Url,
    pub handle_url: Url,
    pub token: String,
}

impl ConnectionConfig {
    pub fn new(
        workspace_url: &str,
        shock_url: &str,
        handle_url: &str,
        token: &str,
    ) -> Result<Self, GtoError> {
        Ok(Self {
            workspace_url: parse_service_url("workspace", workspace_url)?,
            shock_url: parse_service_url("shock", shock_url)?,
            handle_url: parse_service_url("handle", handle_url)?,
            token: token.trim().to_string(),
        })
    }
}

fn parse_service_url(name: &'static str, value: &str) -> Result<Url, GtoError> {
    let invalid = || GtoError::InvalidUrl {
        name,
        value: value.to_string(),
    };
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(url)
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub pretty: bool,
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            pretty: false,
        }
    }
}

pub fn default_user_agent() -> String {
    format!("gto-extract/{}", env!("CARGO_PKG_VERSION"))
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn settings_path_from_env() -> Option<PathBuf> {
        std::env::var_os(SETTINGS_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    // A missing default file means defaults; a missing explicit file is an error.
    pub fn resolve(path: Option<&Path>) -> Result<ResolvedSettings, GtoError> {
        let settings_path = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_SETTINGS_FILE),
        };

        if path.is_none() && !settings_path.exists() {
            return Ok(ResolvedSettings::default());
        }

        let content = fs::read_to_string(&settings_path)
            .map_err(|_| GtoError::ConfigRead(settings_path.clone()))?;
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|err| GtoError::ConfigParse(err.to_string()))?;

        Self::resolve_config(settings)
    }

    pub fn resolve_config(settings: Settings) -> Result<ResolvedSettings, GtoError> {
        let timeout_secs = settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(GtoError::ConfigParse(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        let user_agent = match settings.user_agent {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => default_user_agent(),
        };

        Ok(ResolvedSettings {
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
            pretty: settings.pretty.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_empty_settings() {
        let resolved = ConfigLoader::resolve_config(Settings::default()).unwrap();
        assert_eq!(resolved, ResolvedSettings::default());
        assert!(resolved.user_agent.starts_with("gto-extract/"));
    }

    #[test]
    fn reject_non_http_url() {
        let err = ConnectionConfig::new(
            "ftp://kbase.us/services/ws",
            "https://kbase.us/services/shock-api",
            "https://kbase.us/services/handle_service",
            "token",
        )
        .unwrap_err();
        assert!(matches!(err, GtoError::InvalidUrl { name: "workspace", .. }));
    }
}
