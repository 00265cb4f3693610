use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// HTTP method used for each probe hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// Headers only; no body transferred.
    #[default]
    Head,
    /// For servers that reject HEAD. The body of the final hop is downloaded and discarded.
    Get,
}

/// Accessibility probe settings. Every key is optional in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub method: ProbeMethod,
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole request.
    pub timeout_secs: u64,
    /// Redirect hops followed before giving up.
    pub max_redirects: usize,
    /// Hosts whose appearance in the redirect chain means sign-in is required.
    /// Subdomains match too.
    pub login_hosts: Vec<String>,
    /// Optional User-Agent header for the default curl client.
    pub user_agent: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            method: ProbeMethod::Head,
            connect_timeout_secs: 15,
            timeout_secs: 30,
            max_redirects: 20,
            login_hosts: vec!["accounts.google.com".to_string()],
            user_agent: None,
        }
    }
}

impl ProbeConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ProbeConfig = toml::from_str(s).context("parse probe config")?;
        Ok(cfg)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True if `host` is one of the login hosts or a subdomain of one.
    pub fn is_login_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.login_hosts.iter().any(|login| {
            let login = login.trim().to_ascii_lowercase();
            !login.is_empty()
                && (host == login
                    || host
                        .strip_suffix(login.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.')))
        })
    }
}

/// Load probe settings from a TOML file. Read-only: nothing is created when the file is missing.
pub fn load(path: &Path) -> Result<ProbeConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read probe config: {}", path.display()))?;
    let cfg = ProbeConfig::from_toml_str(&data)?;
    tracing::debug!("loaded probe config from {}: {:?}", path.display(), cfg);
    Ok(cfg)
}
