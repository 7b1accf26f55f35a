use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fs_paths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub lookup: LookupSettings,
    #[serde(default)]
    pub download: DownloadSettings,
    #[serde(default)]
    pub proxy: ProxySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupSettings {
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    #[serde(default = "default_true")]
    pub hd: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    #[serde(default = "fs_paths::default_downloads_dir")]
    pub default_output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProxySettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_proxy_type")]
    pub proxy_type: String,
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_proxy_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl ProxySettings {
    pub fn url(&self) -> Option<String> {
        if !self.enabled || self.host.is_empty() {
            return None;
        }
        let scheme = match self.proxy_type.as_str() {
            "socks5" => "socks5",
            "https" => "https",
            _ => "http",
        };
        if !self.username.is_empty() {
            Some(format!(
                "{}://{}:{}@{}:{}",
                scheme, self.username, self.password, self.host, self.port
            ))
        } else {
            Some(format!("{}://{}:{}", scheme, self.host, self.port))
        }
    }
}

fn default_schema_version() -> u32 {
    1
}

pub fn default_api_endpoint() -> String {
    "https://www.tikwm.com/api/".into()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_proxy_type() -> String {
    "http".into()
}

fn default_proxy_port() -> u16 {
    8080
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            hd: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            default_output_dir: fs_paths::default_downloads_dir(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            lookup: LookupSettings::default(),
            download: DownloadSettings::default(),
            proxy: ProxySettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_loads_defaults() {
        let settings: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.lookup.api_endpoint, "https://www.tikwm.com/api/");
        assert!(settings.lookup.hd);
        assert!(!settings.proxy.enabled);
    }

    #[test]
    fn proxy_url_disabled() {
        let proxy = ProxySettings {
            host: "127.0.0.1".into(),
            ..Default::default()
        };
        assert_eq!(proxy.url(), None);
    }

    #[test]
    fn proxy_url_with_credentials() {
        let proxy = ProxySettings {
            enabled: true,
            proxy_type: "socks5".into(),
            host: "10.0.0.2".into(),
            port: 1080,
            username: "u".into(),
            password: "p".into(),
        };
        assert_eq!(proxy.url().as_deref(), Some("socks5://u:p@10.0.0.2:1080"));
    }

    #[test]
    fn proxy_url_unknown_type_is_http() {
        let proxy = ProxySettings {
            enabled: true,
            proxy_type: "weird".into(),
            host: "proxy.local".into(),
            port: 3128,
            ..Default::default()
        };
        assert_eq!(proxy.url().as_deref(), Some("http://proxy.local:3128"));
    }
}
