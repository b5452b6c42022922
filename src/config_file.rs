use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cli::{Args, CheckArgs, ServeArgs};
use crate::image_check::TransparencyPolicy;
use crate::server::{ServerConfig, DEFAULT_HOST, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PORT};
use crate::utils::validate_server_config;

/// JSON config file format
///
/// ```json
/// { "name": "production", "server": { "port": 9000, "maxUploadMb": 20, "transparency": "below-opaque" } }
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub name: Option<String>,
    #[serde(default)]
    pub server: ServerConfigJson,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfigJson {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_mb: Option<usize>,
    pub workers: Option<usize>,
    pub cors: Option<bool>,
    pub transparency: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn transparency(&self) -> Result<Option<TransparencyPolicy>> {
        self.server
            .transparency
            .as_deref()
            .map(parse_transparency)
            .transpose()
    }
}

/// Parse a transparency policy name as written in the config file
pub fn parse_transparency(name: &str) -> Result<TransparencyPolicy> {
    match name {
        "fully-transparent" | "fullyTransparent" => Ok(TransparencyPolicy::FullyTransparent),
        "below-opaque" | "belowOpaque" => Ok(TransparencyPolicy::BelowOpaque),
        other => Err(anyhow::anyhow!(
            "Invalid transparency policy '{}'. Valid values: fully-transparent, below-opaque",
            other
        )),
    }
}

impl Args {
    /// Load the config file named by `--config`, if any
    pub fn load_config_file(&self) -> Result<Option<ConfigFile>> {
        match &self.config_file {
            Some(path) => {
                let config = ConfigFile::load(path)?;
                log::info!(
                    "Loaded configuration {}from: {:?}",
                    config
                        .name
                        .as_deref()
                        .map(|n| format!("'{}' ", n))
                        .unwrap_or_default(),
                    path
                );
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }
}

impl ServeArgs {
    /// Effective server settings: command-line flags, then the config file, then defaults
    pub fn resolve(&self, file: Option<&ConfigFile>) -> Result<ServerConfig> {
        let json = file.map(|f| &f.server);

        let file_transparency = match file {
            Some(f) => f.transparency()?,
            None => None,
        };

        let max_upload_mb = self
            .max_upload_mb
            .or(json.and_then(|j| j.max_upload_mb))
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        let config = ServerConfig {
            host: self
                .host
                .clone()
                .or(json.and_then(|j| j.host.clone()))
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self
                .port
                .or(json.and_then(|j| j.port))
                .unwrap_or(DEFAULT_PORT),
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            workers: self.workers.or(json.and_then(|j| j.workers)).unwrap_or(0),
            cors: !self.no_cors && json.and_then(|j| j.cors).unwrap_or(true),
            transparency: self
                .transparency
                .map(TransparencyPolicy::from)
                .or(file_transparency)
                .unwrap_or_default(),
        };

        validate_server_config(&config)?;
        Ok(config)
    }
}

impl CheckArgs {
    /// Transparency policy for a one-off check: flag, then config file, then default
    pub fn transparency_policy(&self, file: Option<&ConfigFile>) -> Result<TransparencyPolicy> {
        if let Some(mode) = self.transparency {
            return Ok(mode.into());
        }
        match file {
            Some(f) => Ok(f.transparency()?.unwrap_or_default()),
            None => Ok(TransparencyPolicy::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TransparencyMode;
    use std::path::PathBuf;

    fn file(json: &str) -> ConfigFile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let config = ServeArgs::default().resolve(None).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_file_values_apply() {
        let f = file(
            r#"{"name":"prod","server":{"host":"127.0.0.1","port":9000,"maxUploadMb":20,"workers":4,"cors":false,"transparency":"belowOpaque"}}"#,
        );
        let config = ServeArgs::default().resolve(Some(&f)).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.workers, 4);
        assert!(!config.cors);
        assert_eq!(config.transparency, TransparencyPolicy::BelowOpaque);
    }

    #[test]
    fn test_cli_overrides_file() {
        let f = file(r#"{"server":{"port":9000,"transparency":"below-opaque"}}"#);
        let args = ServeArgs {
            port: Some(7000),
            transparency: Some(TransparencyMode::FullyTransparent),
            no_cors: true,
            ..Default::default()
        };
        let config = args.resolve(Some(&f)).unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.transparency, TransparencyPolicy::FullyTransparent);
        assert!(!config.cors);
    }

    #[test]
    fn test_missing_server_section() {
        let f = file(r#"{"name":"empty"}"#);
        let config = ServeArgs::default().resolve(Some(&f)).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let f = file(r#"{"server":{"transparency":"sometimes"}}"#);
        assert!(ServeArgs::default().resolve(Some(&f)).is_err());

        let f = file(r#"{"server":{"maxUploadMb":500}}"#);
        assert!(ServeArgs::default().resolve(Some(&f)).is_err());

        let args = ServeArgs {
            port: Some(0),
            ..Default::default()
        };
        assert!(args.resolve(None).is_err());
    }

    #[test]
    fn test_check_transparency_policy() {
        let args = CheckArgs {
            image: PathBuf::from("a.png"),
            image_type: "portrait".to_string(),
            json: false,
            transparency: None,
        };
        assert_eq!(
            args.transparency_policy(None).unwrap(),
            TransparencyPolicy::FullyTransparent
        );

        let f = file(r#"{"server":{"transparency":"below-opaque"}}"#);
        assert_eq!(
            args.transparency_policy(Some(&f)).unwrap(),
            TransparencyPolicy::BelowOpaque
        );

        let args = CheckArgs {
            transparency: Some(TransparencyMode::FullyTransparent),
            ..args
        };
        assert_eq!(
            args.transparency_policy(Some(&f)).unwrap(),
            TransparencyPolicy::FullyTransparent
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigFile::load(Path::new("/nonexistent/checker.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
