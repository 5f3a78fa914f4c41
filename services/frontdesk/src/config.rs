//! Front-desk service configuration.
//!
//! # Purpose
//! Reads settings from `FRONTDESK_*` environment variables, then applies an
//! optional YAML file named by `FRONTDESK_CONFIG` on top.
//!
//! # Notes
//! Values in the YAML file win over the environment. `.env` files are not read.
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9090";
pub const DEFAULT_PG_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_PG_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_PG_ACQUIRE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "pg" => Ok(StorageBackend::Postgres),
            other => bail!("unknown storage backend: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub url: String,
    #[serde(default = "default_pg_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_pg_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_pg_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

fn default_pg_max_connections() -> u32 {
    DEFAULT_PG_MAX_CONNECTIONS
}

fn default_pg_connect_timeout_ms() -> u64 {
    DEFAULT_PG_CONNECT_TIMEOUT_MS
}

fn default_pg_acquire_timeout_ms() -> u64 {
    DEFAULT_PG_ACQUIRE_TIMEOUT_MS
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Base64 Ed25519 seed. A random key is generated when unset, which
    /// invalidates every token on restart.
    pub signing_seed: Option<String>,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

/// Admin account created at startup when no user has that email yet.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    #[serde(default = "default_admin_name")]
    pub name: String,
}

fn default_admin_name() -> String {
    DEFAULT_ADMIN_NAME.to_string()
}

#[derive(Debug, Clone)]
pub struct FrontdeskConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
    pub token: TokenConfig,
    pub uploads: UploadConfig,
    pub reject_overlapping_bookings: bool,
    pub admin: Option<AdminSeed>,
}

#[derive(Debug, Default, Deserialize)]
struct FrontdeskConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<StorageBackend>,
    postgres: Option<PostgresConfig>,
    token_signing_seed: Option<String>,
    token_ttl_secs: Option<u64>,
    upload_dir: Option<PathBuf>,
    max_upload_bytes: Option<usize>,
    reject_overlapping_bookings: Option<bool>,
    admin: Option<AdminSeed>,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|err| anyhow::anyhow!("{err}"))
            .with_context(|| format!("parse {key}")),
        None => Ok(default),
    }
}

impl FrontdeskConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("FRONTDESK_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse FRONTDESK_BIND")?;
        let metrics_bind = lookup("FRONTDESK_METRICS_BIND")
            .unwrap_or_else(|| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse FRONTDESK_METRICS_BIND")?;
        let storage = parse_or(&lookup, "FRONTDESK_STORAGE", StorageBackend::Memory)?;

        let postgres = match lookup("FRONTDESK_DATABASE_URL") {
            Some(url) => Some(PostgresConfig {
                url,
                max_connections: parse_or(
                    &lookup,
                    "FRONTDESK_PG_MAX_CONNECTIONS",
                    DEFAULT_PG_MAX_CONNECTIONS,
                )?,
                connect_timeout_ms: parse_or(
                    &lookup,
                    "FRONTDESK_PG_CONNECT_TIMEOUT_MS",
                    DEFAULT_PG_CONNECT_TIMEOUT_MS,
                )?,
                acquire_timeout_ms: parse_or(
                    &lookup,
                    "FRONTDESK_PG_ACQUIRE_TIMEOUT_MS",
                    DEFAULT_PG_ACQUIRE_TIMEOUT_MS,
                )?,
            }),
            None => None,
        };

        let token = TokenConfig {
            signing_seed: lookup("FRONTDESK_TOKEN_SEED").filter(|seed| !seed.trim().is_empty()),
            ttl_secs: parse_or(&lookup, "FRONTDESK_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?,
        };
        let uploads = UploadConfig {
            dir: lookup("FRONTDESK_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_bytes: parse_or(
                &lookup,
                "FRONTDESK_MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
        };
        let reject_overlapping_bookings =
            parse_or(&lookup, "FRONTDESK_REJECT_OVERLAPPING_BOOKINGS", false)?;

        let admin = match (
            lookup("FRONTDESK_ADMIN_EMAIL"),
            lookup("FRONTDESK_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(AdminSeed {
                email,
                password,
                name: lookup("FRONTDESK_ADMIN_NAME").unwrap_or_else(default_admin_name),
            }),
            (Some(_), None) | (None, Some(_)) => {
                bail!("FRONTDESK_ADMIN_EMAIL and FRONTDESK_ADMIN_PASSWORD must be set together")
            }
            (None, None) => None,
        };

        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            postgres,
            token,
            uploads,
            reject_overlapping_bookings,
            admin,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("FRONTDESK_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read FRONTDESK_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: FrontdeskConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse frontdesk config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value;
        }
        if let Some(value) = override_cfg.postgres {
            self.postgres = Some(value);
        }
        if let Some(value) = override_cfg.token_signing_seed {
            self.token.signing_seed = Some(value);
        }
        if let Some(value) = override_cfg.token_ttl_secs {
            self.token.ttl_secs = value;
        }
        if let Some(value) = override_cfg.upload_dir {
            self.uploads.dir = value;
        }
        if let Some(value) = override_cfg.max_upload_bytes {
            self.uploads.max_bytes = value;
        }
        if let Some(value) = override_cfg.reject_overlapping_bookings {
            self.reject_overlapping_bookings = value;
        }
        if let Some(value) = override_cfg.admin {
            self.admin = Some(value);
        }
        Ok(())
    }
}
