//! ordr-config
//!
//! Environment-driven configuration for the gateway and the board client.
//!
//! Every `std::env::var` read in the workspace goes through this crate.
//! Resolution is written against a lookup function so tests can supply a
//! map instead of mutating the process environment.

pub mod secrets;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{bail, Context, Result};

pub use secrets::StoreSecrets;

// ---------------------------------------------------------------------------
// Env var names
// ---------------------------------------------------------------------------

pub const ENV_STORE_URL: &str = "ORDR_STORE_URL";
pub const ENV_STORE_KEY: &str = "ORDR_STORE_KEY";
pub const ENV_PORT: &str = "ORDR_PORT";
pub const ENV_BIND_ADDR: &str = "ORDR_BIND_ADDR";
pub const ENV_CORS_ORIGINS: &str = "ORDR_CORS_ORIGINS";
pub const ENV_API_URL: &str = "ORDR_API_URL";

/// Names used by existing hosted-store deployments; read when the
/// `ORDR_*` variable is absent.
pub const LEGACY_STORE_URL: &str = "SUPABASE_URL";
pub const LEGACY_STORE_KEY: &str = "SUPABASE_KEY";
pub const LEGACY_PORT: &str = "PORT";

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// Load `.env.local`, then `.env`, if present. Variables already set in the
/// process environment win. Silent when neither file exists.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
}

/// Process-environment lookup; blank values count as unset.
pub fn process_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

fn first_of(lookup: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|n| lookup(n).filter(|v| !v.trim().is_empty()))
        .map(|v| v.trim().to_string())
}

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// Everything `ordr-gateway` needs at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub store: StoreSecrets,
    pub bind_addr: SocketAddr,
    /// `None` = allow any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store = StoreSecrets::from_lookup(&lookup)?;
        let bind_addr = resolve_bind_addr(&lookup)?;
        let cors_origins = first_of(&lookup, &[ENV_CORS_ORIGINS]).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        Ok(Self {
            store,
            bind_addr,
            cors_origins,
        })
    }
}

/// `ORDR_BIND_ADDR` wins; otherwise listen on all interfaces at the
/// configured port.
fn resolve_bind_addr(lookup: &impl Fn(&str) -> Option<String>) -> Result<SocketAddr> {
    if let Some(raw) = first_of(lookup, &[ENV_BIND_ADDR]) {
        return raw
            .parse()
            .with_context(|| format!("CONFIG_INVALID: {ENV_BIND_ADDR}='{raw}' is not a socket address"));
    }

    let port = match first_of(lookup, &[ENV_PORT, LEGACY_PORT]) {
        Some(raw) => raw
            .parse::<u16>()
            .with_context(|| format!("CONFIG_INVALID: port '{raw}' is not a valid TCP port"))?,
        None => DEFAULT_PORT,
    };
    if port == 0 {
        bail!("CONFIG_INVALID: port must be non-zero");
    }

    Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Board client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Gateway base URL without a trailing slash.
    pub api_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = first_of(&lookup, &[ENV_API_URL]).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::with_api_url(api_url)
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}
