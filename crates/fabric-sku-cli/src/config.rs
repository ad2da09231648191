use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use fabric_sku_engine::{
    AdjustmentSourceConfig, HttpAdjustmentConfig, Profile, Weights, DEFAULT_FETCH_TIMEOUT,
};
use tracing::debug;

pub const ENV_ADJUSTMENTS_URL: &str = "FABRIC_SKU_ADJUSTMENTS_URL";
pub const ENV_ADJUSTMENTS_API_KEY: &str = "FABRIC_SKU_ADJUSTMENTS_API_KEY";
pub const ENV_ADJUSTMENTS_TIMEOUT_MS: &str = "FABRIC_SKU_ADJUSTMENTS_TIMEOUT_MS";
pub const ENV_WEIGHTS: &str = "FABRIC_SKU_WEIGHTS";

/// Values given on the command line; anything left unset falls back to the
/// environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub weights_file: Option<PathBuf>,
    pub adjustments_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub weights: Weights,
    pub source: AdjustmentSourceConfig,
    pub fetch_timeout: Duration,
}

impl AppConfig {
    pub fn resolve(overrides: Overrides) -> anyhow::Result<Self> {
        let weights = load_weights(&overrides)?;

        let fetch_timeout = match overrides.timeout_ms {
            Some(ms) => Duration::from_millis(ms),
            None => env_u64(ENV_ADJUSTMENTS_TIMEOUT_MS)?
                .map_or(DEFAULT_FETCH_TIMEOUT, Duration::from_millis),
        };

        let url = overrides
            .adjustments_url
            .or_else(|| env_nonempty(ENV_ADJUSTMENTS_URL));
        let source = match url {
            Some(endpoint) => {
                let mut http = HttpAdjustmentConfig::new(endpoint);
                http.api_key = env_nonempty(ENV_ADJUSTMENTS_API_KEY);
                http.timeout = fetch_timeout;
                AdjustmentSourceConfig::Http(http)
            }
            None => AdjustmentSourceConfig::default(),
        };
        debug!(profile = weights.profile.name(), ?fetch_timeout, "configuration resolved");

        Ok(Self {
            weights,
            source,
            fetch_timeout,
        })
    }
}

fn load_weights(overrides: &Overrides) -> anyhow::Result<Weights> {
    let path = overrides
        .weights_file
        .clone()
        .or_else(|| env_nonempty(ENV_WEIGHTS).map(PathBuf::from));
    let profile = overrides
        .profile
        .as_deref()
        .map(|raw| {
            Profile::parse(raw)
                .with_context(|| format!("unknown profile {raw:?}, expected reference or legacy"))
        })
        .transpose()?;

    let Some(path) = path else {
        return Ok(profile.unwrap_or_default().weights());
    };
    let weights = Weights::from_file(&path)
        .with_context(|| format!("failed to load weights from {}", path.display()))?;
    // A weights file names its own profile; --profile may only confirm it.
    if let Some(profile) = profile {
        if profile != weights.profile {
            anyhow::bail!(
                "--profile {} conflicts with profile {} in {}",
                profile.name(),
                weights.profile.name(),
                path.display()
            );
        }
    }
    Ok(weights)
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(name: &str) -> anyhow::Result<Option<u64>> {
    env_nonempty(name)
        .map(|raw| {
            raw.parse::<u64>()
                .with_context(|| format!("{name} must be a whole number of milliseconds"))
        })
        .transpose()
}
