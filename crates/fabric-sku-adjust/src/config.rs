use std::time::Duration;

use fabric_sku_core::ExternalAdjustments;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct HttpAdjustmentConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl HttpAdjustmentConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub enum AdjustmentSourceConfig {
    Fixed(ExternalAdjustments),
    Http(HttpAdjustmentConfig),
}

impl Default for AdjustmentSourceConfig {
    fn default() -> Self {
        Self::Fixed(ExternalAdjustments::ZERO)
    }
}
