use fabric_sku_core::ExternalAdjustments;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::HttpAdjustmentConfig;
use crate::error::AdjustmentSourceError;
use crate::traits::AdjustmentSource;

#[derive(Clone)]
pub struct HttpAdjustmentSource {
    config: HttpAdjustmentConfig,
    client: Client,
}

impl HttpAdjustmentSource {
    pub fn new(config: HttpAdjustmentConfig) -> Result<Self, AdjustmentSourceError> {
        if config.endpoint.trim().is_empty() {
            return Err(AdjustmentSourceError::EmptyEndpoint);
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AdjustmentSourceError::Client)?;
        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        self.config.endpoint.trim()
    }
}

#[async_trait::async_trait]
impl AdjustmentSource for HttpAdjustmentSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self) -> Result<ExternalAdjustments, AdjustmentSourceError> {
        let mut req = self.client.get(self.endpoint());
        if let Some(key) = self.config.api_key.as_deref() {
            req = req.bearer_auth(key);
        }
        let unreachable = |source: reqwest::Error| AdjustmentSourceError::Unreachable {
            endpoint: self.endpoint().to_string(),
            source,
        };
        let res = req.send().await.map_err(unreachable)?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(AdjustmentSourceError::Status {
                endpoint: self.endpoint().to_string(),
                status,
                body,
            });
        }

        let body = res.text().await.map_err(unreachable)?;
        let adjustments = parse_payload(&body)?;
        debug!(endpoint = %self.endpoint(), ?adjustments, "fetched external adjustments");
        Ok(adjustments)
    }
}

fn parse_payload(body: &str) -> Result<ExternalAdjustments, AdjustmentSourceError> {
    let value: Value = serde_json::from_str(body)?;
    let found = match &value {
        Value::Object(_) => None,
        Value::Null => Some("null"),
        Value::Bool(_) => Some("a boolean"),
        Value::Number(_) => Some("a number"),
        Value::String(_) => Some("a string"),
        Value::Array(_) => Some("an array"),
    };
    if let Some(found) = found {
        return Err(AdjustmentSourceError::NotAnObject { found });
    }
    let payload: AdjustmentPayload = serde_json::from_value(value)?;
    Ok(payload.into_adjustments())
}

/// Accepts the short field names as well as the `*Adjustment` names the
/// first calculator read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdjustmentPayload {
    #[serde(alias = "baseAdjustment", alias = "base_adjustment")]
    base: Option<f64>,
    #[serde(alias = "workloadAdjustment", alias = "workload_adjustment")]
    workload: Option<f64>,
    #[serde(alias = "copilotAdjustment", alias = "copilot_adjustment")]
    copilot: Option<f64>,
    #[serde(
        alias = "additionalFactors",
        alias = "additionalFactorsAdjustment",
        alias = "additional_factors_adjustment"
    )]
    additional_factors: Option<f64>,
    #[serde(alias = "storageAdjustment", alias = "storage_adjustment")]
    storage: Option<f64>,
    #[serde(alias = "demandAdjustment", alias = "demand_adjustment")]
    demand: Option<f64>,
}

impl AdjustmentPayload {
    fn into_adjustments(self) -> ExternalAdjustments {
        ExternalAdjustments {
            base: self.base.unwrap_or(0.0),
            workload: self.workload.unwrap_or(0.0),
            copilot: self.copilot.unwrap_or(0.0),
            additional_factors: self.additional_factors.unwrap_or(0.0),
            storage: self.storage.unwrap_or(0.0),
            demand: self.demand.unwrap_or(0.0),
        }
        .sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_accepts_original_field_names() {
        let adj = parse_payload(
            r#"{"baseAdjustment": 1.5, "workloadAdjustment": 0.25, "copilotAdjustment": 4,
                "additionalFactorsAdjustment": -1, "storageAdjustment": 2, "demandAdjustment": 0.5}"#,
        )
        .expect("parse original names");
        assert_eq!(adj.base, 1.5);
        assert_eq!(adj.workload, 0.25);
        assert_eq!(adj.copilot, 4.0);
        assert_eq!(adj.additional_factors, -1.0);
        assert_eq!(adj.storage, 2.0);
        assert_eq!(adj.demand, 0.5);
    }

    #[test]
    fn payload_accepts_short_names_and_defaults_missing_fields() {
        let adj = parse_payload(r#"{"additionalFactors": 3, "extra": "ignored"}"#)
            .expect("parse short names");
        assert_eq!(adj.additional_factors, 3.0);
        assert_eq!(adj.base, 0.0);
        assert_eq!(adj.demand, 0.0);
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(matches!(
            parse_payload("not json"),
            Err(AdjustmentSourceError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_payload("[1, 2, 3]"),
            Err(AdjustmentSourceError::NotAnObject { found: "an array" })
        ));
        assert!(matches!(
            parse_payload(r#"{"base": "high"}"#),
            Err(AdjustmentSourceError::MalformedPayload(_))
        ));
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let err = HttpAdjustmentSource::new(HttpAdjustmentConfig::new("  "))
            .err()
            .expect("empty endpoint");
        assert!(matches!(err, AdjustmentSourceError::EmptyEndpoint));
    }
}
