//! Async estimation: one adjustment fetch, then the pure pipeline.
//!
//! The fetch is the only suspension point. Any failure (transport error,
//! bad status, malformed payload, timeout) degrades to all-zero adjustments
//! and is never retried.

use std::sync::Arc;
use std::time::Duration;

use fabric_sku_adjust::{AdjustmentSource, FixedAdjustmentSource, DEFAULT_FETCH_TIMEOUT};
use fabric_sku_core::{
    estimate_with, Estimation, EstimationInput, EstimationResult, ExternalAdjustments, FormInput,
    TierTable, ValidationError, Weights,
};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentOrigin {
    Fetched,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FetchedAdjustments {
    pub values: ExternalAdjustments,
    pub origin: AdjustmentOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateReport {
    pub estimation: Estimation,
    pub adjustments: FetchedAdjustments,
    pub source: &'static str,
    pub profile: &'static str,
}

pub struct Estimator {
    source: Arc<dyn AdjustmentSource>,
    weights: Weights,
    tiers: TierTable,
    fetch_timeout: Duration,
}

impl Estimator {
    pub fn new(source: Arc<dyn AdjustmentSource>, weights: Weights) -> Self {
        Self {
            source,
            weights,
            tiers: TierTable::fabric(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Reference weights, no external source.
    pub fn offline() -> Self {
        Self::new(Arc::new(FixedAdjustmentSource::zero()), Weights::reference())
    }

    pub fn with_tiers(mut self, tiers: TierTable) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub async fn fetch_adjustments(&self) -> FetchedAdjustments {
        let source = self.source.name();
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch()).await {
            Ok(Ok(values)) => FetchedAdjustments {
                values: values.sanitized(),
                origin: AdjustmentOrigin::Fetched,
            },
            Ok(Err(err)) => {
                warn!(source, error = %err, "adjustment fetch failed, using zero adjustments");
                Self::fallback()
            }
            Err(_) => {
                warn!(
                    source,
                    timeout_ms = self.fetch_timeout.as_millis() as u64,
                    "adjustment fetch timed out, using zero adjustments"
                );
                Self::fallback()
            }
        }
    }

    fn fallback() -> FetchedAdjustments {
        FetchedAdjustments {
            values: ExternalAdjustments::ZERO,
            origin: AdjustmentOrigin::Fallback,
        }
    }

    pub async fn estimate(
        &self,
        input: &EstimationInput,
    ) -> Result<EstimationResult, ValidationError> {
        Ok(self.estimate_detailed(input).await?.estimation.result)
    }

    /// Rejects invalid input before the adjustment fetch.
    pub async fn estimate_detailed(
        &self,
        input: &EstimationInput,
    ) -> Result<EstimateReport, ValidationError> {
        input.validate()?;
        let adjustments = self.fetch_adjustments().await;
        let estimation = estimate_with(input, &adjustments.values, &self.weights, &self.tiers);
        info!(
            sku = %estimation.result.label,
            capacity_units = estimation.result.capacity_units,
            score = estimation.score,
            floor_applied = estimation.floor_applied,
            origin = ?adjustments.origin,
            "estimate complete"
        );
        Ok(EstimateReport {
            estimation,
            adjustments,
            source: self.source.name(),
            profile: self.weights.profile.name(),
        })
    }

    /// Validates raw form values before anything touches the network.
    pub async fn estimate_form(&self, form: &FormInput) -> Result<EstimateReport, ValidationError> {
        let input = form.parse()?;
        self.estimate_detailed(&input).await
    }
}
