use fabric_sku_core::ExternalAdjustments;

use crate::error::AdjustmentSourceError;
use crate::traits::AdjustmentSource;

/// Serves the same values on every call. The default is all zeros, which is
/// what estimation uses when no endpoint is configured.
#[derive(Debug, Clone, Default)]
pub struct FixedAdjustmentSource {
    values: ExternalAdjustments,
}

impl FixedAdjustmentSource {
    pub fn new(values: ExternalAdjustments) -> Self {
        Self { values }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AdjustmentSource for FixedAdjustmentSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn fetch(&self) -> Result<ExternalAdjustments, AdjustmentSourceError> {
        Ok(self.values)
    }
}
