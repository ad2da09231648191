use async_trait::async_trait;
use fabric_sku_core::ExternalAdjustments;

use crate::error::AdjustmentSourceError;

#[async_trait]
pub trait AdjustmentSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<ExternalAdjustments, AdjustmentSourceError>;
}
