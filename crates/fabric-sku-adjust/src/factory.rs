use std::sync::Arc;

use crate::config::AdjustmentSourceConfig;
use crate::error::AdjustmentSourceError;
use crate::providers::{FixedAdjustmentSource, HttpAdjustmentSource};
use crate::traits::AdjustmentSource;

pub fn build_adjustment_source(
    cfg: AdjustmentSourceConfig,
) -> Result<Arc<dyn AdjustmentSource>, AdjustmentSourceError> {
    match cfg {
        AdjustmentSourceConfig::Fixed(values) => Ok(Arc::new(FixedAdjustmentSource::new(values))),
        AdjustmentSourceConfig::Http(c) => Ok(Arc::new(HttpAdjustmentSource::new(c)?)),
    }
}
