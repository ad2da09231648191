pub mod estimator;

pub use estimator::*;
pub use fabric_sku_adjust::{
    build_adjustment_source, AdjustmentSource, AdjustmentSourceConfig, AdjustmentSourceError,
    FixedAdjustmentSource, HttpAdjustmentConfig, HttpAdjustmentSource, DEFAULT_FETCH_TIMEOUT,
};
pub use fabric_sku_core::*;
