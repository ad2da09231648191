pub mod fixed;
pub mod http;

pub use fixed::FixedAdjustmentSource;
pub use http::HttpAdjustmentSource;
