pub mod adjusters;
pub mod descriptions;
pub mod error;
pub mod forecast;
pub mod form;
pub mod pipeline;
pub mod session;
pub mod tiers;
pub mod types;
pub mod weights;

pub use descriptions::*;
pub use error::{ConfigError, ValidationError};
pub use form::FormInput;
pub use pipeline::*;
pub use session::*;
pub use tiers::*;
pub use types::*;
pub use weights::*;
