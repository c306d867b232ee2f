pub mod error;
pub mod types;

#[cfg(feature = "debt")]
pub mod debt;

#[cfg(feature = "budget")]
pub mod budget;

pub use error::HomeFinanceError;
pub use types::*;

/// Standard result type for all home-finance operations
pub type HomeFinanceResult<T> = Result<T, HomeFinanceError>;
