//! Structured results returned by the intent classifier and the responders
//!
//! Every value crossing the collaborator boundary is checked with
//! `validate()` before the router acts on it.

mod category;
mod classification;
mod response;
pub mod schema;

pub use category::Category;
pub use classification::ClassificationResult;
pub use response::{BookResult, CategoryResult, ClothingResult, OrderResult, RetentionResult};

use thiserror::Error;

/// A collaborator result that failed shape or range checks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
    #[error("{category} result has an empty response")]
    EmptyResponse { category: Category },
    #[error("discount percentage {0} is outside [0, 100]")]
    DiscountOutOfRange(f64),
    #[error("order amount {0} is not a non-negative number")]
    InvalidOrderAmount(f64),
    #[error("order result has an empty item name")]
    MissingOrderItem,
    #[error("asked the {expected} responder but received a {actual} result")]
    CategoryMismatch { expected: Category, actual: Category },
    #[error("malformed structured output: {0}")]
    Malformed(String),
}
