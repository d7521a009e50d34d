//! Category-specific responder output

use super::{Category, ValidationError};
use serde::{Deserialize, Serialize};

/// Book recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResult {
    pub reason: String,
    pub response: String,
}

/// Clothing recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingResult {
    pub reason: String,
    pub response: String,
}

/// Retention offer for a customer who wants to leave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionResult {
    pub offer: String,
    pub discount_percentage: f64,
    pub response: String,
}

/// Order placement details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    pub human_approval_required: bool,
    pub order_item_name: String,
    pub item_id: i64,
    pub order_id: i64,
    /// Total in USD
    pub order_amount: f64,
    pub response: String,
}

impl OrderResult {
    /// Prompt shown instead of the responder's own text when the order needs a yes/no
    pub fn summary_prompt(&self) -> String {
        format!(
            "Order summary: {} (${:.2}). Approve this order? (yes/no)",
            self.order_item_name, self.order_amount
        )
    }
}

/// Responder output, one variant per routable category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum CategoryResult {
    Books(BookResult),
    Clothing(ClothingResult),
    Retention(RetentionResult),
    Order(OrderResult),
}

impl CategoryResult {
    pub fn category(&self) -> Category {
        match self {
            CategoryResult::Books(_) => Category::Books,
            CategoryResult::Clothing(_) => Category::Clothing,
            CategoryResult::Retention(_) => Category::Retention,
            CategoryResult::Order(_) => Category::Order,
        }
    }

    /// Text suitable for direct display
    pub fn response(&self) -> &str {
        match self {
            CategoryResult::Books(r) => &r.response,
            CategoryResult::Clothing(r) => &r.response,
            CategoryResult::Retention(r) => &r.response,
            CategoryResult::Order(r) => &r.response,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.response().trim().is_empty() {
            return Err(ValidationError::EmptyResponse {
                category: self.category(),
            });
        }

        match self {
            CategoryResult::Books(_) | CategoryResult::Clothing(_) => Ok(()),
            CategoryResult::Retention(r) => {
                if r.discount_percentage.is_finite()
                    && (0.0..=100.0).contains(&r.discount_percentage)
                {
                    Ok(())
                } else {
                    Err(ValidationError::DiscountOutOfRange(r.discount_percentage))
                }
            }
            CategoryResult::Order(r) => {
                if !r.order_amount.is_finite() || r.order_amount < 0.0 {
                    Err(ValidationError::InvalidOrderAmount(r.order_amount))
                } else if r.order_item_name.trim().is_empty() {
                    Err(ValidationError::MissingOrderItem)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Validate and check that this result answers `expected`
    pub fn validate_for(&self, expected: Category) -> Result<(), ValidationError> {
        let actual = self.category();
        if actual != expected {
            return Err(ValidationError::CategoryMismatch { expected, actual });
        }
        self.validate()
    }
}
