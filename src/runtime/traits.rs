//! Collaborator abstractions
//!
//! These traits enable testing the router with mock implementations.

use super::CollaboratorError;
use crate::contracts::{Category, CategoryResult, ClassificationResult};
use crate::state_machine::Turn;
use async_trait::async_trait;
use std::sync::Arc;

/// Assigns an intent category to the conversation so far
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, history: &[Turn]) -> Result<ClassificationResult, CollaboratorError>;
}

/// Produces a category-specific reply to the conversation so far
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, history: &[Turn]) -> Result<CategoryResult, CollaboratorError>;
}

// ============================================================================
// Dispatch table
// ============================================================================

/// One responder per routable category, configured once at startup
#[derive(Clone)]
pub struct ResponderSet {
    books: Arc<dyn Responder>,
    clothing: Arc<dyn Responder>,
    retention: Arc<dyn Responder>,
    order: Arc<dyn Responder>,
}

impl ResponderSet {
    pub fn new(
        books: Arc<dyn Responder>,
        clothing: Arc<dyn Responder>,
        retention: Arc<dyn Responder>,
        order: Arc<dyn Responder>,
    ) -> Self {
        Self {
            books,
            clothing,
            retention,
            order,
        }
    }

    /// Build the set from a per-category factory. `None` if any routable
    /// category is left without a responder.
    pub fn from_fn(mut make: impl FnMut(Category) -> Option<Arc<dyn Responder>>) -> Option<Self> {
        Some(Self::new(
            make(Category::Books)?,
            make(Category::Clothing)?,
            make(Category::Retention)?,
            make(Category::Order)?,
        ))
    }

    /// Resolve the responder for `category`; `Unknown` has none
    pub fn get(&self, category: Category) -> Option<&Arc<dyn Responder>> {
        match category {
            Category::Books => Some(&self.books),
            Category::Clothing => Some(&self.clothing),
            Category::Retention => Some(&self.retention),
            Category::Order => Some(&self.order),
            Category::Unknown => None,
        }
    }

    pub async fn respond(
        &self,
        category: Category,
        history: &[Turn],
    ) -> Result<CategoryResult, CollaboratorError> {
        let responder = self.get(category).ok_or_else(|| {
            CollaboratorError::Unavailable(format!("no responder for {category}"))
        })?;
        responder.respond(history).await
    }
}
