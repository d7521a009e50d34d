//! Pure state transition function
//!
//! Given a state and an event, decide the next state and the effects the
//! runtime must carry out. No I/O happens here.

use super::{ConvState, Effect, Event};
use crate::contracts::{Category, CategoryResult, ClassificationResult, OrderResult};
use thiserror::Error;

/// Replies that approve a pending order (compared after trim + lowercase)
pub const AFFIRMATIVE_REPLIES: [&str; 3] = ["yes", "y", "approve"];

pub const ORDER_APPROVED_REPLY: &str = "Order approved and sent to shipping!";
pub const ORDER_CANCELLED_REPLY: &str = "Order cancelled at your request.";
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't categorize your request correctly.";

/// Display values for a confirmation turn, where no classification runs
pub const CONFIRMATION_DISPLAY_CATEGORY: &str = "Order";
pub const CONFIRMATION_DISPLAY_CONFIDENCE: f64 = 1.0;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("A turn is already in progress for this conversation")]
    TurnInProgress,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(state: &ConvState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // User Message Handling
        // ============================================================

        // Idle + UserMessage -> Classifying
        (ConvState::Idle, Event::UserMessage { text }) => {
            Ok(TransitionResult::new(ConvState::Classifying)
                .with_effect(Effect::append_user(text))
                .with_effect(Effect::RequestClassification))
        }

        // AwaitingApproval + UserMessage -> Idle, answered locally
        (ConvState::AwaitingApproval { .. }, Event::UserMessage { text }) => {
            let reply = if is_affirmative(&text) {
                ORDER_APPROVED_REPLY
            } else {
                ORDER_CANCELLED_REPLY
            };
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::append_user(text))
                .with_effect(Effect::append_assistant(reply))
                .with_effect(Effect::display(
                    CONFIRMATION_DISPLAY_CATEGORY,
                    CONFIRMATION_DISPLAY_CONFIDENCE,
                )))
        }

        (ConvState::Classifying | ConvState::Responding { .. }, Event::UserMessage { .. }) => {
            Err(TransitionError::TurnInProgress)
        }

        // ============================================================
        // Classification
        // ============================================================
        (ConvState::Classifying, Event::Classified(classification)) => {
            Ok(handle_classification(&classification))
        }

        // ============================================================
        // Responder Output
        // ============================================================
        (ConvState::Responding { category }, Event::Responded(result))
            if result.category() == *category =>
        {
            Ok(handle_response(result))
        }

        (ConvState::Responding { category }, Event::Responded(result)) => {
            Err(TransitionError::InvalidTransition(format!(
                "{} result received while waiting for the {category} responder",
                result.category()
            )))
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{} cannot handle {}",
            state.name(),
            event_name(&event)
        ))),
    }
}

/// Case-insensitive match of the trimmed reply against the approval words
pub fn is_affirmative(reply: &str) -> bool {
    let normalized = reply.trim().to_lowercase();
    AFFIRMATIVE_REPLIES.contains(&normalized.as_str())
}

fn handle_classification(classification: &ClassificationResult) -> TransitionResult {
    // Display always reflects the raw classifier output, even for Unknown
    let display = Effect::display(classification.category.label(), classification.confidence);

    match classification.category {
        category @ (Category::Books | Category::Clothing | Category::Retention | Category::Order) => {
            TransitionResult::new(ConvState::Responding { category })
                .with_effect(display)
                .with_effect(Effect::RequestResponse { category })
        }
        Category::Unknown => TransitionResult::new(ConvState::Idle)
            .with_effect(display)
            .with_effect(Effect::append_assistant(FALLBACK_REPLY)),
    }
}

fn handle_response(result: CategoryResult) -> TransitionResult {
    match result {
        CategoryResult::Order(order) if order.human_approval_required => {
            request_approval(order)
        }
        other => TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::append_assistant(other.response())),
    }
}

fn request_approval(order: OrderResult) -> TransitionResult {
    let prompt = order.summary_prompt();
    TransitionResult::new(ConvState::AwaitingApproval { order })
        .with_effect(Effect::append_assistant(prompt))
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::UserMessage { .. } => "user_message",
        Event::Classified(_) => "classified",
        Event::Responded(_) => "responded",
    }
}
