//! Mock implementations for testing
//!
//! These mocks enable router testing without a real model.

use super::traits::*;
use super::{CollaboratorError, TriageRouter};
use crate::contracts::{Category, CategoryResult, ClassificationResult};
use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService, Usage};
use crate::state_machine::Turn;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Classifier
// ============================================================================

/// Classifier that returns queued results and records every call
#[derive(Default)]
pub struct MockClassifier {
    results: Mutex<VecDeque<Result<ClassificationResult, CollaboratorError>>>,
    /// History seen by each call
    pub calls: Mutex<Vec<Vec<Turn>>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, category: Category, confidence: f64) {
        self.results
            .lock()
            .unwrap()
            .push_back(Ok(ClassificationResult::new(category, confidence, "mock")));
    }

    pub fn queue_error(&self, error: CollaboratorError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(&self, history: &[Turn]) -> Result<ClassificationResult, CollaboratorError> {
        self.calls.lock().unwrap().push(history.to_vec());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::Unavailable("No mock result queued".into())))
    }
}

// ============================================================================
// Mock Responder
// ============================================================================

/// Responder that returns queued results and records every call
#[derive(Default)]
pub struct MockResponder {
    results: Mutex<VecDeque<Result<CategoryResult, CollaboratorError>>>,
    pub calls: Mutex<Vec<Vec<Turn>>>,
}

impl MockResponder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, result: CategoryResult) {
        self.results.lock().unwrap().push_back(Ok(result));
    }

    pub fn queue_error(&self, error: CollaboratorError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, history: &[Turn]) -> Result<CategoryResult, CollaboratorError> {
        self.calls.lock().unwrap().push(history.to_vec());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::Unavailable("No mock result queued".into())))
    }
}

// ============================================================================
// Delayed Mock Classifier (for concurrency and cancellation testing)
// ============================================================================

/// Classifier that waits before answering
pub struct DelayedMockClassifier {
    inner: MockClassifier,
    delay: Duration,
    /// Notified when a call starts (for test synchronization)
    pub call_started: Arc<Notify>,
}

impl DelayedMockClassifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockClassifier::new(),
            delay,
            call_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue(&self, category: Category, confidence: f64) {
        self.inner.queue(category, confidence);
    }
}

#[async_trait]
impl IntentClassifier for DelayedMockClassifier {
    async fn classify(&self, history: &[Turn]) -> Result<ClassificationResult, CollaboratorError> {
        self.call_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.classify(history).await
    }
}

// ============================================================================
// Mock LLM Service
// ============================================================================

/// LLM service that returns queued text and records requests
#[derive(Default)]
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    delay: Option<Duration>,
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn queue_text(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let text = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))?;
        Ok(LlmResponse {
            text,
            usage: Usage::default(),
        })
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}

// ============================================================================
// Test Router
// ============================================================================

/// Router wired to mock collaborators, with handles for assertions
pub struct TestRouter {
    pub router: Arc<TriageRouter>,
    pub classifier: Arc<MockClassifier>,
    pub books: Arc<MockResponder>,
    pub clothing: Arc<MockResponder>,
    pub retention: Arc<MockResponder>,
    pub order: Arc<MockResponder>,
}

impl TestRouter {
    pub fn new() -> Self {
        Self::with_classifier_impl(Arc::new(MockClassifier::new()), None)
    }

    /// Use a custom classifier; `classifier` mock stays unused
    pub fn with_classifier(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self::with_classifier_impl(Arc::new(MockClassifier::new()), Some(classifier))
    }

    fn with_classifier_impl(
        mock: Arc<MockClassifier>,
        custom: Option<Arc<dyn IntentClassifier>>,
    ) -> Self {
        let books = Arc::new(MockResponder::new());
        let clothing = Arc::new(MockResponder::new());
        let retention = Arc::new(MockResponder::new());
        let order = Arc::new(MockResponder::new());

        let responders = ResponderSet::new(
            books.clone(),
            clothing.clone(),
            retention.clone(),
            order.clone(),
        );
        let classifier: Arc<dyn IntentClassifier> = match custom {
            Some(classifier) => classifier,
            None => mock.clone(),
        };

        Self {
            router: Arc::new(TriageRouter::new(classifier, responders)),
            classifier: mock,
            books,
            clothing,
            retention,
            order,
        }
    }

    /// Total responder invocations across all categories
    pub fn responder_calls(&self) -> usize {
        self.books.call_count()
            + self.clothing.call_count()
            + self.retention.call_count()
            + self.order.call_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{BookResult, OrderResult, RetentionResult, ValidationError};
    use crate::runtime::{LlmClassifier, LlmResponder, RouterError, TurnOutcome};
    use crate::state_machine::transition::{
        FALLBACK_REPLY, ORDER_APPROVED_REPLY, ORDER_CANCELLED_REPLY,
    };
    use crate::state_machine::{ConvState, Role};

    fn book(response: &str) -> CategoryResult {
        CategoryResult::Books(BookResult {
            reason: "matches the request".to_string(),
            response: response.to_string(),
        })
    }

    fn order(approval: bool) -> CategoryResult {
        CategoryResult::Order(OrderResult {
            human_approval_required: approval,
            order_item_name: "Atomic Habits".to_string(),
            item_id: 2,
            order_id: 9001,
            order_amount: 19.99,
            response: "Your order is ready for review.".to_string(),
        })
    }

    fn last_content(outcome: &TurnOutcome) -> &str {
        outcome.history.last().map(|t| t.content.as_str()).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < f64::EPSILON
    }

    // ------------------------------------------------------------------
    // End-to-end scenarios
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_book_recommendation_turn() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Books, 0.92);
        rt.books.queue(book("Try Atomic Habits!"));

        let outcome = rt.router.submit_message("s1", "I want a good book").await.unwrap();

        let turns = outcome.history.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("I want a good book"));
        assert_eq!(turns[1], Turn::assistant("Try Atomic Habits!"));
        assert_eq!(outcome.display_category, "books");
        assert!(approx(outcome.display_confidence, 0.92));
        assert_eq!(outcome.state, ConvState::Idle);
    }

    #[tokio::test]
    async fn test_order_approval_flow() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Order, 0.88);
        rt.order.queue(order(true));

        let outcome = rt.router.submit_message("s1", "I want to order book #2").await.unwrap();
        assert_eq!(
            last_content(&outcome),
            "Order summary: Atomic Habits ($19.99). Approve this order? (yes/no)"
        );
        assert!(outcome.state.pending_approval());
        assert_eq!(outcome.display_category, "order");

        let outcome = rt.router.submit_message("s1", "yes").await.unwrap();
        assert_eq!(last_content(&outcome), ORDER_APPROVED_REPLY);
        assert!(!outcome.state.pending_approval());
        assert_eq!(outcome.display_category, "Order");
        assert!(approx(outcome.display_confidence, 1.0));
        assert_eq!(outcome.history.len(), 4);

        // The confirmation turn never reached a collaborator
        assert_eq!(rt.classifier.call_count(), 1);
        assert_eq!(rt.order.call_count(), 1);
    }

    #[tokio::test]
    async fn test_order_declined() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Order, 0.9);
        rt.order.queue(order(true));

        rt.router.submit_message("s1", "buy it").await.unwrap();
        let outcome = rt.router.submit_message("s1", "what?").await.unwrap();

        assert_eq!(last_content(&outcome), ORDER_CANCELLED_REPLY);
        assert_eq!(outcome.state, ConvState::Idle);
        assert_eq!(rt.classifier.call_count(), 1);
    }

    #[tokio::test]
    async fn test_order_without_approval_stays_idle() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Order, 0.7);
        rt.order.queue(order(false));

        let outcome = rt.router.submit_message("s1", "how do I order?").await.unwrap();
        assert_eq!(last_content(&outcome), "Your order is ready for review.");
        assert_eq!(outcome.state, ConvState::Idle);
    }

    #[tokio::test]
    async fn test_unknown_category_uses_fallback() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Unknown, 0.41);

        let outcome = rt.router.submit_message("s1", "what's the weather?").await.unwrap();

        assert_eq!(last_content(&outcome), FALLBACK_REPLY);
        assert_eq!(outcome.state, ConvState::Idle);
        assert_eq!(outcome.display_category, "unknown");
        assert!(approx(outcome.display_confidence, 0.41));
        assert_eq!(rt.responder_calls(), 0);
    }

    #[tokio::test]
    async fn test_collaborators_see_full_history() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Books, 0.9);
        rt.books.queue(book("Try Project Hail Mary."));
        rt.classifier.queue(Category::Retention, 0.8);
        rt.retention.queue(CategoryResult::Retention(RetentionResult {
            offer: "25% off your next purchase".to_string(),
            discount_percentage: 25.0,
            response: "Before you go, here's 25% off!".to_string(),
        }));

        rt.router.submit_message("s1", "recommend sci-fi").await.unwrap();
        rt.router.submit_message("s1", "actually cancel my account").await.unwrap();

        let calls = rt.retention.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 3);
        assert_eq!(calls[0][2].role, Role::User);
        assert_eq!(calls[0][2].content, "actually cancel my account");
    }

    // ------------------------------------------------------------------
    // Failures
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_classifier_failure_keeps_user_message_only() {
        let rt = TestRouter::new();
        rt.classifier
            .queue_error(CollaboratorError::Unavailable("HTTP 503".into()));

        let err = rt.router.submit_message("s1", "hello").await.unwrap_err();
        assert!(matches!(err, RouterError::ClassifierUnavailable(_)));

        let snapshot = rt.router.snapshot("s1").await;
        assert_eq!(snapshot.history.turns(), &[Turn::user("hello")]);
        assert_eq!(snapshot.state, ConvState::Idle);
        assert_eq!(rt.responder_calls(), 0);
    }

    #[tokio::test]
    async fn test_responder_failure() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Books, 0.9);
        rt.books
            .queue_error(CollaboratorError::Timeout(Duration::from_secs(30)));

        let err = rt.router.submit_message("s1", "a book please").await.unwrap_err();
        assert!(matches!(
            err,
            RouterError::ResponderUnavailable {
                category: Category::Books,
                ..
            }
        ));

        let snapshot = rt.router.snapshot("s1").await;
        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(snapshot.history.last().map(|t| t.role), Some(Role::User));
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_is_rejected() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Books, 1.5);

        let err = rt.router.submit_message("s1", "books?").await.unwrap_err();
        assert!(matches!(
            err,
            RouterError::Validation(ValidationError::ConfidenceOutOfRange(_))
        ));
        assert_eq!(rt.responder_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_response_is_rejected() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Books, 0.9);
        rt.books.queue(book(""));

        let err = rt.router.submit_message("s1", "books?").await.unwrap_err();
        assert!(matches!(
            err,
            RouterError::Validation(ValidationError::EmptyResponse { .. })
        ));
        assert_eq!(rt.router.snapshot("s1").await.history.len(), 1);
    }

    #[tokio::test]
    async fn test_mismatched_responder_output_is_rejected() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Books, 0.9);
        rt.books.queue(order(true));

        let err = rt.router.submit_message("s1", "books?").await.unwrap_err();
        assert!(matches!(
            err,
            RouterError::Validation(ValidationError::CategoryMismatch { .. })
        ));
        // Did not slip into AwaitingApproval
        assert_eq!(rt.router.snapshot("s1").await.state, ConvState::Idle);
    }

    #[tokio::test]
    async fn test_confirmation_preserves_history_prefix() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Order, 0.9);
        rt.order.queue(order(true));
        rt.router.submit_message("s1", "order it").await.unwrap();

        let before = rt.router.snapshot("s1").await;
        assert!(before.state.pending_approval());

        let outcome = rt.router.submit_message("s1", "Approve").await.unwrap();
        assert_eq!(last_content(&outcome), ORDER_APPROVED_REPLY);
        assert_eq!(&outcome.history.turns()[..before.history.len()], before.history.turns());
    }

    // ------------------------------------------------------------------
    // Clear
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_clear_resets_any_state() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Order, 0.9);
        rt.order.queue(order(true));
        rt.router.submit_message("s1", "order it").await.unwrap();

        for _ in 0..2 {
            let cleared = rt.router.clear("s1").await;
            assert!(cleared.history.is_empty());
            assert_eq!(cleared.display_category, "");
            assert!(approx(cleared.display_confidence, 0.0));

            let snapshot = rt.router.snapshot("s1").await;
            assert!(snapshot.history.is_empty());
            assert_eq!(snapshot.state, ConvState::Idle);
        }

        // After clearing, "yes" is a fresh query, not a confirmation
        rt.classifier.queue(Category::Unknown, 0.2);
        let outcome = rt.router.submit_message("s1", "yes").await.unwrap();
        assert_eq!(last_content(&outcome), FALLBACK_REPLY);
        assert_eq!(rt.classifier.call_count(), 2);
    }

    #[tokio::test]
    async fn test_handle_taken_before_clear_stays_live() {
        let rt = TestRouter::new();
        rt.classifier.queue(Category::Unknown, 0.4);
        rt.router.submit_message("s1", "hello").await.unwrap();

        let before = rt.router.sessions().get_or_create("s1").await;
        rt.router.clear("s1").await;

        let after = rt.router.sessions().get("s1").await.unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(before.lock().await.history.is_empty());

        // A pending order committed through the old handle is what the next turn sees
        rt.classifier.queue(Category::Order, 0.9);
        rt.order.queue(order(true));
        let pending = rt.router.submit_message("s1", "order it").await.unwrap();
        assert!(pending.state.pending_approval());
        assert!(before.lock().await.state.pending_approval());

        let outcome = rt.router.submit_message("s1", "yes").await.unwrap();
        assert_eq!(last_content(&outcome), ORDER_APPROVED_REPLY);
        assert_eq!(rt.classifier.call_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_unknown_session() {
        let rt = TestRouter::new();
        let cleared = rt.router.clear("never-seen").await;
        assert!(cleared.history.is_empty());
        assert!(rt.router.sessions().is_empty().await);
    }

    // ------------------------------------------------------------------
    // Concurrency and cancellation
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_concurrent_turn_for_same_session_is_rejected() {
        let classifier = Arc::new(DelayedMockClassifier::new(Duration::from_millis(200)));
        classifier.queue(Category::Unknown, 0.5);
        let started = classifier.call_started.clone();
        let rt = TestRouter::with_classifier(classifier);

        let router = rt.router.clone();
        let first = tokio::spawn(async move { router.submit_message("s1", "first").await });
        started.notified().await;

        let err = rt.router.submit_message("s1", "second").await.unwrap_err();
        assert!(matches!(err, RouterError::SessionBusy(_)));

        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome.history.len(), 2);
        assert_eq!(outcome.history.turns()[0].content, "first");
    }

    #[tokio::test]
    async fn test_other_sessions_proceed_during_turn() {
        let classifier = Arc::new(DelayedMockClassifier::new(Duration::from_millis(50)));
        classifier.queue(Category::Unknown, 0.5);
        classifier.queue(Category::Unknown, 0.6);
        let rt = TestRouter::with_classifier(classifier);

        let (a, b) = tokio::join!(
            rt.router.submit_message("alice", "hi"),
            rt.router.submit_message("bob", "hello")
        );
        assert_eq!(a.unwrap().history.len(), 2);
        assert_eq!(b.unwrap().history.len(), 2);
    }

    #[tokio::test]
    async fn test_abandoned_turn_commits_nothing() {
        let classifier = Arc::new(DelayedMockClassifier::new(Duration::from_secs(10)));
        classifier.queue(Category::Books, 0.9);
        let rt = TestRouter::with_classifier(classifier);

        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            rt.router.submit_message("s1", "hello"),
        )
        .await;
        assert!(abandoned.is_err());

        let snapshot = rt.router.snapshot("s1").await;
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.state, ConvState::Idle);
    }

    // ------------------------------------------------------------------
    // LLM-backed collaborators
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_llm_classifier_parses_structured_output() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_text(r#"{"reason":"wants a novel","category":"books","confidence":0.92}"#);
        let classifier = LlmClassifier::new(llm.clone(), Duration::from_secs(5));

        let history = vec![Turn::user("I want a good book")];
        let result = classifier.classify(&history).await.unwrap();

        assert_eq!(result.category, Category::Books);
        let requests = llm.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(
            requests[0].response_format.as_ref().map(|f| f.name.as_str()),
            Some("classification")
        );
    }

    #[tokio::test]
    async fn test_llm_classifier_rejects_unlisted_category() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_text(r#"{"reason":"?","category":"electronics","confidence":0.5}"#);
        let classifier = LlmClassifier::new(llm, Duration::from_secs(5));

        let err = classifier.classify(&[Turn::user("tv?")]).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_llm_classifier_times_out() {
        let llm = Arc::new(MockLlmService::with_delay(Duration::from_secs(10)));
        llm.queue_text("{}");
        let classifier = LlmClassifier::new(llm, Duration::from_millis(20));

        let err = classifier.classify(&[Turn::user("hi")]).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_llm_order_responder() {
        let llm: Arc<dyn LlmService> = Arc::new(MockLlmService::new());
        let responder = LlmResponder::new(Category::Order, llm.clone(), Duration::from_secs(5)).unwrap();
        assert!(LlmResponder::new(Category::Unknown, llm, Duration::from_secs(5)).is_none());

        let mock = Arc::new(MockLlmService::new());
        mock.queue_text(
            r#"{"human_approval_required":true,"order_item_name":"Atomic Habits","item_id":2,"order_id":77,"order_amount":19.99,"response":"Ready when you are."}"#,
        );
        let responder_with_output =
            LlmResponder::new(Category::Order, mock.clone(), Duration::from_secs(5)).unwrap();
        let result = responder_with_output
            .respond(&[Turn::user("order book 2")])
            .await
            .unwrap();

        assert_eq!(result.category(), Category::Order);
        assert!(result.validate().is_ok());
        assert!(mock.recorded_requests()[0].system.contains("human_approval_required=true"));

        // The first responder has nothing queued and reports the provider failure
        let err = responder.respond(&[Turn::user("order")]).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_router_over_llm_collaborators() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_text(r#"{"reason":"asks for a book","category":"books","confidence":0.8}"#);
        llm.queue_text(r#"{"reason":"bestseller","response":"Try The Midnight Library."}"#);

        let service: Arc<dyn LlmService> = llm.clone();
        let router = TriageRouter::new(
            Arc::new(LlmClassifier::new(service.clone(), Duration::from_secs(5))),
            LlmResponder::set(&service, Duration::from_secs(5)).unwrap(),
        );

        let outcome = router.submit_message("s1", "any book ideas?").await.unwrap();
        assert_eq!(last_content(&outcome), "Try The Midnight Library.");

        let requests = llm.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].system.contains("book specialist"));
    }

    #[tokio::test]
    async fn test_llm_provider_error_surfaces_as_classifier_unavailable() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_error(LlmError::server_error("HTTP 500: overloaded"));

        let service: Arc<dyn LlmService> = llm;
        let router = TriageRouter::new(
            Arc::new(LlmClassifier::new(service.clone(), Duration::from_secs(5))),
            LlmResponder::set(&service, Duration::from_secs(5)).unwrap(),
        );

        let err = router.submit_message("s1", "hello").await.unwrap_err();
        assert!(matches!(err, RouterError::ClassifierUnavailable(m) if m.contains("overloaded")));
    }
}
