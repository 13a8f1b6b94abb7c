//! # Mock Framework
//!
//! Utilities for testing clients and workflows without spawning real collections.
//!
//! [`MockClient`] hands out an ordinary [`ResourceClient`] whose requests are answered
//! from a queue of expectations. Each expectation is registered with a builder
//! (`expect_query().return_ok(..)`) and consumed in order; [`MockClient::verify`]
//! fails the test if any expectation is left over or any request arrived that
//! nobody expected.
//!
//! [`delay_relay`] wraps a real client so every request reaches the actor late,
//! which is how tests open the window between a read and the write that depends on it.

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::error;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the canned response for it.
enum Expectation<T: ActorEntity> {
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Insert {
        id: T::Id,
        response: Result<T::Id, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
    Query {
        response: Result<Vec<T>, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Create { .. } => "create",
            Expectation::Insert { .. } => "insert",
            Expectation::Get { .. } => "get",
            Expectation::Update { .. } => "update",
            Expectation::Delete { .. } => "delete",
            Expectation::Action { .. } => "action",
            Expectation::Query { .. } => "query",
        }
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<UserProfile>::new();
/// mock.expect_query().return_ok(vec![]);
/// mock.expect_insert(id.clone()).return_err(FrameworkError::ActorDropped);
///
/// let profiles = ProfileClient::new(mock.client());
/// // Drive the code under test...
/// mock.verify();
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    unexpected: Arc<AtomicUsize>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let unexpected = Arc::new(AtomicUsize::new(0));
        let queue = expectations.clone();
        let misses = unexpected.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Insert { id, respond_to, .. },
                        Some(Expectation::Insert { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "insert called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "get called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "update called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "delete called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "action called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Query { respond_to, .. },
                        Some(Expectation::Query { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        // Dropping the responder surfaces as ActorDropped to the caller
                        misses.fetch_add(1, Ordering::SeqCst);
                        error!(
                            ?request,
                            expected = ?expectation.as_ref().map(Expectation::name),
                            "Unexpected request"
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            unexpected,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn expect<R>(
        &mut self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.expect(|response| Expectation::Create { response })
    }

    /// Expects an `insert` under `id`.
    pub fn expect_insert(&mut self, id: T::Id) -> ExpectationBuilder<T, T::Id> {
        self.expect(move |response| Expectation::Insert { id, response })
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.expect(move |response| Expectation::Get { id, response })
    }

    /// Expects an `update` operation.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.expect(move |response| Expectation::Update { id, response })
    }

    /// Expects a `delete` operation.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.expect(move |response| Expectation::Delete { id, response })
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.expect(move |response| Expectation::Action { id, response })
    }

    /// Expects a `query` operation.
    pub fn expect_query(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.expect(|response| Expectation::Query { response })
    }

    /// Verifies that all expectations were met and nothing else was asked.
    pub fn verify(&self) {
        let unexpected = self.unexpected.load(Ordering::SeqCst);
        if unexpected > 0 {
            panic!("{} unexpected request(s) reached the mock", unexpected);
        }
        let exps = self
            .expectations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !exps.is_empty() {
            let pending: Vec<&str> = exps.iter().map(Expectation::name).collect();
            panic!("Not all expectations were met. Remaining: {:?}", pending);
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder that completes an expectation with its canned response.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T>>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.wrap)(response);
        self.expectations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(expectation);
    }
}

// =============================================================================
// RAW CHANNEL HELPER
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// For tests that need to inspect request payloads (e.g. the exact document a
/// workflow writes) rather than just return canned answers. The test answers
/// each request through its `respond_to` sender.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

// =============================================================================
// LATENCY INJECTION
// =============================================================================

/// Returns a client whose every request reaches `target` only after `delay`.
///
/// Requests are relayed concurrently, so two callers that issue a request at the
/// same moment both see the actor state as it was before either of them wrote.
pub fn delay_relay<T: ActorEntity>(
    target: ResourceClient<T>,
    delay: Duration,
) -> ResourceClient<T> {
    let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
    tokio::spawn(async move {
        while let Some(request) = receiver.recv().await {
            let target = target.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                // On failure the request and its responder are dropped, so the caller
                // sees ActorDropped
                let _ = target.dispatch(request).await;
            });
        }
    });
    ResourceClient::new(sender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IdentityId, ProfileCreate, ProfileFilter, UserProfile};

    fn params(phone: &str) -> ProfileCreate {
        ProfileCreate {
            display_phone: phone.to_string(),
            email: "ama@example.com".to_string(),
            first_name: "Ama".to_string(),
            last_name: "Mensah".to_string(),
            account_number: "241234567".to_string(),
            date_of_birth: "3/14/1990".to_string(),
            account_balance: 1000.0,
            request_id: None,
        }
    }

    fn profile(id: &str, phone: &str) -> UserProfile {
        UserProfile::new(IdentityId::from(id), params(phone))
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<UserProfile>::new();

        mock.expect_query().return_ok(vec![profile("uid_1", "+233241234567")]);
        mock.expect_insert(IdentityId::from("uid_2"))
            .return_err(FrameworkError::UniqueViolation("+233241234567".into()));

        let client = mock.client();

        let hits = client
            .query(ProfileFilter::DisplayPhone("+233241234567".into()))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].identity_id, IdentityId::from("uid_1"));

        let err = client
            .insert(IdentityId::from("uid_2"), params("+233241234567"))
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::UniqueViolation(_)));

        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_is_dropped_and_reported() {
        let mock = MockClient::<UserProfile>::new();
        let err = mock
            .client()
            .get(IdentityId::from("uid_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::ActorDropped));

        let verdict = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mock.verify()));
        assert!(verdict.is_err());
    }

    #[tokio::test]
    async fn test_delay_relay_forwards_after_delay() {
        let mut mock = MockClient::<UserProfile>::new();
        mock.expect_get(IdentityId::from("uid_9")).return_ok(None);

        let delayed = delay_relay(mock.client(), Duration::from_millis(20));
        let started = tokio::time::Instant::now();
        let found = delayed.get(IdentityId::from("uid_9")).await.unwrap();
        assert!(found.is_none());
        assert!(started.elapsed() >= Duration::from_millis(20));

        mock.verify();
    }
}
