//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`], but the requests it sends are
//! answered from a queue of scripted expectations instead of by an actor. Use it to
//! test code that sits *on top of* a client, in particular how that code reacts to
//! failures that a healthy actor never produces.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Determinism** | Fully scripted | Subject to scheduler |
//! | **State** | None (expectations only) | Real entity state |
//! | **Error Injection** | Easy (`return_err`) | Hard |
//! | **Use Case** | Adapter/error-path tests | Behavior of the entity itself |
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut mock = MockClient::<Cart>::new();
//! mock.expect_get(UserId(7)).return_err(FrameworkError::ActorClosed);
//!
//! let client = mock.client();
//! assert!(client.get(UserId(7)).await.is_err());
//! mock.verify();
//! ```
//!
//! Expectations are consumed in order. A request that does not match the next
//! expectation (or arrives when none is left) panics the mock task, which the
//! caller observes as [`FrameworkError::ActorDropped`].

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response to give it.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
    Remove {
        id: T::Id,
        response: Result<bool, FrameworkError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: ActorEntity>(expectations: &Expectations<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    expectations.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Remove { id, respond_to },
                        Some(Expectation::Remove { id: expected, response }),
                    ) if id == expected => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {request:?}");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` request for `id`.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(id, self.expectations.clone(), |id, response| {
            Expectation::Get { id, response }
        })
    }

    /// Expects an action request for `id`.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(id, self.expectations.clone(), |id, response| {
            Expectation::Action { id, response }
        })
    }

    /// Expects a `remove` request for `id`.
    pub fn expect_remove(&mut self, id: T::Id) -> ExpectationBuilder<T, bool> {
        ExpectationBuilder::new(id, self.expectations.clone(), |id, response| {
            Expectation::Remove { id, response }
        })
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.expectations).len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder that records one expectation once a response is chosen.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    id: T::Id,
    expectations: Expectations<T>,
    make: fn(T::Id, Result<R, FrameworkError>) -> Expectation<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(
        id: T::Id,
        expectations: Expectations<T>,
        make: fn(T::Id, Result<R, FrameworkError>) -> Expectation<T>,
    ) -> Self {
        Self {
            id,
            expectations,
            make,
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.make)(self.id, Ok(value));
        lock(&self.expectations).push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.make)(self.id, Err(error));
        lock(&self.expectations).push_back(expectation);
    }
}

/// Creates a client and the raw receiver behind it, for tests that want to answer
/// requests by hand.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u32,
        text: String,
    }

    #[derive(Debug)]
    enum NoteAction {
        Append(String),
    }

    #[derive(Debug, thiserror::Error)]
    #[error("note error")]
    struct NoteError;

    impl ActorEntity for Note {
        type Id = u32;
        type Action = NoteAction;
        type ActionResult = usize;
        type Error = NoteError;

        fn new(id: u32) -> Self {
            Self {
                id,
                text: String::new(),
            }
        }

        fn handle_action(&mut self, action: NoteAction) -> Result<usize, NoteError> {
            match action {
                NoteAction::Append(s) => self.text.push_str(&s),
            }
            Ok(self.text.len())
        }
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_action(1).return_ok(5);
        mock.expect_get(1).return_ok(Some(Note {
            id: 1,
            text: "hello".into(),
        }));
        mock.expect_remove(1).return_err(FrameworkError::ActorClosed);

        let client = mock.client();
        assert_eq!(client.perform_action(1, NoteAction::Append("hello".into())).await.unwrap(), 5);
        assert_eq!(client.get(1).await.unwrap().unwrap().text, "hello");
        assert!(matches!(client.remove(1).await, Err(FrameworkError::ActorClosed)));

        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatched_request_drops_response() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_get(1).return_ok(None);

        let client = mock.client();
        let result = client.get(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }

    #[tokio::test]
    async fn test_manual_responder() {
        let (client, mut receiver) = create_mock_client::<Note>(4);
        let task = tokio::spawn(async move { client.remove(9).await });

        match receiver.recv().await {
            Some(ResourceRequest::Remove { id, respond_to }) => {
                assert_eq!(id, 9);
                respond_to.send(Ok(true)).unwrap();
            }
            other => panic!("Expected Remove request, got {other:?}"),
        }

        assert!(task.await.unwrap().unwrap());
    }
}
