use std::fmt::Debug;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// State owned by a [`StoreActor`] and changed only by dispatching actions to it.
pub trait Reducer: Clone + Default + Send + Sync + 'static {
    type Action: Send + Sync + Debug;

    /// Apply one action and return the resulting state. Must be pure and total.
    fn reduce(self, action: Self::Action) -> Self;
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    Closed,
    #[error("Actor dropped")]
    Dropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<T>;

#[derive(Debug)]
pub enum StoreRequest<S: Reducer> {
    Dispatch {
        action: S::Action,
        respond_to: Response<S>,
    },
    /// Like `Dispatch`, but also answers with the state the action was applied to.
    Transition {
        action: S::Action,
        respond_to: Response<(S, S)>,
    },
    Snapshot {
        respond_to: Response<S>,
    },
    /// Stop the actor even while other clients are still alive.
    Stop,
}

// =============================================================================
// 3. THE GENERIC ACTOR
// =============================================================================

/// Single owner of a piece of state. Requests are handled one at a time, so an
/// action is fully applied before the next one is looked at.
pub struct StoreActor<S: Reducer> {
    receiver: mpsc::Receiver<StoreRequest<S>>,
    state: S,
}

impl<S: Reducer> StoreActor<S> {
    pub fn new(buffer_size: usize, initial: S) -> (Self, StoreClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            state: initial,
        };
        (actor, StoreClient::new(sender))
    }

    #[instrument(name = "store_actor", skip(self))]
    pub async fn run(mut self) {
        info!("Store actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Dispatch { action, respond_to } => {
                    debug!(?action, "Applying action");
                    let current = std::mem::take(&mut self.state);
                    self.state = current.reduce(action);
                    let _ = respond_to.send(self.state.clone());
                }
                StoreRequest::Transition { action, respond_to } => {
                    debug!(?action, "Applying action");
                    let before = std::mem::take(&mut self.state);
                    self.state = before.clone().reduce(action);
                    let _ = respond_to.send((before, self.state.clone()));
                }
                StoreRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(self.state.clone());
                }
                StoreRequest::Stop => break,
            }
        }
        info!("Store actor stopped");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct StoreClient<S: Reducer> {
    sender: mpsc::Sender<StoreRequest<S>>,
}

impl<S: Reducer> StoreClient<S> {
    pub fn new(sender: mpsc::Sender<StoreRequest<S>>) -> Self {
        Self { sender }
    }

    /// Apply `action` and return the state it produced.
    pub async fn dispatch(&self, action: S::Action) -> Result<S, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Dispatch { action, respond_to })
            .await
            .map_err(|_| FrameworkError::Closed)?;
        response.await.map_err(|_| FrameworkError::Dropped)
    }

    /// Apply `action` and return `(before, after)` from one round-trip, so no
    /// other client's action can land between the two.
    pub async fn transition(&self, action: S::Action) -> Result<(S, S), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Transition { action, respond_to })
            .await
            .map_err(|_| FrameworkError::Closed)?;
        response.await.map_err(|_| FrameworkError::Dropped)
    }

    pub async fn snapshot(&self) -> Result<S, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Snapshot { respond_to })
            .await
            .map_err(|_| FrameworkError::Closed)?;
        response.await.map_err(|_| FrameworkError::Dropped)
    }

    /// Ask the actor to exit. Requests queued behind the stop are answered with errors.
    pub async fn stop(&self) -> Result<(), FrameworkError> {
        self.sender
            .send(StoreRequest::Stop)
            .await
            .map_err(|_| FrameworkError::Closed)
    }
}
