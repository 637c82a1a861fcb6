//! Completion handles handed back to navigation callers.
//!
//! Two futures come out of every navigation:
//!
//! - the [`NavigationTask`], resolving when the adapter's pipeline for that
//!   navigation has finished (or was abandoned because of cancellation);
//! - the [`ResultTask`], resolving when the navigated-to entry produces its
//!   result, typically when a dialog is dismissed or a later back-navigation
//!   pops the entry.
//!
//! Both are [`Shared`] so any number of clones can await them.

use crate::{NavigationError, NavigationOutcome, NavigationRequest, Value};
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tokio_util::sync::CancellationToken;

/// Future resolving to a navigation's result payload.
pub type ResultTask = Shared<LocalBoxFuture<'static, Result<Option<Value>, NavigationError>>>;

/// Future resolving when a navigation's pipeline has finished.
pub type NavigationTask = Shared<LocalBoxFuture<'static, NavigationOutcome>>;

/// State of a [`ResultCompletion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Pending,
    Completed,
    Cancelled,
}

struct CompletionState {
    status: CompletionStatus,
    sender: Option<oneshot::Sender<Result<Option<Value>, NavigationError>>>,
}

/// Single-assignment completion of a navigation's result.
///
/// The first call to [`complete`](Self::complete) or [`cancel`](Self::cancel)
/// wins; later calls return `false` and change nothing. Clones share state.
#[derive(Clone)]
pub struct ResultCompletion {
    state: Rc<RefCell<CompletionState>>,
    task: ResultTask,
}

impl ResultCompletion {
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel();
        let task = receiver
            .map(|received| received.unwrap_or(Err(NavigationError::Cancelled)))
            .boxed_local()
            .shared();
        Self {
            state: Rc::new(RefCell::new(CompletionState {
                status: CompletionStatus::Pending,
                sender: Some(sender),
            })),
            task,
        }
    }

    /// Resolve with `value`. Returns `true` if this call resolved it.
    pub fn complete(&self, value: Option<Value>) -> bool {
        self.resolve(CompletionStatus::Completed, Ok(value))
    }

    /// Resolve as cancelled. Returns `true` if this call resolved it.
    pub fn cancel(&self) -> bool {
        self.resolve(CompletionStatus::Cancelled, Err(NavigationError::Cancelled))
    }

    fn resolve(
        &self,
        status: CompletionStatus,
        outcome: Result<Option<Value>, NavigationError>,
    ) -> bool {
        let sender = {
            let mut state = self.state.borrow_mut();
            if state.status != CompletionStatus::Pending {
                return false;
            }
            state.status = status;
            state.sender.take()
        };
        if let Some(sender) = sender {
            // The receiver lives inside `task`, which we hold.
            let _ = sender.send(outcome);
        }
        true
    }

    pub fn status(&self) -> CompletionStatus {
        self.state.borrow().status
    }

    pub fn is_pending(&self) -> bool {
        self.status() == CompletionStatus::Pending
    }

    /// Future resolving to the eventual result.
    pub fn task(&self) -> ResultTask {
        self.task.clone()
    }

    /// Check if both handles complete the same result.
    pub fn ptr_eq(&self, other: &ResultCompletion) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for ResultCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResultCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResultCompletion").field(&self.status()).finish()
    }
}

/// Create the sending half and the shared future of a pipeline run.
pub(crate) fn navigation_task() -> (oneshot::Sender<NavigationOutcome>, NavigationTask) {
    let (sender, receiver) = oneshot::channel();
    let task = receiver
        .map(|received| {
            received.unwrap_or_else(|_| {
                Err(NavigationError::failed(
                    "navigation pipeline dropped before completing",
                ))
            })
        })
        .boxed_local()
        .shared();
    (sender, task)
}

/// What a caller gets back from a navigation.
#[derive(Clone)]
pub struct NavigationResponse {
    /// The request as submitted.
    pub request: NavigationRequest,
    /// Resolves once the pipeline has run.
    pub task: NavigationTask,
    /// Cancellation source of the navigation.
    pub cancellation: CancellationToken,
    /// Resolves with the navigation's result payload.
    pub result: ResultTask,
}

impl NavigationResponse {
    /// Cancel the navigation (and, for cancellable navigations that already
    /// completed, navigate back).
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }
}

impl fmt::Debug for NavigationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationResponse")
            .field("request", &self.request)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}
