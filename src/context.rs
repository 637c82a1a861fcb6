//! Navigation requests and the context that carries them through the adapter.
//!
//! - [`NavigationRequest`]: what the caller asked for: who sent it
//!   ([`Sender`]) and where to go ([`NavigationRoute`]).
//! - [`NavigationContext`]: one request/response cycle in flight. It adds the
//!   normalized path, the resolved mapping, the scoped service resolver, the
//!   cancellation token and the [`ResultCompletion`] the caller awaits.
//!
//! A context is a value type. Clones share the cancellation token and the
//! result completion, so the copy produced by
//! [`with_mapping`](NavigationContext::with_mapping) still belongs to the same
//! navigation.

use crate::completion::ResultCompletion;
use crate::{
    normalize_path, NavigationData, NavigationMap, ServiceResolver, Value, MESSAGE_DIALOG_PATH,
    PREVIOUS_VIEW_PATH,
};
use std::any::TypeId;
use std::fmt;
use std::rc::Rc;
use tokio_util::sync::CancellationToken;

/// Originator of a navigation request.
///
/// Back-navigations synthesized by the adapter are addressed with the
/// dialog that produced them; cancellation-driven back-navigations reuse the
/// sender of the cancelled request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sender {
    /// An application component, identified by name.
    Named(String),
    /// A message dialog dismissed by the user.
    MessageDialog,
    /// A content dialog (by view name) dismissed by the user.
    ContentDialog(String),
}

impl Sender {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

/// Type of the result a navigation expects back.
///
/// A request with an expected result gets its [`ResultCompletion`] resolved
/// when the navigated-to entry is popped by a back-navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultType {
    id: TypeId,
    name: &'static str,
}

impl ResultType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check if `value` is of the expected type.
    pub fn matches(&self, value: &Value) -> bool {
        (**value).type_id() == self.id
    }
}

/// Destination of a navigation.
#[derive(Debug, Clone)]
pub struct NavigationRoute {
    /// Target path as given by the caller (normalized by the context).
    pub path: String,
    /// Navigation parameters.
    pub data: NavigationData,
    /// Expected result type, if the caller awaits a result.
    pub result: Option<ResultType>,
}

impl NavigationRoute {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: NavigationData::new(),
            result: None,
        }
    }

    /// Route back to the previous view.
    pub fn back() -> Self {
        Self::new(PREVIOUS_VIEW_PATH)
    }

    /// Route back to the previous view, handing `response` to whoever awaits
    /// the popped entry's result.
    pub fn back_with(response: Option<Value>) -> Self {
        let mut route = Self::back();
        route.data.set_response(response);
        route
    }

    /// Set navigation parameters.
    pub fn with_data(mut self, data: NavigationData) -> Self {
        self.data = data;
        self
    }

    /// Declare that the caller expects a `T` back.
    pub fn expecting<T: 'static>(mut self) -> Self {
        self.result = Some(ResultType::of::<T>());
        self
    }
}

/// A caller's navigation request.
#[derive(Debug, Clone)]
pub struct NavigationRequest {
    pub sender: Sender,
    pub route: NavigationRoute,
}

impl NavigationRequest {
    pub fn new(sender: Sender, route: NavigationRoute) -> Self {
        Self { sender, route }
    }

    /// Request to go back to the previous view.
    pub fn back(sender: Sender) -> Self {
        Self::new(sender, NavigationRoute::back())
    }

    /// Check if the caller expects a result.
    pub fn expects_result(&self) -> bool {
        self.route.result.is_some()
    }
}

/// One navigation request/response cycle.
#[derive(Clone)]
pub struct NavigationContext {
    request: NavigationRequest,
    path: String,
    data: NavigationData,
    mapping: Option<Rc<NavigationMap>>,
    services: Rc<dyn ServiceResolver>,
    cancellation: CancellationToken,
    can_cancel: bool,
    result_completion: ResultCompletion,
    retirement: CancellationToken,
}

impl NavigationContext {
    /// Create a context for `request`, resolving view-models from `services`.
    ///
    /// The context starts with a fresh cancellation token, is not
    /// cancellable, and has no mapping attached.
    pub fn new(request: NavigationRequest, services: Rc<dyn ServiceResolver>) -> Self {
        let path = normalize_path(&request.route.path).into_owned();
        let data = request.route.data.clone();
        Self {
            request,
            path,
            data,
            mapping: None,
            services,
            cancellation: CancellationToken::new(),
            can_cancel: false,
            result_completion: ResultCompletion::new(),
            retirement: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Whether cancelling the token later should navigate back automatically.
    pub fn cancellable(mut self, can_cancel: bool) -> Self {
        self.can_cancel = can_cancel;
        self
    }

    /// Copy of this context with `mapping` attached.
    pub fn with_mapping(&self, mapping: Rc<NavigationMap>) -> Self {
        Self {
            mapping: Some(mapping),
            ..self.clone()
        }
    }

    pub fn request(&self) -> &NavigationRequest {
        &self.request
    }

    /// Normalized target path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn data(&self) -> &NavigationData {
        &self.data
    }

    /// Resolved mapping, once the adapter has looked it up.
    pub fn mapping(&self) -> Option<&Rc<NavigationMap>> {
        self.mapping.as_ref()
    }

    pub fn services(&self) -> &Rc<dyn ServiceResolver> {
        &self.services
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn can_cancel(&self) -> bool {
        self.can_cancel
    }

    pub fn result_completion(&self) -> &ResultCompletion {
        &self.result_completion
    }

    /// Signal this navigation's cancellation token.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Check if `other` is a copy of this same navigation.
    pub fn same_navigation(&self, other: &NavigationContext) -> bool {
        self.result_completion.ptr_eq(&other.result_completion)
    }

    /// Mark the navigation's entry as gone from the back-stack.
    pub(crate) fn retire(&self) {
        self.retirement.cancel();
    }

    /// Check if the navigation's entry has left the back-stack.
    pub fn is_retired(&self) -> bool {
        self.retirement.is_cancelled()
    }

    /// Signalled once the navigation's entry leaves the back-stack.
    pub(crate) fn retirement_token(&self) -> &CancellationToken {
        &self.retirement
    }

    /// Check if this is a navigation back to the previous view.
    pub fn is_back(&self) -> bool {
        self.path == PREVIOUS_VIEW_PATH
    }

    /// Check if this navigation shows a message dialog.
    pub fn is_message_dialog(&self) -> bool {
        self.path == MESSAGE_DIALOG_PATH
    }

    /// Check if the mapped view is a content dialog.
    pub fn is_content_dialog(&self) -> bool {
        self.mapping.as_ref().is_some_and(|m| m.is_dialog())
    }
}

impl fmt::Debug for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationContext")
            .field("sender", &self.request.sender)
            .field("path", &self.path)
            .field("data", &self.data)
            .field("mapping", &self.mapping)
            .field("can_cancel", &self.can_cancel)
            .field("cancelled", &self.is_cancelled())
            .field("retired", &self.is_retired())
            .field("result", &self.result_completion.status())
            .finish_non_exhaustive()
    }
}
