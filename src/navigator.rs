//! Navigation service facade.
//!
//! Application code (and dialogs that are [`NavigationAware`]) navigate
//! through a [`NavigationService`] rather than talking to the adapter: the
//! service turns a [`NavigationRequest`] into a fresh [`NavigationContext`]
//! and submits it. [`RegionNavigator`] is the service for a single region.
//!
//! [`NavigationAware`]: crate::NavigationAware

use crate::{
    debug_log, MessageDialog, NavigationAdapter, NavigationContext, NavigationRequest,
    NavigationResponse, Sender,
};
use std::rc::{Rc, Weak};
use tokio_util::sync::CancellationToken;

/// Entry point for issuing navigations.
pub trait NavigationService {
    /// Submit a navigation request.
    fn navigate(&self, request: NavigationRequest) -> NavigationResponse;

    /// Navigate back to the previous view on behalf of `sender`.
    fn navigate_to_previous_view(&self, sender: Sender) -> NavigationResponse {
        self.navigate(NavigationRequest::back(sender))
    }
}

/// [`NavigationService`] bound to one [`NavigationAdapter`].
pub struct RegionNavigator {
    adapter: NavigationAdapter,
}

impl RegionNavigator {
    /// Create the navigator and bind it (weakly) to `adapter`, so the
    /// adapter can issue the navigations it synthesizes itself.
    ///
    /// The adapter does not keep the navigator alive; hold on to the returned
    /// `Rc` for as long as the region navigates.
    pub fn new(adapter: NavigationAdapter) -> Rc<Self> {
        let navigator = Rc::new(Self { adapter });
        let service = Rc::downgrade(&navigator) as Weak<dyn NavigationService>;
        navigator.adapter.set_navigation(service);
        debug_log!("Navigator bound to region '{}'", navigator.adapter.name());
        navigator
    }

    pub fn adapter(&self) -> &NavigationAdapter {
        &self.adapter
    }

    /// Submit `request` under an externally owned `token`.
    ///
    /// The navigation is cancellable: cancelling `token` after it completed
    /// navigates back on behalf of the original sender.
    pub fn navigate_cancellable(
        &self,
        request: NavigationRequest,
        token: CancellationToken,
    ) -> NavigationResponse {
        let context = NavigationContext::new(request, self.adapter.services())
            .with_cancellation(token)
            .cancellable(true);
        self.adapter.navigate(context)
    }

    /// Show `dialog`. The response's result resolves with the selected
    /// [`UiCommand`](crate::UiCommand).
    pub fn show_message_dialog(&self, sender: Sender, dialog: MessageDialog) -> NavigationResponse {
        self.navigate(NavigationRequest::new(sender, dialog.into_route()))
    }
}

impl NavigationService for RegionNavigator {
    fn navigate(&self, request: NavigationRequest) -> NavigationResponse {
        let context = NavigationContext::new(request, self.adapter.services());
        self.adapter.navigate(context)
    }
}
