//! Platform binding of a navigation region.
//!
//! The adapter decides *what* happens; the host performs the concrete
//! transitions of whatever UI toolkit renders the region. The adapter calls
//! the host synchronously, between awaited pipeline steps.

use crate::dialog::{MessageDialog, PresentationHandle};
use crate::{NavigationContext, ViewModelInstance};
use std::rc::Rc;

/// Concrete view transitions for one region.
pub trait RegionHost {
    /// Show the ordinary (non-dialog) view for `context`.
    ///
    /// The context's mapping, if any, names the view; `view_model` is the
    /// resolved and initialized view-model to bind to it. The host keeps its
    /// own visual back-stack in step with these calls.
    fn show_view(&self, context: &NavigationContext, view_model: Option<&ViewModelInstance>);

    /// Return to the previous ordinary view.
    fn go_back(&self, context: &NavigationContext);

    /// Create a message dialog from `dialog`.
    ///
    /// The adapter presents it by calling [`PresentationHandle::show`] on the
    /// returned handle.
    fn show_message_dialog(&self, dialog: MessageDialog) -> Rc<dyn PresentationHandle>;
}
