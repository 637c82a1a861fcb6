//! Registry of open modal presentations.
//!
//! Dialogs are tracked outside the back-stack so the adapter can close the
//! right one when a back-navigation pops its entry. Entries keep insertion
//! order; lookups return the most recent presentation of the requested
//! kind. Every entry is removed exactly once, either by the adapter closing
//! it or by the back-navigation that follows a user dismissal.

use crate::dialog::{ContentDialog, PresentationHandle};
use std::fmt;
use std::rc::Rc;

/// Identity of a registered presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PresentationId(u64);

/// An open presentation.
#[derive(Clone)]
pub enum OpenPresentation {
    MessageDialog(Rc<dyn PresentationHandle>),
    ContentDialog {
        /// View name the dialog was created for.
        view: String,
        dialog: Rc<dyn ContentDialog>,
    },
}

impl OpenPresentation {
    pub fn is_message_dialog(&self) -> bool {
        matches!(self, Self::MessageDialog(_))
    }

    /// View name, for content dialogs.
    pub fn view(&self) -> Option<&str> {
        match self {
            Self::MessageDialog(_) => None,
            Self::ContentDialog { view, .. } => Some(view),
        }
    }
}

impl fmt::Debug for OpenPresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageDialog(_) => write!(f, "MessageDialog"),
            Self::ContentDialog { view, .. } => {
                f.debug_struct("ContentDialog").field("view", view).finish()
            }
        }
    }
}

/// Open presentations in insertion order.
#[derive(Debug, Default)]
pub struct OpenPresentationRegistry {
    entries: Vec<(PresentationId, OpenPresentation)>,
    next_id: u64,
}

impl OpenPresentationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly shown presentation.
    pub fn register(&mut self, presentation: OpenPresentation) -> PresentationId {
        let id = PresentationId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, presentation));
        id
    }

    /// Check if `id` is still open.
    pub fn contains(&self, id: PresentationId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    /// Remove a presentation by id.
    pub fn remove(&mut self, id: PresentationId) -> Option<OpenPresentation> {
        let index = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(index).1)
    }

    /// Remove and return the most recent message dialog.
    pub fn take_last_message_dialog(&mut self) -> Option<Rc<dyn PresentationHandle>> {
        let index = self
            .entries
            .iter()
            .rposition(|(_, p)| p.is_message_dialog())?;
        match self.entries.remove(index).1 {
            OpenPresentation::MessageDialog(handle) => Some(handle),
            OpenPresentation::ContentDialog { .. } => None,
        }
    }

    /// Remove and return the most recent content dialog created for `view`.
    pub fn take_last_content_dialog(&mut self, view: &str) -> Option<Rc<dyn ContentDialog>> {
        let index = self
            .entries
            .iter()
            .rposition(|(_, p)| p.view() == Some(view))?;
        match self.entries.remove(index).1 {
            OpenPresentation::ContentDialog { dialog, .. } => Some(dialog),
            OpenPresentation::MessageDialog(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpenPresentation> {
        self.entries.iter().map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::PresentationOutcome;
    use crate::ViewModelInstance;
    use futures::future::{self, FutureExt, LocalBoxFuture};

    struct Inert;

    impl PresentationHandle for Inert {
        fn show(&self) -> LocalBoxFuture<'static, PresentationOutcome> {
            future::ready(PresentationOutcome::Dismissed(None)).boxed_local()
        }
        fn hide(&self) {}
        fn cancel(&self) {}
    }

    impl ContentDialog for Inert {
        fn set_data_context(&self, _view_model: ViewModelInstance) {}
    }

    fn content(view: &str) -> OpenPresentation {
        OpenPresentation::ContentDialog {
            view: view.to_string(),
            dialog: Rc::new(Inert),
        }
    }

    #[test]
    fn test_take_most_recent_of_kind() {
        let mut registry = OpenPresentationRegistry::new();
        let first_md = registry.register(OpenPresentation::MessageDialog(Rc::new(Inert)));
        let picker = registry.register(content("Picker"));
        let second_md = registry.register(OpenPresentation::MessageDialog(Rc::new(Inert)));
        assert_eq!(registry.len(), 3);

        assert!(registry.take_last_message_dialog().is_some());
        assert!(!registry.contains(second_md));
        assert!(registry.contains(first_md));
        assert!(registry.contains(picker));

        assert!(registry.take_last_content_dialog("Other").is_none());
        assert!(registry.take_last_content_dialog("Picker").is_some());
        assert!(registry.take_last_content_dialog("Picker").is_none());
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn test_remove_by_id_once() {
        let mut registry = OpenPresentationRegistry::new();
        let id = registry.register(content("Editor"));
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut registry = OpenPresentationRegistry::new();
        let a = registry.register(content("A"));
        registry.remove(a);
        let b = registry.register(content("A"));
        assert_ne!(a, b);
        assert!(!registry.contains(a));
    }
}
