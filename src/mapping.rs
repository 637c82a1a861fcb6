//! Path → (view, view-model) mappings.
//!
//! A [`NavigationMap`] associates a logical path with the view that should be
//! shown for it and the view-model that backs that view. Both halves are
//! optional: a path may map to a view without a view-model, or to a
//! view-model only.
//!
//! Lookup is an exact match on the [normalized](normalize_path) path. The
//! adapter consumes mappings through the [`MappingResolver`] trait so hosts
//! can plug in deeper resolution; [`NavigationMappingTable`] is the static
//! implementation.
//!
//! # Example
//!
//! ```
//! use region_navigator::{MappingResolver, NavigationMappingTable, ViewModelType, ViewType};
//!
//! struct HomeViewModel;
//!
//! let table = NavigationMappingTable::new()
//!     .map("home", Some(ViewType::page("HomePage")), Some(ViewModelType::of::<HomeViewModel>()));
//!
//! let map = table.lookup_by_path("/home/").unwrap();
//! assert_eq!(map.path, "/home");
//! assert_eq!(map.view.as_ref().unwrap().name(), "HomePage");
//! ```

use crate::dialog::ContentDialog;
use crate::{trace_log, MESSAGE_DIALOG_PATH, PREVIOUS_VIEW_PATH};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Creates a fresh content dialog instance for a dialog-capable view.
pub type DialogFactory = Rc<dyn Fn() -> Rc<dyn ContentDialog>>;

/// How a view is presented.
#[derive(Clone)]
pub enum ViewKind {
    /// An ordinary view, shown by the host's region transition.
    Page,
    /// A modal content dialog, instantiated by the adapter itself.
    ContentDialog(DialogFactory),
}

impl fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Page => write!(f, "Page"),
            ViewKind::ContentDialog(_) => write!(f, "ContentDialog"),
        }
    }
}

/// Descriptor of a view type.
///
/// The name identifies the view. Open content dialogs are matched back to
/// their stack entries by this name.
#[derive(Debug, Clone)]
pub struct ViewType {
    name: String,
    kind: ViewKind,
}

impl ViewType {
    /// An ordinary view.
    pub fn page(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ViewKind::Page,
        }
    }

    /// A content dialog created on demand by `factory`.
    pub fn content_dialog<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Rc<dyn ContentDialog> + 'static,
    {
        Self {
            name: name.into(),
            kind: ViewKind::ContentDialog(Rc::new(factory)),
        }
    }

    /// View name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Presentation kind.
    pub fn kind(&self) -> &ViewKind {
        &self.kind
    }

    /// Check if this view is presented as a content dialog.
    pub fn is_dialog(&self) -> bool {
        matches!(self.kind, ViewKind::ContentDialog(_))
    }

    /// Dialog factory, if this view is a content dialog.
    pub fn dialog_factory(&self) -> Option<&DialogFactory> {
        match &self.kind {
            ViewKind::ContentDialog(factory) => Some(factory),
            ViewKind::Page => None,
        }
    }
}

impl PartialEq for ViewType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.is_dialog() == other.is_dialog()
    }
}

/// Key under which a view-model is registered with the service resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewModelType(Cow<'static, str>);

impl ViewModelType {
    /// Key derived from a Rust type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// Key from an explicit name.
    pub fn named(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The registration key.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved mapping for one path.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationMap {
    /// Normalized path this mapping answers for.
    pub path: String,
    /// View shown for the path.
    pub view: Option<ViewType>,
    /// View-model bound to the view.
    pub view_model: Option<ViewModelType>,
}

impl NavigationMap {
    /// Check if the mapped view is a content dialog.
    pub fn is_dialog(&self) -> bool {
        self.view.as_ref().is_some_and(ViewType::is_dialog)
    }
}

/// Resolves a path to its mapping.
pub trait MappingResolver {
    /// Look up the mapping for `path`. The path is normalized before lookup.
    fn lookup_by_path(&self, path: &str) -> Option<Rc<NavigationMap>>;
}

/// Static mapping table, immutable once handed to an adapter.
#[derive(Debug, Default)]
pub struct NavigationMappingTable {
    maps: HashMap<String, Rc<NavigationMap>>,
}

impl NavigationMappingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapping. A later registration for the same path replaces
    /// the earlier one.
    pub fn map(
        mut self,
        path: &str,
        view: Option<ViewType>,
        view_model: Option<ViewModelType>,
    ) -> Self {
        let path = normalize_path(path).into_owned();
        trace_log!(
            "Mapping '{}' → view {:?}, view-model {:?}",
            path,
            view.as_ref().map(ViewType::name),
            view_model.as_ref().map(ViewModelType::name)
        );
        self.maps.insert(
            path.clone(),
            Rc::new(NavigationMap {
                path,
                view,
                view_model,
            }),
        );
        self
    }

    /// Number of registered mappings.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Return `true` if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl MappingResolver for NavigationMappingTable {
    fn lookup_by_path(&self, path: &str) -> Option<Rc<NavigationMap>> {
        self.maps.get(&*normalize_path(path)).cloned()
    }
}

/// Normalize a navigation path.
///
/// Adds a leading slash, drops trailing and repeated slashes and turns the
/// empty path into `/`. The back and message-dialog sentinels are returned
/// unchanged. Already-normal paths are borrowed.
///
/// ```
/// use region_navigator::normalize_path;
///
/// assert_eq!(normalize_path("users//42/"), "/users/42");
/// assert_eq!(normalize_path(""), "/");
/// assert_eq!(normalize_path(".."), "..");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let trimmed = path.trim();
    if trimmed == PREVIOUS_VIEW_PATH || trimmed == MESSAGE_DIALOG_PATH {
        return Cow::Borrowed(trimmed);
    }

    let is_normal = trimmed.starts_with('/')
        && (trimmed.len() == 1 || !trimmed.ends_with('/'))
        && !trimmed.contains("//");
    if is_normal {
        return Cow::Borrowed(trimmed);
    }

    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    Cow::Owned(format!("/{}", segments.join("/")))
}
