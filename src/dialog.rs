//! Dialog-like presentations.
//!
//! Two kinds of modal surfaces sit on top of the back-stack:
//!
//! - **Message dialogs**: described entirely by navigation parameters
//!   ([`MessageDialog`]) and shown by the host
//!   ([`RegionHost::show_message_dialog`](crate::RegionHost::show_message_dialog)).
//! - **Content dialogs**: views whose [`ViewType`](crate::ViewType) is a
//!   content dialog; the adapter instantiates them, binds the view-model and
//!   shows them itself.
//!
//! Both are driven through [`PresentationHandle`]: `show` returns a future
//! resolving when the presentation closes, `hide` closes it as if the user
//! had, `cancel` aborts it so its future resolves with
//! [`PresentationOutcome::Cancelled`].

use crate::data::{
    MESSAGE_DIALOG_PARAMETER_CANCEL_COMMAND, MESSAGE_DIALOG_PARAMETER_COMMANDS,
    MESSAGE_DIALOG_PARAMETER_CONTENT, MESSAGE_DIALOG_PARAMETER_DEFAULT_COMMAND,
    MESSAGE_DIALOG_PARAMETER_OPTIONS, MESSAGE_DIALOG_PARAMETER_TITLE,
};
use crate::{
    NavigationData, NavigationError, NavigationRoute, NavigationService, Value,
    ViewModelInstance, MESSAGE_DIALOG_PATH,
};
use futures::future::LocalBoxFuture;
use std::any::Any;
use std::rc::Weak;

/// How a closed presentation ended.
#[derive(Clone)]
pub enum PresentationOutcome {
    /// Closed by the user (or by `hide`) with an optional result payload.
    Dismissed(Option<Value>),
    /// Aborted through [`PresentationHandle::cancel`].
    Cancelled,
}

impl PresentationOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Debug for PresentationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dismissed(result) => f
                .debug_tuple("Dismissed")
                .field(&result.as_ref().map(|_| ".."))
                .finish(),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// An on-screen modal presentation.
pub trait PresentationHandle {
    /// Present it. The returned future resolves once it closes.
    fn show(&self) -> LocalBoxFuture<'static, PresentationOutcome>;

    /// Close it.
    fn hide(&self);

    /// Abort it; the `show` future resolves with
    /// [`PresentationOutcome::Cancelled`].
    fn cancel(&self);
}

/// Capability of views that want the navigation service injected.
pub trait NavigationAware {
    fn set_navigation(&self, navigation: Weak<dyn NavigationService>);
}

/// A content dialog view.
pub trait ContentDialog: PresentationHandle {
    /// Bind the view-model as the dialog's data context.
    fn set_data_context(&self, view_model: ViewModelInstance);

    /// The dialog's [`NavigationAware`] capability, if it has one.
    fn navigation_aware(&self) -> Option<&dyn NavigationAware> {
        None
    }
}

/// Result a content dialog closes itself with.
///
/// A back-navigation whose response is a `ContentDialogResult` comes from the
/// dialog's own dismissal, so the adapter does not hide it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentDialogResult {
    None,
    Primary,
    Secondary,
}

/// Presentation options of a message dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageDialogOptions {
    #[default]
    None,
    /// Ignore input for a short delay after showing.
    AcceptUserInputAfterDelay,
}

/// A message dialog command (button).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiCommand {
    pub label: String,
    pub id: Option<String>,
}

impl UiCommand {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Construction arguments of a message dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDialog {
    pub content: String,
    pub title: String,
    pub options: MessageDialogOptions,
    pub default_command_index: Option<u32>,
    pub cancel_command_index: Option<u32>,
    pub commands: Vec<UiCommand>,
}

impl MessageDialog {
    pub fn new(content: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn command(mut self, command: UiCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn default_command(mut self, index: u32) -> Self {
        self.default_command_index = Some(index);
        self
    }

    pub fn cancel_command(mut self, index: u32) -> Self {
        self.cancel_command_index = Some(index);
        self
    }

    pub fn options(mut self, options: MessageDialogOptions) -> Self {
        self.options = options;
        self
    }

    /// Read the dialog from the reserved `__md__*` parameters.
    ///
    /// Absent keys fall back to defaults; a key present with the wrong type
    /// is an [`InvalidParams`](NavigationError::InvalidParams) error.
    /// Content and title accept `String` or `&'static str`.
    pub fn from_data(data: &NavigationData) -> Result<Self, NavigationError> {
        Ok(Self {
            content: text(data, MESSAGE_DIALOG_PARAMETER_CONTENT)?.unwrap_or_default(),
            title: text(data, MESSAGE_DIALOG_PARAMETER_TITLE)?.unwrap_or_default(),
            options: typed::<MessageDialogOptions>(data, MESSAGE_DIALOG_PARAMETER_OPTIONS)?
                .unwrap_or_default(),
            default_command_index: typed::<u32>(data, MESSAGE_DIALOG_PARAMETER_DEFAULT_COMMAND)?,
            cancel_command_index: typed::<u32>(data, MESSAGE_DIALOG_PARAMETER_CANCEL_COMMAND)?,
            commands: typed::<Vec<UiCommand>>(data, MESSAGE_DIALOG_PARAMETER_COMMANDS)?
                .unwrap_or_default(),
        })
    }

    /// Encode the dialog as the reserved parameters.
    pub fn to_data(&self) -> NavigationData {
        let mut data = NavigationData::new()
            .with(MESSAGE_DIALOG_PARAMETER_CONTENT, self.content.clone())
            .with(MESSAGE_DIALOG_PARAMETER_TITLE, self.title.clone())
            .with(MESSAGE_DIALOG_PARAMETER_OPTIONS, self.options)
            .with(MESSAGE_DIALOG_PARAMETER_COMMANDS, self.commands.clone());
        if let Some(index) = self.default_command_index {
            data.insert(MESSAGE_DIALOG_PARAMETER_DEFAULT_COMMAND, index);
        }
        if let Some(index) = self.cancel_command_index {
            data.insert(MESSAGE_DIALOG_PARAMETER_CANCEL_COMMAND, index);
        }
        data
    }

    /// Route that shows this dialog and expects the selected
    /// [`UiCommand`] back.
    pub fn into_route(self) -> NavigationRoute {
        NavigationRoute::new(MESSAGE_DIALOG_PATH)
            .with_data(self.to_data())
            .expecting::<UiCommand>()
    }
}

fn typed<T: Any + Clone>(data: &NavigationData, key: &str) -> Result<Option<T>, NavigationError> {
    match data.get(key) {
        None => Ok(None),
        Some(v) => v.downcast_ref::<T>().cloned().map(Some).ok_or_else(|| {
            NavigationError::invalid_params(format!(
                "'{}' is not a {}",
                key,
                std::any::type_name::<T>()
            ))
        }),
    }
}

fn text(data: &NavigationData, key: &str) -> Result<Option<String>, NavigationError> {
    if let Some(s) = data.get_as::<&'static str>(key) {
        return Ok(Some((*s).to_string()));
    }
    typed::<String>(data, key)
}
