//! # region-navigator
//!
//! Navigation orchestration for region-based MVVM user interfaces.
//!
//! A *region* is a part of the UI whose content is swapped by navigating to
//! logical paths. For each region a [`NavigationAdapter`] keeps the logical
//! back-stack, drives the optional view-model lifecycle hooks
//! ([`Initialize`], [`NavigationStart`], [`NavigationStop`]), presents
//! message dialogs and content dialogs on top of the stack, propagates
//! results back to whoever awaits them, and turns cancellation into
//! back-navigation.
//!
//! The crate renders nothing. The UI toolkit plugs in through a few traits:
//!
//! - [`RegionHost`] performs the concrete view transitions;
//! - [`PresentationHandle`] / [`ContentDialog`] wrap on-screen dialogs;
//! - [`ServiceResolver`] resolves view-models (a small
//!   [`ServiceCollection`] is included);
//! - [`Dispatcher`] schedules the adapter's `!Send` pipelines on the UI
//!   thread's event loop.
//!
//! # Quick start
//!
//! ```
//! use futures::executor::LocalPool;
//! use region_navigator::*;
//! use std::rc::Rc;
//!
//! struct HomeViewModel;
//!
//! struct Host;
//!
//! impl RegionHost for Host {
//!     fn show_view(&self, context: &NavigationContext, _vm: Option<&ViewModelInstance>) {
//!         println!("showing {}", context.path());
//!     }
//!     fn go_back(&self, _context: &NavigationContext) {}
//!     fn show_message_dialog(&self, _dialog: MessageDialog) -> Rc<dyn PresentationHandle> {
//!         unimplemented!()
//!     }
//! }
//!
//! let services = ServiceCollection::new()
//!     .add_scoped(ViewModelType::of::<HomeViewModel>(), |_| {
//!         Ok(ViewModelInstance::plain(Rc::new(HomeViewModel)))
//!     })
//!     .build();
//!
//! let mut pool = LocalPool::new();
//! let adapter = NavigationAdapter::builder()
//!     .name("main")
//!     .mapping(NavigationMappingTable::new().map(
//!         "/home",
//!         Some(ViewType::page("HomePage")),
//!         Some(ViewModelType::of::<HomeViewModel>()),
//!     ))
//!     .services(services)
//!     .host(Rc::new(Host))
//!     .dispatcher(pool.spawner())
//!     .build()
//!     .unwrap();
//!
//! let navigator = RegionNavigator::new(adapter);
//! navigator.navigate(NavigationRequest::new(Sender::named("shell"), NavigationRoute::new("/home")));
//! pool.run_until_stalled();
//!
//! assert_eq!(navigator.adapter().depth(), 1);
//! ```
//!
//! # Features
//!
//! - `log` (default): diagnostics through the `log` crate.
//! - `tracing`: diagnostics through `tracing` instead.
//! - `tokio`: [`TokioDispatcher`], which runs pipelines with
//!   `tokio::task::spawn_local`.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

mod adapter;
mod completion;
mod context;
mod data;
mod dialog;
mod dispatcher;
mod error;
mod host;
mod lifecycle;
mod mapping;
mod navigator;
mod presentation;
mod services;
mod stack;

pub use adapter::{NavigationAdapter, NavigationAdapterBuilder};
pub use completion::{
    CompletionStatus, NavigationResponse, NavigationTask, ResultCompletion, ResultTask,
};
pub use context::{NavigationContext, NavigationRequest, NavigationRoute, ResultType, Sender};
pub use data::{
    value, NavigationData, Value, MESSAGE_DIALOG_PARAMETER_CANCEL_COMMAND,
    MESSAGE_DIALOG_PARAMETER_COMMANDS, MESSAGE_DIALOG_PARAMETER_CONTENT,
    MESSAGE_DIALOG_PARAMETER_DEFAULT_COMMAND, MESSAGE_DIALOG_PARAMETER_OPTIONS,
    MESSAGE_DIALOG_PARAMETER_TITLE, RESPONSE_KEY,
};
pub use dialog::{
    ContentDialog, ContentDialogResult, MessageDialog, MessageDialogOptions, NavigationAware,
    PresentationHandle, PresentationOutcome, UiCommand,
};
#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub use dispatcher::TokioDispatcher;
pub use dispatcher::Dispatcher;
pub use error::{NavigationError, NavigationOutcome};
pub use host::RegionHost;
pub use lifecycle::{
    Initialize, NavigationStart, NavigationStop, ViewModelInstance, ViewModelInstanceBuilder,
};
pub use mapping::{
    normalize_path, DialogFactory, MappingResolver, NavigationMap, NavigationMappingTable,
    ViewKind, ViewModelType, ViewType,
};
pub use navigator::{NavigationService, RegionNavigator};
pub use presentation::{OpenPresentation, OpenPresentationRegistry, PresentationId};
pub use services::{
    ServiceCollection, ServiceLifetime, ServiceResolver, ServiceScope, ViewModelDataProvider,
};
pub use stack::NavigationContextStack;

pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;

/// Path that navigates back to the previous view.
pub const PREVIOUS_VIEW_PATH: &str = "..";

/// Path that shows a message dialog described by the `__md__*` parameters.
pub const MESSAGE_DIALOG_PATH: &str = "__md__";
