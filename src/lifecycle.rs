//! View-model lifecycle capabilities.
//!
//! A view-model *may* take part in navigation through three independent
//! capabilities:
//!
//! - [`Initialize`]: called once the view-model has been resolved for a
//!   forward navigation, before its view is shown.
//! - [`NavigationStart`]: called after the view (or dialog) is presented,
//!   and again when a back-navigation reveals the view.
//! - [`NavigationStop`]: called on the outgoing view-model before any other
//!   navigation proceeds. It receives the *incoming* context and may cancel
//!   it to veto the navigation.
//!
//! Capabilities are declared when the view-model is composed into a
//! [`ViewModelInstance`], not discovered by inspecting the instance at
//! runtime:
//!
//! ```
//! use region_navigator::{async_trait, Initialize, NavigationContext, NavigationError, ViewModelInstance};
//! use std::rc::Rc;
//!
//! struct ProfileViewModel;
//!
//! #[async_trait(?Send)]
//! impl Initialize for ProfileViewModel {
//!     async fn initialize(&self, _context: &NavigationContext) -> Result<(), NavigationError> {
//!         Ok(())
//!     }
//! }
//!
//! let vm = ViewModelInstance::builder(Rc::new(ProfileViewModel))
//!     .initialize()
//!     .build();
//! assert!(vm.can_initialize());
//! assert!(!vm.can_stop());
//! ```

use crate::{trace_log, NavigationContext, NavigationError};
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Initialization hook for an incoming view-model.
#[async_trait(?Send)]
pub trait Initialize {
    /// Prepare the view-model for `context` (load data, read parameters).
    async fn initialize(&self, context: &NavigationContext) -> Result<(), NavigationError>;
}

/// Start hook, run once the view-model's view is on screen.
#[async_trait(?Send)]
pub trait NavigationStart {
    /// `is_forward` is `false` when a back-navigation revealed the view again.
    async fn start(&self, context: &NavigationContext, is_forward: bool)
        -> Result<(), NavigationError>;
}

/// Stop hook for the outgoing view-model.
#[async_trait(?Send)]
pub trait NavigationStop {
    /// `context` is the navigation about to happen. Cancelling its token
    /// (see [`NavigationContext::cancel`]) aborts that navigation.
    async fn stop(&self, context: &NavigationContext, is_back: bool)
        -> Result<(), NavigationError>;
}

/// A resolved view-model together with the capabilities it declared.
#[derive(Clone)]
pub struct ViewModelInstance {
    instance: Rc<dyn Any>,
    type_name: &'static str,
    initialize: Option<Rc<dyn Initialize>>,
    start: Option<Rc<dyn NavigationStart>>,
    stop: Option<Rc<dyn NavigationStop>>,
}

impl ViewModelInstance {
    /// Compose a view-model with no capabilities; chain capability calls on
    /// the returned builder to declare them.
    pub fn builder<T: 'static>(vm: Rc<T>) -> ViewModelInstanceBuilder<T> {
        ViewModelInstanceBuilder {
            vm,
            initialize: None,
            start: None,
            stop: None,
        }
    }

    /// A view-model without lifecycle capabilities.
    pub fn plain<T: 'static>(vm: Rc<T>) -> Self {
        Self::builder(vm).build()
    }

    /// The underlying instance, e.g. to bind as a view's data context.
    pub fn instance(&self) -> &Rc<dyn Any> {
        &self.instance
    }

    /// Downcast the underlying instance.
    pub fn downcast<T: 'static>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.instance).downcast::<T>().ok()
    }

    /// Rust type name of the instance, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if two handles refer to the same instance.
    pub fn ptr_eq(&self, other: &ViewModelInstance) -> bool {
        Rc::ptr_eq(&self.instance, &other.instance)
    }

    pub fn can_initialize(&self) -> bool {
        self.initialize.is_some()
    }

    pub fn can_start(&self) -> bool {
        self.start.is_some()
    }

    pub fn can_stop(&self) -> bool {
        self.stop.is_some()
    }

    /// Run the initialize hook, if declared.
    pub async fn initialize(&self, context: &NavigationContext) -> Result<(), NavigationError> {
        match &self.initialize {
            Some(hook) => {
                trace_log!("Initializing {} for '{}'", self.type_name, context.path());
                hook.initialize(context).await
            }
            None => Ok(()),
        }
    }

    /// Run the start hook, if declared.
    pub async fn start(
        &self,
        context: &NavigationContext,
        is_forward: bool,
    ) -> Result<(), NavigationError> {
        match &self.start {
            Some(hook) => {
                trace_log!(
                    "Starting {} for '{}' (forward: {})",
                    self.type_name,
                    context.path(),
                    is_forward
                );
                hook.start(context, is_forward).await
            }
            None => Ok(()),
        }
    }

    /// Run the stop hook, if declared.
    pub async fn stop(&self, context: &NavigationContext, is_back: bool) -> Result<(), NavigationError> {
        match &self.stop {
            Some(hook) => {
                trace_log!("Stopping {} before '{}'", self.type_name, context.path());
                hook.stop(context, is_back).await
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ViewModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModelInstance")
            .field("type_name", &self.type_name)
            .field("initialize", &self.can_initialize())
            .field("start", &self.can_start())
            .field("stop", &self.can_stop())
            .finish()
    }
}

/// Builder returned by [`ViewModelInstance::builder`].
pub struct ViewModelInstanceBuilder<T> {
    vm: Rc<T>,
    initialize: Option<Rc<dyn Initialize>>,
    start: Option<Rc<dyn NavigationStart>>,
    stop: Option<Rc<dyn NavigationStop>>,
}

impl<T: 'static> ViewModelInstanceBuilder<T> {
    pub fn build(self) -> ViewModelInstance {
        ViewModelInstance {
            instance: self.vm,
            type_name: std::any::type_name::<T>(),
            initialize: self.initialize,
            start: self.start,
            stop: self.stop,
        }
    }
}

impl<T: Initialize + 'static> ViewModelInstanceBuilder<T> {
    /// Declare the [`Initialize`] capability.
    pub fn initialize(mut self) -> Self {
        self.initialize = Some(self.vm.clone());
        self
    }
}

impl<T: NavigationStart + 'static> ViewModelInstanceBuilder<T> {
    /// Declare the [`NavigationStart`] capability.
    pub fn start(mut self) -> Self {
        self.start = Some(self.vm.clone());
        self
    }
}

impl<T: NavigationStop + 'static> ViewModelInstanceBuilder<T> {
    /// Declare the [`NavigationStop`] capability.
    pub fn stop(mut self) -> Self {
        self.stop = Some(self.vm.clone());
        self
    }
}
