//! Service resolution for view-models.
//!
//! The adapter only needs three things from a dependency container:
//! resolving a view-model by its [`ViewModelType`], the scope's
//! [`ViewModelDataProvider`], and creating child scopes. Those are captured
//! by [`ServiceResolver`].
//!
//! [`ServiceCollection`] is a small in-process container implementing that
//! contract. View-models are registered as factories with a
//! [`ServiceLifetime`]: *scoped* registrations yield one instance per scope
//! (so the instance initialized on push is the one stopped on pop),
//! *transient* ones a fresh instance per resolution.
//!
//! # Example
//!
//! ```
//! use region_navigator::{ServiceCollection, ServiceResolver, ViewModelInstance, ViewModelType};
//! use std::rc::Rc;
//!
//! struct CounterViewModel {
//!     start: u32,
//! }
//!
//! let root = ServiceCollection::new()
//!     .add_scoped(ViewModelType::of::<CounterViewModel>(), |data| {
//!         let start = data.parameters().get_as::<u32>("start").copied().unwrap_or(0);
//!         Ok(ViewModelInstance::plain(Rc::new(CounterViewModel { start })))
//!     })
//!     .build();
//!
//! let scope = root.create_scope();
//! let vm = scope.resolve(&ViewModelType::of::<CounterViewModel>()).unwrap().unwrap();
//! assert_eq!(vm.downcast::<CounterViewModel>().unwrap().start, 0);
//! ```

use crate::{debug_log, trace_log, NavigationData, NavigationError, ViewModelInstance, ViewModelType};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Scoped service resolver consumed by the adapter.
pub trait ServiceResolver {
    /// Resolve a view-model. `Ok(None)` means nothing is registered for `ty`.
    fn resolve(&self, ty: &ViewModelType) -> Result<Option<ViewModelInstance>, NavigationError>;

    /// Parameter provider of this scope.
    fn data_provider(&self) -> Option<Rc<ViewModelDataProvider>>;

    /// Create a child scope.
    fn create_scope(&self) -> Rc<dyn ServiceResolver>;
}

/// Holds the parameters of the navigation currently creating a view-model.
///
/// The adapter sets the parameters right before resolving the incoming
/// view-model, so factories can read them.
#[derive(Debug, Default)]
pub struct ViewModelDataProvider {
    parameters: RefCell<NavigationData>,
}

impl ViewModelDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current navigation parameters.
    pub fn parameters(&self) -> NavigationData {
        self.parameters.borrow().clone()
    }

    /// Replace the current navigation parameters.
    pub fn set_parameters(&self, parameters: NavigationData) {
        *self.parameters.borrow_mut() = parameters;
    }
}

/// How long a resolved view-model lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifetime {
    /// One instance per scope.
    Scoped,
    /// A new instance on every resolution.
    Transient,
}

type Factory = Rc<dyn Fn(&ViewModelDataProvider) -> Result<ViewModelInstance, NavigationError>>;

#[derive(Clone)]
struct Registration {
    lifetime: ServiceLifetime,
    factory: Factory,
}

/// Registry of view-model factories.
#[derive(Default)]
pub struct ServiceCollection {
    registrations: HashMap<ViewModelType, Registration>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view-model with an explicit lifetime.
    pub fn add<F>(mut self, ty: ViewModelType, lifetime: ServiceLifetime, factory: F) -> Self
    where
        F: Fn(&ViewModelDataProvider) -> Result<ViewModelInstance, NavigationError> + 'static,
    {
        self.registrations.insert(
            ty,
            Registration {
                lifetime,
                factory: Rc::new(factory),
            },
        );
        self
    }

    /// Register a view-model with one instance per scope.
    pub fn add_scoped<F>(self, ty: ViewModelType, factory: F) -> Self
    where
        F: Fn(&ViewModelDataProvider) -> Result<ViewModelInstance, NavigationError> + 'static,
    {
        self.add(ty, ServiceLifetime::Scoped, factory)
    }

    /// Register a view-model that is created anew on every resolution.
    pub fn add_transient<F>(self, ty: ViewModelType, factory: F) -> Self
    where
        F: Fn(&ViewModelDataProvider) -> Result<ViewModelInstance, NavigationError> + 'static,
    {
        self.add(ty, ServiceLifetime::Transient, factory)
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Freeze the registrations into the root scope.
    pub fn build(self) -> Rc<ServiceScope> {
        debug_log!("Built service root with {} registrations", self.registrations.len());
        Rc::new(ServiceScope::new(Rc::new(self.registrations), 0))
    }
}

/// A resolution scope created from a [`ServiceCollection`].
pub struct ServiceScope {
    registrations: Rc<HashMap<ViewModelType, Registration>>,
    instances: RefCell<HashMap<ViewModelType, ViewModelInstance>>,
    data_provider: Rc<ViewModelDataProvider>,
    depth: usize,
}

impl ServiceScope {
    fn new(registrations: Rc<HashMap<ViewModelType, Registration>>, depth: usize) -> Self {
        Self {
            registrations,
            instances: RefCell::new(HashMap::new()),
            data_provider: Rc::new(ViewModelDataProvider::new()),
            depth,
        }
    }

    /// Nesting depth; the root scope is `0`.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl ServiceResolver for ServiceScope {
    fn resolve(&self, ty: &ViewModelType) -> Result<Option<ViewModelInstance>, NavigationError> {
        let Some(registration) = self.registrations.get(ty) else {
            trace_log!("No view-model registered for {}", ty);
            return Ok(None);
        };

        if registration.lifetime == ServiceLifetime::Scoped {
            if let Some(existing) = self.instances.borrow().get(ty) {
                return Ok(Some(existing.clone()));
            }
        }

        let instance = (registration.factory)(&self.data_provider)?;
        trace_log!("Created {} (scope depth {})", ty, self.depth);

        if registration.lifetime == ServiceLifetime::Scoped {
            self.instances
                .borrow_mut()
                .insert(ty.clone(), instance.clone());
        }
        Ok(Some(instance))
    }

    fn data_provider(&self) -> Option<Rc<ViewModelDataProvider>> {
        Some(Rc::clone(&self.data_provider))
    }

    fn create_scope(&self) -> Rc<dyn ServiceResolver> {
        Rc::new(ServiceScope::new(
            Rc::clone(&self.registrations),
            self.depth + 1,
        ))
    }
}

impl fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceScope")
            .field("registrations", &self.registrations.len())
            .field("instances", &self.instances.borrow().len())
            .field("depth", &self.depth)
            .finish()
    }
}
