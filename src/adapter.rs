//! The navigation adapter of a region.
//!
//! [`NavigationAdapter`] owns a region's logical back-stack and the registry
//! of open dialogs, and sequences every navigation through one pipeline:
//!
//! 1. **End the current context**: stop the outgoing view-model (which may
//!    veto by cancelling the incoming context). For a back-navigation, pop
//!    the stack, close the dialog the popped entry stood for and resolve the
//!    popped entry's result with the response payload.
//! 2. **Cancellation check**: a cancelled navigation stops here.
//! 3. **Transition**. Forward: look up the mapping, push the entry,
//!    initialize the view-model, then show a message dialog, a content
//!    dialog or an ordinary view, and start the view-model. Back: let the
//!    host go back (unless a dialog dismissal already handled it) and
//!    restart the revealed view-model.
//! 4. **Cancellation wiring**: for cancellable navigations, a later
//!    cancellation turns into a back-navigation from the original sender.
//!
//! Navigations on one adapter must be serialized: the pipeline mutates the
//! stack in place and suspends at every lifecycle hook. Each pipeline runs as
//! a task on the adapter's [`Dispatcher`]; `navigate` itself never blocks.
//!
//! # Example
//!
//! ```
//! use futures::executor::LocalPool;
//! use region_navigator::*;
//! use std::rc::Rc;
//!
//! struct Host;
//!
//! impl RegionHost for Host {
//!     fn show_view(&self, _: &NavigationContext, _: Option<&ViewModelInstance>) {}
//!     fn go_back(&self, _: &NavigationContext) {}
//!     fn show_message_dialog(&self, _: MessageDialog) -> Rc<dyn PresentationHandle> {
//!         unimplemented!()
//!     }
//! }
//!
//! let mut pool = LocalPool::new();
//! let adapter = NavigationAdapter::builder()
//!     .name("main")
//!     .mapping(NavigationMappingTable::new().map("home", Some(ViewType::page("Home")), None))
//!     .services(ServiceCollection::new().build())
//!     .host(Rc::new(Host))
//!     .dispatcher(pool.spawner())
//!     .build()
//!     .unwrap();
//! let navigator = RegionNavigator::new(adapter.clone());
//!
//! let response = navigator.navigate(NavigationRequest::new(
//!     Sender::named("shell"),
//!     NavigationRoute::new("home"),
//! ));
//! pool.run_until_stalled();
//!
//! assert_eq!(pool.run_until(response.task), Ok(()));
//! assert_eq!(adapter.current_path().as_deref(), Some("/home"));
//! ```

use crate::completion::navigation_task;
use crate::dialog::{ContentDialogResult, MessageDialog, PresentationOutcome};
use crate::presentation::{OpenPresentation, OpenPresentationRegistry, PresentationId};
use crate::{
    debug_log, error_log, info_log, trace_log, warn_log, Dispatcher, MappingResolver,
    NavigationContext, NavigationContextStack, NavigationError, NavigationOutcome,
    NavigationRequest, NavigationResponse, NavigationRoute, NavigationService, RegionHost, Sender,
    ServiceResolver, ViewModelInstance,
};
use futures::future::{self, Either, FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

struct AdapterInner {
    name: String,
    mapping: Rc<dyn MappingResolver>,
    services: Rc<dyn ServiceResolver>,
    host: Rc<dyn RegionHost>,
    dispatcher: Rc<dyn Dispatcher>,
    navigation: RefCell<Option<Weak<dyn NavigationService>>>,
    contexts: RefCell<NavigationContextStack>,
    open_presentations: RefCell<OpenPresentationRegistry>,
}

/// Navigation orchestrator for one region.
///
/// Cheap to clone; clones share the same stack and registry.
#[derive(Clone)]
pub struct NavigationAdapter {
    inner: Rc<AdapterInner>,
}

impl NavigationAdapter {
    /// Start configuring an adapter.
    pub fn builder() -> NavigationAdapterBuilder {
        NavigationAdapterBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The adapter's own service scope, shared by every context it runs.
    pub fn services(&self) -> Rc<dyn ServiceResolver> {
        Rc::clone(&self.inner.services)
    }

    /// Bind the navigation service used for synthesized navigations
    /// (dialog dismissals, cancellation-driven back-navigation).
    pub fn set_navigation(&self, navigation: Weak<dyn NavigationService>) {
        *self.inner.navigation.borrow_mut() = Some(navigation);
    }

    fn navigation(&self) -> Option<Weak<dyn NavigationService>> {
        self.inner.navigation.borrow().clone()
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of entries on the back-stack.
    pub fn depth(&self) -> usize {
        self.inner.contexts.borrow().len()
    }

    /// Path of the entry currently shown.
    pub fn current_path(&self) -> Option<String> {
        self.inner
            .contexts
            .borrow()
            .current_path()
            .map(str::to_string)
    }

    /// Paths on the back-stack, bottom first.
    pub fn stack_paths(&self) -> Vec<String> {
        self.inner.contexts.borrow().paths()
    }

    /// Context of the entry currently shown.
    pub fn current_context(&self) -> Option<NavigationContext> {
        self.peek_context()
    }

    /// Dialogs currently open, oldest first.
    pub fn open_presentations(&self) -> Vec<OpenPresentation> {
        self.inner.open_presentations.borrow().iter().cloned().collect()
    }

    // ========================================================================
    // Navigation pipeline
    // ========================================================================

    /// Submit a navigation.
    ///
    /// Returns immediately; the pipeline runs on the dispatcher. If the
    /// pipeline fails or is cancelled, the context's result is cancelled too
    /// so callers awaiting it are released.
    pub fn navigate(&self, context: NavigationContext) -> NavigationResponse {
        info_log!(
            "[{}] Navigation {:?} → '{}'",
            self.inner.name,
            context.request().sender,
            context.path()
        );

        let (done, task) = navigation_task();
        let response = NavigationResponse {
            request: context.request().clone(),
            task,
            cancellation: context.cancellation_token().clone(),
            result: context.result_completion().task(),
        };

        let adapter = self.clone();
        let completion = context.result_completion().clone();
        let pipeline_completion = completion.clone();
        let scheduled = self.inner.dispatcher.dispatch(
            async move {
                let outcome = adapter.internal_navigate(context).await;
                if let Err(err) = &outcome {
                    if err.is_cancelled() {
                        debug_log!("[{}] Navigation cancelled", adapter.inner.name);
                    } else {
                        error_log!("[{}] Navigation failed: {}", adapter.inner.name, err);
                    }
                    pipeline_completion.cancel();
                }
                let _ = done.send(outcome);
            }
            .boxed_local(),
        );
        if !scheduled {
            warn_log!(
                "[{}] Navigation to '{}' was not scheduled",
                self.inner.name,
                response.request.route.path
            );
            completion.cancel();
        }
        response
    }

    async fn internal_navigate(&self, context: NavigationContext) -> NavigationOutcome {
        let frame_navigation_required = self.end_current_navigation_context(&context).await?;

        if context.is_cancelled() {
            return Err(NavigationError::Cancelled);
        }

        let context = self
            .adapter_navigate(context, frame_navigation_required)
            .await?;

        // Only forward navigations leave an entry a cancellation can undo
        if context.can_cancel() && !context.is_back() {
            self.register_cancellation(&context);
        }

        debug_log!(
            "[{}] Navigation complete: '{}' (stack depth: {})",
            self.inner.name,
            context.path(),
            self.depth()
        );
        Ok(())
    }

    /// Concrete transition for `context`.
    async fn adapter_navigate(
        &self,
        context: NavigationContext,
        frame_navigation_required: bool,
    ) -> Result<NavigationContext, NavigationError> {
        if context.is_back() {
            if frame_navigation_required {
                trace_log!("[{}] Host going back", self.inner.name);
                self.inner.host.go_back(&context);
                self.start_current_view_model(&context).await?;
            }
            return Ok(context);
        }

        let host = Rc::clone(&self.inner.host);
        self.do_forward_navigation(context, move |ctx, view_model| {
            host.show_view(ctx, view_model);
        })
        .await
    }

    /// Forward transition to `context`.
    ///
    /// Attaches the mapping, pushes the entry, initializes the view-model and
    /// presents the target: message dialogs and content dialogs are shown by
    /// the adapter, ordinary views are handed to `show_view`. The
    /// view-model's start hook runs last. Returns the mapping-enriched
    /// context.
    pub async fn do_forward_navigation<F>(
        &self,
        context: NavigationContext,
        show_view: F,
    ) -> Result<NavigationContext, NavigationError>
    where
        F: FnOnce(&NavigationContext, Option<&ViewModelInstance>),
    {
        let mapping = self.inner.mapping.lookup_by_path(context.path());
        let context = match mapping {
            Some(mapping) => context.with_mapping(mapping),
            None => {
                trace_log!("[{}] No mapping for '{}'", self.inner.name, context.path());
                context
            }
        };

        let message_dialog = if context.is_message_dialog() {
            Some(MessageDialog::from_data(context.data())?)
        } else {
            None
        };

        // Pushed before the view-model exists so it sees itself on top
        self.inner
            .contexts
            .borrow_mut()
            .push(context.path(), context.clone());
        debug_log!(
            "[{}] Pushed '{}' (depth {})",
            self.inner.name,
            context.path(),
            self.depth()
        );

        let view_model = match self.initialize_view_model().await {
            Ok(view_model) => view_model,
            Err(err) => {
                // Never presented, so it must not be popped by a later back
                self.discard_top(&context);
                return Err(err);
            }
        };

        if let Some(dialog) = message_dialog {
            let handle = self.inner.host.show_message_dialog(dialog);
            let id = self
                .inner
                .open_presentations
                .borrow_mut()
                .register(OpenPresentation::MessageDialog(Rc::clone(&handle)));
            debug_log!("[{}] Message dialog opened", self.inner.name);
            self.watch_dismissal(id, handle.show(), Sender::MessageDialog, &context);
        } else if let Some((view, factory)) = context
            .mapping()
            .and_then(|m| m.view.as_ref())
            .and_then(|v| v.dialog_factory().map(|f| (v.name().to_string(), Rc::clone(f))))
        {
            let dialog = factory();
            if let Some(view_model) = &view_model {
                dialog.set_data_context(view_model.clone());
            }
            if let Some(aware) = dialog.navigation_aware() {
                match self.navigation() {
                    Some(navigation) => aware.set_navigation(navigation),
                    None => {
                        warn_log!(
                            "[{}] No navigation service to inject into '{}'",
                            self.inner.name,
                            view
                        );
                    }
                }
            }
            let id = self
                .inner
                .open_presentations
                .borrow_mut()
                .register(OpenPresentation::ContentDialog {
                    view: view.clone(),
                    dialog: Rc::clone(&dialog),
                });
            debug_log!("[{}] Content dialog '{}' opened", self.inner.name, view);
            self.watch_dismissal(id, dialog.show(), Sender::ContentDialog(view), &context);
        } else {
            show_view(&context, view_model.as_ref());
        }

        if let Some(view_model) = &view_model {
            view_model.start(&context, true).await?;
        }
        Ok(context)
    }

    /// Close out the entry currently shown before `context` proceeds.
    ///
    /// Returns whether a concrete view transition is still required.
    async fn end_current_navigation_context(
        &self,
        context: &NavigationContext,
    ) -> Result<bool, NavigationError> {
        if self.inner.contexts.borrow().is_empty() {
            if context.is_back() {
                warn_log!("[{}] Nothing to navigate back to", self.inner.name);
                return Ok(false);
            }
            return Ok(true);
        }

        // Stopping may veto, so it runs before anything leaves the stack
        self.stop_current_view_model(context).await?;
        if context.is_cancelled() {
            debug_log!(
                "[{}] Navigation to '{}' vetoed by outgoing view-model",
                self.inner.name,
                context.path()
            );
            return Ok(false);
        }

        if !context.is_back() {
            return Ok(true);
        }

        let response = context.data().response();
        let popped = self.inner.contexts.borrow_mut().pop();
        let Some((path, previous)) = popped else {
            return Ok(false);
        };
        previous.retire();
        debug_log!(
            "[{}] Popped '{}' (depth {})",
            self.inner.name,
            path,
            self.depth()
        );

        let mut frame_navigation_required = true;

        if previous.is_message_dialog() {
            frame_navigation_required = false;
            let handle = self
                .inner
                .open_presentations
                .borrow_mut()
                .take_last_message_dialog();
            if let Some(handle) = handle {
                debug_log!("[{}] Cancelling open message dialog", self.inner.name);
                handle.cancel();
            }
        }

        if let Some(view) = previous
            .mapping()
            .and_then(|m| m.view.as_ref())
            .filter(|v| v.is_dialog())
        {
            frame_navigation_required = false;
            let dialog = self
                .inner
                .open_presentations
                .borrow_mut()
                .take_last_content_dialog(view.name());
            if let Some(dialog) = dialog {
                // A dialog result as response means the dialog is already closing itself
                let self_dismissed = response
                    .as_ref()
                    .is_some_and(|r| r.is::<ContentDialogResult>());
                if !self_dismissed {
                    debug_log!("[{}] Hiding content dialog '{}'", self.inner.name, view.name());
                    dialog.hide();
                }
            }
        }

        if let Some(expected) = previous.request().route.result {
            if response.as_ref().is_some_and(|r| !expected.matches(r)) {
                trace_log!(
                    "[{}] Response for '{}' is not a {}",
                    self.inner.name,
                    path,
                    expected.name()
                );
            }
            previous.result_completion().complete(response);
        }

        Ok(frame_navigation_required)
    }

    /// Run the stop hook of the outgoing view-model, handing it the
    /// incoming `context`.
    async fn stop_current_view_model(
        &self,
        context: &NavigationContext,
    ) -> Result<Option<ViewModelInstance>, NavigationError> {
        let Some(current) = self.peek_context() else {
            return Ok(None);
        };
        let Some(view_model) = self.resolve_view_model(&current)? else {
            return Ok(None);
        };
        view_model.stop(context, false).await?;
        Ok(Some(view_model))
    }

    /// Resolve and initialize the view-model of the entry on top of the stack.
    async fn initialize_view_model(&self) -> Result<Option<ViewModelInstance>, NavigationError> {
        let Some(current) = self.peek_context() else {
            return Ok(None);
        };
        let Some(ty) = current.mapping().and_then(|m| m.view_model.clone()) else {
            return Ok(None);
        };

        let services = Rc::clone(current.services());
        if let Some(provider) = services.data_provider() {
            provider.set_parameters(current.data().clone());
        }

        match services.resolve(&ty)? {
            Some(view_model) => {
                view_model.initialize(&current).await?;
                Ok(Some(view_model))
            }
            None => {
                trace_log!("[{}] View-model {} is not registered", self.inner.name, ty);
                Ok(None)
            }
        }
    }

    /// Pop the top entry if it belongs to `context`.
    fn discard_top(&self, context: &NavigationContext) {
        let mut contexts = self.inner.contexts.borrow_mut();
        let owned = contexts
            .peek()
            .is_some_and(|(_, top)| top.same_navigation(context));
        if owned {
            if let Some((path, discarded)) = contexts.pop() {
                discarded.retire();
                debug_log!(
                    "[{}] Discarded '{}' (depth {})",
                    self.inner.name,
                    path,
                    contexts.len()
                );
            }
        }
    }

    /// Restart the view-model revealed by a back-navigation.
    async fn start_current_view_model(&self, context: &NavigationContext) -> NavigationOutcome {
        let Some(current) = self.peek_context() else {
            return Ok(());
        };
        if let Some(view_model) = self.resolve_view_model(&current)? {
            view_model.start(context, false).await?;
        }
        Ok(())
    }

    fn resolve_view_model(
        &self,
        context: &NavigationContext,
    ) -> Result<Option<ViewModelInstance>, NavigationError> {
        match context.mapping().and_then(|m| m.view_model.as_ref()) {
            Some(ty) => context.services().resolve(ty),
            None => Ok(None),
        }
    }

    fn peek_context(&self) -> Option<NavigationContext> {
        self.inner
            .contexts
            .borrow()
            .peek()
            .map(|(_, context)| context.clone())
    }

    // ========================================================================
    // Synthesized navigations
    // ========================================================================

    /// Navigate back once the presentation `id` is dismissed by the user.
    fn watch_dismissal(
        &self,
        id: PresentationId,
        dismissed: LocalBoxFuture<'static, PresentationOutcome>,
        sender: Sender,
        context: &NavigationContext,
    ) {
        let adapter = Rc::downgrade(&self.inner);
        let completion = context.result_completion().clone();
        let scheduled = self.inner.dispatcher.dispatch(
            async move {
                let outcome = dismissed.await;
                let Some(inner) = adapter.upgrade() else {
                    return;
                };
                let adapter = NavigationAdapter { inner };

                let PresentationOutcome::Dismissed(result) = outcome else {
                    trace_log!("[{}] Presentation cancelled", adapter.inner.name);
                    return;
                };
                if !completion.is_pending() {
                    trace_log!("[{}] Presentation result already settled", adapter.inner.name);
                    return;
                }
                if !adapter.inner.open_presentations.borrow().contains(id) {
                    trace_log!("[{}] Presentation already closed", adapter.inner.name);
                    return;
                }

                debug_log!(
                    "[{}] Presentation dismissed by {:?}, navigating back",
                    adapter.inner.name,
                    sender
                );
                adapter.request_navigation(NavigationRequest::new(
                    sender,
                    NavigationRoute::back_with(result),
                ));
            }
            .boxed_local(),
        );
        if !scheduled {
            warn_log!("[{}] Dismissal of presentation not observed", self.inner.name);
        }
    }

    /// Turn a later cancellation of `context` into a back-navigation.
    ///
    /// The watcher retires with the context's entry: once a back-navigation
    /// has popped it, cancelling the token does nothing.
    fn register_cancellation(&self, context: &NavigationContext) {
        let adapter = Rc::downgrade(&self.inner);
        let token = context.cancellation_token().clone();
        let retirement = context.retirement_token().clone();
        let watched = context.clone();
        let scheduled = self.inner.dispatcher.dispatch(
            async move {
                let cancelled = token.cancelled();
                let retired = retirement.cancelled();
                futures::pin_mut!(cancelled, retired);
                if let Either::Right(_) = future::select(cancelled, retired).await {
                    trace_log!("'{}' left the stack, cancellation watch ended", watched.path());
                    return;
                }
                if watched.is_retired() {
                    return;
                }
                let Some(inner) = adapter.upgrade() else {
                    return;
                };
                let adapter = NavigationAdapter { inner };

                let on_top = adapter
                    .peek_context()
                    .is_some_and(|top| top.same_navigation(&watched));
                if !on_top {
                    debug_log!(
                        "[{}] '{}' cancelled but no longer shown, not navigating back",
                        adapter.inner.name,
                        watched.path()
                    );
                    return;
                }

                debug_log!(
                    "[{}] '{}' cancelled, navigating back",
                    adapter.inner.name,
                    watched.path()
                );
                watched.result_completion().cancel();
                adapter.request_navigation(NavigationRequest::back(
                    watched.request().sender.clone(),
                ));
            }
            .boxed_local(),
        );
        if !scheduled {
            warn_log!(
                "[{}] Cancellation of '{}' will not navigate back",
                self.inner.name,
                context.path()
            );
        }
    }

    fn request_navigation(&self, request: NavigationRequest) {
        match self.navigation().and_then(|weak| weak.upgrade()) {
            Some(navigation) => {
                navigation.navigate(request);
            }
            None => {
                warn_log!(
                    "[{}] No navigation service bound; dropping request to '{}'",
                    self.inner.name,
                    request.route.path
                );
            }
        }
    }
}

impl fmt::Debug for NavigationAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationAdapter")
            .field("name", &self.inner.name)
            .field("stack", &self.stack_paths())
            .field("open_presentations", &self.inner.open_presentations.borrow().len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Configuration of a [`NavigationAdapter`].
#[derive(Default)]
pub struct NavigationAdapterBuilder {
    name: Option<String>,
    mapping: Option<Rc<dyn MappingResolver>>,
    services: Option<Rc<dyn ServiceResolver>>,
    host: Option<Rc<dyn RegionHost>>,
    dispatcher: Option<Rc<dyn Dispatcher>>,
}

impl NavigationAdapterBuilder {
    /// Region name, used in diagnostics. Defaults to `"default"`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mapping(mut self, mapping: impl MappingResolver + 'static) -> Self {
        self.mapping = Some(Rc::new(mapping));
        self
    }

    /// Application-wide resolver; the adapter creates its own child scope.
    pub fn services(mut self, services: Rc<dyn ServiceResolver>) -> Self {
        self.services = Some(services);
        self
    }

    pub fn host(mut self, host: Rc<dyn RegionHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn dispatcher(mut self, dispatcher: impl Dispatcher + 'static) -> Self {
        self.dispatcher = Some(Rc::new(dispatcher));
        self
    }

    pub fn build(self) -> Result<NavigationAdapter, NavigationError> {
        let missing = |what: &str| NavigationError::Configuration {
            message: format!("no {} configured", what),
        };
        let mapping = self.mapping.ok_or_else(|| missing("mapping"))?;
        let services = self.services.ok_or_else(|| missing("service resolver"))?;
        let host = self.host.ok_or_else(|| missing("region host"))?;
        let dispatcher = self.dispatcher.ok_or_else(|| missing("dispatcher"))?;
        let name = self.name.unwrap_or_else(|| "default".to_string());

        info_log!("Created navigation adapter '{}'", name);
        Ok(NavigationAdapter {
            inner: Rc::new(AdapterInner {
                name,
                mapping,
                services: services.create_scope(),
                host,
                dispatcher,
                navigation: RefCell::new(None),
                contexts: RefCell::new(NavigationContextStack::new()),
                open_presentations: RefCell::new(OpenPresentationRegistry::new()),
            }),
        })
    }
}
