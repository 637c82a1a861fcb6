//! Test utilities for navigation adapter tests
//!
//! Provides fake hosts, dialogs and view-models that record what the adapter
//! does to them, plus a harness wiring them to an adapter on a `LocalPool`.

#![allow(dead_code)]

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{FutureExt, LocalBoxFuture};
use region_navigator::*;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Shared, ordered log of everything the fakes observed.
pub type EventLog = Rc<RefCell<Vec<String>>>;

/// Initialize test logging (safe to call from every test)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Presentations
// ============================================================================

/// Presentation driven by the test instead of a user.
#[derive(Default)]
pub struct FakePresentation {
    closer: RefCell<Option<oneshot::Sender<PresentationOutcome>>>,
    pub shows: Cell<usize>,
    pub hides: Cell<usize>,
    pub cancels: Cell<usize>,
}

impl FakePresentation {
    /// Close the presentation the way a user would, with `result`.
    pub fn dismiss(&self, result: Option<Value>) -> bool {
        self.close(PresentationOutcome::Dismissed(result))
    }

    /// Check if the presentation is still on screen.
    pub fn is_open(&self) -> bool {
        self.closer.borrow().is_some()
    }

    fn close(&self, outcome: PresentationOutcome) -> bool {
        match self.closer.borrow_mut().take() {
            Some(closer) => closer.send(outcome).is_ok(),
            None => false,
        }
    }
}

impl PresentationHandle for FakePresentation {
    fn show(&self) -> LocalBoxFuture<'static, PresentationOutcome> {
        let (closer, closed) = oneshot::channel();
        *self.closer.borrow_mut() = Some(closer);
        self.shows.set(self.shows.get() + 1);
        closed
            .map(|outcome| outcome.unwrap_or(PresentationOutcome::Cancelled))
            .boxed_local()
    }

    fn hide(&self) {
        self.hides.set(self.hides.get() + 1);
        self.close(PresentationOutcome::Dismissed(None));
    }

    fn cancel(&self) {
        self.cancels.set(self.cancels.get() + 1);
        self.close(PresentationOutcome::Cancelled);
    }
}

/// Content dialog that remembers its data context and navigation service.
#[derive(Default)]
pub struct FakeContentDialog {
    pub presentation: FakePresentation,
    pub data_context: RefCell<Option<ViewModelInstance>>,
    pub navigation: RefCell<Option<Weak<dyn NavigationService>>>,
}

impl PresentationHandle for FakeContentDialog {
    fn show(&self) -> LocalBoxFuture<'static, PresentationOutcome> {
        self.presentation.show()
    }

    fn hide(&self) {
        self.presentation.hide();
    }

    fn cancel(&self) {
        self.presentation.cancel();
    }
}

impl NavigationAware for FakeContentDialog {
    fn set_navigation(&self, navigation: Weak<dyn NavigationService>) {
        *self.navigation.borrow_mut() = Some(navigation);
    }
}

impl ContentDialog for FakeContentDialog {
    fn set_data_context(&self, view_model: ViewModelInstance) {
        *self.data_context.borrow_mut() = Some(view_model);
    }

    fn navigation_aware(&self) -> Option<&dyn NavigationAware> {
        Some(self)
    }
}

// ============================================================================
// Host
// ============================================================================

/// Host recording view transitions and handing out fake message dialogs.
pub struct RecordingHost {
    log: EventLog,
    pub message_dialogs: RefCell<Vec<(MessageDialog, Rc<FakePresentation>)>>,
}

impl RecordingHost {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            message_dialogs: RefCell::new(Vec::new()),
        }
    }

    /// Most recently created message dialog.
    pub fn last_message_dialog(&self) -> Option<(MessageDialog, Rc<FakePresentation>)> {
        self.message_dialogs.borrow().last().cloned()
    }
}

impl RegionHost for RecordingHost {
    fn show_view(&self, context: &NavigationContext, view_model: Option<&ViewModelInstance>) {
        let bound = if view_model.is_some() { "+vm" } else { "" };
        self.log
            .borrow_mut()
            .push(format!("show:{}{}", context.path(), bound));
    }

    fn go_back(&self, _context: &NavigationContext) {
        self.log.borrow_mut().push("go_back".to_string());
    }

    fn show_message_dialog(&self, dialog: MessageDialog) -> Rc<dyn PresentationHandle> {
        self.log
            .borrow_mut()
            .push(format!("message:{}", dialog.content));
        let presentation = Rc::new(FakePresentation::default());
        self.message_dialogs
            .borrow_mut()
            .push((dialog, presentation.clone()));
        presentation
    }
}

// ============================================================================
// View-models
// ============================================================================

/// View-model declaring all three lifecycle capabilities.
pub struct RecordingViewModel {
    name: String,
    log: EventLog,
    /// Cancel the incoming navigation from the stop hook.
    pub veto: Cell<bool>,
    /// Fail the initialize hook.
    pub fail_initialize: Cell<bool>,
}

impl RecordingViewModel {
    pub fn new(name: &str, log: EventLog) -> Self {
        Self {
            name: name.to_string(),
            log,
            veto: Cell::new(false),
            fail_initialize: Cell::new(false),
        }
    }

    fn record(&self, event: String) {
        self.log.borrow_mut().push(event);
    }
}

#[async_trait(?Send)]
impl Initialize for RecordingViewModel {
    async fn initialize(&self, _context: &NavigationContext) -> Result<(), NavigationError> {
        self.record(format!("init:{}", self.name));
        if self.fail_initialize.get() {
            return Err(NavigationError::custom(format!("{} failed to load", self.name)));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl NavigationStart for RecordingViewModel {
    async fn start(
        &self,
        _context: &NavigationContext,
        is_forward: bool,
    ) -> Result<(), NavigationError> {
        let direction = if is_forward { "forward" } else { "back" };
        self.record(format!("start:{}:{}", self.name, direction));
        Ok(())
    }
}

#[async_trait(?Send)]
impl NavigationStop for RecordingViewModel {
    async fn stop(&self, context: &NavigationContext, _is_back: bool) -> Result<(), NavigationError> {
        self.record(format!("stop:{}", self.name));
        if self.veto.get() {
            context.cancel();
        }
        Ok(())
    }
}

// ============================================================================
// Navigation service
// ============================================================================

/// Navigation service recording every request before forwarding it.
pub struct RecordingNavigation {
    inner: Rc<RegionNavigator>,
    pub requests: RefCell<Vec<NavigationRequest>>,
}

impl RecordingNavigation {
    /// Back-navigation requests received so far.
    pub fn back_requests(&self) -> Vec<NavigationRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.route.path == PREVIOUS_VIEW_PATH)
            .cloned()
            .collect()
    }
}

impl NavigationService for RecordingNavigation {
    fn navigate(&self, request: NavigationRequest) -> NavigationResponse {
        self.requests.borrow_mut().push(request.clone());
        self.inner.navigate(request)
    }
}

// ============================================================================
// Harness
// ============================================================================

/// An adapter with fakes for every collaborator.
///
/// Paths `/a`, `/b` and `/c` are pages backed by scoped
/// [`RecordingViewModel`]s named `a`, `b` and `c`; `/plain` is a page with
/// no view-model; `/picker` is a content dialog backed by view-model
/// `picker`.
pub struct Harness {
    pub pool: LocalPool,
    pub log: EventLog,
    pub host: Rc<RecordingHost>,
    pub adapter: NavigationAdapter,
    pub navigator: Rc<RegionNavigator>,
    pub recorder: Rc<RecordingNavigation>,
    pub view_models: Rc<RefCell<Vec<Rc<RecordingViewModel>>>>,
    pub dialogs: Rc<RefCell<Vec<Rc<FakeContentDialog>>>>,
}

impl Harness {
    pub fn new() -> Self {
        init_logging();

        let log: EventLog = Rc::default();
        let view_models: Rc<RefCell<Vec<Rc<RecordingViewModel>>>> = Rc::default();
        let dialogs: Rc<RefCell<Vec<Rc<FakeContentDialog>>>> = Rc::default();

        let mut services = ServiceCollection::new();
        for name in ["a", "b", "c", "picker"] {
            let log = log.clone();
            let created = view_models.clone();
            services = services.add_scoped(ViewModelType::named(name), move |_| {
                let vm = Rc::new(RecordingViewModel::new(name, log.clone()));
                created.borrow_mut().push(vm.clone());
                Ok(ViewModelInstance::builder(vm)
                    .initialize()
                    .start()
                    .stop()
                    .build())
            });
        }

        let factory_dialogs = dialogs.clone();
        let mapping = NavigationMappingTable::new()
            .map("a", Some(ViewType::page("A")), Some(ViewModelType::named("a")))
            .map("b", Some(ViewType::page("B")), Some(ViewModelType::named("b")))
            .map("c", Some(ViewType::page("C")), Some(ViewModelType::named("c")))
            .map("plain", Some(ViewType::page("Plain")), None)
            .map(
                "picker",
                Some(ViewType::content_dialog("Picker", move || {
                    let dialog = Rc::new(FakeContentDialog::default());
                    factory_dialogs.borrow_mut().push(dialog.clone());
                    dialog as Rc<dyn ContentDialog>
                })),
                Some(ViewModelType::named("picker")),
            );

        let pool = LocalPool::new();
        let host = Rc::new(RecordingHost::new(log.clone()));
        let adapter = NavigationAdapter::builder()
            .name("test")
            .mapping(mapping)
            .services(services.build())
            .host(host.clone())
            .dispatcher(pool.spawner())
            .build()
            .expect("adapter configuration");

        let navigator = RegionNavigator::new(adapter.clone());
        let recorder = Rc::new(RecordingNavigation {
            inner: navigator.clone(),
            requests: RefCell::new(Vec::new()),
        });
        let service = Rc::downgrade(&recorder) as Weak<dyn NavigationService>;
        adapter.set_navigation(service);

        Self {
            pool,
            log,
            host,
            adapter,
            navigator,
            recorder,
            view_models,
            dialogs,
        }
    }

    /// Navigate forward to `path` through the recording service.
    pub fn go(&mut self, path: &str) -> NavigationResponse {
        let response = self.recorder.navigate(NavigationRequest::new(
            Sender::named("test"),
            NavigationRoute::new(path),
        ));
        self.run();
        response
    }

    /// Navigate back through the recording service.
    pub fn back(&mut self) -> NavigationResponse {
        let response = self.recorder.navigate_to_previous_view(Sender::named("test"));
        self.run();
        response
    }

    /// Run every task that can make progress.
    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Events recorded so far, draining the log.
    pub fn take_events(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// The view-model instance created for `name`.
    pub fn view_model(&self, name: &str) -> Option<Rc<RecordingViewModel>> {
        self.view_models
            .borrow()
            .iter()
            .find(|vm| vm.name == name)
            .cloned()
    }

    /// Outcome of a finished navigation.
    pub fn outcome(&mut self, response: &NavigationResponse) -> NavigationOutcome {
        self.pool.run_until(response.task.clone())
    }

    /// Result of a navigation, if already resolved.
    pub fn result(
        &self,
        response: &NavigationResponse,
    ) -> Option<Result<Option<Value>, NavigationError>> {
        response.result.clone().now_or_never()
    }
}
