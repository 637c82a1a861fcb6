//! Integration tests for message dialogs and content dialogs

mod common;

use common::*;
use region_navigator::*;

fn yes_no() -> MessageDialog {
    MessageDialog::new("Hi", "T")
        .command(UiCommand::new("Yes").with_id("yes"))
        .command(UiCommand::new("No").with_id("no"))
        .default_command(0)
}

fn show(h: &mut Harness, dialog: MessageDialog) -> NavigationResponse {
    let response = h
        .recorder
        .navigate(NavigationRequest::new(Sender::named("test"), dialog.into_route()));
    h.run();
    response
}

#[test]
fn test_message_dialog_is_shown_from_parameters() {
    let mut h = Harness::new();
    h.go("a");
    h.take_events();

    let response = show(&mut h, yes_no());
    assert_eq!(h.outcome(&response), Ok(()));
    assert_eq!(h.take_events(), vec!["stop:a", "message:Hi"]);

    let (dialog, presentation) = h.host.last_message_dialog().unwrap();
    assert_eq!(dialog.title, "T");
    assert_eq!(dialog.commands.len(), 2);
    assert_eq!(dialog.default_command_index, Some(0));
    assert_eq!(presentation.shows.get(), 1);

    assert_eq!(h.adapter.depth(), 2);
    let open = h.adapter.open_presentations();
    assert_eq!(open.len(), 1);
    assert!(open[0].is_message_dialog());
}

#[test]
fn test_dismissed_message_dialog_navigates_back_with_command() {
    let mut h = Harness::new();
    h.go("a");
    let response = show(&mut h, yes_no());
    let (dialog, presentation) = h.host.last_message_dialog().unwrap();
    h.take_events();

    assert!(presentation.dismiss(Some(value(dialog.commands[0].clone()))));
    h.run();

    let backs = h.recorder.back_requests();
    assert_eq!(backs.len(), 1);
    assert_eq!(backs[0].sender, Sender::MessageDialog);
    let carried = backs[0].route.data.response().unwrap();
    assert_eq!(carried.downcast_ref::<UiCommand>().unwrap().label, "Yes");

    let result = h.result(&response).unwrap().unwrap().unwrap();
    assert_eq!(result.downcast_ref::<UiCommand>().unwrap().id.as_deref(), Some("yes"));

    // The dialog closed itself, so the page underneath is not navigated
    assert!(h.take_events().is_empty());
    assert!(h.adapter.open_presentations().is_empty());
    assert_eq!(h.adapter.stack_paths(), vec!["/a"]);
}

#[test]
fn test_message_dialog_result_resolves_once() {
    let mut h = Harness::new();
    h.go("a");
    let response = show(&mut h, yes_no());
    let (dialog, presentation) = h.host.last_message_dialog().unwrap();

    presentation.dismiss(Some(value(dialog.commands[1].clone())));
    h.run();
    // A late back-navigation must not touch the already resolved result
    h.back();

    let result = h.result(&response).unwrap().unwrap().unwrap();
    assert_eq!(result.downcast_ref::<UiCommand>().unwrap().label, "No");
    assert_eq!(h.recorder.back_requests().len(), 2);
    assert_eq!(h.adapter.depth(), 0);
}

#[test]
fn test_back_navigation_cancels_open_message_dialog() {
    let mut h = Harness::new();
    h.go("a");
    let response = show(&mut h, yes_no());
    let (_, presentation) = h.host.last_message_dialog().unwrap();
    h.take_events();

    h.back();

    assert_eq!(presentation.cancels.get(), 1);
    assert!(!presentation.is_open());
    assert!(matches!(h.result(&response), Some(Ok(None))));
    // The cancelled dialog does not synthesize a second back-navigation
    assert_eq!(h.recorder.back_requests().len(), 1);
    assert!(h.take_events().is_empty());
    assert_eq!(h.adapter.stack_paths(), vec!["/a"]);
    assert!(h.adapter.open_presentations().is_empty());
}

#[test]
fn test_malformed_message_dialog_leaves_stack_untouched() {
    let mut h = Harness::new();
    h.go("a");
    h.take_events();

    let route = NavigationRoute::new(MESSAGE_DIALOG_PATH)
        .with_data(NavigationData::new().with(MESSAGE_DIALOG_PARAMETER_TITLE, 5_u32));
    let response = h
        .recorder
        .navigate(NavigationRequest::new(Sender::named("test"), route));
    h.run();

    assert!(matches!(
        h.outcome(&response),
        Err(NavigationError::InvalidParams { .. })
    ));
    assert!(matches!(h.result(&response), Some(Err(NavigationError::Cancelled))));
    assert!(h.host.last_message_dialog().is_none());
    assert_eq!(h.adapter.stack_paths(), vec!["/a"]);
}

#[test]
fn test_content_dialog_is_created_and_bound() {
    let mut h = Harness::new();
    h.go("a");
    h.take_events();

    let response = h.go("picker");
    assert_eq!(h.outcome(&response), Ok(()));
    assert_eq!(
        h.take_events(),
        vec!["stop:a", "init:picker", "start:picker:forward"]
    );

    let dialog = h.dialogs.borrow()[0].clone();
    assert_eq!(dialog.presentation.shows.get(), 1);
    let bound = dialog.data_context.borrow().clone().unwrap();
    assert!(bound.downcast::<RecordingViewModel>().is_some());
    assert!(dialog
        .navigation
        .borrow()
        .as_ref()
        .and_then(|n| n.upgrade())
        .is_some());

    let open = h.adapter.open_presentations();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].view(), Some("Picker"));
}

#[test]
fn test_self_dismissed_content_dialog_is_not_hidden_again() {
    let mut h = Harness::new();
    h.go("a");
    let response = h.recorder.navigate(NavigationRequest::new(
        Sender::named("test"),
        NavigationRoute::new("picker").expecting::<ContentDialogResult>(),
    ));
    h.run();
    let dialog = h.dialogs.borrow()[0].clone();
    h.take_events();

    dialog
        .presentation
        .dismiss(Some(value(ContentDialogResult::Primary)));
    h.run();

    assert_eq!(dialog.presentation.hides.get(), 0);
    let backs = h.recorder.back_requests();
    assert_eq!(backs.len(), 1);
    assert_eq!(backs[0].sender, Sender::ContentDialog("Picker".into()));

    let result = h.result(&response).unwrap().unwrap().unwrap();
    assert_eq!(
        result.downcast_ref::<ContentDialogResult>(),
        Some(&ContentDialogResult::Primary)
    );
    assert_eq!(h.take_events(), vec!["stop:picker"]);
    assert_eq!(h.adapter.stack_paths(), vec!["/a"]);
    assert!(h.adapter.open_presentations().is_empty());
}

#[test]
fn test_back_navigation_hides_content_dialog_once() {
    let mut h = Harness::new();
    h.go("a");
    h.go("picker");
    let dialog = h.dialogs.borrow()[0].clone();
    h.take_events();

    h.back();

    assert_eq!(dialog.presentation.hides.get(), 1);
    // Hiding resolves the dialog, but it is no longer registered
    assert_eq!(h.recorder.back_requests().len(), 1);
    assert_eq!(h.take_events(), vec!["stop:picker"]);
    assert_eq!(h.adapter.stack_paths(), vec!["/a"]);
}

#[test]
fn test_each_content_dialog_navigation_creates_a_new_dialog() {
    let mut h = Harness::new();
    h.go("a");
    h.go("picker");
    h.back();
    h.go("picker");

    assert_eq!(h.dialogs.borrow().len(), 2);
    assert_eq!(h.adapter.open_presentations().len(), 1);
}
