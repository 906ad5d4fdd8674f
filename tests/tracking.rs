//! Driving the tracker through a fake X server
use simple_test_case::test_case;
use std::time::Duration;
use tyle::{
    core::ClientRegistry,
    geometry::Rect,
    x::{
        event::{ConfigureEvent, FocusEvent, NotifyMode, PropertyEvent},
        property::{ButtonMask, Desktop, StateAction, WmState},
        Atom, EventClass, XEvent,
    },
    Config, Error, Tracker, Xid,
};

mod common;

use common::{frame, ids, Call, FakeX, RecordingTiler, TilerCall, Window, LEFT, RIGHT};

fn config() -> Config {
    Config {
        remap_delay: Duration::ZERO,
        ..Config::default()
    }
}

fn fake_x(n: u32) -> FakeX {
    let x = FakeX::default();
    for id in 1..=n {
        x.add(id, Window::default());
    }

    x
}

fn running_tracker(x: FakeX) -> Tracker<FakeX, RecordingTiler> {
    let mut tracker = Tracker::new(config(), x, RecordingTiler::default());
    tracker.init().unwrap();

    tracker
}

fn property(id: u32, atom: Atom) -> XEvent {
    XEvent::PropertyNotify(PropertyEvent {
        id: Xid::from(id),
        atom: atom.as_ref().to_owned(),
    })
}

#[test]
fn init_tracks_existing_clients_top_of_stack_first() {
    let tracker = running_tracker(fake_x(3));

    assert_eq!(tracker.registry().tracked_ids(), ids(&[1, 2, 3]));
    assert_eq!(
        tracker.tiler().calls,
        vec![
            TilerCall::Added(Xid::from(3)),
            TilerCall::Added(Xid::from(2)),
            TilerCall::Added(Xid::from(1)),
        ]
    );
}

#[test]
fn new_clients_save_their_initial_geometry() {
    let tracker = running_tracker(fake_x(1));
    let client = tracker.registry().client(Xid::from(1)).unwrap();

    assert_eq!(client.saved_geometry(), Some(Rect::new(10, 10, 200, 100)));
    assert_eq!(client.saved_state(), Some(WmState::empty()));
    assert_eq!(client.parent(), frame(1));
    assert_eq!(client.name(), "xterm");
}

#[test]
fn windows_without_state_are_ignored_until_they_have_one() {
    let x = fake_x(1);
    x.update(1, |w| w.state = None);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());

    reg.reconcile(&ids(&[1]), &x, &mut tiler);
    assert!(!reg.is_tracked(Xid::from(1)));
    assert!(!reg.is_ignored(Xid::from(1)));

    x.update(1, |w| w.state = Some(WmState::empty()));
    reg.reconcile(&ids(&[1]), &x, &mut tiler);
    assert!(reg.is_tracked(Xid::from(1)));
}

#[test_case(Atom::NetWindowTypeDock; "dock")]
#[test_case(Atom::NetWindowTypeDialog; "dialog")]
#[test_case(Atom::NetWindowTypeNotification; "notification")]
#[test]
fn disqualifying_window_types_are_cached(ty: Atom) {
    let x = fake_x(1);
    x.update(1, |w| w.types = vec![ty]);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());

    reg.reconcile(&ids(&[1]), &x, &mut tiler);
    assert!(reg.is_ignored(Xid::from(1)));

    // The cached verdict wins even if the window now looks eligible
    x.update(1, |w| w.types = vec![Atom::NetWindowTypeNormal]);
    reg.reconcile(&ids(&[1]), &x, &mut tiler);

    assert!(!reg.is_tracked(Xid::from(1)));
    assert!(tiler.calls.is_empty());
}

#[test]
fn transient_windows_are_permanently_ineligible() {
    let x = fake_x(2);
    x.update(2, |w| w.transient_for = Some(Xid::from(1)));
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());

    reg.reconcile(&ids(&[1, 2]), &x, &mut tiler);

    assert_eq!(reg.tracked_ids(), ids(&[1]));
    assert!(reg.is_ignored(Xid::from(2)));
}

#[test]
fn ignored_classes_are_not_tracked() {
    let x = fake_x(1);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(Config {
        ignore_classes: vec!["xterm".to_owned()],
        ..config()
    });

    reg.reconcile(&ids(&[1]), &x, &mut tiler);

    assert!(reg.is_empty());
    assert!(!reg.is_ignored(Xid::from(1)));
}

#[test]
fn reconcile_is_idempotent() {
    let x = fake_x(3);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());

    reg.reconcile(&ids(&[3, 2, 1]), &x, &mut tiler);
    let calls = tiler.calls.clone();
    reg.reconcile(&ids(&[3, 2, 1]), &x, &mut tiler);

    assert_eq!(reg.tracked_ids(), ids(&[1, 2, 3]));
    assert_eq!(tiler.calls, calls);
}

#[test]
fn reconcile_untracks_exactly_the_missing_client() {
    let x = fake_x(3);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());

    reg.reconcile(&ids(&[3, 2, 1]), &x, &mut tiler);
    x.destroy(2);
    reg.reconcile(&ids(&[3, 1]), &x, &mut tiler);

    assert_eq!(reg.tracked_ids(), ids(&[1, 3]));
    assert_eq!(tiler.count(|c| matches!(c, TilerCall::Removed(_))), 1);
    assert!(tiler.calls.contains(&TilerCall::Removed(Xid::from(2))));
}

#[test]
fn tracking_twice_is_an_error() {
    let x = fake_x(1);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());

    reg.track(Xid::from(1), &x, &mut tiler).unwrap();
    let res = reg.track(Xid::from(1), &x, &mut tiler);

    assert!(matches!(res, Err(Error::AlreadyTracked(id)) if id == Xid::from(1)));
    assert_eq!(tiler.count(|c| matches!(c, TilerCall::Added(_))), 1);
}

#[test]
fn stacking_list_changes_are_picked_up() {
    let mut tracker = running_tracker(fake_x(2));

    tracker.x().add(3, Window::default());
    tracker.x().destroy(1);
    tracker
        .handle_xevent(property(0, Atom::NetClientListStacking))
        .unwrap();

    assert_eq!(tracker.registry().tracked_ids(), ids(&[2, 3]));
}

#[test]
fn other_root_properties_are_ignored() {
    let mut tracker = running_tracker(fake_x(1));
    tracker.x().add(2, Window::default());

    tracker.handle_xevent(property(0, Atom::NetWmName)).unwrap();

    assert_eq!(tracker.registry().tracked_ids(), ids(&[1]));
}

#[test]
fn dragging_a_client_is_detected() {
    let mut tracker = running_tracker(fake_x(1));
    let id = Xid::from(1);
    tracker.x().buttons.set(ButtonMask::BUTTON_1);

    tracker
        .handle_xevent(XEvent::FocusOut(FocusEvent {
            id,
            mode: NotifyMode::Grab,
        }))
        .unwrap();
    assert_eq!(tracker.registry().grabbed(), Some(id));

    tracker
        .handle_xevent(XEvent::ConfigureNotify(ConfigureEvent {
            id: frame(1),
            r: Rect::new(50, 50, 200, 100),
        }))
        .unwrap();
    assert!(tracker.registry().client(id).unwrap().is_moving());

    tracker
        .handle_xevent(XEvent::FocusIn(FocusEvent {
            id,
            mode: NotifyMode::Ungrab,
        }))
        .unwrap();

    let client = tracker.registry().client(id).unwrap();
    assert!(!client.is_moving());
    assert_eq!(tracker.registry().grabbed(), None);
    assert_eq!(tracker.tiler().count(|c| *c == TilerCall::Moved(id)), 1);
}

#[test]
fn configure_without_a_held_button_is_not_a_move() {
    let mut tracker = running_tracker(fake_x(1));
    let id = Xid::from(1);

    tracker
        .handle_xevent(XEvent::FocusOut(FocusEvent {
            id,
            mode: NotifyMode::Grab,
        }))
        .unwrap();
    tracker
        .handle_xevent(XEvent::ConfigureNotify(ConfigureEvent {
            id: frame(1),
            r: Rect::new(50, 50, 200, 100),
        }))
        .unwrap();

    assert!(!tracker.registry().client(id).unwrap().is_moving());
}

#[test]
fn reparented_clients_listen_on_client_and_frame() {
    let tracker = running_tracker(fake_x(1));
    let x = tracker.x();

    assert_eq!(
        x.mask(Xid::from(1)),
        vec![EventClass::PropertyChange, EventClass::FocusChange]
    );
    assert_eq!(x.mask(frame(1)), vec![EventClass::StructureNotify]);
}

#[test]
fn unparented_clients_listen_for_everything_on_one_mask() {
    let x = fake_x(1);
    x.reparenting.set(false);
    let tracker = running_tracker(x);
    let id = Xid::from(1);

    assert_eq!(tracker.registry().client(id).unwrap().parent(), id);
    assert_eq!(
        tracker.x().mask(id),
        vec![
            EventClass::PropertyChange,
            EventClass::FocusChange,
            EventClass::StructureNotify,
        ]
    );
}

#[test]
fn dragging_an_unparented_client_is_detected() {
    let x = fake_x(1);
    x.reparenting.set(false);
    x.buttons.set(ButtonMask::BUTTON_1);
    let mut tracker = running_tracker(x);
    let id = Xid::from(1);

    tracker
        .handle_xevent(XEvent::FocusOut(FocusEvent {
            id,
            mode: NotifyMode::Grab,
        }))
        .unwrap();
    tracker
        .handle_xevent(XEvent::ConfigureNotify(ConfigureEvent {
            id,
            r: Rect::new(50, 50, 200, 100),
        }))
        .unwrap();

    assert!(tracker.registry().client(id).unwrap().is_moving());
}

#[test]
fn events_for_unknown_windows_are_dropped() {
    let mut tracker = running_tracker(fake_x(1));

    let res = tracker.handle_xevent(XEvent::FocusOut(FocusEvent {
        id: Xid::from(42),
        mode: NotifyMode::Grab,
    }));

    assert!(res.is_ok());
    assert_eq!(tracker.registry().grabbed(), None);
}

#[test]
fn desktop_changes_are_reported_to_the_tiler() {
    let mut tracker = running_tracker(fake_x(1));
    tracker
        .x()
        .update(1, |w| w.desktop = Some(Desktop::Index(3)));

    tracker.handle_xevent(property(1, Atom::NetWmDesktop)).unwrap();
    // No change the second time around
    tracker.handle_xevent(property(1, Atom::NetWmDesktop)).unwrap();

    let id = Xid::from(1);
    assert_eq!(
        tracker.registry().client(id).unwrap().desktop(),
        Some(Desktop::Index(3))
    );
    assert_eq!(
        tracker
            .tiler()
            .count(|c| matches!(c, TilerCall::DesktopChanged(..))),
        1
    );
    assert!(tracker.tiler().calls.contains(&TilerCall::DesktopChanged(
        id,
        Some(Desktop::Index(0)),
        Some(Desktop::Index(3))
    )));
}

#[test]
fn moving_to_all_desktops_untracks_the_client() {
    let mut tracker = running_tracker(fake_x(1));
    tracker.x().update(1, |w| w.desktop = Some(Desktop::All));

    tracker.handle_xevent(property(1, Atom::NetWmDesktop)).unwrap();

    assert!(tracker.registry().is_empty());
    assert!(tracker
        .tiler()
        .calls
        .contains(&TilerCall::Removed(Xid::from(1))));
}

#[test_case(WmState::HIDDEN; "hidden")]
#[test_case(WmState::FULLSCREEN; "fullscreen")]
#[test_case(WmState::STICKY; "sticky")]
#[test]
fn ineligible_state_changes_untrack_the_client(state: WmState) {
    let mut tracker = running_tracker(fake_x(1));
    tracker.x().update(1, |w| w.state = Some(state));

    tracker.handle_xevent(property(1, Atom::NetWmState)).unwrap();

    assert!(tracker.registry().is_empty());
    assert!(tracker.registry().router().is_empty());
}

#[test]
fn name_changes_are_picked_up() {
    let mut tracker = running_tracker(fake_x(1));
    tracker
        .x()
        .update(1, |w| w.name = Some("vim".to_owned()));

    tracker.handle_xevent(property(1, Atom::NetWmName)).unwrap();

    assert_eq!(
        tracker.registry().client(Xid::from(1)).unwrap().name(),
        "vim"
    );
}

#[test]
fn restore_on_the_same_monitor_is_unchanged() {
    let x = fake_x(1);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());
    reg.reconcile(&ids(&[1]), &x, &mut tiler);

    x.update(1, |w| w.geometry = Rect::new(300, 300, 50, 50));
    reg.client(Xid::from(1)).unwrap().restore(&x).unwrap();

    assert_eq!(
        x.calls(),
        vec![Call::MoveResize(Xid::from(1), Rect::new(10, 10, 200, 100))]
    );
}

#[test]
fn restore_projects_onto_a_new_monitor() {
    let x = fake_x(1);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());
    reg.reconcile(&ids(&[1]), &x, &mut tiler);

    // Moved to the right hand monitor
    x.update(1, |w| w.geometry = Rect::new(1500, 100, 200, 100));
    reg.client(Xid::from(1)).unwrap().restore(&x).unwrap();

    let expected = Rect::new(10, 10, 200, 100).project(&LEFT, &RIGHT);
    assert_eq!(expected, Rect::new(1020, 5, 400, 50));
    assert_eq!(x.calls(), vec![Call::MoveResize(Xid::from(1), expected)]);
}

#[test]
fn restore_fully_maximized_only_sets_state() {
    let x = fake_x(1);
    x.update(1, |w| w.state = Some(WmState::MAXIMIZED));
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());
    reg.reconcile(&ids(&[1]), &x, &mut tiler);

    reg.client(Xid::from(1)).unwrap().restore(&x).unwrap();

    assert_eq!(
        x.calls(),
        vec![Call::WmState(
            Xid::from(1),
            StateAction::Add,
            WmState::MAXIMIZED
        )]
    );
}

#[test_case(WmState::MAXIMIZED_VERT; "vertical")]
#[test_case(WmState::MAXIMIZED_HORZ; "horizontal")]
#[test]
fn restore_partially_maximized_sets_state_and_geometry(state: WmState) {
    let x = fake_x(1);
    x.update(1, |w| w.state = Some(state));
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());
    reg.reconcile(&ids(&[1]), &x, &mut tiler);

    reg.client(Xid::from(1)).unwrap().restore(&x).unwrap();

    assert_eq!(
        x.calls(),
        vec![
            Call::WmState(Xid::from(1), StateAction::Add, state),
            Call::MoveResize(Xid::from(1), Rect::new(10, 10, 200, 100)),
        ]
    );
}

#[test]
fn save_replaces_the_snapshot() {
    let x = fake_x(1);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());
    reg.reconcile(&ids(&[1]), &x, &mut tiler);

    let r = Rect::new(20, 30, 400, 300);
    x.update(1, |w| w.geometry = r);
    reg.client_mut(Xid::from(1)).unwrap().save(&x).unwrap();

    assert_eq!(reg.client(Xid::from(1)).unwrap().saved_geometry(), Some(r));
}

#[test]
fn restoring_a_destroyed_window_is_not_an_error() {
    let x = fake_x(1);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());
    reg.reconcile(&ids(&[1]), &x, &mut tiler);

    x.destroy(1);

    assert!(reg.client(Xid::from(1)).unwrap().restore(&x).is_ok());
    assert!(x.calls().is_empty());
}

#[test]
fn client_actions_are_sent_to_the_window_manager() {
    let x = fake_x(1);
    let mut tiler = RecordingTiler::default();
    let mut reg = ClientRegistry::new(config());
    reg.reconcile(&ids(&[1]), &x, &mut tiler);

    let id = Xid::from(1);
    let client = reg.client(id).unwrap();
    client.activate(&x).unwrap();
    client.unmaximize(&x).unwrap();

    assert_eq!(
        x.calls(),
        vec![
            Call::Activate(id),
            Call::WmState(id, StateAction::Remove, WmState::MAXIMIZED),
        ]
    );
}
