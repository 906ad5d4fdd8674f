//! A mock implementation of XConn that is easier to implement for
//! use in tests.
use crate::{
    pure::geometry::Rect,
    x::{
        atom::Atom,
        event::XEvent,
        property::{ButtonMask, Desktop, StateAction, WmClass, WmState},
        EventClass, XConn,
    },
    Result, Xid,
};

/// All methods on this trait that return a Result are unimplemented by
/// default unless an implementation is provided.
/// The `mock_root` method always returns id 0 and `mock_flush` by default is a no-op.
///
/// Any implementation of `MockXConn` will automatically implement `XConn` by forwarding on
/// calls to `$method` to `mock_$method`.
#[allow(unused_variables)]
pub trait MockXConn {
    fn mock_root(&self) -> Xid {
        Xid(0)
    }

    fn mock_screen_details(&self) -> Result<Vec<Rect>> {
        unimplemented!("mock_screen_details")
    }

    fn mock_next_event(&self) -> Result<XEvent> {
        unimplemented!("mock_next_event")
    }

    fn mock_flush(&self) {}

    fn mock_select_input(&self, id: Xid, classes: &[EventClass]) -> Result<()> {
        unimplemented!("mock_select_input")
    }

    fn mock_client_list_stacking(&self) -> Result<Vec<Xid>> {
        unimplemented!("mock_client_list_stacking")
    }

    fn mock_window_name(&self, id: Xid) -> Result<Option<String>> {
        unimplemented!("mock_window_name")
    }

    fn mock_window_desktop(&self, id: Xid) -> Result<Option<Desktop>> {
        unimplemented!("mock_window_desktop")
    }

    fn mock_window_class(&self, id: Xid) -> Result<Option<WmClass>> {
        unimplemented!("mock_window_class")
    }

    fn mock_transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        unimplemented!("mock_transient_for")
    }

    fn mock_window_types(&self, id: Xid) -> Result<Vec<Atom>> {
        unimplemented!("mock_window_types")
    }

    fn mock_wm_state(&self, id: Xid) -> Result<Option<WmState>> {
        unimplemented!("mock_wm_state")
    }

    fn mock_client_geometry(&self, id: Xid) -> Result<Rect> {
        unimplemented!("mock_client_geometry")
    }

    fn mock_pointer_buttons(&self, id: Xid) -> Result<ButtonMask> {
        unimplemented!("mock_pointer_buttons")
    }

    fn mock_parent(&self, id: Xid) -> Result<Xid> {
        unimplemented!("mock_parent")
    }

    fn mock_request_activate(&self, id: Xid) -> Result<()> {
        unimplemented!("mock_request_activate")
    }

    fn mock_request_wm_state(&self, id: Xid, action: StateAction, state: WmState) -> Result<()> {
        unimplemented!("mock_request_wm_state")
    }

    fn mock_move_resize(&self, id: Xid, r: Rect) -> Result<()> {
        unimplemented!("mock_move_resize")
    }
}

impl<T> XConn for T
where
    T: MockXConn,
{
    fn root(&self) -> Xid {
        self.mock_root()
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        self.mock_screen_details()
    }

    fn next_event(&self) -> Result<XEvent> {
        self.mock_next_event()
    }

    fn flush(&self) {
        self.mock_flush()
    }

    fn select_input(&self, id: Xid, classes: &[EventClass]) -> Result<()> {
        self.mock_select_input(id, classes)
    }

    fn client_list_stacking(&self) -> Result<Vec<Xid>> {
        self.mock_client_list_stacking()
    }

    fn window_name(&self, id: Xid) -> Result<Option<String>> {
        self.mock_window_name(id)
    }

    fn window_desktop(&self, id: Xid) -> Result<Option<Desktop>> {
        self.mock_window_desktop(id)
    }

    fn window_class(&self, id: Xid) -> Result<Option<WmClass>> {
        self.mock_window_class(id)
    }

    fn transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        self.mock_transient_for(id)
    }

    fn window_types(&self, id: Xid) -> Result<Vec<Atom>> {
        self.mock_window_types(id)
    }

    fn wm_state(&self, id: Xid) -> Result<Option<WmState>> {
        self.mock_wm_state(id)
    }

    fn client_geometry(&self, id: Xid) -> Result<Rect> {
        self.mock_client_geometry(id)
    }

    fn pointer_buttons(&self, id: Xid) -> Result<ButtonMask> {
        self.mock_pointer_buttons(id)
    }

    fn parent(&self, id: Xid) -> Result<Xid> {
        self.mock_parent(id)
    }

    fn request_activate(&self, id: Xid) -> Result<()> {
        self.mock_request_activate(id)
    }

    fn request_wm_state(&self, id: Xid, action: StateAction, state: WmState) -> Result<()> {
        self.mock_request_wm_state(id, action, state)
    }

    fn move_resize(&self, id: Xid, r: Rect) -> Result<()> {
        self.mock_move_resize(id, r)
    }
}
