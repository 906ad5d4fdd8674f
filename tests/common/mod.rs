#![allow(dead_code)]
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};
use tyle::{
    core::Client,
    geometry::Rect,
    tiler::Tiler,
    x::{
        property::{ButtonMask, Desktop, StateAction, WmClass, WmState},
        Atom, EventClass, MockXConn, XConn,
    },
    Error, Result, Xid,
};

pub const LEFT: Rect = Rect::new(0, 0, 1000, 1000);
pub const RIGHT: Rect = Rect::new(1000, 0, 2000, 500);

/// The properties of a single fake client window.
#[derive(Debug, Clone)]
pub struct Window {
    pub name: Option<String>,
    pub class: Option<WmClass>,
    pub transient_for: Option<Xid>,
    pub types: Vec<Atom>,
    pub state: Option<WmState>,
    pub desktop: Option<Desktop>,
    pub geometry: Rect,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            name: Some("xterm".to_owned()),
            class: Some(WmClass::new("xterm", "XTerm")),
            transient_for: None,
            types: vec![Atom::NetWindowTypeNormal],
            state: Some(WmState::empty()),
            desktop: Some(Desktop::Index(0)),
            geometry: Rect::new(10, 10, 200, 100),
        }
    }
}

/// A mutating request made against the fake X server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Activate(Xid),
    WmState(Xid, StateAction, WmState),
    MoveResize(Xid, Rect),
}

/// An in memory X server that records every mutating request made against it.
pub struct FakeX {
    pub windows: RefCell<HashMap<Xid, Window>>,
    pub stacking: RefCell<Vec<Xid>>,
    pub screens: Vec<Rect>,
    pub buttons: Cell<ButtonMask>,
    pub calls: RefCell<Vec<Call>>,
    pub reparenting: Cell<bool>,
    pub masks: RefCell<HashMap<Xid, Vec<EventClass>>>,
}

impl Default for FakeX {
    fn default() -> Self {
        Self {
            windows: RefCell::new(HashMap::new()),
            stacking: RefCell::new(vec![]),
            screens: vec![LEFT, RIGHT],
            buttons: Cell::new(ButtonMask::empty()),
            calls: RefCell::new(vec![]),
            reparenting: Cell::new(true),
            masks: RefCell::new(HashMap::new()),
        }
    }
}

impl FakeX {
    /// Add a window to the top of the stacking order.
    pub fn add(&self, id: u32, w: Window) {
        self.windows.borrow_mut().insert(Xid::from(id), w);
        self.stacking.borrow_mut().push(Xid::from(id));
    }

    /// Remove a window from the stacking order and destroy it.
    pub fn destroy(&self, id: u32) {
        self.windows.borrow_mut().remove(&Xid::from(id));
        self.stacking.borrow_mut().retain(|&w| w != Xid::from(id));
    }

    pub fn update(&self, id: u32, f: impl FnOnce(&mut Window)) {
        if let Some(w) = self.windows.borrow_mut().get_mut(&Xid::from(id)) {
            f(w)
        }
    }

    pub fn mask(&self, id: Xid) -> Vec<EventClass> {
        self.masks.borrow().get(&id).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn with<T>(&self, id: Xid, f: impl FnOnce(&Window) -> T) -> Result<T> {
        self.windows
            .borrow()
            .get(&id)
            .map(f)
            .ok_or(Error::WindowNotFound(id))
    }
}

/// Frames are always the client id + 1000
pub fn frame(id: u32) -> Xid {
    Xid::from(id + 1000)
}

impl MockXConn for FakeX {
    fn mock_screen_details(&self) -> Result<Vec<Rect>> {
        Ok(self.screens.clone())
    }

    // Like X, each call replaces the previous event mask for the window
    fn mock_select_input(&self, id: Xid, classes: &[EventClass]) -> Result<()> {
        self.masks.borrow_mut().insert(id, classes.to_vec());
        Ok(())
    }

    fn mock_client_list_stacking(&self) -> Result<Vec<Xid>> {
        Ok(self.stacking.borrow().clone())
    }

    fn mock_window_name(&self, id: Xid) -> Result<Option<String>> {
        self.with(id, |w| w.name.clone())
    }

    fn mock_window_desktop(&self, id: Xid) -> Result<Option<Desktop>> {
        self.with(id, |w| w.desktop)
    }

    fn mock_window_class(&self, id: Xid) -> Result<Option<WmClass>> {
        self.with(id, |w| w.class.clone())
    }

    fn mock_transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        self.with(id, |w| w.transient_for)
    }

    fn mock_window_types(&self, id: Xid) -> Result<Vec<Atom>> {
        self.with(id, |w| w.types.clone())
    }

    fn mock_wm_state(&self, id: Xid) -> Result<Option<WmState>> {
        self.with(id, |w| w.state)
    }

    fn mock_client_geometry(&self, id: Xid) -> Result<Rect> {
        self.with(id, |w| w.geometry)
    }

    fn mock_pointer_buttons(&self, _: Xid) -> Result<ButtonMask> {
        Ok(self.buttons.get())
    }

    fn mock_parent(&self, id: Xid) -> Result<Xid> {
        let parent = if self.reparenting.get() {
            Xid::from(*id + 1000)
        } else {
            self.mock_root()
        };

        self.with(id, |_| parent)
    }

    fn mock_request_activate(&self, id: Xid) -> Result<()> {
        self.with(id, |_| ())?;
        self.calls.borrow_mut().push(Call::Activate(id));
        Ok(())
    }

    fn mock_request_wm_state(&self, id: Xid, action: StateAction, state: WmState) -> Result<()> {
        self.with(id, |_| ())?;
        self.calls.borrow_mut().push(Call::WmState(id, action, state));
        Ok(())
    }

    fn mock_move_resize(&self, id: Xid, r: Rect) -> Result<()> {
        self.with(id, |_| ())?;
        self.update(*id, |w| w.geometry = r);
        self.calls.borrow_mut().push(Call::MoveResize(id, r));
        Ok(())
    }
}

/// A notification received by a [RecordingTiler].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilerCall {
    Added(Xid),
    Removed(Xid),
    Moved(Xid),
    DesktopChanged(Xid, Option<Desktop>, Option<Desktop>),
}

#[derive(Debug, Default)]
pub struct RecordingTiler {
    pub calls: Vec<TilerCall>,
}

impl RecordingTiler {
    pub fn count(&self, f: impl Fn(&TilerCall) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }
}

impl<X: XConn> Tiler<X> for RecordingTiler {
    fn client_added(&mut self, client: &Client, _: &X) -> Result<()> {
        self.calls.push(TilerCall::Added(client.id()));
        Ok(())
    }

    fn client_removed(&mut self, client: &Client, _: &X) -> Result<()> {
        self.calls.push(TilerCall::Removed(client.id()));
        Ok(())
    }

    fn client_moved(&mut self, client: &Client, _: &X) -> Result<()> {
        self.calls.push(TilerCall::Moved(client.id()));
        Ok(())
    }

    fn client_desktop_changed(
        &mut self,
        client: &Client,
        old: Option<Desktop>,
        _: &X,
    ) -> Result<()> {
        self.calls
            .push(TilerCall::DesktopChanged(client.id(), old, client.desktop()));
        Ok(())
    }
}

pub fn ids(raw: &[u32]) -> Vec<Xid> {
    raw.iter().map(|&id| Xid::from(id)).collect()
}
