//! Metadata around tracked X clients and manipulating them
use crate::{
    core::router::{EventRouter, Subscription},
    ignore_missing,
    pure::geometry::Rect,
    x::{
        event::NotifyMode,
        property::{Desktop, StateAction, WmState},
        EventClass, XConn, XConnExt,
    },
    Result, Xid,
};
use tracing::{debug, trace};

/// Whether or not a client is currently being dragged around by the user.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveState {
    /// The client is at rest
    #[default]
    Idle,
    /// The user is dragging the client with the mouse
    Moving,
}

/// Meta-data around a client window that we are tracking.
///
/// Clients are only ever created and destroyed by the [ClientRegistry][1] which owns them.
///
/// [1]: crate::core::registry::ClientRegistry
#[derive(Debug)]
pub struct Client {
    id: Xid,
    parent: Xid,
    pub(crate) name: String,
    pub(crate) desktop: Option<Desktop>,
    floating: bool,
    move_state: MoveState,
    saved_geometry: Option<Rect>,
    saved_state: Option<WmState>,
    subscriptions: Vec<Subscription>,
}

impl Client {
    /// Load the initial metadata for a client window and start listening for the
    /// events we need to track it.
    pub(crate) fn new<X: XConn>(id: Xid, x: &X, router: &mut EventRouter) -> Result<Self> {
        let name = x.window_title(id);
        debug!(%id, %name, "connecting to client");

        let parent = x.parent(id)?;
        let desktop = x.window_desktop(id)?;

        // Non-reparenting window managers leave clients as children of the root window
        let frame = if parent == x.root() { id } else { parent };

        // Selecting input replaces the existing event mask for the window
        if frame == id {
            x.select_input(
                id,
                &[
                    EventClass::PropertyChange,
                    EventClass::FocusChange,
                    EventClass::StructureNotify,
                ],
            )?;
        } else {
            x.select_input(id, &[EventClass::PropertyChange, EventClass::FocusChange])?;
            x.select_input(frame, &[EventClass::StructureNotify])?;
        }

        let subscriptions = vec![
            router.subscribe(id, EventClass::PropertyChange, id),
            router.subscribe(id, EventClass::FocusChange, id),
            router.subscribe(frame, EventClass::StructureNotify, id),
        ];

        Ok(Self {
            id,
            parent: frame,
            name,
            desktop,
            floating: false,
            move_state: MoveState::Idle,
            saved_geometry: None,
            saved_state: None,
            subscriptions,
        })
    }

    /// Stop routing events to this client.
    pub(crate) fn release(mut self, router: &mut EventRouter) {
        debug!(id = %self.id, name = %self.name, "disconnecting from client");
        for sub in self.subscriptions.drain(..) {
            router.unsubscribe(sub);
        }
    }

    /// The X window ID of this client
    pub fn id(&self) -> Xid {
        self.id
    }

    /// The window that configure notifications for this client are received from.
    ///
    /// This is the frame window when the window manager reparents its clients.
    pub fn parent(&self) -> Xid {
        self.parent
    }

    /// The title of this client at the point it was last read.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The desktop this client is on, if known.
    pub fn desktop(&self) -> Option<Desktop> {
        self.desktop
    }

    /// Whether or not this client has been marked as floating.
    ///
    /// Floating clients are not currently supported so this is always `false`.
    pub fn is_floating(&self) -> bool {
        self.floating
    }

    /// The current [MoveState] of this client.
    pub fn move_state(&self) -> MoveState {
        self.move_state
    }

    /// Whether or not the user is currently dragging this client.
    pub fn is_moving(&self) -> bool {
        self.move_state == MoveState::Moving
    }

    /// The geometry recorded by the last call to [Client::save].
    pub fn saved_geometry(&self) -> Option<Rect> {
        self.saved_geometry
    }

    /// The `_NET_WM_STATE` recorded by the last call to [Client::save].
    pub fn saved_state(&self) -> Option<WmState> {
        self.saved_state
    }

    /// Ask the window manager to activate this client.
    pub fn activate<X: XConn>(&self, x: &X) -> Result<()> {
        ignore_missing(x.request_activate(self.id))?;

        Ok(())
    }

    /// Ask the window manager to remove any maximized state from this client.
    pub fn unmaximize<X: XConn>(&self, x: &X) -> Result<()> {
        ignore_missing(x.request_wm_state(self.id, StateAction::Remove, WmState::MAXIMIZED))?;

        Ok(())
    }

    /// Record the current geometry and state of this client so that it can be put back
    /// with [Client::restore] later.
    pub fn save<X: XConn>(&mut self, x: &X) -> Result<()> {
        let r = x.client_geometry(self.id)?;
        let state = x.wm_state(self.id)?;
        trace!(id = %self.id, ?r, ?state, "saving client geometry");

        self.saved_geometry = Some(r);
        self.saved_state = state;

        Ok(())
    }

    /// Return this client to the geometry and maximized state recorded by the last call
    /// to [Client::save].
    ///
    /// If the client is now on a different monitor to the one it was saved on, the saved
    /// geometry is scaled to occupy the same proportion of the new monitor.
    pub fn restore<X: XConn>(&self, x: &X) -> Result<()> {
        debug!(id = %self.id, name = %self.name, "restoring client");

        if let Some(state) = self.saved_state {
            let maxed = state & WmState::MAXIMIZED;
            if !maxed.is_empty() {
                trace!(id = %self.id, ?maxed, "restoring maximized state");
                ignore_missing(x.request_wm_state(self.id, StateAction::Add, maxed))?;
            }

            // Fully maximized windows have their geometry set by the window manager
            if maxed == WmState::MAXIMIZED {
                return Ok(());
            }
        }

        let saved = match self.saved_geometry {
            Some(r) => r,
            None => return Ok(()),
        };

        let now = match ignore_missing(x.client_geometry(self.id))? {
            Some(r) => r,
            None => return Ok(()),
        };

        let (m_now, m_old) = (x.monitor_area(now)?, x.monitor_area(saved)?);
        let r = if m_now != m_old {
            trace!(id = %self.id, ?m_old, ?m_now, "client has changed monitor");
            saved.project(&m_old, &m_now)
        } else {
            saved
        };

        ignore_missing(x.move_resize(self.id, r))?;

        Ok(())
    }

    /// Move and resize this client, unless the user is currently dragging it.
    pub fn move_resize<X: XConn>(&self, r: Rect, x: &X) -> Result<()> {
        if self.is_moving() {
            debug!(id = %self.id, ?r, "client is being moved by the user: ignoring move/resize");
            return Ok(());
        }

        trace!(id = %self.id, ?r, "moving client");
        ignore_missing(x.move_resize(self.id, r))?;

        Ok(())
    }

    // A grab on focus out is the window manager starting an interactive move or resize.
    // We only note which client it was here: the move is confirmed by a configure notify.
    pub(crate) fn focus_out(&self, mode: NotifyMode, grabbed: &mut Option<Xid>) {
        if mode == NotifyMode::Grab {
            trace!(id = %self.id, "focus grabbed");
            *grabbed = Some(self.id);
        }
    }

    /// Returns `true` if this configure notify started a move.
    pub(crate) fn configured<X: XConn>(&mut self, grabbed: Option<Xid>, x: &X) -> bool {
        if self.is_moving() || grabbed != Some(self.id) {
            return false;
        }

        if x.drag_button_held(self.id) {
            debug!(id = %self.id, "user has started moving client");
            self.move_state = MoveState::Moving;
            return true;
        }

        false
    }

    /// Returns `true` if this focus in completed a move.
    pub(crate) fn focus_in(&mut self, mode: NotifyMode, grabbed: &mut Option<Xid>) -> bool {
        if !(self.is_moving() && mode == NotifyMode::Ungrab) {
            return false;
        }

        debug!(id = %self.id, "user has finished moving client");
        *grabbed = None;
        self.move_state = MoveState::Idle;

        true
    }
}
