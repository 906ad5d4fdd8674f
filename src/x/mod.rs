//! Logic for interacting with the X server
use crate::{
    ignore_missing,
    pure::geometry::Rect,
    x::property::{ButtonMask, Desktop, StateAction, WmClass, WmState},
    Result, Xid,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

pub mod atom;
pub mod event;
pub mod mock;
pub mod property;

pub use atom::Atom;
pub use event::XEvent;
pub use mock::MockXConn;

/// The classes of notification that can be selected for on a given window.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventClass {
    /// Changes to the properties set on the window
    PropertyChange,
    /// The window gaining or losing input focus
    FocusChange,
    /// Changes to the geometry and stacking of the window
    StructureNotify,
}

/// A handle on a running X11 connection that we can use for issuing X requests.
///
/// XConn is intended as an abstraction layer to allow for communication with the underlying
/// display system (assumed to be X) using whatever mechanism the implementer wishes. All of the
/// window metadata that the tracker needs, along with the small set of requests it makes of the
/// running window manager, pass through this trait.
///
/// Any method taking a client window may fail with [Error::WindowNotFound][1] if the window has
/// been destroyed: callers are expected to treat that as a non-fatal condition.
///
/// [1]: crate::Error::WindowNotFound
pub trait XConn {
    /// The ID of the root window.
    fn root(&self) -> Xid;
    /// Ask the X server for the dimensions of each currently available monitor.
    fn screen_details(&self) -> Result<Vec<Rect>>;
    /// Block and wait for the next event from the X server so it can be processed.
    fn next_event(&self) -> Result<XEvent>;
    /// Flush any pending requests to the X server.
    fn flush(&self);

    /// Request notifications of the given classes for a window.
    fn select_input(&self, id: Xid, classes: &[EventClass]) -> Result<()>;

    /// The ids of all client windows in stacking order (bottom to top).
    fn client_list_stacking(&self) -> Result<Vec<Xid>>;
    /// The title of the window, if it has one.
    fn window_name(&self, id: Xid) -> Result<Option<String>>;
    /// The desktop the window is currently assigned to, if known.
    fn window_desktop(&self, id: Xid) -> Result<Option<Desktop>>;
    /// The `WM_CLASS` of the window, if it is set.
    fn window_class(&self, id: Xid) -> Result<Option<WmClass>>;
    /// The window that this window is transient for, if any.
    fn transient_for(&self, id: Xid) -> Result<Option<Xid>>;
    /// The `_NET_WM_WINDOW_TYPE` values set for the window that are known [Atom]s.
    fn window_types(&self, id: Xid) -> Result<Vec<Atom>>;
    /// The current `_NET_WM_STATE` of the window.
    ///
    /// `None` means that the property is not set at all, which is distinct from it being set
    /// with no flags.
    fn wm_state(&self, id: Xid) -> Result<Option<WmState>>;
    /// The position and size of the window in root window coordinates.
    fn client_geometry(&self, id: Xid) -> Result<Rect>;
    /// Query the pointer for the buttons currently held down.
    fn pointer_buttons(&self, id: Xid) -> Result<ButtonMask>;
    /// The parent of the window. For reparenting window managers this is the frame window.
    fn parent(&self, id: Xid) -> Result<Xid>;

    /// Ask the window manager to activate the window.
    fn request_activate(&self, id: Xid) -> Result<()>;
    /// Ask the window manager to modify the `_NET_WM_STATE` of the window.
    fn request_wm_state(&self, id: Xid, action: StateAction, state: WmState) -> Result<()>;
    /// Ask the window manager to move and resize the window.
    fn move_resize(&self, id: Xid, r: Rect) -> Result<()>;
}

/// Extended functionality for [XConn] impls.
pub trait XConnExt: XConn + Sized {
    /// The area of the monitor containing `r`.
    ///
    /// This is the monitor containing the midpoint of `r` if there is one, otherwise the
    /// monitor that `r` overlaps the most. If `r` is entirely off screen then the first
    /// monitor is used.
    fn monitor_area(&self, r: Rect) -> Result<Rect> {
        let screens = self.screen_details()?;
        let mid = r.midpoint();

        let area = screens
            .iter()
            .find(|s| s.contains_point(mid))
            .or_else(|| {
                screens
                    .iter()
                    .filter(|s| s.overlap(&r) > 0)
                    .max_by_key(|s| s.overlap(&r))
            })
            .or_else(|| screens.first())
            .copied();

        area.ok_or_else(|| crate::Error::Raw("no monitors reported by the X server".to_owned()))
    }

    /// Whether or not the user is currently holding down a mouse button that can be used
    /// to drag windows. Any error from the X server is treated as no buttons being held.
    fn drag_button_held(&self, id: Xid) -> bool {
        match self.pointer_buttons(id) {
            Ok(mask) => mask.is_dragging(),
            Err(e) => {
                trace!(%id, %e, "unable to query pointer");
                false
            }
        }
    }

    /// Request the title of a given client window, falling back to "N/A" if it is
    /// not set or the window has already gone.
    fn window_title(&self, id: Xid) -> String {
        match ignore_missing(self.window_name(id)) {
            Ok(Some(Some(name))) if !name.is_empty() => name,
            _ => "N/A".to_owned(),
        }
    }
}

// Auto impl XConnExt for all XConn impls
impl<T> XConnExt for T where T: XConn {}
