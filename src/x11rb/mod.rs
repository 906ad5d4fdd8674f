//! An [XConn] implementation using x11rb to talk to a running X server.
//!
//! All window metadata is read from the EWMH / ICCCM properties set by clients and the running
//! window manager, and all changes are requested by sending client messages to the root window
//! so that the window manager stays in control of the windows it manages.
use crate::{
    pure::geometry::Rect,
    x::{
        atom::Atom,
        event::XEvent,
        property::{ButtonMask, Desktop, StateAction, WmClass, WmState},
        EventClass, XConn,
    },
    Error, Xid,
};
use tracing::trace;
use x11rb::{
    connection::Connection,
    protocol::{
        randr::ConnectionExt as _,
        xproto::{
            AtomEnum, ChangeWindowAttributesAux, ClientMessageEvent, ConnectionExt as _, EventMask,
            GetPropertyReply, Window,
        },
    },
    rust_connection::RustConnection,
};

mod atom;
mod conversions;

use atom::Atoms;
use conversions::{convert_event, ReplyExt};

/// Result type for fallible methods using x11rb
pub type Result<T> = std::result::Result<T, X11rbError>;

/// Enum to store the various ways that operations can fail inside of the
/// x11rb implementation of [XConn].
#[derive(thiserror::Error, Debug)]
pub enum X11rbError {
    /// Unable to establish a connection to the X server
    #[error(transparent)]
    Connect(#[from] ::x11rb::errors::ConnectError),

    /// The X11 connection broke
    #[error(transparent)]
    Connection(#[from] ::x11rb::errors::ConnectionError),

    /// Could not get X11 request reply
    #[error(transparent)]
    ReplyError(#[from] ::x11rb::errors::ReplyError),

    /// Could not get X11 request reply or could not generate_id()
    #[error(transparent)]
    ReplyOrIdError(#[from] ::x11rb::errors::ReplyOrIdError),

    /// An [Atom] was not interned when the connection was established
    #[error("'{}' was not interned", .0.as_ref())]
    UnknownAtom(Atom),

    /// The X server did not report any monitors
    #[error("the X server did not report any monitors")]
    NoMonitors,
}

impl From<::x11rb::errors::ConnectionError> for Error {
    fn from(e: ::x11rb::errors::ConnectionError) -> Self {
        Self::X11rb(X11rbError::from(e))
    }
}

// _NET_MOVERESIZE_WINDOW: x, y, width & height are set and the request comes from a pager
const MOVERESIZE_FLAGS: u32 = 0xF00 | (2 << 12);
// The source indication for requests coming from a pager rather than an application
const SOURCE_PAGER: u32 = 2;

/// Handles communication with an X server via the x11rb crate.
#[derive(Debug)]
pub struct X11rbConnection<C>
where
    C: Connection,
{
    conn: C,
    root: Window,
    atoms: Atoms,
}

impl X11rbConnection<RustConnection> {
    /// Connect to the X server named by the `DISPLAY` environment variable.
    pub fn new() -> crate::Result<Self> {
        let (conn, screen) = RustConnection::connect(None).map_err(X11rbError::from)?;

        Self::new_for_connection(conn, screen)
    }
}

impl<C> X11rbConnection<C>
where
    C: Connection,
{
    /// Wrap an existing x11rb connection, using the given screen.
    pub fn new_for_connection(conn: C, screen: usize) -> crate::Result<Self> {
        let root = match conn.setup().roots.get(screen) {
            Some(s) => s.root,
            None => return Err(Error::Raw(format!("screen {screen} does not exist"))),
        };
        let atoms = Atoms::new(&conn)?;

        Ok(Self { conn, root, atoms })
    }

    pub(crate) fn known_atom(&self, atom: Atom) -> crate::Result<u32> {
        Ok(self.atoms.known_atom(atom)?)
    }

    // Resolve an atom ID to its name, asking the X server if it is not one of ours.
    pub(crate) fn atom_name(&self, id: u32) -> crate::Result<String> {
        if let Some(atom) = self.atoms.atom_name(id) {
            return Ok(atom.as_ref().to_owned());
        }

        let reply = self.conn.get_atom_name(id)?.reply().map_err(X11rbError::from)?;

        Ok(String::from_utf8_lossy(&reply.name).into_owned())
    }

    fn get_prop(&self, id: Xid, atom: Atom, ty: impl Into<u32>) -> crate::Result<GetPropertyReply> {
        let prop = self.known_atom(atom)?;

        self.conn
            .get_property(false, *id, prop, ty, 0, 1024)?
            .reply()
            .for_window(id)
    }

    fn get_prop_u32s(&self, id: Xid, atom: Atom, ty: impl Into<u32>) -> crate::Result<Vec<u32>> {
        let reply = self.get_prop(id, atom, ty)?;

        Ok(reply.value32().map(|vals| vals.collect()).unwrap_or_default())
    }

    fn get_prop_string(&self, id: Xid, atom: Atom, ty: impl Into<u32>) -> crate::Result<Option<String>> {
        let reply = self.get_prop(id, atom, ty)?;
        if reply.value.is_empty() {
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&reply.value).into_owned()))
    }

    // Client messages to the root window are how EWMH pagers ask the window manager to do things
    fn send_root_message(&self, id: Xid, atom: Atom, data: [u32; 5]) -> crate::Result<()> {
        let type_ = self.known_atom(atom)?;
        let event = ClientMessageEvent::new(32, *id, type_, data);
        let mask = EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY;
        trace!(%id, atom = atom.as_ref(), ?data, "sending client message to root");
        self.conn.send_event(false, self.root, mask, event)?;

        Ok(())
    }
}

impl<C> XConn for X11rbConnection<C>
where
    C: Connection,
{
    fn root(&self) -> Xid {
        Xid(self.root)
    }

    fn screen_details(&self) -> crate::Result<Vec<Rect>> {
        let reply = self
            .conn
            .randr_get_monitors(self.root, true)?
            .reply()
            .map_err(X11rbError::from)?;

        let rects: Vec<Rect> = reply
            .monitors
            .iter()
            .map(|m| Rect::new(m.x as i32, m.y as i32, m.width as u32, m.height as u32))
            .collect();

        if rects.is_empty() {
            return Err(X11rbError::NoMonitors.into());
        }

        Ok(rects)
    }

    fn next_event(&self) -> crate::Result<XEvent> {
        loop {
            let event = self.conn.wait_for_event()?;
            if let Some(event) = convert_event(self, event)? {
                return Ok(event);
            }
        }
    }

    fn flush(&self) {
        if let Err(e) = self.conn.flush() {
            trace!(%e, "error flushing connection");
        }
    }

    fn select_input(&self, id: Xid, classes: &[EventClass]) -> crate::Result<()> {
        let mask = classes.iter().fold(EventMask::NO_EVENT, |mask, class| {
            mask | match class {
                EventClass::PropertyChange => EventMask::PROPERTY_CHANGE,
                EventClass::FocusChange => EventMask::FOCUS_CHANGE,
                EventClass::StructureNotify => EventMask::STRUCTURE_NOTIFY,
            }
        });
        let aux = ChangeWindowAttributesAux::new().event_mask(mask);

        self.conn
            .change_window_attributes(*id, &aux)?
            .check()
            .for_window(id)
    }

    fn client_list_stacking(&self) -> crate::Result<Vec<Xid>> {
        let ids = self.get_prop_u32s(self.root(), Atom::NetClientListStacking, AtomEnum::WINDOW)?;

        Ok(ids.into_iter().map(Xid).collect())
    }

    fn window_name(&self, id: Xid) -> crate::Result<Option<String>> {
        let utf8 = self.known_atom(Atom::UTF8String)?;
        match self.get_prop_string(id, Atom::NetWmName, utf8)? {
            Some(name) => Ok(Some(name)),
            None => self.get_prop_string(id, Atom::WmName, AtomEnum::ANY),
        }
    }

    fn window_desktop(&self, id: Xid) -> crate::Result<Option<Desktop>> {
        let vals = self.get_prop_u32s(id, Atom::NetWmDesktop, AtomEnum::CARDINAL)?;

        Ok(vals.first().map(|&raw| Desktop::from(raw)))
    }

    fn window_class(&self, id: Xid) -> crate::Result<Option<WmClass>> {
        let raw = match self.get_prop_string(id, Atom::WmClass, AtomEnum::STRING)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        // Two consecutive null terminated strings
        let mut parts = raw.split('\0');
        let instance = parts.next().unwrap_or_default();
        let class = parts.next().unwrap_or_default();

        Ok(Some(WmClass::new(instance, class)))
    }

    fn transient_for(&self, id: Xid) -> crate::Result<Option<Xid>> {
        let vals = self.get_prop_u32s(id, Atom::WmTransientFor, AtomEnum::WINDOW)?;

        Ok(vals.first().filter(|&&w| w != x11rb::NONE).map(|&w| Xid(w)))
    }

    fn window_types(&self, id: Xid) -> crate::Result<Vec<Atom>> {
        let vals = self.get_prop_u32s(id, Atom::NetWmWindowType, AtomEnum::ATOM)?;

        Ok(vals
            .into_iter()
            .filter_map(|a| self.atoms.atom_name(a))
            .collect())
    }

    fn wm_state(&self, id: Xid) -> crate::Result<Option<WmState>> {
        let reply = self.get_prop(id, Atom::NetWmState, AtomEnum::ATOM)?;
        if reply.type_ == x11rb::NONE {
            return Ok(None);
        }

        let atoms = reply
            .value32()
            .into_iter()
            .flatten()
            .filter_map(|a| self.atoms.atom_name(a));

        Ok(Some(WmState::from_atoms(atoms)))
    }

    fn client_geometry(&self, id: Xid) -> crate::Result<Rect> {
        let geom = self.conn.get_geometry(*id)?.reply().for_window(id)?;
        let pos = self
            .conn
            .translate_coordinates(*id, self.root, 0, 0)?
            .reply()
            .for_window(id)?;

        Ok(Rect::new(
            pos.dst_x as i32,
            pos.dst_y as i32,
            geom.width as u32,
            geom.height as u32,
        ))
    }

    fn pointer_buttons(&self, id: Xid) -> crate::Result<ButtonMask> {
        let reply = self.conn.query_pointer(*id)?.reply().for_window(id)?;

        Ok(ButtonMask::from_bits_truncate(u16::from(reply.mask)))
    }

    fn parent(&self, id: Xid) -> crate::Result<Xid> {
        let reply = self.conn.query_tree(*id)?.reply().for_window(id)?;

        Ok(Xid(reply.parent))
    }

    fn request_activate(&self, id: Xid) -> crate::Result<()> {
        self.send_root_message(
            id,
            Atom::NetActiveWindow,
            [SOURCE_PAGER, x11rb::CURRENT_TIME, 0, 0, 0],
        )
    }

    fn request_wm_state(&self, id: Xid, action: StateAction, state: WmState) -> crate::Result<()> {
        // Each message can carry at most two properties
        let atoms = state
            .atoms()
            .into_iter()
            .map(|a| self.known_atom(a))
            .collect::<crate::Result<Vec<u32>>>()?;

        for pair in atoms.chunks(2) {
            let first = pair[0];
            let second = pair.get(1).copied().unwrap_or(0);
            self.send_root_message(
                id,
                Atom::NetWmState,
                [action.into(), first, second, SOURCE_PAGER, 0],
            )?;
        }

        Ok(())
    }

    fn move_resize(&self, id: Xid, r: Rect) -> crate::Result<()> {
        self.send_root_message(
            id,
            Atom::NetMoveResizeWindow,
            [MOVERESIZE_FLAGS, r.x as u32, r.y as u32, r.w, r.h],
        )
    }
}
