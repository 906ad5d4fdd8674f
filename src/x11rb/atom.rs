//! Interning the known [Atom]s with the X server
use crate::{
    x::Atom,
    x11rb::{Result, X11rbError},
};
use std::collections::HashMap;
use strum::IntoEnumIterator;
use x11rb::{connection::Connection, protocol::xproto::ConnectionExt};

#[derive(Debug)]
pub(crate) struct Atoms {
    atoms: HashMap<Atom, u32>,
    names: HashMap<u32, Atom>,
}

impl Atoms {
    pub(crate) fn new(conn: &impl Connection) -> Result<Self> {
        // First send all requests...
        let atom_requests = Atom::iter()
            .map(|atom| Ok((atom, conn.intern_atom(false, atom.as_ref().as_bytes())?)))
            .collect::<Result<Vec<_>>>()?;
        // ..then get all the replies (so that we only need one instead of many round-trips to the
        // X11 server)
        let atoms = atom_requests
            .into_iter()
            .map(|(atom, cookie)| Ok((atom, cookie.reply()?.atom)))
            .collect::<Result<HashMap<_, _>>>()?;
        let names = atoms.iter().map(|(&atom, &id)| (id, atom)).collect();

        Ok(Self { atoms, names })
    }

    pub(crate) fn known_atom(&self, atom: Atom) -> Result<u32> {
        self.atoms
            .get(&atom)
            .copied()
            .ok_or(X11rbError::UnknownAtom(atom))
    }

    pub(crate) fn atom_name(&self, id: u32) -> Option<Atom> {
        self.names.get(&id).copied()
    }
}
