//! tyle :: client tracking for a tiling assistant
//!
//! `tyle` runs alongside an existing EWMH compliant window manager rather than replacing it. It
//! watches the `_NET_CLIENT_LIST_STACKING` property of the root window, decides which top level
//! windows are candidates for automatic tiling and keeps enough per-window state around to put
//! those windows back where they were when tiling is turned off again.
//!
//! Deciding _where_ windows should go is left to an implementation of the [Tiler][1] trait: this
//! crate only tells it when clients appear, disappear, change desktop or finish being dragged
//! around by the user.
//!
//! [1]: crate::tiler::Tiler
#![warn(
    clippy::complexity,
    clippy::correctness,
    clippy::style,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rustdoc::all
)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::trace;

pub mod core;
pub mod pure;
pub mod tiler;
pub mod x;
#[cfg(feature = "x11rb")]
pub mod x11rb;

#[doc(inline)]
pub use crate::core::{Config, Tracker};
#[doc(inline)]
pub use crate::pure::geometry;

/// An X11 ID for a given resource
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Xid(pub(crate) u32);

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Error variants from the core library.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An attempt was made to start tracking a client that is already being tracked.
    ///
    /// This is only possible if the reconciliation of the stacking list has broken down.
    #[error("client {0} is already being tracked")]
    AlreadyTracked(Xid),

    /// A generic error type for use in user code when needing to construct
    /// a simple [Error].
    #[error("Unhandled error: {0}")]
    Raw(String),

    /// Parsing an [Atom][crate::x::Atom] from a str failed.
    ///
    /// This happens when the atom name being requested is not a known atom.
    #[error(transparent)]
    Strum(#[from] strum::ParseError),

    /// An attempt was made to reference a client that is not being tracked
    #[error("{0} is not a known client")]
    UnknownClient(Xid),

    /// The window targeted by a request no longer exists on the X server.
    ///
    /// Windows can be destroyed at any point between us deciding to act on them and
    /// the request reaching the server so this is expected and normally discarded.
    #[error("window {0} no longer exists")]
    WindowNotFound(Xid),

    /// Something went wrong using the [x11rb] module.
    ///
    /// See [X11rbError][crate::x11rb::X11rbError] for variants.
    #[cfg(feature = "x11rb")]
    #[error(transparent)]
    X11rb(#[from] crate::x11rb::X11rbError),
}

/// A Result where the error type is a tyle [Error]
pub type Result<T> = std::result::Result<T, Error>;

/// Discard [Error::WindowNotFound], returning `Ok(None)` in its place.
///
/// Any other error is passed through unmodified.
pub fn ignore_missing<T>(res: Result<T>) -> Result<Option<T>> {
    match res {
        Ok(t) => Ok(Some(t)),
        Err(Error::WindowNotFound(id)) => {
            trace!(%id, "window no longer exists: discarding request");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
