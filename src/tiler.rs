//! The interface to the layout engine that positions tracked clients
//!
//! A [Tiler] is told about every change to the set of tracked clients but is never asked
//! anything in return: it is free to call [Client::move_resize] (or any of the other client
//! actions) from inside of its callbacks. Errors returned from a [Tiler] are logged and
//! otherwise ignored so that a misbehaving layout can not break tracking.
use crate::{core::client::Client, x::property::Desktop, x::XConn, Result};

/// Callbacks run when the set of tracked clients changes.
///
/// All methods have a default implementation that does nothing.
pub trait Tiler<X>
where
    X: XConn,
{
    /// A new client is now being tracked.
    fn client_added(&mut self, client: &Client, x: &X) -> Result<()> {
        let _ = (client, x);
        Ok(())
    }

    /// A client is no longer being tracked. This is run before the client is dropped.
    fn client_removed(&mut self, client: &Client, x: &X) -> Result<()> {
        let _ = (client, x);
        Ok(())
    }

    /// The user has finished dragging a client to a new position.
    fn client_moved(&mut self, client: &Client, x: &X) -> Result<()> {
        let _ = (client, x);
        Ok(())
    }

    /// A client has been moved to a new desktop. `old` is the desktop it was previously on,
    /// if that was known.
    fn client_desktop_changed(&mut self, client: &Client, old: Option<Desktop>, x: &X) -> Result<()> {
        let _ = (client, old, x);
        Ok(())
    }
}

/// A [Tiler] that leaves every client exactly where it is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoTiling;

impl<X: XConn> Tiler<X> for NoTiling {}
