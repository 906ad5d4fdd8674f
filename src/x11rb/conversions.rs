//! Conversions to tyle types from x11rb types
use crate::{
    pure::geometry::Rect,
    x::event::{ConfigureEvent, FocusEvent, NotifyMode, PropertyEvent, XEvent},
    x11rb::{X11rbConnection, X11rbError},
    Error, Result, Xid,
};
use tracing::{trace, warn};
use x11rb::{
    connection::Connection,
    errors::ReplyError,
    protocol::{xproto, ErrorKind, Event},
};

/// Map errors caused by a window having been destroyed to [Error::WindowNotFound].
pub(crate) trait ReplyExt<T> {
    fn for_window(self, id: Xid) -> Result<T>;
}

impl<T> ReplyExt<T> for std::result::Result<T, ReplyError> {
    fn for_window(self, id: Xid) -> Result<T> {
        self.map_err(|e| match e {
            ReplyError::X11Error(ref err)
                if matches!(err.error_kind, ErrorKind::Window | ErrorKind::Drawable) =>
            {
                Error::WindowNotFound(id)
            }
            e => X11rbError::from(e).into(),
        })
    }
}

fn notify_mode(mode: xproto::NotifyMode) -> NotifyMode {
    match mode {
        xproto::NotifyMode::GRAB => NotifyMode::Grab,
        xproto::NotifyMode::UNGRAB => NotifyMode::Ungrab,
        xproto::NotifyMode::WHILE_GRABBED => NotifyMode::WhileGrabbed,
        _ => NotifyMode::Normal,
    }
}

pub(crate) fn convert_event<C: Connection>(
    conn: &X11rbConnection<C>,
    event: Event,
) -> Result<Option<XEvent>> {
    match event {
        Event::ConfigureNotify(event) => Ok(Some(XEvent::ConfigureNotify(ConfigureEvent {
            id: Xid(event.window),
            r: Rect::new(
                event.x as i32,
                event.y as i32,
                event.width as u32,
                event.height as u32,
            ),
        }))),

        Event::FocusIn(event) => Ok(Some(XEvent::FocusIn(FocusEvent {
            id: Xid(event.event),
            mode: notify_mode(event.mode),
        }))),

        Event::FocusOut(event) => Ok(Some(XEvent::FocusOut(FocusEvent {
            id: Xid(event.event),
            mode: notify_mode(event.mode),
        }))),

        Event::PropertyNotify(event) => Ok(Some(XEvent::PropertyNotify(PropertyEvent {
            id: Xid(event.window),
            atom: conn.atom_name(event.atom)?,
        }))),

        // Requests racing against windows being destroyed are expected
        Event::Error(err) if matches!(err.error_kind, ErrorKind::Window | ErrorKind::Drawable) => {
            trace!(?err, "window error from X server");
            Ok(None)
        }

        Event::Error(err) => {
            warn!(?err, "error from X server");
            Ok(None)
        }

        // NOTE: Ignoring other event types
        _ => Ok(None),
    }
}
