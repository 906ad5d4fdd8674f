//! Data types for working with X events
use crate::{pure::geometry::Rect, Xid};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wrapper around the low level X event types that are of interest when tracking clients.
///
/// The variant names and data have developed with the x11rb implementation in mind but
/// should be applicable for all back ends.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XEvent {
    /// A window has been configured (moved, resized, restacked...)
    ConfigureNotify(ConfigureEvent),
    /// A window has received input focus
    FocusIn(FocusEvent),
    /// A window has lost input focus
    FocusOut(FocusEvent),
    /// A property has been changed on a window
    PropertyNotify(PropertyEvent),
}

/// A notification that a window's geometry or stacking has been changed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureEvent {
    /// The ID of the window that was configured
    pub id: Xid,
    /// The new window geometry
    pub r: Rect,
}

/// A notification that a property on a window has changed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEvent {
    /// The ID of the window that had a property changed
    pub id: Xid,
    /// The name of the property that changed
    pub atom: String,
}

/// The detail mode attached to a focus change.
///
/// Window managers grab the pointer and keyboard while a window is being dragged, which shows
/// up as a focus change with mode [NotifyMode::Grab] (and [NotifyMode::Ungrab] once released).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyMode {
    /// A regular focus change
    Normal,
    /// Focus moved as the result of a grab being activated
    Grab,
    /// Focus moved as the result of a grab being released
    Ungrab,
    /// Focus moved while a grab was active
    WhileGrabbed,
}

/// A notification that a window has gained or lost focus.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusEvent {
    /// The ID of the window whose focus changed
    pub id: Xid,
    /// The reason for the focus change
    pub mode: NotifyMode,
}
