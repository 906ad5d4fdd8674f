//! Data types for working with X window properties
use crate::x::atom::Atom;
use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The `_NET_WM_DESKTOP` value used by clients that should be shown on every desktop.
pub const ALL_DESKTOPS: u32 = 0xFFFF_FFFF;

/// The virtual desktop that a client window has been assigned to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Desktop {
    /// A single desktop, identified by its index
    Index(u32),
    /// The window is "sticky" in the desktop sense: it is visible on all desktops
    All,
}

impl From<u32> for Desktop {
    fn from(raw: u32) -> Self {
        if raw == ALL_DESKTOPS {
            Self::All
        } else {
            Self::Index(raw)
        }
    }
}

/// The two strings making up the ICCCM `WM_CLASS` property of a window.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct WmClass {
    /// The instance name of the window
    pub instance: String,
    /// The class name of the window
    pub class: String,
}

impl WmClass {
    /// Create a new WmClass from an instance and class name.
    pub fn new(instance: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            class: class.into(),
        }
    }

    /// Check whether either the instance or class name is contained in `names`.
    ///
    /// Comparison is case insensitive.
    pub fn matches_any(&self, names: &[String]) -> bool {
        let (inst, cls) = (self.instance.to_lowercase(), self.class.to_lowercase());

        names
            .iter()
            .map(|n| n.to_lowercase())
            .any(|n| n == inst || n == cls)
    }
}

bitflags! {
    /// The `_NET_WM_STATE` flags that are currently set for a client window.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WmState: u32 {
        /// _NET_WM_STATE_MODAL
        const MODAL             = 1 << 0;
        /// _NET_WM_STATE_STICKY
        const STICKY            = 1 << 1;
        /// _NET_WM_STATE_MAXIMIZED_VERT
        const MAXIMIZED_VERT    = 1 << 2;
        /// _NET_WM_STATE_MAXIMIZED_HORZ
        const MAXIMIZED_HORZ    = 1 << 3;
        /// _NET_WM_STATE_SHADED
        const SHADED            = 1 << 4;
        /// _NET_WM_STATE_SKIP_TASKBAR
        const SKIP_TASKBAR      = 1 << 5;
        /// _NET_WM_STATE_SKIP_PAGER
        const SKIP_PAGER        = 1 << 6;
        /// _NET_WM_STATE_HIDDEN
        const HIDDEN            = 1 << 7;
        /// _NET_WM_STATE_FULLSCREEN
        const FULLSCREEN        = 1 << 8;
        /// _NET_WM_STATE_ABOVE
        const ABOVE             = 1 << 9;
        /// _NET_WM_STATE_BELOW
        const BELOW             = 1 << 10;
        /// _NET_WM_STATE_DEMANDS_ATTENTION
        const DEMANDS_ATTENTION = 1 << 11;

        /// Maximized along both axes
        const MAXIMIZED = Self::MAXIMIZED_VERT.bits() | Self::MAXIMIZED_HORZ.bits();
    }
}

const STATE_ATOMS: &[(WmState, Atom)] = &[
    (WmState::MODAL, Atom::NetWmStateModal),
    (WmState::STICKY, Atom::NetWmStateSticky),
    (WmState::MAXIMIZED_VERT, Atom::NetWmStateMaximizedVert),
    (WmState::MAXIMIZED_HORZ, Atom::NetWmStateMaximizedHorz),
    (WmState::SHADED, Atom::NetWmStateShaded),
    (WmState::SKIP_TASKBAR, Atom::NetWmStateSkipTaskbar),
    (WmState::SKIP_PAGER, Atom::NetWmStateSkipPager),
    (WmState::HIDDEN, Atom::NetWmStateHidden),
    (WmState::FULLSCREEN, Atom::NetWmStateFullscreen),
    (WmState::ABOVE, Atom::NetWmStateAbove),
    (WmState::BELOW, Atom::NetWmStateBelow),
    (WmState::DEMANDS_ATTENTION, Atom::NetWmStateDemandsAttention),
];

impl WmState {
    /// The flag corresponding to a given `_NET_WM_STATE_*` atom, if there is one.
    pub fn from_atom(atom: Atom) -> Option<Self> {
        STATE_ATOMS.iter().find(|(_, a)| *a == atom).map(|(s, _)| *s)
    }

    /// Collect the flags for all known state atoms, silently dropping anything else.
    pub fn from_atoms<I>(atoms: I) -> Self
    where
        I: IntoIterator<Item = Atom>,
    {
        atoms
            .into_iter()
            .filter_map(Self::from_atom)
            .fold(Self::empty(), |acc, s| acc | s)
    }

    /// The `_NET_WM_STATE_*` atoms for each flag that is set.
    pub fn atoms(&self) -> Vec<Atom> {
        STATE_ATOMS
            .iter()
            .filter(|(s, _)| self.contains(*s))
            .map(|(_, a)| *a)
            .collect()
    }
}

/// The action to take when requesting a change to a window's `_NET_WM_STATE`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum StateAction {
    /// _NET_WM_STATE_REMOVE
    Remove,
    /// _NET_WM_STATE_ADD
    Add,
    /// _NET_WM_STATE_TOGGLE
    Toggle,
}

impl From<StateAction> for u32 {
    fn from(action: StateAction) -> u32 {
        match action {
            StateAction::Remove => 0,
            StateAction::Add => 1,
            StateAction::Toggle => 2,
        }
    }
}

bitflags! {
    /// The pointer buttons reported as held down when querying the pointer.
    ///
    /// Bit positions match the core protocol `KeyButMask`.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonMask: u16 {
        /// Button 1 (normally the left button)
        const BUTTON_1 = 1 << 8;
        /// Button 2 (normally the middle button)
        const BUTTON_2 = 1 << 9;
        /// Button 3 (normally the right button)
        const BUTTON_3 = 1 << 10;
        /// Button 4 (normally scroll up)
        const BUTTON_4 = 1 << 11;
        /// Button 5 (normally scroll down)
        const BUTTON_5 = 1 << 12;
    }
}

impl ButtonMask {
    /// Whether or not one of the buttons used for dragging windows is held.
    pub fn is_dragging(&self) -> bool {
        self.intersects(Self::BUTTON_1 | Self::BUTTON_3)
    }
}
