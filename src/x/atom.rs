//! Data types for working with X atoms
use strum::{AsRefStr, EnumIter, EnumString};

/// A tyle internal representation of X atoms.
///
/// Atom names are shared between all X11 API libraries so this enum allows us to get a little bit
/// of type safety around their use. Only the atoms that are consulted when tracking clients are
/// listed here.
#[derive(AsRefStr, EnumString, EnumIter, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Atom {
    /// UTF8_STRING
    #[strum(serialize = "UTF8_STRING")]
    UTF8String,
    /// WM_CLASS
    #[strum(serialize = "WM_CLASS")]
    WmClass,
    /// WM_NAME
    #[strum(serialize = "WM_NAME")]
    WmName,
    /// WM_TRANSIENT_FOR
    #[strum(serialize = "WM_TRANSIENT_FOR")]
    WmTransientFor,
    /// _NET_ACTIVE_WINDOW
    #[strum(serialize = "_NET_ACTIVE_WINDOW")]
    NetActiveWindow,
    /// _NET_CLIENT_LIST_STACKING
    #[strum(serialize = "_NET_CLIENT_LIST_STACKING")]
    NetClientListStacking,
    /// _NET_MOVERESIZE_WINDOW
    #[strum(serialize = "_NET_MOVERESIZE_WINDOW")]
    NetMoveResizeWindow,
    /// _NET_WM_DESKTOP
    #[strum(serialize = "_NET_WM_DESKTOP")]
    NetWmDesktop,
    /// _NET_WM_NAME
    #[strum(serialize = "_NET_WM_NAME")]
    NetWmName,
    /// _NET_WM_STATE
    #[strum(serialize = "_NET_WM_STATE")]
    NetWmState,
    /// _NET_WM_WINDOW_TYPE
    #[strum(serialize = "_NET_WM_WINDOW_TYPE")]
    NetWmWindowType,

    // Window States
    /// _NET_WM_STATE_MODAL
    #[strum(serialize = "_NET_WM_STATE_MODAL")]
    NetWmStateModal,
    /// _NET_WM_STATE_STICKY
    #[strum(serialize = "_NET_WM_STATE_STICKY")]
    NetWmStateSticky,
    /// _NET_WM_STATE_MAXIMIZED_VERT
    #[strum(serialize = "_NET_WM_STATE_MAXIMIZED_VERT")]
    NetWmStateMaximizedVert,
    /// _NET_WM_STATE_MAXIMIZED_HORZ
    #[strum(serialize = "_NET_WM_STATE_MAXIMIZED_HORZ")]
    NetWmStateMaximizedHorz,
    /// _NET_WM_STATE_SHADED
    #[strum(serialize = "_NET_WM_STATE_SHADED")]
    NetWmStateShaded,
    /// _NET_WM_STATE_SKIP_TASKBAR
    #[strum(serialize = "_NET_WM_STATE_SKIP_TASKBAR")]
    NetWmStateSkipTaskbar,
    /// _NET_WM_STATE_SKIP_PAGER
    #[strum(serialize = "_NET_WM_STATE_SKIP_PAGER")]
    NetWmStateSkipPager,
    /// _NET_WM_STATE_HIDDEN
    #[strum(serialize = "_NET_WM_STATE_HIDDEN")]
    NetWmStateHidden,
    /// _NET_WM_STATE_FULLSCREEN
    #[strum(serialize = "_NET_WM_STATE_FULLSCREEN")]
    NetWmStateFullscreen,
    /// _NET_WM_STATE_ABOVE
    #[strum(serialize = "_NET_WM_STATE_ABOVE")]
    NetWmStateAbove,
    /// _NET_WM_STATE_BELOW
    #[strum(serialize = "_NET_WM_STATE_BELOW")]
    NetWmStateBelow,
    /// _NET_WM_STATE_DEMANDS_ATTENTION
    #[strum(serialize = "_NET_WM_STATE_DEMANDS_ATTENTION")]
    NetWmStateDemandsAttention,

    // Window Types
    /// _NET_WM_WINDOW_TYPE_DESKTOP
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DESKTOP")]
    NetWindowTypeDesktop,
    /// _NET_WM_WINDOW_TYPE_DOCK
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DOCK")]
    NetWindowTypeDock,
    /// _NET_WM_WINDOW_TYPE_TOOLBAR
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_TOOLBAR")]
    NetWindowTypeToolbar,
    /// _NET_WM_WINDOW_TYPE_MENU
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_MENU")]
    NetWindowTypeMenu,
    /// _NET_WM_WINDOW_TYPE_UTILITY
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_UTILITY")]
    NetWindowTypeUtility,
    /// _NET_WM_WINDOW_TYPE_SPLASH
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_SPLASH")]
    NetWindowTypeSplash,
    /// _NET_WM_WINDOW_TYPE_DIALOG
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DIALOG")]
    NetWindowTypeDialog,
    /// _NET_WM_WINDOW_TYPE_DROPDOWN_MENU
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DROPDOWN_MENU")]
    NetWindowTypeDropdownMenu,
    /// _NET_WM_WINDOW_TYPE_POPUP_MENU
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_POPUP_MENU")]
    NetWindowTypePopupMenu,
    /// _NET_WM_WINDOW_TYPE_TOOLTIP
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_TOOLTIP")]
    NetWindowTypeTooltip,
    /// _NET_WM_WINDOW_TYPE_NOTIFICATION
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_NOTIFICATION")]
    NetWindowTypeNotification,
    /// _NET_WM_WINDOW_TYPE_COMBO
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_COMBO")]
    NetWindowTypeCombo,
    /// _NET_WM_WINDOW_TYPE_DND
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DND")]
    NetWindowTypeDnd,
    /// _NET_WM_WINDOW_TYPE_NORMAL
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_NORMAL")]
    NetWindowTypeNormal,
}

/// Clients with one of these window types are never tracked.
///
/// A window's type does not change over its lifetime so a match here is cached.
pub const UNTRACKED_WINDOW_TYPES: &[Atom] = &[
    Atom::NetWindowTypeDesktop,
    Atom::NetWindowTypeDock,
    Atom::NetWindowTypeToolbar,
    Atom::NetWindowTypeMenu,
    Atom::NetWindowTypeUtility,
    Atom::NetWindowTypeSplash,
    Atom::NetWindowTypeDialog,
    Atom::NetWindowTypeDropdownMenu,
    Atom::NetWindowTypePopupMenu,
    Atom::NetWindowTypeTooltip,
    Atom::NetWindowTypeNotification,
    Atom::NetWindowTypeCombo,
    Atom::NetWindowTypeDnd,
];
