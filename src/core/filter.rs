//! Deciding which windows should be tracked at all
//!
//! Windows are run through a fixed series of checks and the first failing check decides the
//! outcome. Failures rooted in what _kind_ of window something is (a dialog, a dock...) can
//! never change over the lifetime of the window and are reported as [Eligibility::Permanent]
//! so they can be cached. Everything else is reported as [Eligibility::Transient] and the
//! checks will be run again the next time the window is considered.
use crate::{
    core::Config,
    x::{
        atom::{Atom, UNTRACKED_WINDOW_TYPES},
        property::{Desktop, WmState},
        XConn,
    },
    Result, Xid,
};
use std::fmt;

/// States that prevent a window from being tracked while they are set.
pub const UNTRACKED_STATES: WmState = WmState::SHADED
    .union(WmState::HIDDEN)
    .union(WmState::FULLSCREEN)
    .union(WmState::MODAL);

/// The reason that a window is not being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The window has a class or instance name in [Config::ignore_classes]
    IgnoredClass(String),
    /// The window is transient for another window
    TransientFor(Xid),
    /// The window has one of the [UNTRACKED_WINDOW_TYPES]
    WindowType(Atom),
    /// The window does not have a `_NET_WM_STATE` property
    NoState,
    /// The window is sticky
    Sticky,
    /// The window has one or more of the [UNTRACKED_STATES] set
    State(WmState),
    /// The window is shown on all desktops
    AllDesktops,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IgnoredClass(c) => write!(f, "class {c} is in the ignore list"),
            Self::TransientFor(id) => write!(f, "it is transient for {id}"),
            Self::WindowType(a) => write!(f, "it has type {}", a.as_ref()),
            Self::NoState => write!(f, "it does not have a state"),
            Self::Sticky => write!(f, "it is sticky"),
            Self::State(s) => write!(f, "it has state {s:?}"),
            Self::AllDesktops => write!(f, "it is on all desktops"),
        }
    }
}

/// The outcome of checking whether or not a window should be tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Eligibility {
    /// The window can be tracked
    Eligible,
    /// The window can never be tracked
    Permanent(IgnoreReason),
    /// The window can not be tracked in its current state
    Transient(IgnoreReason),
}

/// Run the eligibility checks for a single window.
///
/// This reads the current properties of the window and has no other side effects.
pub fn classify<X: XConn>(id: Xid, x: &X, config: &Config) -> Result<Eligibility> {
    use Eligibility::*;
    use IgnoreReason::*;

    if let Some(class) = x.window_class(id)? {
        if class.matches_any(&config.ignore_classes) {
            return Ok(Transient(IgnoredClass(class.class)));
        }
    }

    if let Some(parent) = x.transient_for(id)? {
        return Ok(Permanent(TransientFor(parent)));
    }

    if let Some(&ty) = x
        .window_types(id)?
        .iter()
        .find(|ty| UNTRACKED_WINDOW_TYPES.contains(ty))
    {
        return Ok(Permanent(WindowType(ty)));
    }

    let state = match x.wm_state(id)? {
        Some(state) => state,
        None => return Ok(Transient(NoState)),
    };

    if config.ignore_sticky && state.contains(WmState::STICKY) {
        return Ok(Transient(Sticky));
    }

    if state.intersects(UNTRACKED_STATES) {
        return Ok(Transient(State(state & UNTRACKED_STATES)));
    }

    if config.ignore_all_desktops && x.window_desktop(id)? == Some(Desktop::All) {
        return Ok(Transient(AllDesktops));
    }

    Ok(Eligible)
}
