//! Core data structures and the main event loop
use crate::{
    tiler::Tiler,
    x::{
        event::{ConfigureEvent, FocusEvent, PropertyEvent},
        Atom, EventClass, XConn, XEvent,
    },
    Result,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use tracing::{debug, error, info, trace};

pub mod client;
pub mod filter;
pub mod registry;
pub mod router;

#[doc(inline)]
pub use client::{Client, MoveState};
#[doc(inline)]
pub use registry::ClientRegistry;

/// The user facing configuration for a [Tracker].
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tyle::Config;
///
/// let config = Config {
///     ignore_classes: vec!["gimp".to_owned()],
///     remap_delay: Duration::ZERO,
///     ..Config::default()
/// };
///
/// assert!(config.ignore_sticky);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Window class or instance names (compared case insensitively) that are never tracked.
    pub ignore_classes: Vec<String>,
    /// How long to wait after a new window appears before connecting to it.
    ///
    /// Only applied once the initial set of windows has been processed.
    pub remap_delay: Duration,
    /// Whether or not sticky windows should be ignored.
    pub ignore_sticky: bool,
    /// Whether or not windows shown on all desktops should be ignored.
    pub ignore_all_desktops: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_classes: vec![],
            remap_delay: Duration::from_millis(200),
            ignore_sticky: true,
            ignore_all_desktops: true,
        }
    }
}

/// Whether the [Tracker] is still picking up the windows that existed when it started.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Processing the initial set of windows
    #[default]
    Starting,
    /// Responding to changes as they happen
    Running,
}

/// Ties together an [XConn], a [ClientRegistry] and a [Tiler] and drives them from the
/// events reported by the X server.
pub struct Tracker<X, T>
where
    X: XConn,
    T: Tiler<X>,
{
    x: X,
    registry: ClientRegistry,
    tiler: T,
}

impl<X, T> fmt::Debug for Tracker<X, T>
where
    X: XConn,
    T: Tiler<X>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("registry", &self.registry)
            .finish()
    }
}

impl<X, T> Tracker<X, T>
where
    X: XConn,
    T: Tiler<X>,
{
    /// Create a new tracker. No requests are made to the X server until [Tracker::init]
    /// or [Tracker::run] are called.
    pub fn new(config: Config, x: X, tiler: T) -> Self {
        Self {
            x,
            registry: ClientRegistry::new(config),
            tiler,
        }
    }

    /// The X connection in use.
    pub fn x(&self) -> &X {
        &self.x
    }

    /// The current set of tracked clients.
    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// The [Tiler] being notified of changes.
    pub fn tiler(&self) -> &T {
        &self.tiler
    }

    /// Mutable access to the [Tiler] being notified of changes.
    pub fn tiler_mut(&mut self) -> &mut T {
        &mut self.tiler
    }

    /// Start listening for changes to the stacking list and pick up all existing windows.
    pub fn init(&mut self) -> Result<()> {
        let root = self.x.root();
        debug!(%root, "selecting for property changes on the root window");
        self.x.select_input(root, &[EventClass::PropertyChange])?;

        self.registry.update_clients(&self.x, &mut self.tiler)?;
        self.registry.set_run_state(RunState::Running);
        info!(n_clients = self.registry.len(), "initial clients tracked");

        Ok(())
    }

    /// Initialise the tracker and then handle events from the X server until an error is
    /// encountered reading from the connection.
    ///
    /// Errors handling individual events are logged and otherwise ignored.
    pub fn run(mut self) -> Result<()> {
        self.init()?;

        debug!("entering main event loop");
        loop {
            let event = self.x.next_event()?;
            trace!(?event, "got XEvent");

            if let Err(e) = self.handle_xevent(event) {
                error!(%e, "error handling XEvent");
            }

            self.x.flush();
        }
    }

    /// Dispatch a single event to the client it is routed to.
    ///
    /// Events for windows that no client has subscribed to are dropped.
    pub fn handle_xevent(&mut self, event: XEvent) -> Result<()> {
        let (x, registry, tiler) = (&self.x, &mut self.registry, &mut self.tiler);

        match event {
            XEvent::PropertyNotify(PropertyEvent { id, atom }) if id == x.root() => {
                if atom == Atom::NetClientListStacking.as_ref() {
                    registry.update_clients(x, tiler)?;
                }
            }

            XEvent::PropertyNotify(PropertyEvent { id, atom }) => {
                if let Some(owner) = registry.router().owner_of(id, EventClass::PropertyChange) {
                    registry.client_property_changed(owner, &atom, x, tiler)?;
                }
            }

            XEvent::FocusIn(FocusEvent { id, mode }) => {
                if let Some(owner) = registry.router().owner_of(id, EventClass::FocusChange) {
                    registry.client_focus_in(owner, mode, x, tiler)?;
                }
            }

            XEvent::FocusOut(FocusEvent { id, mode }) => {
                if let Some(owner) = registry.router().owner_of(id, EventClass::FocusChange) {
                    registry.client_focus_out(owner, mode)?;
                }
            }

            XEvent::ConfigureNotify(ConfigureEvent { id, .. }) => {
                if let Some(owner) = registry.router().owner_of(id, EventClass::StructureNotify) {
                    registry.client_configured(owner, x)?;
                }
            }
        }

        Ok(())
    }
}
