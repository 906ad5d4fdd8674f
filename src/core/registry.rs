//! The set of tracked clients and keeping it in sync with the window manager
use crate::{
    core::{
        client::Client,
        filter::{classify, Eligibility},
        router::EventRouter,
        Config, RunState,
    },
    ignore_missing,
    tiler::Tiler,
    x::{event::NotifyMode, Atom, XConn, XConnExt},
    Error, Result, Xid,
};
use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
    thread,
};
use tracing::{debug, error, info, trace, warn};

/// Owner of every [Client] that is currently being tracked.
///
/// The registry is the only place that clients are created and destroyed: it diffs the
/// stacking list published by the window manager against what it already knows about and
/// makes sure that the [Tiler] is told about every change.
#[derive(Debug)]
pub struct ClientRegistry {
    config: Config,
    clients: HashMap<Xid, Client>,
    ignored: HashSet<Xid>,
    grabbed: Option<Xid>,
    router: EventRouter,
    run_state: RunState,
}

impl ClientRegistry {
    /// Create a new, empty registry.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            clients: HashMap::new(),
            ignored: HashSet::new(),
            grabbed: None,
            router: EventRouter::new(),
            run_state: RunState::Starting,
        }
    }

    /// The [Config] in use by this registry.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether we are still processing the initial set of clients or are up and running.
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub(crate) fn set_run_state(&mut self, run_state: RunState) {
        self.run_state = run_state;
    }

    /// The router holding the event subscriptions of all tracked clients.
    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// Look up a tracked client by ID.
    pub fn client(&self, id: Xid) -> Option<&Client> {
        self.clients.get(&id)
    }

    /// Mutable access to a tracked client, for running [Client] actions against it.
    pub fn client_mut(&mut self, id: Xid) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    /// An iterator over all tracked clients in arbitrary order.
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// The IDs of all tracked clients in ascending order.
    pub fn tracked_ids(&self) -> Vec<Xid> {
        let mut ids: Vec<Xid> = self.clients.keys().copied().collect();
        ids.sort();

        ids
    }

    /// The number of tracked clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether or not there are any tracked clients.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether or not `id` is a tracked client.
    pub fn is_tracked(&self, id: Xid) -> bool {
        self.clients.contains_key(&id)
    }

    /// Whether or not `id` has been found to be permanently ineligible for tracking.
    pub fn is_ignored(&self, id: Xid) -> bool {
        self.ignored.contains(&id)
    }

    /// The client that most recently lost focus to a grab, if any.
    pub fn grabbed(&self) -> Option<Xid> {
        self.grabbed
    }

    /// Check whether or not a window should be left alone.
    ///
    /// Windows found to be permanently ineligible are remembered and never checked again.
    /// If the window can not be inspected then it is ignored for now.
    pub fn should_ignore<X: XConn>(&mut self, id: Xid, x: &X) -> bool {
        if self.ignored.contains(&id) {
            trace!(%id, "window is permanently ignored");
            return true;
        }

        match classify(id, x, &self.config) {
            Ok(Eligibility::Eligible) => false,

            Ok(Eligibility::Permanent(reason)) => {
                debug!(%id, %reason, "permanently ignoring window");
                self.ignored.insert(id);
                true
            }

            Ok(Eligibility::Transient(reason)) => {
                debug!(%id, %reason, "ignoring window");
                true
            }

            Err(e) => {
                debug!(%id, %e, "unable to check window: ignoring");
                true
            }
        }
    }

    /// Read the current stacking order from the window manager and reconcile against it.
    pub fn update_clients<X, T>(&mut self, x: &X, tiler: &mut T) -> Result<()>
    where
        X: XConn,
        T: Tiler<X>,
    {
        // Top of the stack first
        let mut ids = x.client_list_stacking()?;
        ids.reverse();
        trace!(?ids, "updating clients");

        self.reconcile(&ids, x, tiler);

        Ok(())
    }

    /// Bring the set of tracked clients in line with `stacking_order`.
    ///
    /// Windows that are not yet tracked are tracked in the order given (provided that they are
    /// eligible) and tracked clients that are missing are untracked. Reconciling against the
    /// same list more than once has no further effect.
    pub fn reconcile<X, T>(&mut self, stacking_order: &[Xid], x: &X, tiler: &mut T)
    where
        X: XConn,
        T: Tiler<X>,
    {
        let desired: HashSet<Xid> = stacking_order.iter().copied().collect();

        for &id in stacking_order {
            if self.clients.contains_key(&id) || self.ignored.contains(&id) {
                continue;
            }

            if let Err(e) = self.track(id, x, tiler) {
                error!(%e, %id, "unable to track client");
            }
        }

        let mut stale: Vec<Xid> = self
            .clients
            .keys()
            .filter(|id| !desired.contains(id))
            .copied()
            .collect();
        stale.sort();

        for id in stale {
            self.untrack(id, x, tiler);
        }

        // X server IDs are reused once a window is destroyed
        self.ignored.retain(|id| desired.contains(id));
    }

    /// Start tracking a window if it is eligible.
    ///
    /// Attempting to track a window that is already tracked is an error. A window that is
    /// ineligible or that disappears before we are able to finish connecting to it is silently
    /// skipped.
    pub fn track<X, T>(&mut self, id: Xid, x: &X, tiler: &mut T) -> Result<()>
    where
        X: XConn,
        T: Tiler<X>,
    {
        if self.clients.contains_key(&id) {
            error!(%id, "attempt to track a client that is already tracked");
            return Err(Error::AlreadyTracked(id));
        }

        if self.should_ignore(id, x) {
            return Ok(());
        }

        let delay = self.config.remap_delay;
        if self.run_state == RunState::Running && !delay.is_zero() {
            // Give the window manager a chance to finish placing the new window
            trace!(%id, ?delay, "waiting before connecting to new window");
            thread::sleep(delay);
        }

        let mut client = match ignore_missing(Client::new(id, x, &mut self.router))? {
            Some(client) => client,
            None => return Ok(()),
        };

        if let Err(e) = tiler.client_added(&client, x) {
            error!(%e, %id, "error running tiler for new client");
        }

        if let Err(e) = ignore_missing(client.save(x)) {
            warn!(%e, %id, "unable to save initial client geometry");
        }

        info!(%id, name = %client.name(), "tracking client");
        self.clients.insert(id, client);

        Ok(())
    }

    /// Stop tracking a client. Untracking a window that is not tracked does nothing.
    pub fn untrack<X, T>(&mut self, id: Xid, x: &X, tiler: &mut T)
    where
        X: XConn,
        T: Tiler<X>,
    {
        let client = match self.clients.remove(&id) {
            Some(client) => client,
            None => return,
        };

        if let Err(e) = tiler.client_removed(&client, x) {
            error!(%e, %id, "error running tiler for removed client");
        }

        if self.grabbed == Some(id) {
            self.grabbed = None;
        }

        info!(%id, name = %client.name(), "untracking client");
        client.release(&mut self.router);
    }

    /// Handle a property change for a tracked client.
    pub fn client_property_changed<X, T>(
        &mut self,
        id: Xid,
        atom: &str,
        x: &X,
        tiler: &mut T,
    ) -> Result<()>
    where
        X: XConn,
        T: Tiler<X>,
    {
        if !self.clients.contains_key(&id) {
            return Err(Error::UnknownClient(id));
        }

        let atom = match Atom::from_str(atom) {
            Ok(atom) => atom,
            Err(_) => return Ok(()),
        };

        match atom {
            Atom::NetWmDesktop => self.desktop_changed(id, x, tiler)?,

            Atom::NetWmState => {
                if self.should_ignore(id, x) {
                    debug!(%id, "client state is no longer eligible for tracking");
                    self.untrack(id, x, tiler);
                }
            }

            Atom::NetWmName | Atom::WmName => {
                let name = x.window_title(id);
                if let Some(client) = self.clients.get_mut(&id) {
                    trace!(%id, %name, "updating client name");
                    client.name = name;
                }
            }

            _ => (),
        }

        Ok(())
    }

    fn desktop_changed<X, T>(&mut self, id: Xid, x: &X, tiler: &mut T) -> Result<()>
    where
        X: XConn,
        T: Tiler<X>,
    {
        if self.should_ignore(id, x) {
            debug!(%id, "client desktop is no longer eligible for tracking");
            self.untrack(id, x, tiler);
            return Ok(());
        }

        let desktop = match ignore_missing(x.window_desktop(id))?.flatten() {
            Some(desktop) => desktop,
            None => return Ok(()),
        };

        let client = match self.clients.get_mut(&id) {
            Some(client) => client,
            None => return Ok(()),
        };

        let old = client.desktop;
        if old == Some(desktop) {
            return Ok(());
        }

        debug!(%id, ?old, new = ?desktop, "client desktop changed");
        client.desktop = Some(desktop);
        if let Err(e) = tiler.client_desktop_changed(client, old, x) {
            error!(%e, %id, "error running tiler for client desktop change");
        }

        Ok(())
    }

    /// Handle a focus out notification for a tracked client.
    pub fn client_focus_out(&mut self, id: Xid, mode: NotifyMode) -> Result<()> {
        let client = self.clients.get(&id).ok_or(Error::UnknownClient(id))?;
        client.focus_out(mode, &mut self.grabbed);

        Ok(())
    }

    /// Handle a configure notification received from the frame of a tracked client.
    pub fn client_configured<X: XConn>(&mut self, id: Xid, x: &X) -> Result<()> {
        let client = self.clients.get_mut(&id).ok_or(Error::UnknownClient(id))?;
        client.configured(self.grabbed, x);

        Ok(())
    }

    /// Handle a focus in notification for a tracked client, letting the [Tiler] know if this
    /// marks the end of the user moving it.
    pub fn client_focus_in<X, T>(
        &mut self,
        id: Xid,
        mode: NotifyMode,
        x: &X,
        tiler: &mut T,
    ) -> Result<()>
    where
        X: XConn,
        T: Tiler<X>,
    {
        let client = self.clients.get_mut(&id).ok_or(Error::UnknownClient(id))?;

        if client.focus_in(mode, &mut self.grabbed) {
            if let Err(e) = tiler.client_moved(client, x) {
                error!(%e, %id, "error running tiler for moved client");
            }
        }

        Ok(())
    }
}
