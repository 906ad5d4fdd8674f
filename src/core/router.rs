//! Bookkeeping for which tracked client owns the notifications arriving for a given window.
//!
//! Each client listens on its own window for property and focus changes, and on its frame
//! (the parent window created by the running window manager) for configure notifications.
//! Registering interest returns a [Subscription] handle which has to be handed back to the
//! router in order to stop routing: there is no other way to remove an entry.
use crate::{x::EventClass, Xid};
use std::collections::HashMap;
use tracing::{trace, warn};

/// A live registration of interest in one class of event for one window.
///
/// Subscriptions are deliberately not `Clone` or `Copy`: the only way to release one is to
/// move it back into [EventRouter::unsubscribe].
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a Subscription without unsubscribing leaves the route in place"]
pub struct Subscription {
    window: Xid,
    class: EventClass,
    owner: Xid,
}

impl Subscription {
    /// The window that events are received from.
    pub fn window(&self) -> Xid {
        self.window
    }

    /// The class of event being routed.
    pub fn class(&self) -> EventClass {
        self.class
    }

    /// The client that events are routed to.
    pub fn owner(&self) -> Xid {
        self.owner
    }
}

/// Maps (window, event class) pairs to the client that should handle them.
#[derive(Debug, Default)]
pub struct EventRouter {
    routes: HashMap<(Xid, EventClass), Xid>,
}

impl EventRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route events of `class` arriving for `window` to the client `owner`.
    ///
    /// A window can only be routed to a single owner per event class: subscribing again
    /// replaces the previous owner.
    pub fn subscribe(&mut self, window: Xid, class: EventClass, owner: Xid) -> Subscription {
        trace!(%window, ?class, %owner, "subscribing");
        if let Some(prev) = self.routes.insert((window, class), owner) {
            if prev != owner {
                warn!(%window, ?class, %prev, %owner, "replacing existing route");
            }
        }

        Subscription {
            window,
            class,
            owner,
        }
    }

    /// Release a [Subscription], stopping events from being routed to its owner.
    pub fn unsubscribe(&mut self, sub: Subscription) {
        let Subscription {
            window,
            class,
            owner,
        } = sub;

        trace!(%window, ?class, %owner, "unsubscribing");
        // Only remove the route if it still points at us
        if self.routes.get(&(window, class)) == Some(&owner) {
            self.routes.remove(&(window, class));
        }
    }

    /// The client, if any, that should handle events of `class` arriving for `window`.
    pub fn owner_of(&self, window: Xid, class: EventClass) -> Option<Xid> {
        self.routes.get(&(window, class)).copied()
    }

    /// The number of active routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether or not there are any active routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
