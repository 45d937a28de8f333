//! Typed signals with disposable subscriptions.
//!
//! A [`Signal`] is a named, synchronous publish/subscribe channel. Handlers are
//! invoked in connection order on the thread that calls [`Signal::emit`].
//! Connecting returns a [`Subscription`]; dropping it (or calling
//! [`Subscription::dispose`]) disconnects the handler.
//!
//! # Dispatch Semantics
//!
//! - The handler list is snapshotted before dispatch, so handlers connected
//!   while an emission is running are not invoked until the next emission.
//! - Handlers disposed while an emission is running are skipped for the rest
//!   of that emission.
//! - No lock is held while a handler runs. Handlers may freely connect,
//!   dispose, or emit other signals.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

// ============================================================================
// Types
// ============================================================================

/// Shared handler stored in a signal.
type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A connected handler together with its liveness flag.
struct Slot<T> {
    /// Connection ID, unique per signal.
    id: u64,
    /// Cleared as soon as the owning subscription is disposed.
    active: Arc<AtomicBool>,
    /// The handler itself.
    handler: Handler<T>,
}

/// Type-erased disconnect capability used by [`Subscription`].
trait Disconnect: Send + Sync {
    fn disconnect(&self, id: u64);
}

struct SignalInner<T> {
    name: &'static str,
    next_id: AtomicU64,
    slots: Mutex<Vec<Slot<T>>>,
}

impl<T> Disconnect for SignalInner<T> {
    fn disconnect(&self, id: u64) { self.slots.lock().retain(|slot| slot.id != id); }
}

// ============================================================================
// Signal
// ============================================================================

/// A named lifecycle signal carrying a payload of type `T`.
///
/// Cloning a `Signal` yields another handle to the same subscriber list.
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self { Self { inner: Arc::clone(&self.inner) } }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.inner.name)
            .field("subscribers", &self.inner.slots.lock().len())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a signal with no subscribers.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                name,
                next_id: AtomicU64::new(1),
                slots: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns the signal name (e.g. `windowAdded`).
    #[must_use]
    pub fn name(&self) -> &'static str { self.inner.name }

    /// Returns the number of connected handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize { self.inner.slots.lock().len() }

    /// Connects a handler and returns the subscription that keeps it alive.
    ///
    /// The handler stays connected until the returned [`Subscription`] is
    /// dropped or disposed.
    pub fn connect<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));

        self.inner.slots.lock().push(Slot {
            id,
            active: Arc::clone(&active),
            handler: Arc::new(handler),
        });

        let inner: Arc<dyn Disconnect> = self.inner.clone();
        Subscription {
            id,
            signal: self.inner.name,
            active,
            owner: Arc::downgrade(&inner),
        }
    }

    /// Delivers `payload` to every handler connected when the call starts.
    pub fn emit(&self, payload: &T) {
        let snapshot: Vec<(Arc<AtomicBool>, Handler<T>)> = self
            .inner
            .slots
            .lock()
            .iter()
            .map(|slot| (Arc::clone(&slot.active), Arc::clone(&slot.handler)))
            .collect();

        tracing::trace!(signal = self.inner.name, handlers = snapshot.len(), "emitting signal");

        for (active, handler) in snapshot {
            if active.load(Ordering::Acquire) {
                handler(payload);
            }
        }
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Disposable connection between a [`Signal`] and a handler.
///
/// Dropping the subscription disconnects the handler. Disposal is idempotent
/// and safe after the signal itself has been dropped.
#[must_use = "dropping a Subscription disconnects its handler"]
pub struct Subscription {
    id: u64,
    signal: &'static str,
    active: Arc<AtomicBool>,
    owner: Weak<dyn Disconnect>,
}

impl Subscription {
    /// Returns the name of the signal this subscription is connected to.
    #[must_use]
    pub const fn signal_name(&self) -> &'static str { self.signal }

    /// Returns whether the handler is still connected.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire) && self.owner.strong_count() > 0
    }

    /// Disconnects the handler.
    pub fn dispose(self) { drop(self); }

    fn disconnect(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(owner) = self.owner.upgrade() {
            owner.disconnect(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) { self.disconnect(); }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("signal", &self.signal)
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
