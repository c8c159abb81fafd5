//! Reaction channel - observe a value every frame, react on the main context.
//!
//! The animation context owns a [`Reactor`]: a list of watched sources, each a
//! `Fn() -> i64` bucket function (read a shared scalar, map it to an identity
//! or bucket). [`Reactor::evaluate`] runs once per frame tick, after every
//! writer of that frame. When a watch observes a bucket different from the one
//! it saw last, it posts exactly one [`Change`] over an mpsc channel.
//!
//! The main context owns the matching [`Dispatcher`]. [`Dispatcher::drain`]
//! runs each posted change exactly once, in posting order, with mutable access
//! to a caller-supplied main-context value `C` (for the tab bar: the
//! navigation collaborator).
//!
//! ```text
//! animation context                     main context
//! ─────────────────                     ────────────
//! writers (gestures, convergences)
//! Reactor::evaluate ── Change ──mpsc──▶ Dispatcher::drain ──▶ on_change(&mut C, change)
//! ```
//!
//! The first evaluation of a watch only records its baseline.
//!
//! # Example
//!
//! ```
//! use spark_tabbar::reaction::{subscribe, Dispatcher, Reactor};
//! use spark_tabbar::shared::SharedIndex;
//!
//! let mut reactor = Reactor::new();
//! let mut dispatcher: Dispatcher<Vec<i64>> = Dispatcher::new();
//! let index = SharedIndex::with(0);
//!
//! let watched = index.clone();
//! subscribe(&mut reactor, &mut dispatcher, move || watched.raw(), |seen, change| {
//!     seen.push(change.current);
//! });
//!
//! reactor.evaluate(); // baseline
//! index.set(2);
//! reactor.evaluate();
//!
//! let mut seen = Vec::new();
//! dispatcher.drain(&mut seen);
//! assert_eq!(seen, vec![2]);
//! ```

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

// =============================================================================
// TYPES
// =============================================================================

/// Identifies one registered main-context handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// One observed crossing (or one-shot notification when `previous` is `None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub previous: Option<i64>,
    pub current: i64,
}

struct Envelope {
    id: SubscriptionId,
    change: Change,
}

/// Send side of one subscription. `Send + Clone`, usable from any context.
#[derive(Clone)]
pub struct Notifier {
    id: SubscriptionId,
    tx: Sender<Envelope>,
}

impl Notifier {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Post a change to the main context. Returns false if the dispatcher is gone.
    pub fn notify(&self, change: Change) -> bool {
        self.tx.send(Envelope { id: self.id, change }).is_ok()
    }
}

// =============================================================================
// REACTOR (animation context)
// =============================================================================

struct Watch {
    source: Box<dyn Fn() -> i64 + Send>,
    last: Option<i64>,
    notifier: Notifier,
}

/// Per-frame observer of watched sources.
#[derive(Default)]
pub struct Reactor {
    watches: Vec<Watch>,
}

impl Reactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch `source`; crossings are posted through `notifier`.
    pub fn watch<F>(&mut self, source: F, notifier: Notifier)
    where
        F: Fn() -> i64 + Send + 'static,
    {
        self.watches.push(Watch {
            source: Box::new(source),
            last: None,
            notifier,
        });
    }

    /// Watch `source`, treating `baseline` as already observed.
    pub fn watch_from<F>(&mut self, source: F, baseline: i64, notifier: Notifier)
    where
        F: Fn() -> i64 + Send + 'static,
    {
        self.watches.push(Watch {
            source: Box::new(source),
            last: Some(baseline),
            notifier,
        });
    }

    /// Stop watching the source bound to `id`.
    pub fn unwatch(&mut self, id: SubscriptionId) {
        self.watches.retain(|w| w.notifier.id != id);
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Evaluate every watch once. Returns how many crossings were posted.
    pub fn evaluate(&mut self) -> usize {
        let mut posted = 0;
        for watch in &mut self.watches {
            let current = (watch.source)();
            match watch.last {
                None => watch.last = Some(current),
                Some(previous) if previous != current => {
                    watch.last = Some(current);
                    if watch.notifier.notify(Change {
                        previous: Some(previous),
                        current,
                    }) {
                        posted += 1;
                    }
                }
                Some(_) => {}
            }
        }
        posted
    }
}

// =============================================================================
// DISPATCHER (main context)
// =============================================================================

type Handler<C> = Box<dyn FnMut(&mut C, Change)>;

/// Main-context end of the channel: owns the handlers.
pub struct Dispatcher<C: ?Sized> {
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    handlers: HashMap<SubscriptionId, Handler<C>>,
    next_id: usize,
}

impl<C: ?Sized> Dispatcher<C> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            handlers: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a handler. The returned notifier posts to it.
    pub fn register<F>(&mut self, handler: F) -> Notifier
    where
        F: FnMut(&mut C, Change) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.insert(id, Box::new(handler));
        Notifier {
            id,
            tx: self.tx.clone(),
        }
    }

    /// Remove a handler. Changes already posted to it are dropped on drain.
    pub fn unregister(&mut self, id: SubscriptionId) {
        self.handlers.remove(&id);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Run every posted change once, in order. Returns how many ran.
    pub fn drain(&mut self, cx: &mut C) -> usize {
        let mut ran = 0;
        loop {
            match self.rx.try_recv() {
                Ok(envelope) => {
                    if let Some(handler) = self.handlers.get_mut(&envelope.id) {
                        handler(cx, envelope.change);
                        ran += 1;
                    } else {
                        tracing::trace!(id = envelope.id.0, "dropping change for removed subscription");
                    }
                }
                // The dispatcher holds a sender, so Disconnected cannot happen.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        ran
    }
}

impl<C: ?Sized> Default for Dispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Watch `source` on `reactor` and run `on_change` on `dispatcher`'s context.
pub fn subscribe<C, S, F>(
    reactor: &mut Reactor,
    dispatcher: &mut Dispatcher<C>,
    source: S,
    on_change: F,
) -> SubscriptionId
where
    C: ?Sized,
    S: Fn() -> i64 + Send + 'static,
    F: FnMut(&mut C, Change) + 'static,
{
    let notifier = dispatcher.register(on_change);
    let id = notifier.id();
    reactor.watch(source, notifier);
    id
}

// =============================================================================
// Tests
// =============================================================================
