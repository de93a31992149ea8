//! Single-threaded change listener registry.
//!
//! # Invariants
//! - Listeners run in connection order.
//! - `emit` runs against a snapshot, so listeners may connect or disconnect
//!   other listeners while being notified.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by [`Listeners::connect`], used to disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<A> = Rc<dyn Fn(&A)>;

/// Ordered list of callbacks receiving `&A`.
pub struct Listeners<A> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(SubscriptionId, Callback<A>)>>,
}

impl<A> Default for Listeners<A> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<A> Listeners<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, listener: impl Fn(&A) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Removes one listener. Returns `false` when `id` was not connected.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub fn emit(&self, args: &A) {
        let snapshot: Vec<Callback<A>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(args);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
