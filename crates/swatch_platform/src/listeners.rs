//! Synchronous observer lists
//!
//! Everything in Swatch runs on the UI thread, so listeners are plain
//! `Rc` callbacks invoked in registration order before `emit` returns.
//! Subscribing hands back a [`Subscription`] guard; dropping it removes the
//! callback.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifier of a registered listener
    pub struct ListenerId;
}

type Callback<T> = Rc<dyn Fn(&T)>;

/// An ordered set of callbacks receiving `&T`
pub struct Listeners<T> {
    slots: Rc<RefCell<SlotMap<ListenerId, Callback<T>>>>,
}

impl<T: 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    /// Register a callback. It stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = self.slots.borrow_mut().insert(Rc::new(callback));
        let slots = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = slots.upgrade() {
                slots.borrow_mut().remove(id);
            }
        })
    }

    /// Invoke every callback with `value`.
    ///
    /// Callbacks may subscribe, unsubscribe or emit again; the set that runs
    /// is the one registered when `emit` was called.
    pub fn emit(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = self.slots.borrow().values().cloned().collect();
        for callback in callbacks {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.slots.borrow().len())
            .finish()
    }
}

/// Guard for a registered callback; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release, for sources that never emit.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribe now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
