//! Single-threaded observable state holder.
//!
//! Listeners are notified synchronously after every mutation with a snapshot
//! of the new value. Listeners may read or mutate the container themselves;
//! they are invoked after all internal borrows have been released.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

pub struct Observable<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(ListenerKey, Listener<T>)>>,
    next_key: Cell<u64>,
}

impl<T: Clone> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            listeners: RefCell::new(Vec::new()),
            next_key: Cell::new(0),
        }
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Register a listener called after each change.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> ListenerKey {
        let key = ListenerKey(self.next_key.get());
        self.next_key.set(key.0 + 1);
        self.listeners.borrow_mut().push((key, Rc::new(listener)));
        key
    }

    /// Remove a listener. Returns false if the key was unknown.
    pub fn unsubscribe(&self, key: ListenerKey) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(k, _)| *k != key);
        listeners.len() != before
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Replace the value and notify.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutate in place and notify. Returns whatever the closure returns.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = f(&mut self.value.borrow_mut());
        self.notify();
        out
    }

    fn notify(&self) {
        let snapshot = self.get();
        let listeners: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_see_each_change() {
        let obs = Observable::new(0_u32);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        obs.subscribe(move |v| sink.borrow_mut().push(*v));

        obs.set(3);
        obs.update(|v| *v += 1);

        assert_eq!(*seen.borrow(), vec![3, 4]);
        assert_eq!(obs.get(), 4);
    }

    #[test]
    fn unsubscribed_listeners_are_silent() {
        let obs = Observable::new(String::new());
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let key = obs.subscribe(move |_| counter.set(counter.get() + 1));

        obs.set("a".into());
        assert!(obs.unsubscribe(key));
        assert!(!obs.unsubscribe(key));
        obs.set("b".into());

        assert_eq!(hits.get(), 1);
        assert_eq!(obs.listener_count(), 0);
    }

    #[test]
    fn listener_may_read_back() {
        let obs = Rc::new(Observable::new(1_i32));
        let inner = Rc::clone(&obs);
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        obs.subscribe(move |_| sink.set(inner.get()));
        obs.set(9);
        assert_eq!(seen.get(), 9);
    }
}
