//! Typed change notification
//!
//! A [`Signal`] is a list of handlers for one kind of event. Each form
//! field owns its signals; editors connect closures that capture the
//! tool handle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use toolbench_core::types::UiHandler;

/// Handle returned by [`Signal::connect`], used to disconnect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// A list of handlers receiving `&T`
pub struct Signal<T> {
    handlers: RefCell<Vec<(HandlerId, UiHandler<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Signal<T> {
    /// Create a signal with no handlers
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register a handler; handlers run in connection order
    pub fn connect<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&T) + 'static,
    {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler; returns false if it was not connected
    pub fn disconnect(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(hid, _)| *hid != id);
        handlers.len() != before
    }

    /// Call every handler with `value`
    ///
    /// The handler list is snapshotted first, so handlers may connect or
    /// disconnect during emission; such changes apply from the next emit.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<UiHandler<T>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in snapshot {
            handler(value);
        }
    }

    /// Number of connected handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbench_core::types::shared;

    #[test]
    fn test_handlers_run_in_order() {
        let log = shared(Vec::new());
        let signal: Signal<u32> = Signal::new();
        let l1 = log.clone();
        signal.connect(move |v| l1.borrow_mut().push(("a", *v)));
        let l2 = log.clone();
        signal.connect(move |v| l2.borrow_mut().push(("b", *v)));

        signal.emit(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_disconnect() {
        let count = shared(0);
        let signal: Signal<()> = Signal::new();
        let c = count.clone();
        let id = signal.connect(move |_| *c.borrow_mut() += 1);
        signal.emit(&());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(&());
        assert_eq!(*count.borrow(), 1);
        assert_eq!(signal.handler_count(), 0);
    }

    #[test]
    fn test_connect_during_emit() {
        let signal: Rc<Signal<()>> = Rc::new(Signal::new());
        let count = shared(0);
        let s = signal.clone();
        let c = count.clone();
        signal.connect(move |_| {
            let c = c.clone();
            s.connect(move |_| *c.borrow_mut() += 1);
        });
        signal.emit(&());
        assert_eq!(*count.borrow(), 0);
        signal.emit(&());
        assert_eq!(*count.borrow(), 1);
    }
}
