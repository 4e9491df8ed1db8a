//! Current-value change feed with synchronous, in-order delivery.
//!
//! [`ValueDispatcher`] is the notification primitive the store publishes
//! through: it holds a current value and, whenever the value is replaced,
//! calls every subscribed handler in registration order before returning.
//! The model is single-threaded, so the subscriber list lives behind
//! `Rc<RefCell<...>>` rather than a lock.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type HandlerCell<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Subscriber<T> {
    id: u64,
    handler: HandlerCell<T>,
}

type SubscriberList<T> = Rc<RefCell<Vec<Subscriber<T>>>>;

/// Holds a current value and notifies subscribers of every replacement.
pub struct ValueDispatcher<T> {
    current: T,
    subscribers: SubscriberList<T>,
    next_id: u64,
}

impl<T> ValueDispatcher<T> {
    /// Create a dispatcher holding an initial value. No notification fires
    /// for the initial value.
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: 0,
        }
    }

    /// The current value.
    #[inline]
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Replace the current value and synchronously notify every subscriber,
    /// in registration order, before returning.
    pub fn set(&mut self, value: T) {
        self.current = value;
        // Snapshot the handler list so a handler that unsubscribes itself
        // mid-delivery does not invalidate the iteration.
        let snapshot: Vec<HandlerCell<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|s| Rc::clone(&s.handler))
            .collect();
        for handler in snapshot {
            (handler.borrow_mut())(&self.current);
        }
    }

    /// Register a handler for future value changes.
    ///
    /// Returns a [`Subscription`] token; dropping the token does not
    /// deregister, only [`Subscription::unsubscribe`] does.
    pub fn subscribe(&mut self, handler: impl FnMut(&T) + 'static) -> Subscription
    where
        T: 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        let handler: HandlerCell<T> = Rc::new(RefCell::new(handler));
        self.subscribers.borrow_mut().push(Subscriber { id, handler });

        let list = Rc::downgrade(&self.subscribers);
        Subscription::new(move || {
            if let Some(list) = list.upgrade() {
                list.borrow_mut().retain(|s| s.id != id);
            }
        })
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueDispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueDispatcher")
            .field("current", &self.current)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Token that deregisters one subscriber.
///
/// `unsubscribe` removes exactly the handler this token was returned for and
/// is idempotent: the second and later calls are no-ops.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Deregister the handler. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// True until the first `unsubscribe` call.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
