//! Unsubscribe handles for listeners a player registers with its host.
//!
//! Every listener (window resize, image load/error) is wrapped in a
//! [`Subscription`] at registration time. A player keeps them in a
//! [`SubscriptionSet`] and tears all of them down together on destroy.

/// A registered listener plus the action that detaches it.
///
/// Dropping an active subscription detaches it.
pub struct Subscription {
    label: &'static str,
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(label: &'static str, teardown: impl FnOnce() + 'static) -> Self {
        Self {
            label,
            teardown: Some(Box::new(teardown)),
        }
    }

    /// What the listener is for (used in debug logs).
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_active(&self) -> bool {
        self.teardown.is_some()
    }

    /// Detach the listener. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}

/// All subscriptions owned by one player.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    entries: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.entries.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detach every listener, in registration order, and forget them.
    pub fn unsubscribe_all(&mut self) {
        for mut subscription in self.entries.drain(..) {
            log::debug!("detaching {} listener", subscription.label());
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn unsubscribe_runs_once() {
        let calls = Rc::new(RefCell::new(0));
        let c = Rc::clone(&calls);
        let mut sub = Subscription::new("resize", move || *c.borrow_mut() += 1);
        assert_eq!(sub.label(), "resize");
        assert!(sub.is_active());
        sub.unsubscribe();
        sub.unsubscribe();
        drop(sub);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn drop_detaches_active_subscription() {
        let calls = Rc::new(RefCell::new(0));
        let c = Rc::clone(&calls);
        drop(Subscription::new("load", move || *c.borrow_mut() += 1));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn set_tears_down_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut set = SubscriptionSet::new();
        for label in ["resize", "load", "error"] {
            let o = Rc::clone(&order);
            set.push(Subscription::new(label, move || o.borrow_mut().push(label)));
        }
        assert_eq!(set.len(), 3);
        set.unsubscribe_all();
        assert!(set.is_empty());
        assert_eq!(*order.borrow(), vec!["resize", "load", "error"]);
    }
}
