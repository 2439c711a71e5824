use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::models::Snapshot;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<u64, (String, Sender<Snapshot>)>,
}

/// Listener registry shared between a store and the subscriptions it hands out.
#[derive(Clone, Default)]
pub struct Subscribers {
    inner: Arc<Mutex<Registry>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, owner_id: &str) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut registry = lock(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, (owner_id.to_string(), tx));
        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.inner),
        }
    }

    pub fn has_listeners(&self, owner_id: &str) -> bool {
        lock(&self.inner)
            .listeners
            .values()
            .any(|(owner, _)| owner == owner_id)
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver a snapshot to every listener of `owner_id`, pruning disconnected ones.
    pub fn publish(&self, owner_id: &str, snapshot: &Snapshot) {
        let mut registry = lock(&self.inner);
        registry.listeners.retain(|id, (owner, tx)| {
            if owner != owner_id {
                return true;
            }
            let delivered = tx.send(snapshot.clone()).is_ok();
            if !delivered {
                tracing::debug!(subscription = id, "pruned disconnected listener");
            }
            delivered
        });
    }
}

/// Live feed of full board snapshots for one owner. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    rx: Receiver<Snapshot>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Drain pending snapshots and return the most recent, if any.
    pub fn latest(&self) -> Option<Snapshot> {
        self.rx.try_iter().last()
    }

    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).listeners.remove(&self.id);
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_reaches_only_matching_owner() {
        let subs = Subscribers::new();
        let alice = subs.subscribe("alice");
        let bob = subs.subscribe("bob");

        subs.publish("alice", &Snapshot::default());

        assert!(alice.latest().is_some());
        assert!(bob.latest().is_none());
    }

    #[test]
    fn latest_keeps_only_the_newest_snapshot() {
        let subs = Subscribers::new();
        let sub = subs.subscribe("alice");
        let mut second = Snapshot::default();
        second.columns.push(crate::models::Column {
            name: crate::models::DefaultStatus::Done.into(),
            order_index: 0,
            owner_id: "alice".into(),
        });

        subs.publish("alice", &Snapshot::default());
        subs.publish("alice", &second);

        assert_eq!(sub.latest(), Some(second));
        assert_eq!(sub.latest(), None);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let subs = Subscribers::new();
        let sub = subs.subscribe("alice");
        assert!(subs.has_listeners("alice"));
        sub.cancel();
        assert!(!subs.has_listeners("alice"));
        assert!(subs.is_empty());
    }
}
