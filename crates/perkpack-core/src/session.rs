//! Session-scoped extension points the host calls into
//!
//! A [`Session`] lives for one play session and is lent to modules when they
//! initialize and when they are destroyed. Listeners are held weakly: the
//! session never keeps a module alive, and a dropped module simply stops
//! receiving calls even if it was never unsubscribed.

use crate::actor::{Actor, Item};
use crate::host::{Requests, World};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A hit resolved by the host's damage system
#[derive(Debug, Clone, PartialEq)]
pub struct DamageEvent {
    pub amount: f32,
    /// Damage type tag such as `fall` or `hazard_acid`
    pub kind: String,
    /// False when the hit killed the actor
    pub survived: bool,
    /// Host frame the hit was resolved in
    pub frame: u64,
}

impl DamageEvent {
    pub fn new(amount: f32, kind: impl Into<String>, frame: u64) -> Self {
        Self {
            amount,
            kind: kind.into(),
            survived: true,
            frame,
        }
    }
}

/// Receives survived hits
pub trait DamageListener {
    fn on_damage(&mut self, event: &DamageEvent, actor: &mut Actor, requests: &mut Requests);
}

/// May substitute an item before the host puts it in a hand
pub trait ItemInterceptor {
    /// Return the replacement, or `None` to let the item through
    fn intercept(&mut self, item: &Item, world: &mut dyn World) -> Option<Item>;
}

struct ListenerList<T: ?Sized> {
    next_id: u64,
    entries: Vec<(ListenerId, Weak<RefCell<T>>)>,
}

impl<T: ?Sized> ListenerList<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn subscribe(&mut self, listener: Weak<RefCell<T>>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(eid, _)| *eid != id);
        self.entries.len() != before
    }

    /// Upgrade live listeners, pruning dropped ones
    fn live(&mut self) -> Vec<Rc<RefCell<T>>> {
        self.entries.retain(|(_, weak)| weak.strong_count() > 0);
        self.entries
            .iter()
            .filter_map(|(_, weak)| weak.upgrade())
            .collect()
    }

    fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }
}

/// The damage-received stream
pub struct DamageEvents {
    listeners: ListenerList<dyn DamageListener>,
}

impl DamageEvents {
    pub fn new() -> Self {
        Self {
            listeners: ListenerList::new(),
        }
    }

    pub fn subscribe<L: DamageListener + 'static>(&mut self, listener: &Rc<RefCell<L>>) -> ListenerId {
        let listener: Rc<RefCell<dyn DamageListener>> = listener.clone();
        self.listeners.subscribe(Rc::downgrade(&listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Deliver a hit to every listener; fatal hits are not forwarded
    ///
    /// Returns the number of listeners called.
    pub fn publish(&mut self, event: &DamageEvent, actor: &mut Actor, requests: &mut Requests) -> usize {
        if !event.survived {
            trace!(kind = %event.kind, "fatal hit not forwarded");
            return 0;
        }
        let live = self.listeners.live();
        for listener in &live {
            listener.borrow_mut().on_damage(event, actor, requests);
        }
        live.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for DamageEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Hooks consulted before an item is added to a hand
pub struct InsertionHooks {
    interceptors: ListenerList<dyn ItemInterceptor>,
}

impl InsertionHooks {
    pub fn new() -> Self {
        Self {
            interceptors: ListenerList::new(),
        }
    }

    pub fn register<I: ItemInterceptor + 'static>(&mut self, interceptor: &Rc<RefCell<I>>) -> ListenerId {
        let interceptor: Rc<RefCell<dyn ItemInterceptor>> = interceptor.clone();
        self.interceptors.subscribe(Rc::downgrade(&interceptor))
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        self.interceptors.unsubscribe(id)
    }

    /// Run the item past each interceptor in registration order
    ///
    /// The first interceptor that substitutes wins.
    pub fn intercept(&mut self, item: Item, world: &mut dyn World) -> Item {
        for interceptor in self.interceptors.live() {
            if let Some(replacement) = interceptor.borrow_mut().intercept(&item, world) {
                return replacement;
            }
        }
        item
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InsertionHooks {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension points shared by all perks in a play session
#[derive(Default)]
pub struct Session {
    pub damage: DamageEvents,
    pub insertion: InsertionHooks,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EmptyWorld;
    use crate::identity::ItemId;

    #[derive(Default)]
    struct Counter {
        hits: u32,
    }

    impl DamageListener for Counter {
        fn on_damage(&mut self, _event: &DamageEvent, _actor: &mut Actor, _requests: &mut Requests) {
            self.hits += 1;
        }
    }

    struct Renamer;

    impl ItemInterceptor for Renamer {
        fn intercept(&mut self, item: &Item, _world: &mut dyn World) -> Option<Item> {
            let mut renamed = item.clone();
            renamed.name = "Item_Swapped".into();
            Some(renamed)
        }
    }

    #[test]
    fn test_publish_skips_fatal_hits() {
        let mut stream = DamageEvents::new();
        let counter = Rc::new(RefCell::new(Counter::default()));
        stream.subscribe(&counter);

        let mut actor = Actor::default();
        let mut requests = Requests::new();
        let mut fatal = DamageEvent::new(10.0, "fall", 1);
        fatal.survived = false;

        assert_eq!(stream.publish(&fatal, &mut actor, &mut requests), 0);
        assert_eq!(stream.publish(&DamageEvent::new(1.0, "fall", 2), &mut actor, &mut requests), 1);
        assert_eq!(counter.borrow().hits, 1);
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let mut stream = DamageEvents::new();
        let counter = Rc::new(RefCell::new(Counter::default()));
        stream.subscribe(&counter);
        assert_eq!(stream.listener_count(), 1);
        drop(counter);
        assert_eq!(stream.listener_count(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut stream = DamageEvents::new();
        let counter = Rc::new(RefCell::new(Counter::default()));
        let id = stream.subscribe(&counter);
        assert!(stream.unsubscribe(id));
        assert!(!stream.unsubscribe(id));
        assert_eq!(stream.listener_count(), 0);
    }

    #[test]
    fn test_insertion_hook_substitutes() {
        let mut hooks = InsertionHooks::new();
        let item = Item::new(ItemId::new(1), "Item_Rebar");
        assert_eq!(hooks.intercept(item.clone(), &mut EmptyWorld).name, "Item_Rebar");

        let renamer = Rc::new(RefCell::new(Renamer));
        hooks.register(&renamer);
        assert_eq!(hooks.intercept(item, &mut EmptyWorld).name, "Item_Swapped");
    }
}
