use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use smallvec::SmallVec;

use crate::panic::catch;
use crate::subscription::Subscription;

pub type ObserverId = u64;

type Callback<V> = Arc<dyn Fn(&V) + Send + Sync>;

/// Thread-safe holder of a single value.
///
/// Every write notifies the active observers in the order they subscribed,
/// and a new observer is handed the current value before anything else.
/// Writers are serialized: concurrent `set`/`update` calls from different
/// threads are applied one after the other and no update is lost.
///
/// A write issued from inside an observer callback is queued and delivered
/// once the current notification round is over, so all observers see the
/// same sequence of snapshots and the last one they see is the current value.
///
/// A panicking observer is logged and skipped. The writer never sees it and
/// the observer stays registered until its [`Subscription`] goes away.
pub struct Observable<V: 'static>(Arc<Inner<V>>);

struct Inner<V> {
    slot: Mutex<Slot<V>>,
    observers: Mutex<SmallVec<[Observer<V>; 4]>>,
    // Held for the whole write + notification round. Reentrant so that
    // observers may write back into the same cell.
    turn: ReentrantMutex<RefCell<Dispatch<V>>>,
    next_observer: AtomicU64,
}

struct Slot<V> {
    version: u64,
    value: V,
}

struct Observer<V> {
    id: ObserverId,
    // Versions at or below this were already handed over on subscribe.
    since: u64,
    active: Arc<AtomicBool>,
    callback: Callback<V>,
}

impl<V> Clone for Observer<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            since: self.since,
            active: self.active.clone(),
            callback: self.callback.clone(),
        }
    }
}

struct Dispatch<V> {
    draining: bool,
    pending: VecDeque<(u64, V)>,
}

// Resets the dispatch state if the round unwinds.
struct DrainGuard<'a, V>(&'a RefCell<Dispatch<V>>);

impl<V> Drop for DrainGuard<'_, V> {
    fn drop(&mut self) {
        let mut dispatch = self.0.borrow_mut();
        dispatch.draining = false;
        dispatch.pending.clear();
    }
}

impl<V> Clone for Observable<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V: Clone + Send + 'static> Observable<V> {
    pub fn new(value: V) -> Self {
        Self(Arc::new(Inner {
            slot: Mutex::new(Slot { version: 0, value }),
            observers: Mutex::new(SmallVec::new()),
            turn: ReentrantMutex::new(RefCell::new(Dispatch {
                draining: false,
                pending: VecDeque::new(),
            })),
            next_observer: AtomicU64::new(0),
        }))
    }

    pub fn get(&self) -> V {
        self.0.slot.lock().value.clone()
    }

    /// Replaces the value and notifies every observer.
    pub fn set(&self, value: V) {
        let turn = self.0.turn.lock();
        self.commit(&turn, value);
    }

    /// Atomic read-modify-write.
    pub fn update(&self, f: impl FnOnce(&V) -> V) {
        let turn = self.0.turn.lock();
        let next = f(&self.get());
        self.commit(&turn, next);
    }

    /// Read-modify-write that may decline to write.
    ///
    /// Returning `None` from `f` leaves the value untouched and notifies nobody.
    pub fn try_update<R>(&self, f: impl FnOnce(&V) -> Option<(V, R)>) -> Option<R> {
        let turn = self.0.turn.lock();
        let (next, out) = f(&self.get())?;
        self.commit(&turn, next);
        Some(out)
    }

    /// Registers `f`, calls it with the current value, then with every later
    /// value until the returned [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe(&self, f: impl Fn(&V) + Send + Sync + 'static) -> Subscription {
        let _turn = self.0.turn.lock();
        let id = self.0.next_observer.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        let callback: Callback<V> = Arc::new(f);

        let (since, current) = {
            let slot = self.0.slot.lock();
            (slot.version, slot.value.clone())
        };
        self.0.observers.lock().push(Observer {
            id,
            since,
            active: active.clone(),
            callback: callback.clone(),
        });
        log::trace!("observer {id} subscribed at version {since}");

        let inner = Arc::downgrade(&self.0);
        let subscription = Subscription::new(active, move || {
            if let Some(inner) = inner.upgrade() {
                inner.observers.lock().retain(|o| o.id != id);
                log::trace!("observer {id} unsubscribed");
            }
        });

        notify(id, &callback, &current);
        subscription
    }

    /// Handle that does not keep the cell alive. Observers that need to
    /// write back into their own cell should hold this instead of a clone.
    pub fn downgrade(&self) -> WeakObservable<V> {
        WeakObservable(Arc::downgrade(&self.0))
    }

    pub fn observer_count(&self) -> usize {
        self.0.observers.lock().len()
    }

    fn commit(&self, turn: &RefCell<Dispatch<V>>, next: V) {
        let version = {
            let mut slot = self.0.slot.lock();
            slot.version += 1;
            slot.value = next.clone();
            slot.version
        };
        turn.borrow_mut().pending.push_back((version, next));

        // Nested write from an observer: the outer round delivers it.
        if turn.borrow().draining {
            return;
        }
        turn.borrow_mut().draining = true;
        let _guard = DrainGuard(turn);

        loop {
            let next = turn.borrow_mut().pending.pop_front();
            let Some((version, value)) = next else {
                break;
            };
            let observers = self.0.observers.lock().clone();
            for observer in &observers {
                if observer.since < version && observer.active.load(Ordering::Acquire) {
                    notify(observer.id, &observer.callback, &value);
                }
            }
        }
    }
}

fn notify<V>(id: ObserverId, callback: &Callback<V>, value: &V) {
    if let Err(e) = catch(|| callback(value)) {
        log::warn!("observer {id} failed: {e}");
    }
}

impl<V: Clone + Send + Default + 'static> Default for Observable<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: Clone + Send + std::fmt::Debug + 'static> std::fmt::Debug for Observable<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.get())
            .field("observers", &self.observer_count())
            .finish()
    }
}

pub struct WeakObservable<V: 'static>(Weak<Inner<V>>);

impl<V> Clone for WeakObservable<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V> WeakObservable<V> {
    pub fn upgrade(&self) -> Option<Observable<V>> {
        self.0.upgrade().map(Observable)
    }
}

pub fn observable<V: Clone + Send + 'static>(value: V) -> Observable<V> {
    Observable::new(value)
}
