use uiflow_core::{Observable, Subscription};

use crate::receive::receive_from;
use crate::{EventId, UiEvent};

/// Contract of anything that owns a queue of pending [`UiEvent`]s.
pub trait UiEventOwner<E: UiEvent> {
    /// Pending events, oldest first.
    fn queue(&self) -> Vec<E>;

    /// Current queue now, then every change.
    fn observe_queue(&self, f: impl Fn(&[E]) + Send + Sync + 'static) -> Subscription;

    /// Appends `event` to the tail of the queue.
    fn send(&self, event: E);

    /// Removes every pending event with the same identity as `event`.
    fn consume(&self, event: &E);

    /// Hands the oldest event to `on_event`, removes it, and repeats while the
    /// queue is non-empty, for as long as the subscription lives.
    ///
    /// Assumes a single consumer. See [`EventHandler::claim`] for a dequeue
    /// that is safe with several.
    ///
    /// `on_event` runs on the thread that changed the queue, while that thread
    /// holds the queue's write turn. It must not block on another thread that
    /// sends to or consumes from the same queue: that thread waits for the
    /// turn and the two deadlock. Hand such work off instead of waiting on it.
    fn receive_events(&self, on_event: impl Fn(E) + Send + Sync + 'static) -> Subscription;
}

/// FIFO queue of one-shot events.
///
/// Any number of threads may [`send`](Self::send). Events stay queued until
/// consumed; nothing expires.
pub struct EventHandler<E: UiEvent> {
    queue: Observable<Vec<E>>,
}

impl<E: UiEvent> Clone for EventHandler<E> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<E: UiEvent> Default for EventHandler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: UiEvent> EventHandler<E> {
    pub fn new() -> Self {
        Self {
            queue: Observable::new(Vec::new()),
        }
    }

    pub fn queue(&self) -> Vec<E> {
        self.queue.get()
    }

    pub fn len(&self) -> usize {
        self.queue.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.get().is_empty()
    }

    pub fn observe_queue(&self, f: impl Fn(&[E]) + Send + Sync + 'static) -> Subscription {
        self.queue.subscribe(move |pending: &Vec<E>| f(pending))
    }

    pub fn send(&self, event: E) {
        log::trace!("queueing {}", event.id());
        self.queue.update(move |pending| {
            let mut next = Vec::with_capacity(pending.len() + 1);
            next.extend_from_slice(pending);
            next.push(event);
            next
        });
    }

    pub fn consume(&self, event: &E) {
        self.consume_id(event.id());
    }

    /// Removes every pending event with identity `id`. No-op if none is queued.
    pub fn consume_id(&self, id: EventId) {
        consume_from(&self.queue, id);
    }

    /// Atomically removes and returns the oldest pending event.
    ///
    /// Each queued event is handed to exactly one caller, however many
    /// threads claim concurrently.
    pub fn claim(&self) -> Option<E> {
        self.queue.try_update(|pending| {
            let (head, rest) = pending.split_first()?;
            Some((rest.to_vec(), head.clone()))
        })
    }

    pub fn receive_events(&self, on_event: impl Fn(E) + Send + Sync + 'static) -> Subscription {
        receive_from(&self.queue, on_event)
    }
}

impl<E: UiEvent> UiEventOwner<E> for EventHandler<E> {
    fn queue(&self) -> Vec<E> {
        EventHandler::queue(self)
    }

    fn observe_queue(&self, f: impl Fn(&[E]) + Send + Sync + 'static) -> Subscription {
        EventHandler::observe_queue(self, f)
    }

    fn send(&self, event: E) {
        EventHandler::send(self, event)
    }

    fn consume(&self, event: &E) {
        EventHandler::consume(self, event)
    }

    fn receive_events(&self, on_event: impl Fn(E) + Send + Sync + 'static) -> Subscription {
        EventHandler::receive_events(self, on_event)
    }
}

pub(crate) fn consume_from<E: UiEvent>(queue: &Observable<Vec<E>>, id: EventId) {
    let removed = queue.try_update(|pending| {
        if !pending.iter().any(|e| e.id() == id) {
            return None;
        }
        let rest: Vec<E> = pending.iter().filter(|e| e.id() != id).cloned().collect();
        Some((rest, ()))
    });
    if removed.is_some() {
        log::trace!("consumed {id}");
    }
}
