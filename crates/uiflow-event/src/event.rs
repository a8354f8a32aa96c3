use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one event instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

impl EventId {
    pub fn next() -> Self {
        Self(NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// A signal meant to be handled once and then discarded.
///
/// Identity comes from [`id`](UiEvent::id), not from the payload: two events
/// carrying equal data are still two events.
pub trait UiEvent: Clone + Send + Sync + 'static {
    fn id(&self) -> EventId;
}

/// Ready-made event: a fresh [`EventId`] plus any payload.
#[derive(Debug, Clone)]
pub struct OneShot<P> {
    id: EventId,
    payload: P,
}

impl<P> OneShot<P> {
    pub fn new(payload: P) -> Self {
        Self {
            id: EventId::next(),
            payload,
        }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<P: Clone + Send + Sync + 'static> UiEvent for OneShot<P> {
    fn id(&self) -> EventId {
        self.id
    }
}
