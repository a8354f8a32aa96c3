use uiflow_core::{Observable, Subscription, catch};

use crate::UiEvent;
use crate::handler::consume_from;

// The notification is only a trigger: the head is read from the live queue,
// so a stale snapshot still in flight can't hand out an event twice.
pub(crate) fn receive_from<E: UiEvent>(
    queue: &Observable<Vec<E>>,
    on_event: impl Fn(E) + Send + Sync + 'static,
) -> Subscription {
    let weak = queue.downgrade();
    queue.subscribe(move |_: &Vec<E>| {
        let Some(queue) = weak.upgrade() else {
            return;
        };
        let Some(head) = queue.get().first().cloned() else {
            return;
        };
        let id = head.id();
        if let Err(e) = catch(|| on_event(head)) {
            // Left pending; it is offered again on the next queue change.
            log::warn!("event handler for {id} failed: {e}");
            return;
        }
        consume_from(&queue, id);
    })
}
