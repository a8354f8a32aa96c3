//! # UI events
//!
//! One-shot signals (navigate, show a toast) that must be handled once and
//! then dropped, as opposed to state that is re-rendered.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use uiflow_event::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Nav {
//!     Details(u32),
//!     Back,
//! }
//!
//! let events = EventHandler::new();
//! let a = OneShot::new(Nav::Details(7));
//! events.send(a.clone());
//! events.send(OneShot::new(Nav::Back));
//! events.consume(&a);
//! assert_eq!(events.queue().len(), 1);
//!
//! let handled = Arc::new(Mutex::new(Vec::new()));
//! let _sub = events.receive_events({
//!     let handled = handled.clone();
//!     move |e: OneShot<Nav>| handled.lock().unwrap().push(e.into_payload())
//! });
//! assert_eq!(*handled.lock().unwrap(), vec![Nav::Back]);
//! assert!(events.is_empty());
//! ```
//!
//! `receive_events` runs the callback on whichever thread changed the queue,
//! inside that thread's write turn, so the callback must not wait on another
//! producer of the same queue.
//! It assumes one consumer; use [`EventHandler::claim`] when several
//! consumers pull from the same queue.

pub mod event;
pub mod handler;
mod receive;

pub use event::*;
pub use handler::*;
pub use uiflow_core::Subscription;
