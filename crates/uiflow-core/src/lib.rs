//! # Observable cells
//!
//! The foundation the uiflow state and event crates are built on. There are
//! three pieces:
//!
//! - `Observable<V>`: thread-safe value cell with change notification.
//! - `Subscription`: handle that keeps an observer registered.
//! - `catch` / `catch_future`: turn panics into a plain [`Error`].
//!
//! ## Observables
//!
//! `Observable<V>` is a cloneable handle to a single value. New observers get
//! the current value first, then every later write:
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use uiflow_core::*;
//!
//! let count = observable(0);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sub = count.subscribe({
//!     let seen = seen.clone();
//!     move |v| seen.lock().unwrap().push(*v)
//! });
//!
//! count.set(1);
//! count.update(|v| v + 1);
//! assert_eq!(count.get(), 2);
//! assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
//!
//! sub.unsubscribe();
//! count.set(3);
//! assert_eq!(seen.lock().unwrap().len(), 3);
//! ```
//!
//! Writes are serialized, so `update` from many threads never loses an
//! increment. Observers run on the writing thread while the write turn is
//! held; keep them short and never block them on another writer of the same
//! cell.
//!
//! ## Subscriptions
//!
//! Dropping a `Subscription` unsubscribes. Call `detach()` to keep an observer
//! for as long as the cell lives.

pub mod error;
pub mod observable;
pub mod panic;
pub mod subscription;

pub use error::*;
pub use observable::*;
pub use panic::*;
pub use subscription::*;
