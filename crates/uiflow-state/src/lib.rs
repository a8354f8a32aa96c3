//! # UI state
//!
//! A single observable source of truth for a screen. The data lives in a
//! [`UiState<T>`] envelope together with a [`StateTag`]:
//!
//! - `Content`: render the data normally.
//! - `Loading`: an async mutation asked for a spinner.
//! - `Error(cause)`: the last mutation failed; the data is the last good value.
//!
//! ## Mutations
//!
//! ```rust
//! use uiflow_state::StateHandler;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter {
//!     count: u32,
//! }
//!
//! let handler = StateHandler::new(Counter { count: 0 });
//!
//! handler.update_sync(|s| {
//!     s.set(Counter { count: 5 });
//!     Ok(())
//! });
//! assert_eq!(handler.state().data(), &Counter { count: 5 });
//! assert!(handler.state().tag().is_content());
//!
//! handler.update_sync(|_| Err(uiflow_state::anyhow::anyhow!("offline")));
//! assert_eq!(handler.state().tag().error().unwrap().to_string(), "offline");
//! assert_eq!(handler.peek().count, 5);
//! ```
//!
//! `update_async` and `run_catching` do the same for blocks that await. They
//! are plain futures: drive them with whatever executor the app already runs.
//!
//! ## Sharing with the view
//!
//! Hand the view a [`StateView`] (read-only) or implement the owner traits on
//! a view model with [`delegate_ui_state!`].

mod delegate;
pub mod handler;
pub mod owner;
pub mod state;
pub mod tag;
mod tests;
pub mod updater;

pub use anyhow;
pub use handler::*;
pub use owner::*;
pub use state::*;
pub use tag::*;
pub use uiflow_core::Subscription;
pub use updater::*;
