use std::future::Future;
use std::sync::Arc;

use uiflow_core::Subscription;

use crate::{StateHandler, StateUpdater, StateView, UiState};

/// Read side of a state owner: what the view layer is allowed to see.
pub trait UiStateOwner<T> {
    /// Current envelope.
    fn state(&self) -> UiState<T>;

    /// Current envelope now, then every change.
    fn observe_state(&self, f: impl Fn(&UiState<T>) + Send + Sync + 'static) -> Subscription;

    /// Current data now, then every data write. Tag-only changes are skipped.
    fn observe_data(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription;

    /// Current data, for consumers that don't care about the tag.
    fn peek(&self) -> Arc<T> {
        self.state().shared_data().clone()
    }
}

/// Mutation side of a state owner.
///
/// Failures inside a block end up in [`StateTag::Error`](crate::StateTag::Error)
/// and are never returned to the caller.
pub trait MutableUiStateOwner<T: 'static>: UiStateOwner<T> {
    fn update_sync<F>(&self, mutator: F)
    where
        F: FnOnce(&StateUpdater<T>) -> anyhow::Result<()>;

    fn update_async<F, Fut>(&self, show_loading: bool, mutator: F) -> impl Future<Output = ()>
    where
        F: FnOnce(StateUpdater<T>) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>;

    fn run_catching<Fut>(&self, show_loading: bool, block: Fut) -> impl Future<Output = ()>
    where
        Fut: Future<Output = anyhow::Result<()>>;
}

impl<T: Send + Sync + 'static> UiStateOwner<T> for StateHandler<T> {
    fn state(&self) -> UiState<T> {
        StateHandler::state(self)
    }

    fn observe_state(&self, f: impl Fn(&UiState<T>) + Send + Sync + 'static) -> Subscription {
        StateHandler::observe_state(self, f)
    }

    fn observe_data(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        StateHandler::observe_data(self, f)
    }
}

impl<T: Send + Sync + 'static> MutableUiStateOwner<T> for StateHandler<T> {
    fn update_sync<F>(&self, mutator: F)
    where
        F: FnOnce(&StateUpdater<T>) -> anyhow::Result<()>,
    {
        StateHandler::update_sync(self, mutator)
    }

    fn update_async<F, Fut>(&self, show_loading: bool, mutator: F) -> impl Future<Output = ()>
    where
        F: FnOnce(StateUpdater<T>) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        StateHandler::update_async(self, show_loading, mutator)
    }

    fn run_catching<Fut>(&self, show_loading: bool, block: Fut) -> impl Future<Output = ()>
    where
        Fut: Future<Output = anyhow::Result<()>>,
    {
        StateHandler::run_catching(self, show_loading, block)
    }
}

impl<T: Send + Sync + 'static> UiStateOwner<T> for StateView<T> {
    fn state(&self) -> UiState<T> {
        StateView::state(self)
    }

    fn observe_state(&self, f: impl Fn(&UiState<T>) + Send + Sync + 'static) -> Subscription {
        StateView::observe_state(self, f)
    }

    fn observe_data(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        StateView::observe_data(self, f)
    }
}
