use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use uiflow_core::{Observable, Subscription, catch, catch_future};

use crate::{StateError, StateTag, StateUpdater, UiState};

/// Owns one [`UiState`] and runs mutations against it.
///
/// Every mutation ends in `Content` when the block returns `Ok`, or in
/// `Error(cause)` when it returns `Err` or panics. The failure never reaches
/// the caller; read it from the tag.
///
/// Mutations are expected to be issued by a single writer. Two mutations
/// running at the same time on one handler may interleave their reads of the
/// data.
pub struct StateHandler<T: 'static> {
    state: Observable<UiState<T>>,
}

impl<T: Send + Sync + 'static> StateHandler<T> {
    pub fn new(data: T) -> Self {
        Self::with_tag(data, StateTag::Content)
    }

    pub fn with_tag(data: T, tag: StateTag) -> Self {
        Self {
            state: Observable::new(UiState::new(data, tag)),
        }
    }

    pub fn state(&self) -> UiState<T> {
        self.state.get()
    }

    pub fn peek(&self) -> Arc<T> {
        self.state.get().shared_data().clone()
    }

    pub fn observe_state(&self, f: impl Fn(&UiState<T>) + Send + Sync + 'static) -> Subscription {
        self.state.subscribe(f)
    }

    /// Observes the data only: the current value first, then each data write.
    /// Tag-only transitions are not reported.
    pub fn observe_data(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        observe_data(&self.state, f)
    }

    /// Read-only handle sharing this handler's state.
    pub fn view(&self) -> StateView<T> {
        StateView {
            state: self.state.clone(),
        }
    }

    pub fn update_sync<F>(&self, mutator: F)
    where
        F: FnOnce(&StateUpdater<T>) -> anyhow::Result<()>,
    {
        let updater = self.updater();
        let outcome = catch(|| mutator(&updater));
        settle(&updater, outcome);
    }

    /// Like [`update_sync`](Self::update_sync), for blocks that await.
    ///
    /// With `show_loading` the tag is `Loading` before the block starts. If the
    /// returned future is dropped before it completes, the tag stays where the
    /// block left it, usually `Loading`.
    pub async fn update_async<F, Fut>(&self, show_loading: bool, mutator: F)
    where
        F: FnOnce(StateUpdater<T>) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let updater = self.updater();
        if show_loading {
            updater.set_tag(StateTag::Loading);
        }
        let outcome = match catch(|| mutator(updater.clone())) {
            Ok(fut) => catch_future(fut).await,
            Err(panicked) => Err(panicked),
        };
        settle(&updater, outcome);
    }

    /// Runs `block` for its side effects, reporting only through the tag.
    pub async fn run_catching<Fut>(&self, show_loading: bool, block: Fut)
    where
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let updater = self.updater();
        if show_loading {
            updater.set_tag(StateTag::Loading);
        }
        let outcome = catch_future(block).await;
        settle(&updater, outcome);
    }

    fn updater(&self) -> StateUpdater<T> {
        StateUpdater::new(self.state.clone())
    }
}

impl<T: Send + Sync + Default + 'static> Default for StateHandler<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug + Send + Sync + 'static> std::fmt::Debug for StateHandler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateHandler")
            .field("state", &self.state.get())
            .finish()
    }
}

/// Read-only view of a [`StateHandler`], for handing to the view layer.
pub struct StateView<T: 'static> {
    state: Observable<UiState<T>>,
}

impl<T> Clone for StateView<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> StateView<T> {
    pub fn state(&self) -> UiState<T> {
        self.state.get()
    }

    pub fn peek(&self) -> Arc<T> {
        self.state.get().shared_data().clone()
    }

    pub fn observe_state(&self, f: impl Fn(&UiState<T>) + Send + Sync + 'static) -> Subscription {
        self.state.subscribe(f)
    }

    pub fn observe_data(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        observe_data(&self.state, f)
    }
}

fn settle<T: Send + Sync + 'static>(
    updater: &StateUpdater<T>,
    outcome: uiflow_core::Result<anyhow::Result<()>>,
) {
    match outcome {
        Ok(Ok(())) => updater.set_tag(StateTag::Content),
        Ok(Err(error)) => {
            log::debug!("state mutation failed: {error:#}");
            updater.set_tag(StateTag::Error(StateError::new(error)));
        }
        Err(panicked) => {
            log::warn!("{panicked}");
            updater.set_tag(StateTag::Error(StateError::new(panicked)));
        }
    }
}

// Per-subscriber projection; the last seen allocation lives in the closure.
fn observe_data<T: Send + Sync + 'static>(
    state: &Observable<UiState<T>>,
    f: impl Fn(&T) + Send + Sync + 'static,
) -> Subscription {
    let last: Mutex<Option<Arc<T>>> = Mutex::new(None);
    state.subscribe(move |snapshot| {
        {
            let mut last = last.lock();
            if last
                .as_ref()
                .is_some_and(|prev| Arc::ptr_eq(prev, snapshot.shared_data()))
            {
                return;
            }
            *last = Some(snapshot.shared_data().clone());
        }
        f(snapshot.data());
    })
}
